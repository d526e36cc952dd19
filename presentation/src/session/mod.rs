//! Interactive session loop

mod runner;

pub use runner::{RecommendationSession, SessionEnd, SessionSummary, failure_message};
