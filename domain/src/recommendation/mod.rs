//! Recommendation domain
//!
//! Candidates recovered from model output, the validator that filters them,
//! and the session-wide exclusion set.

mod candidate;
mod entities;
mod exclusion;
pub mod validator;

pub use candidate::CandidateRecommendation;
pub use entities::{RecommendationBatch, ValidatedRecommendation};
pub use exclusion::ExclusionSet;
pub use validator::{
    DropReason, DroppedCandidate, RecommendationValidator, ValidationError, ValidationOutcome,
    ValidationReport, ValidationRules,
};
