//! Presentation layer for bookbot
//!
//! This crate contains the CLI definition, localized messages, interactive
//! preference collection, output formatters, progress reporters and the
//! multi-round session loop.

pub mod cli;
pub mod config;
pub mod i18n;
pub mod input;
pub mod output;
pub mod progress;
pub mod session;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use config::OutputConfig;
pub use i18n::Messages;
pub use input::{
    CollectError, InputError, LineSource, PreferenceCollector, PresetPreferences,
    TerminalLineSource, select_language,
};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use session::{RecommendationSession, SessionEnd, SessionSummary, failure_message};
