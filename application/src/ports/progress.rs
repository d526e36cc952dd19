//! Progress notification port
//!
//! Defines the interface for reporting progress during a recommendation round.

use std::fmt;

/// Why an attempt did not produce a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptFailure {
    /// Gateway error, timeout or empty response
    Llm,
    /// No JSON array could be recovered from the response
    Unparseable,
    /// Too few candidates survived validation
    Invalid,
    /// Every usable candidate had already been recommended
    Duplicates,
}

impl AttemptFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptFailure::Llm => "llm",
            AttemptFailure::Unparseable => "unparseable",
            AttemptFailure::Invalid => "invalid",
            AttemptFailure::Duplicates => "duplicates",
        }
    }
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Callback for progress updates during a round
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain text, etc.)
pub trait RoundProgressNotifier: Send + Sync {
    /// Called before each request to the model
    fn on_attempt_start(&self, attempt: usize, max_attempts: usize);

    /// Called when an attempt fails; `will_retry` is false on the last one
    fn on_attempt_failed(&self, attempt: usize, failure: AttemptFailure, will_retry: bool);

    /// Called once when the round ends
    fn on_round_complete(&self, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl RoundProgressNotifier for NoProgress {
    fn on_attempt_start(&self, _attempt: usize, _max_attempts: usize) {}
    fn on_attempt_failed(&self, _attempt: usize, _failure: AttemptFailure, _will_retry: bool) {}
}
