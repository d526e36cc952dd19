//! Pipeline parameters: round and attempt control.
//!
//! [`PipelineConfig`] groups the static parameters that control a
//! recommendation round in [`RecommendBooksUseCase`](crate::use_cases::recommend_books::RecommendBooksUseCase).
//! These are application-layer concerns, not domain policy.

use bookbot_domain::{Model, ValidationRules};
use std::time::Duration;

/// Model sampling parameters sent with every request
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub model: Model,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// Retry and timeout policy for model calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per round, shared by every failure kind
    pub max_attempts: usize,
    /// Pause before each attempt after the first; zero disables it
    pub backoff: Duration,
    /// Upper bound on a single gateway call
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Everything a round needs besides its inputs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineConfig {
    pub sampling: SamplingParams,
    pub retry: RetryPolicy,
    pub validation: ValidationRules,
}

impl PipelineConfig {
    // ==================== Builder Methods ====================

    pub fn with_model(mut self, model: Model) -> Self {
        self.sampling.model = model;
        self
    }

    pub fn with_max_attempts(mut self, max: usize) -> Self {
        self.retry.max_attempts = max;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.retry.backoff = backoff;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.retry.timeout = timeout;
        self
    }

    pub fn with_validation(mut self, rules: ValidationRules) -> Self {
        self.validation = rules;
        self
    }
}
