//! Recommend Books use case.
//!
//! Runs one recommendation round:
//!
//! 1. Build prompts from the preferences and the session's exclusion set
//! 2. Call the model through the [`CompletionClient`]
//! 3. Extract candidates with the [`ResponseExtractor`] chain
//! 4. Validate them into a [`RecommendationBatch`]
//!
//! Steps 2 to 4 repeat on empty responses, extraction failures, validation
//! failures and all-duplicate results. Every repetition draws from one
//! [`RetryBudget`], so a round never makes more than
//! [`RetryPolicy::max_attempts`](crate::config::RetryPolicy) model calls.

use crate::config::PipelineConfig;
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway};
use crate::ports::progress::{AttemptFailure, RoundProgressNotifier};
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger};
use crate::use_cases::complete_with_retry::{AttemptError, CompletionClient, CompletionError};
use crate::use_cases::shared::{RetryBudget, is_cancelled};
use bookbot_domain::{
    ExclusionSet, ExtractionError, Language, Preferences, PromptTemplate, RecommendationBatch,
    RecommendationValidator, ResponseExtractor, ValidationError, ValidationOutcome,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Terminal failure of a round. Carries the last failure once the budget
/// is spent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendBooksError {
    #[error(transparent)]
    Completion(CompletionError),

    #[error("could not read recommendations from the model output: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("recommendations failed validation: {0}")]
    Validation(#[from] ValidationError),

    #[error("the model only suggested books that were already recommended ({attempts} attempt(s))")]
    OnlyDuplicates { attempts: usize },

    #[error("cancelled")]
    Cancelled,
}

impl From<CompletionError> for RecommendBooksError {
    fn from(e: CompletionError) -> Self {
        match e {
            CompletionError::Cancelled => RecommendBooksError::Cancelled,
            other => RecommendBooksError::Completion(other),
        }
    }
}

/// Input for the [`RecommendBooksUseCase`].
#[derive(Debug, Clone)]
pub struct RecommendBooksInput {
    pub preferences: Preferences,
    pub language: Language,
}

impl RecommendBooksInput {
    pub fn new(preferences: Preferences, language: Language) -> Self {
        Self {
            preferences,
            language,
        }
    }
}

/// Successful round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutput {
    pub batch: RecommendationBatch,
    /// Model calls made, including failed ones
    pub attempts_used: usize,
}

/// Use case for running one recommendation round.
pub struct RecommendBooksUseCase {
    client: CompletionClient,
    extractor: Arc<ResponseExtractor>,
    validator: RecommendationValidator,
    config: PipelineConfig,
    transcript: Arc<dyn TranscriptLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl Clone for RecommendBooksUseCase {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            extractor: self.extractor.clone(),
            validator: self.validator.clone(),
            config: self.config.clone(),
            transcript: self.transcript.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl RecommendBooksUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, config: PipelineConfig) -> Self {
        Self {
            client: CompletionClient::new(gateway, config.retry),
            extractor: Arc::new(ResponseExtractor::default()),
            validator: RecommendationValidator::new(config.validation),
            config,
            transcript: Arc::new(NoTranscriptLogger),
            cancellation_token: None,
        }
    }

    /// Create with a transcript logger.
    pub fn with_transcript_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.client = self.client.with_transcript_logger(logger.clone());
        self.transcript = logger;
        self
    }

    /// Replace the default extraction chain.
    pub fn with_extractor(mut self, extractor: ResponseExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one round against the current exclusion set.
    ///
    /// The caller owns `exclusions` and is expected to fold the returned
    /// batch into it before the next round.
    pub async fn execute(
        &self,
        input: &RecommendBooksInput,
        exclusions: &ExclusionSet,
        progress: &dyn RoundProgressNotifier,
    ) -> Result<RoundOutput, RecommendBooksError> {
        let result = self.run_round(input, exclusions, progress).await;
        progress.on_round_complete(result.is_ok());
        match &result {
            Ok(output) => info!(
                attempts = output.attempts_used,
                count = output.batch.len(),
                "Round complete"
            ),
            Err(e) => warn!(error = %e, "Round failed"),
        }
        result
    }

    async fn run_round(
        &self,
        input: &RecommendBooksInput,
        exclusions: &ExclusionSet,
        progress: &dyn RoundProgressNotifier,
    ) -> Result<RoundOutput, RecommendBooksError> {
        let prompts = PromptTemplate::build(&input.preferences, exclusions, input.language);
        debug!(
            language = %input.language,
            excluded = exclusions.len(),
            user_prompt = %prompts.user,
            "Built prompts"
        );
        self.transcript.log(TranscriptEvent::new(
            "prompt",
            json!({
                "language": input.language.as_str(),
                "system": prompts.system,
                "user": prompts.user,
                "excluded": exclusions.titles(),
            }),
        ));

        let sampling = &self.config.sampling;
        let request = CompletionRequest {
            model: sampling.model.clone(),
            system_prompt: prompts.system,
            user_prompt: prompts.user,
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
        };

        let mut budget = RetryBudget::new(self.config.retry.max_attempts);
        let mut last_failure: Option<RecommendBooksError> = None;

        while !budget.is_exhausted() {
            if is_cancelled(&self.cancellation_token) {
                return Err(RecommendBooksError::Cancelled);
            }

            let raw = self
                .client
                .complete_within(&mut budget, &request, progress, &self.cancellation_token)
                .await?;
            let attempt = budget.used();

            let extracted = match self.extractor.extract(&raw) {
                Ok(extracted) => extracted,
                Err(e) => {
                    warn!(attempt, error = %e, "Could not extract recommendations");
                    self.record_failure(attempt, AttemptFailure::Unparseable, &e.to_string());
                    progress.on_attempt_failed(attempt, AttemptFailure::Unparseable, !budget.is_exhausted());
                    last_failure = Some(e.into());
                    continue;
                }
            };
            debug!(
                attempt,
                strategy = extracted.strategy,
                candidates = extracted.candidates.len(),
                "Extracted candidates"
            );

            let report = self
                .validator
                .validate_detailed(&extracted.candidates, exclusions);
            for dropped in &report.dropped {
                warn!(
                    attempt,
                    index = dropped.index,
                    title = dropped.title.as_deref().unwrap_or("<none>"),
                    reason = %dropped.reason,
                    "Dropped candidate"
                );
            }

            match report.result {
                Ok(ValidationOutcome::Accepted(batch)) => {
                    self.transcript.log(TranscriptEvent::new(
                        "round_complete",
                        json!({ "attempts": attempt, "batch": &batch }),
                    ));
                    return Ok(RoundOutput {
                        batch,
                        attempts_used: attempt,
                    });
                }
                Ok(ValidationOutcome::NeedsRetry) => {
                    info!(attempt, "Every suggestion was already recommended; asking again");
                    self.record_failure(attempt, AttemptFailure::Duplicates, "all duplicates");
                    progress.on_attempt_failed(attempt, AttemptFailure::Duplicates, !budget.is_exhausted());
                    last_failure = Some(RecommendBooksError::OnlyDuplicates { attempts: attempt });
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Recommendations failed validation");
                    self.record_failure(attempt, AttemptFailure::Invalid, &e.to_string());
                    progress.on_attempt_failed(attempt, AttemptFailure::Invalid, !budget.is_exhausted());
                    last_failure = Some(e.into());
                }
            }
        }

        Err(last_failure.unwrap_or(RecommendBooksError::Completion(
            CompletionError::Exhausted {
                attempts: budget.used(),
                cause: AttemptError::NoAttemptsLeft,
            },
        )))
    }

    fn record_failure(&self, attempt: usize, failure: AttemptFailure, error: &str) {
        self.transcript.log(TranscriptEvent::new(
            "attempt_failed",
            json!({ "attempt": attempt, "stage": failure.as_str(), "error": error }),
        ));
    }
}
