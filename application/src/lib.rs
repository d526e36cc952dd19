//! Application layer for bookbot
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{PipelineConfig, RetryPolicy, SamplingParams};
pub use ports::{
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    progress::{AttemptFailure, NoProgress, RoundProgressNotifier},
    transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger},
};
pub use use_cases::complete_with_retry::{AttemptError, CompletionClient, CompletionError};
pub use use_cases::recommend_books::{
    RecommendBooksError, RecommendBooksInput, RecommendBooksUseCase, RoundOutput,
};
pub use use_cases::shared::RetryBudget;
