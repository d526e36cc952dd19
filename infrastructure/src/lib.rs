//! Infrastructure layer for bookbot
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileInputConfig, FileLlmConfig,
    FileLoggingConfig, FileOutputConfig, FilePipelineConfig,
};
pub use logging::JsonlTranscriptLogger;
pub use providers::OpenAiGateway;
