//! Application-level configuration.
//!
//! - [`PipelineConfig`]: sampling, retry policy and validation bounds for a round

pub mod pipeline;

pub use pipeline::{PipelineConfig, RetryPolicy, SamplingParams};
