//! Candidate extraction from free-form model output.
//!
//! Models are asked for a bare JSON array but often wrap it in prose, put it
//! in a Markdown fence, leave trailing commas, or nest it under a
//! `"recommendations"` key. [`ResponseExtractor`] runs an ordered chain of
//! [`ExtractionStrategy`]s and returns the first success.
//!
//! # Default chain
//!
//! | Strategy | Input it recovers |
//! |----------|-------------------|
//! | [`DirectJson`] | the whole text is JSON |
//! | [`FencedBlock`] | JSON inside a ```` ``` ```` / ```` ```json ```` fence |
//! | [`TrailingCommas`] | fenced or bare JSON with `,]` / `,}` |
//! | [`BracketScan`] | the first balanced `[...]` holding objects, anywhere in prose |
//!
//! Every strategy accepts either a top-level array or an object whose
//! `recommendations` field is an array.

mod strategies;
mod text;

pub use strategies::{BracketScan, DirectJson, FencedBlock, TrailingCommas};

use crate::recommendation::CandidateRecommendation;
use crate::util::truncate_str;
use serde_json::Value;
use thiserror::Error;

/// Maximum bytes of raw output quoted in an [`ExtractionError`]
pub const SNIPPET_MAX_BYTES: usize = 200;

/// One way of recovering a JSON array of candidates from text
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// The array elements, or `None` if this strategy does not apply.
    fn extract(&self, text: &str) -> Option<Vec<Value>>;
}

/// No strategy could recover an array
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not find a JSON array in model output (tried {}): {snippet:?}", .strategies.join(", "))]
pub struct ExtractionError {
    /// Leading part of the raw output
    pub snippet: String,
    /// Names of the strategies attempted, in order
    pub strategies: Vec<&'static str>,
}

/// Successful extraction
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub candidates: Vec<CandidateRecommendation>,
    /// Name of the strategy that succeeded
    pub strategy: &'static str,
}

/// Ordered chain of extraction strategies
pub struct ResponseExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ResponseExtractor {
    /// An extractor with no strategies; add some with [`with_strategy`](Self::with_strategy).
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: impl ExtractionStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract(&self, raw: &str) -> Result<Extracted, ExtractionError> {
        for strategy in &self.strategies {
            if let Some(values) = strategy.extract(raw) {
                return Ok(Extracted {
                    candidates: values.into_iter().map(CandidateRecommendation::new).collect(),
                    strategy: strategy.name(),
                });
            }
        }
        Err(ExtractionError {
            snippet: truncate_str(raw, SNIPPET_MAX_BYTES).to_string(),
            strategies: self.strategy_names(),
        })
    }

    /// Convenience wrapper returning only the candidates
    pub fn candidates(&self, raw: &str) -> Result<Vec<CandidateRecommendation>, ExtractionError> {
        self.extract(raw).map(|e| e.candidates)
    }
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::empty()
            .with_strategy(DirectJson)
            .with_strategy(FencedBlock)
            .with_strategy(TrailingCommas)
            .with_strategy(BracketScan)
    }
}

impl std::fmt::Debug for ResponseExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseExtractor")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
