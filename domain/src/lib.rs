//! Domain layer for bookbot
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Round
//!
//! A round turns [`Preferences`] into a [`RecommendationBatch`]:
//!
//! - **Prompt**: [`PromptTemplate`] renders the system and user messages
//! - **Extraction**: [`ResponseExtractor`] recovers candidate objects from model text
//! - **Validation**: [`RecommendationValidator`] filters candidates into a batch of 3 to 5
//!
//! ## Session
//!
//! Titles shown in earlier rounds live in an [`ExclusionSet`] owned by the
//! host and passed into each round, so a session never repeats a book.

pub mod config;
pub mod core;
pub mod extraction;
pub mod preferences;
pub mod prompt;
pub mod recommendation;
pub mod util;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{error::PreferenceError, language::Language, model::Model};
pub use extraction::{Extracted, ExtractionError, ExtractionStrategy, ResponseExtractor};
pub use preferences::{Adventurousness, Genre, InputSanitizer, Preferences};
pub use prompt::{PromptPair, PromptTemplate};
pub use recommendation::{
    CandidateRecommendation, DropReason, DroppedCandidate, ExclusionSet, RecommendationBatch,
    RecommendationValidator, ValidatedRecommendation, ValidationError, ValidationOutcome,
    ValidationReport, ValidationRules,
};
