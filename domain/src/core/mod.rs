//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: the LLM that generates recommendations
//! - [`language::Language`]: display and prompt language
//! - [`error::PreferenceError`]: rejection reasons for user input

pub mod error;
pub mod language;
pub mod model;
