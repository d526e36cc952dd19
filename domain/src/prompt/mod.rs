//! Prompt domain
//!
//! Templates that turn validated preferences and the session's exclusion
//! set into the system and user messages for one attempt.

mod template;

pub use template::{PromptPair, PromptTemplate};
