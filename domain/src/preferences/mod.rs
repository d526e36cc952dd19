//! Preference domain
//!
//! The typed reader profile that drives a recommendation round, plus the
//! sanitizer that guards its construction.

mod adventurousness;
mod entities;
mod genre;
pub mod sanitizer;

pub use adventurousness::Adventurousness;
pub use entities::Preferences;
pub use genre::Genre;
pub use sanitizer::InputSanitizer;
