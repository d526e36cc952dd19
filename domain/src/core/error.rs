//! Domain error types

use thiserror::Error;

/// Reasons a set of user preferences cannot become a [`Preferences`](crate::Preferences) value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("expected 1 to 3 genres, got {0}")]
    GenreCount(usize),

    #[error("unknown genre: {0}")]
    UnknownGenre(String),

    #[error("genre listed more than once: {0}")]
    DuplicateGenre(String),

    #[error("expected 2 or 3 favorite books, got {0}")]
    BookCount(usize),

    #[error("book title is empty")]
    EmptyTitle,

    #[error("book title longer than {max} characters: {title}")]
    TitleTooLong { title: String, max: usize },

    #[error("book title contains control characters: {0:?}")]
    ControlCharacters(String),

    #[error("book title has no letters or digits: {0}")]
    NoAlphanumeric(String),

    #[error("input looks like a prompt-injection attempt: {0}")]
    PromptInjection(String),

    #[error("adventurousness must be between 1 and 4, got {0}")]
    AdventurousnessOutOfRange(i64),
}

impl PreferenceError {
    /// Whether the error was raised by the injection filter
    pub fn is_injection(&self) -> bool {
        matches!(self, PreferenceError::PromptInjection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            PreferenceError::GenreCount(4).to_string(),
            "expected 1 to 3 genres, got 4"
        );
        assert_eq!(
            PreferenceError::AdventurousnessOutOfRange(9).to_string(),
            "adventurousness must be between 1 and 4, got 9"
        );
    }

    #[test]
    fn test_is_injection_check() {
        assert!(PreferenceError::PromptInjection("you are now".into()).is_injection());
        assert!(!PreferenceError::EmptyTitle.is_injection());
    }
}
