//! Input sanitization for free-text preference fields.
//!
//! [`InputSanitizer`] is the capability a host must hold before it can
//! construct [`Preferences`](super::Preferences). It rejects control
//! characters, over-long strings, strings without a single letter or digit,
//! and text matching any configured prompt-injection pattern.

use crate::core::error::PreferenceError;
use regex::{Regex, RegexBuilder};

/// Longest accepted book title, in characters
pub const DEFAULT_MAX_TITLE_CHARS: usize = 200;

/// Prompt-injection phrases rejected by default (case-insensitive regexes)
pub const DEFAULT_INJECTION_PATTERNS: &[&str] = &[
    r"ignore previous instructions",
    r"pretend you are",
    r"disregard.*prompt",
    r"forget your instructions",
    r"you are now",
    r"act as if",
    r"new persona",
    r"override.*system",
];

/// Validates free-text user input before it may enter a prompt
#[derive(Debug, Clone)]
pub struct InputSanitizer {
    patterns: Vec<Regex>,
    max_chars: usize,
}

impl InputSanitizer {
    /// Build a sanitizer from host-supplied patterns.
    pub fn new<S: AsRef<str>>(patterns: &[S], max_chars: usize) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| RegexBuilder::new(p.as_ref()).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            max_chars,
        })
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Returns the first injection pattern matched by `text`, if any.
    pub fn injection_match(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|re| re.is_match(text))
            .map(|re| re.as_str())
    }

    /// Reject text that matches an injection pattern.
    pub fn check_injection(&self, text: &str) -> Result<(), PreferenceError> {
        match self.injection_match(text) {
            Some(_) => Err(PreferenceError::PromptInjection(text.to_string())),
            None => Ok(()),
        }
    }

    /// Validate a single book title and return it trimmed.
    pub fn check_title(&self, title: &str) -> Result<String, PreferenceError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(PreferenceError::EmptyTitle);
        }
        if trimmed.chars().any(char::is_control) {
            return Err(PreferenceError::ControlCharacters(trimmed.to_string()));
        }
        if trimmed.chars().count() > self.max_chars {
            return Err(PreferenceError::TitleTooLong {
                title: trimmed.to_string(),
                max: self.max_chars,
            });
        }
        if !trimmed.chars().any(char::is_alphanumeric) {
            return Err(PreferenceError::NoAlphanumeric(trimmed.to_string()));
        }
        self.check_injection(trimmed)?;
        Ok(trimmed.to_string())
    }
}

impl Default for InputSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_INJECTION_PATTERNS, DEFAULT_MAX_TITLE_CHARS)
            .expect("built-in injection patterns are valid regexes")
    }
}
