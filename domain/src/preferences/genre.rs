//! Genre value object: the fixed set of genres a reader may pick from

use crate::core::language::Language;
use serde::{Deserialize, Serialize};

/// One of the seven supported genres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    ScienceFiction,
    Fantasy,
    Mystery,
    Thriller,
    Romance,
    Nonfiction,
    Historical,
}

impl Genre {
    /// All genres in display order
    pub const ALL: [Genre; 7] = [
        Genre::ScienceFiction,
        Genre::Fantasy,
        Genre::Mystery,
        Genre::Thriller,
        Genre::Romance,
        Genre::Nonfiction,
        Genre::Historical,
    ];

    /// Canonical English name
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Genre::ScienceFiction => "science fiction",
            Genre::Fantasy => "fantasy",
            Genre::Mystery => "mystery",
            Genre::Thriller => "thriller",
            Genre::Romance => "romance",
            Genre::Nonfiction => "nonfiction",
            Genre::Historical => "historical",
        }
    }

    /// Name shown to the reader (and used in prompts) for the given language
    pub fn display_name(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.canonical_name(),
            Language::Zh => match self {
                Genre::ScienceFiction => "科幻",
                Genre::Fantasy => "奇幻",
                Genre::Mystery => "悬疑",
                Genre::Thriller => "惊悚",
                Genre::Romance => "爱情",
                Genre::Nonfiction => "非虚构",
                Genre::Historical => "历史",
            },
        }
    }

    /// Display names of every genre for the given language
    pub fn display_names(language: Language) -> Vec<&'static str> {
        Self::ALL.iter().map(|g| g.display_name(language)).collect()
    }

    /// Resolve user input to a genre.
    ///
    /// Matches the display name of the active language first, then the
    /// English name, case-insensitively and ignoring surrounding whitespace.
    pub fn lookup(input: &str, language: Language) -> Option<Genre> {
        let normalized = input.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.display_name(language) == normalized)
            .or_else(|| {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|g| g.canonical_name() == normalized)
            })
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_name())
    }
}
