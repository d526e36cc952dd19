//! Display language value object

use serde::{Deserialize, Serialize};

/// Language used for prompts, genre names and host messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    /// Separator used when listing items in running text
    pub fn list_separator(&self) -> &'static str {
        match self {
            Language::En => ", ",
            Language::Zh => "、",
        }
    }

    /// Split user-typed list input on the comma conventional for this language.
    ///
    /// Chinese input accepts both the full-width `，` and the ASCII comma.
    pub fn split_list(&self, input: &str) -> Vec<String> {
        let parts: Vec<&str> = match self {
            Language::En => input.split(',').collect(),
            Language::Zh => input.split(['，', ',']).collect(),
        };
        parts
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "zh" | "chinese" | "中文" => Ok(Language::Zh),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}
