//! Model value object representing the LLM that generates recommendations

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// LLM models known to produce usable recommendation lists (Value Object)
///
/// The pipeline sends every request of a session to one fixed model.
/// Unknown identifiers are carried verbatim as [`Model::Custom`] so that any
/// OpenAI-compatible endpoint can be targeted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Gpt4oMini,
    Gpt4o,
    Gpt41,
    Gpt41Mini,
    Gpt5Mini,
    Custom(String),
}

impl Model {
    /// Get the string identifier sent to the provider
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Gpt4o => "gpt-4o",
            Model::Gpt41 => "gpt-4.1",
            Model::Gpt41Mini => "gpt-4.1-mini",
            Model::Gpt5Mini => "gpt-5-mini",
            Model::Custom(s) => s,
        }
    }

    /// Models with a built-in identifier
    pub fn known_models() -> Vec<Model> {
        vec![
            Model::Gpt4oMini,
            Model::Gpt4o,
            Model::Gpt41,
            Model::Gpt41Mini,
            Model::Gpt5Mini,
        ]
    }
}

impl Default for Model {
    /// Returns the default model (gpt-4o-mini)
    fn default() -> Self {
        Model::Gpt4oMini
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gpt-4o-mini" => Model::Gpt4oMini,
            "gpt-4o" => Model::Gpt4o,
            "gpt-4.1" => Model::Gpt41,
            "gpt-4.1-mini" => Model::Gpt41Mini,
            "gpt-5-mini" => Model::Gpt5Mini,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap())
    }
}
