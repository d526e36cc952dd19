//! Adventurousness value object

use crate::core::error::PreferenceError;
use crate::core::language::Language;
use serde::{Deserialize, Serialize};

/// How far from well-known titles the reader wants to go (1 = safe, 4 = surprise me)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Adventurousness(u8);

impl Adventurousness {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(level: i64) -> Result<Self, PreferenceError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(PreferenceError::AdventurousnessOutOfRange(level))
        }
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Natural-language description interpolated into the user prompt
    pub fn description(&self, language: Language) -> &'static str {
        match (language, self.0) {
            (Language::En, 1) => "very familiar, well-known classics and bestsellers",
            (Language::En, 2) => "mostly familiar titles with a few lesser-known picks",
            (Language::En, 3) => "a mix of familiar favorites and hidden gems",
            (Language::En, _) => "surprise me with unexpected, lesser-known books",
            (Language::Zh, 1) => "非常熟悉的经典名著和畅销书",
            (Language::Zh, 2) => "以熟悉的作品为主，搭配几本小众佳作",
            (Language::Zh, 3) => "熟悉的好书与冷门宝藏各占一半",
            (Language::Zh, _) => "给我惊喜，推荐意想不到的小众书籍",
        }
    }
}

impl TryFrom<i64> for Adventurousness {
    type Error = PreferenceError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Adventurousness> for u8 {
    fn from(value: Adventurousness) -> Self {
        value.0
    }
}
