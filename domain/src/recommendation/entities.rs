//! Recommendation entities: validated books and the batch handed to the user

use serde::Serialize;

/// A recommendation that passed every check (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedRecommendation {
    title: String,
    author: String,
    year: i32,
    explanation: String,
}

impl ValidatedRecommendation {
    pub(crate) fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            explanation: explanation.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

/// Between [`MIN_SIZE`](Self::MIN_SIZE) and [`MAX_SIZE`](Self::MAX_SIZE)
/// validated recommendations with pairwise-distinct normalized titles.
///
/// Only the validator constructs batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecommendationBatch {
    items: Vec<ValidatedRecommendation>,
}

impl RecommendationBatch {
    pub const MIN_SIZE: usize = 3;
    pub const MAX_SIZE: usize = 5;

    pub(crate) fn new(items: Vec<ValidatedRecommendation>) -> Self {
        debug_assert!((Self::MIN_SIZE..=Self::MAX_SIZE).contains(&items.len()));
        Self { items }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidatedRecommendation> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[ValidatedRecommendation] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(ValidatedRecommendation::title)
    }

    pub fn into_vec(self) -> Vec<ValidatedRecommendation> {
        self.items
    }
}

impl<'a> IntoIterator for &'a RecommendationBatch {
    type Item = &'a ValidatedRecommendation;
    type IntoIter = std::slice::Iter<'a, ValidatedRecommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
