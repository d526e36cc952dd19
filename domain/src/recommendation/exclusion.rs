//! Exclusion set: titles already shown earlier in the session

use super::entities::RecommendationBatch;
use crate::util::normalize_title;
use std::collections::HashSet;

/// Titles previously recommended in this session.
///
/// Membership is case-insensitive and whitespace-normalized. The original
/// spelling of each title is kept, in insertion order, for use in prompts.
/// The set only ever grows.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    titles: Vec<String>,
    keys: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a title. Returns `false` if an equivalent title was already present.
    pub fn insert(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        let key = normalize_title(&title);
        if key.is_empty() || !self.keys.insert(key) {
            return false;
        }
        self.titles.push(title.trim().to_string());
        true
    }

    /// Fold every title of an accepted batch into the set.
    pub fn extend_from_batch(&mut self, batch: &RecommendationBatch) {
        for rec in batch.iter() {
            self.insert(rec.title());
        }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.keys.contains(&normalize_title(title))
    }

    /// Membership test for a key already produced by [`normalize_title`].
    pub(crate) fn contains_normalized(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Titles in insertion order, as originally spelled
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ExclusionSet::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for ExclusionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for title in iter {
            self.insert(title);
        }
    }
}
