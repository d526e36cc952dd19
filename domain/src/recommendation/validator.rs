//! Recommendation validation
//!
//! Turns untrusted [`CandidateRecommendation`]s into a [`RecommendationBatch`]
//! or tells the caller why it cannot. Checks run per candidate in order:
//!
//! 1. shape: non-empty `title`, `author` and `explanation` strings, numeric `year`
//! 2. year inside [`ValidationRules::min_year`]..=[`ValidationRules::max_year`]
//! 3. explanation length (in characters) inside the configured bounds
//! 4. title not already seen earlier in the same batch
//! 5. title not in the session's [`ExclusionSet`]
//!
//! Survivors are truncated to [`RecommendationBatch::MAX_SIZE`] after
//! filtering. A batch that would have been complete but for check 5 is
//! reported as [`ValidationOutcome::NeedsRetry`]; every other shortfall is
//! [`ValidationError::TooFew`].

use super::candidate::CandidateRecommendation;
use super::entities::{RecommendationBatch, ValidatedRecommendation};
use super::exclusion::ExclusionSet;
use crate::util::normalize_title;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Bounds applied by [`RecommendationValidator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    pub min_year: i32,
    pub max_year: i32,
    pub min_explanation_chars: usize,
    pub max_explanation_chars: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_year: 1450,
            max_year: 2026,
            min_explanation_chars: 10,
            max_explanation_chars: 1000,
        }
    }
}

/// Why a candidate was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    MalformedShape,
    YearOutOfRange,
    ExplanationLength,
    DuplicateInBatch,
    AlreadyRecommended,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::MalformedShape => "missing or mistyped field",
            DropReason::YearOutOfRange => "publication year out of range",
            DropReason::ExplanationLength => "explanation too short or too long",
            DropReason::DuplicateInBatch => "duplicate title in batch",
            DropReason::AlreadyRecommended => "already recommended this session",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate the validator rejected, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedCandidate {
    /// Position in the candidate list
    pub index: usize,
    pub title: Option<String>,
    pub reason: DropReason,
}

/// Non-error result of a validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted(RecommendationBatch),
    /// At least [`RecommendationBatch::MIN_SIZE`] candidates passed every
    /// other check but had all been shown already; asking the model again
    /// may produce fresh titles.
    NeedsRetry,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "only {survivors} usable recommendation(s), at least {required} required{}",
        .first_defect.map(|d| format!(" (first problem: {d})")).unwrap_or_default()
    )]
    TooFew {
        survivors: usize,
        required: usize,
        first_defect: Option<DropReason>,
    },
}

/// Full record of a validation pass
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub result: Result<ValidationOutcome, ValidationError>,
    pub dropped: Vec<DroppedCandidate>,
}

/// Deterministic, side-effect free candidate filter
#[derive(Debug, Clone, Default)]
pub struct RecommendationValidator {
    rules: ValidationRules,
}

impl RecommendationValidator {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub fn validate(
        &self,
        candidates: &[CandidateRecommendation],
        exclusions: &ExclusionSet,
    ) -> Result<ValidationOutcome, ValidationError> {
        self.validate_detailed(candidates, exclusions).result
    }

    /// Like [`validate`](Self::validate) but also reports every dropped
    /// candidate.
    pub fn validate_detailed(
        &self,
        candidates: &[CandidateRecommendation],
        exclusions: &ExclusionSet,
    ) -> ValidationReport {
        let mut accepted = Vec::new();
        let mut dropped = Vec::new();
        let mut seen = HashSet::new();
        let mut excluded = 0usize;

        for (index, candidate) in candidates.iter().enumerate() {
            let mut reject = |reason| {
                dropped.push(DroppedCandidate {
                    index,
                    title: candidate.title_hint().map(str::to_string),
                    reason,
                })
            };

            let rec = match self.check_candidate(candidate) {
                Ok(rec) => rec,
                Err(reason) => {
                    reject(reason);
                    continue;
                }
            };

            let key = normalize_title(rec.title());
            if !seen.insert(key.clone()) {
                reject(DropReason::DuplicateInBatch);
                continue;
            }
            if exclusions.contains_normalized(&key) {
                excluded += 1;
                reject(DropReason::AlreadyRecommended);
                continue;
            }
            accepted.push(rec);
        }

        accepted.truncate(RecommendationBatch::MAX_SIZE);

        let result = if accepted.len() >= RecommendationBatch::MIN_SIZE {
            Ok(ValidationOutcome::Accepted(RecommendationBatch::new(accepted)))
        } else if accepted.is_empty() && excluded >= RecommendationBatch::MIN_SIZE {
            Ok(ValidationOutcome::NeedsRetry)
        } else {
            Err(ValidationError::TooFew {
                survivors: accepted.len(),
                required: RecommendationBatch::MIN_SIZE,
                first_defect: dropped.first().map(|d| d.reason),
            })
        };

        ValidationReport { result, dropped }
    }

    /// Shape, year and explanation checks for a single candidate
    fn check_candidate(
        &self,
        candidate: &CandidateRecommendation,
    ) -> Result<ValidatedRecommendation, DropReason> {
        let (Some(title), Some(author), Some(explanation), Some(year)) = (
            candidate.text("title"),
            candidate.text("author"),
            candidate.text("explanation"),
            candidate.year(),
        ) else {
            return Err(DropReason::MalformedShape);
        };

        let year = i32::try_from(year).map_err(|_| DropReason::YearOutOfRange)?;
        if !(self.rules.min_year..=self.rules.max_year).contains(&year) {
            return Err(DropReason::YearOutOfRange);
        }

        let chars = explanation.chars().count();
        if !(self.rules.min_explanation_chars..=self.rules.max_explanation_chars).contains(&chars) {
            return Err(DropReason::ExplanationLength);
        }

        Ok(ValidatedRecommendation::new(title, author, year, explanation))
    }
}
