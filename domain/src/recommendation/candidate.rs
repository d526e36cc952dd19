//! Candidate recommendation: one untrusted object recovered from model text

use super::entities::ValidatedRecommendation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A recommendation as the model wrote it, before any type or range check.
///
/// Wraps the raw JSON value so that malformed entries survive extraction
/// and are judged (and dropped) by the validator instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateRecommendation(Value);

impl CandidateRecommendation {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Raw field lookup; `year` falls back to `publication_year`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        let object = self.0.as_object()?;
        match object.get(name) {
            Some(value) => Some(value),
            None if name == "year" => object.get("publication_year"),
            None => None,
        }
    }

    /// A string field, trimmed; `None` when absent, not a string or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The `year` field when it is an integer or an integer-valued number.
    pub fn year(&self) -> Option<i64> {
        let number = self.field("year")?.as_number()?;
        if let Some(i) = number.as_i64() {
            return Some(i);
        }
        let f = number.as_f64()?;
        (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
    }

    /// Title for diagnostics, whatever its validity
    pub fn title_hint(&self) -> Option<&str> {
        self.field("title").and_then(Value::as_str)
    }
}

impl From<Value> for CandidateRecommendation {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&ValidatedRecommendation> for CandidateRecommendation {
    fn from(rec: &ValidatedRecommendation) -> Self {
        Self(serde_json::json!({
            "title": rec.title(),
            "author": rec.author(),
            "year": rec.year(),
            "explanation": rec.explanation(),
        }))
    }
}
