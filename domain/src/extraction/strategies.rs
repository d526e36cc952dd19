//! Built-in extraction strategies

use super::ExtractionStrategy;
use super::text::{bracketed_slices, fenced_body, remove_trailing_commas};
use serde_json::Value;

/// Parse `text` as JSON and return the candidate array it holds.
fn parse_candidates(text: &str) -> Option<Vec<Value>> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    unwrap_envelope(value)
}

/// Accept a bare array or `{"recommendations": [...]}`.
fn unwrap_envelope(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("recommendations") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// The whole response is JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectJson;

impl ExtractionStrategy for DirectJson {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn extract(&self, text: &str) -> Option<Vec<Value>> {
        parse_candidates(text)
    }
}

/// JSON inside the first Markdown code fence
#[derive(Debug, Clone, Copy, Default)]
pub struct FencedBlock;

impl ExtractionStrategy for FencedBlock {
    fn name(&self) -> &'static str {
        "fenced"
    }

    fn extract(&self, text: &str) -> Option<Vec<Value>> {
        parse_candidates(fenced_body(text)?)
    }
}

/// Fenced or bare JSON after dropping trailing commas
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailingCommas;

impl ExtractionStrategy for TrailingCommas {
    fn name(&self) -> &'static str {
        "trailing-commas"
    }

    fn extract(&self, text: &str) -> Option<Vec<Value>> {
        let body = fenced_body(text).unwrap_or(text);
        parse_candidates(&remove_trailing_commas(body))
    }
}

/// First balanced `[...]` in the text that parses to an array containing
/// at least one object.
///
/// Each opening bracket is tried in turn, so bracketed prose such as
/// `[sic]` before the real array is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketScan;

impl ExtractionStrategy for BracketScan {
    fn name(&self) -> &'static str {
        "bracket-scan"
    }

    fn extract(&self, text: &str) -> Option<Vec<Value>> {
        bracketed_slices(text).find_map(|slice| {
            let items = parse_candidates(slice)
                .or_else(|| parse_candidates(&remove_trailing_commas(slice)))?;
            items.iter().any(Value::is_object).then_some(items)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_envelope_shapes() {
        assert_eq!(unwrap_envelope(serde_json::json!([1])), Some(vec![serde_json::json!(1)]));
        assert_eq!(
            unwrap_envelope(serde_json::json!({"recommendations": []})),
            Some(vec![])
        );
        assert_eq!(unwrap_envelope(serde_json::json!({"books": []})), None);
        assert_eq!(unwrap_envelope(serde_json::json!({"recommendations": "none"})), None);
        assert_eq!(unwrap_envelope(serde_json::json!("text")), None);
    }

    #[test]
    fn test_fenced_requires_fence() {
        assert!(FencedBlock.extract("[{\"a\": 1}]").is_none());
        assert!(FencedBlock.extract("```\n[{\"a\": 1}]\n```").is_some());
    }

    #[test]
    fn test_bracket_scan_skips_non_object_arrays() {
        let items = BracketScan
            .extract("ratings [4, 5] then [{\"title\": \"Dune\"}]")
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "Dune");
    }
}
