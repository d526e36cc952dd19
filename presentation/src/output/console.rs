//! Console output for recommendation batches

use crate::i18n::Messages;
use bookbot_domain::{Language, OutputFormat, RecommendationBatch, ValidatedRecommendation};
use colored::Colorize;

const RULE_WIDTH: usize = 55;

/// Formats recommendation batches for the terminal
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render in the requested format
    pub fn render(
        batch: &RecommendationBatch,
        format: OutputFormat,
        language: Language,
    ) -> serde_json::Result<String> {
        match format {
            OutputFormat::Text => Ok(Self::format(batch, language)),
            OutputFormat::Json => Self::format_json(batch),
        }
    }

    /// Numbered list under a localized header
    pub fn format(batch: &RecommendationBatch, language: Language) -> String {
        let messages = Messages::for_language(language);
        let rule = "=".repeat(RULE_WIDTH);

        let mut output = String::new();
        output.push_str(&format!("\n{}\n", rule.cyan()));
        output.push_str(&format!("{}\n", messages.rec_header.bold()));
        output.push_str(&format!("{}\n", rule.cyan()));

        for (i, rec) in batch.iter().enumerate() {
            output.push_str(&format!("\n  {}. {}\n", i + 1, Self::headline(rec, language)));
            output.push_str(&format!("{}\n", Self::indent(rec.explanation(), "     ")));
        }

        output.push_str(&format!("\n{}\n", rule.cyan()));
        output
    }

    fn headline(rec: &ValidatedRecommendation, language: Language) -> String {
        match language {
            Language::En => format!(
                "{} by {} ({})",
                rec.title().yellow().bold(),
                rec.author(),
                rec.year()
            ),
            Language::Zh => format!(
                "{} {}（{}）",
                format!("《{}》", rec.title()).yellow().bold(),
                rec.author(),
                rec.year()
            ),
        }
    }

    /// Pretty JSON array of `{title, author, year, explanation}`
    pub fn format_json(batch: &RecommendationBatch) -> serde_json::Result<String> {
        serde_json::to_string_pretty(batch)
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookbot_domain::{CandidateRecommendation, ExclusionSet, RecommendationValidator, ValidationOutcome};
    use serde_json::json;

    fn batch() -> RecommendationBatch {
        let candidates: Vec<CandidateRecommendation> = [
            ("Dune", "Frank Herbert", 1965),
            ("Hyperion", "Dan Simmons", 1989),
            ("Solaris", "Stanisław Lem", 1961),
        ]
        .iter()
        .map(|(title, author, year)| {
            CandidateRecommendation::new(json!({
                "title": title,
                "author": author,
                "year": year,
                "explanation": "A classic of the genre with lasting influence."
            }))
        })
        .collect();
        match RecommendationValidator::default()
            .validate(&candidates, &ExclusionSet::new())
            .unwrap()
        {
            ValidationOutcome::Accepted(batch) => batch,
            ValidationOutcome::NeedsRetry => panic!("expected a batch"),
        }
    }

    #[test]
    fn test_format_text() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&batch(), Language::En);
        assert!(text.contains("Here are your BookBot picks"));
        assert!(text.contains("  1. Dune by Frank Herbert (1965)"));
        assert!(text.contains("  3. Solaris by Stanisław Lem (1961)"));
        assert!(text.contains("     A classic of the genre"));
    }

    #[test]
    fn test_format_text_zh() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&batch(), Language::Zh);
        assert!(text.contains("这是我为你精选的书单"));
        assert!(text.contains("2. 《Hyperion》 Dan Simmons（1989）"));
    }

    #[test]
    fn test_format_json() {
        let rendered = ConsoleFormatter::render(&batch(), OutputFormat::Json, Language::En).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["title"], "Dune");
        assert_eq!(items[0]["year"], 1965);
        assert!(items[0].get("explanation").is_some());
    }
}
