//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use crate::providers::openai::DEFAULT_BASE_URL;
use bookbot_application::{PipelineConfig, RetryPolicy, SamplingParams};
use bookbot_domain::preferences::sanitizer::{DEFAULT_INJECTION_PATTERNS, DEFAULT_MAX_TITLE_CHARS};
use bookbot_domain::{InputSanitizer, Language, Model, OutputFormat, ValidationRules};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("llm.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("llm.model cannot be empty")]
    EmptyModelName,

    #[error("llm.base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("llm.temperature must be between 0 and 2 (got {0})")]
    InvalidTemperature(f32),

    #[error("llm.max_tokens cannot be 0")]
    InvalidMaxTokens,

    #[error("pipeline.max_attempts cannot be 0")]
    InvalidAttempts,

    #[error("pipeline.explanation_min_chars ({min}) exceeds explanation_max_chars ({max})")]
    InvalidExplanationBounds { min: usize, max: usize },

    #[error("pipeline.min_year ({min}) exceeds max_year ({max})")]
    InvalidYearRange { min: i32, max: i32 },

    #[error("input.max_title_chars cannot be 0")]
    InvalidTitleLength,

    #[error("input.injection_patterns contains an invalid regex {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// `[llm]`: provider endpoint and sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    pub model: Model,
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_seconds: 30,
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// `[pipeline]`: retry and validation bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    pub max_attempts: usize,
    pub retry_backoff_ms: u64,
    pub explanation_min_chars: usize,
    pub explanation_max_chars: usize,
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        let rules = ValidationRules::default();
        Self {
            max_attempts: 3,
            retry_backoff_ms: 500,
            explanation_min_chars: rules.min_explanation_chars,
            explanation_max_chars: rules.max_explanation_chars,
            min_year: rules.min_year,
            max_year: rules.max_year,
        }
    }
}

/// `[input]`: user input sanitation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInputConfig {
    pub max_title_chars: usize,
    /// Case-insensitive regexes; a title matching any of them is rejected
    pub injection_patterns: Vec<String>,
}

impl Default for FileInputConfig {
    fn default() -> Self {
        Self {
            max_title_chars: DEFAULT_MAX_TITLE_CHARS,
            injection_patterns: DEFAULT_INJECTION_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// `[output]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Fixed language; asked interactively when unset
    pub language: Option<Language>,
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            language: None,
            format: OutputFormat::default(),
            color: true,
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of prompts and raw completions
    pub transcript_path: Option<PathBuf>,
    /// Directory for daily-rolling diagnostic log files
    pub log_dir: Option<PathBuf>,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub llm: FileLlmConfig,
    pub pipeline: FilePipelineConfig,
    pub input: FileInputConfig,
    pub output: FileOutputConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let llm = &self.llm;
        if llm.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if llm.model.as_str().trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if llm.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }
        if !(0.0..=2.0).contains(&llm.temperature) {
            return Err(ConfigValidationError::InvalidTemperature(llm.temperature));
        }
        if llm.max_tokens == 0 {
            return Err(ConfigValidationError::InvalidMaxTokens);
        }

        let pipeline = &self.pipeline;
        if pipeline.max_attempts == 0 {
            return Err(ConfigValidationError::InvalidAttempts);
        }
        if pipeline.explanation_min_chars > pipeline.explanation_max_chars {
            return Err(ConfigValidationError::InvalidExplanationBounds {
                min: pipeline.explanation_min_chars,
                max: pipeline.explanation_max_chars,
            });
        }
        if pipeline.min_year > pipeline.max_year {
            return Err(ConfigValidationError::InvalidYearRange {
                min: pipeline.min_year,
                max: pipeline.max_year,
            });
        }

        if self.input.max_title_chars == 0 {
            return Err(ConfigValidationError::InvalidTitleLength);
        }
        for pattern in &self.input.injection_patterns {
            InputSanitizer::new(std::slice::from_ref(pattern), self.input.max_title_chars)
                .map_err(|e| ConfigValidationError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Round parameters for the application layer
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            sampling: SamplingParams {
                model: self.llm.model.clone(),
                temperature: self.llm.temperature,
                max_tokens: self.llm.max_tokens,
            },
            retry: RetryPolicy {
                max_attempts: self.pipeline.max_attempts,
                backoff: Duration::from_millis(self.pipeline.retry_backoff_ms),
                timeout: self.llm_timeout(),
            },
            validation: ValidationRules {
                min_year: self.pipeline.min_year,
                max_year: self.pipeline.max_year,
                min_explanation_chars: self.pipeline.explanation_min_chars,
                max_explanation_chars: self.pipeline.explanation_max_chars,
            },
        }
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm.timeout_seconds)
    }

    /// Sanitizer built from `[input]`
    pub fn sanitizer(&self) -> Result<InputSanitizer, ConfigValidationError> {
        InputSanitizer::new(&self.input.injection_patterns, self.input.max_title_chars).map_err(
            |e| ConfigValidationError::InvalidPattern {
                pattern: self.input.injection_patterns.join(", "),
                message: e.to_string(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[llm]
model = "gpt-4o"
base_url = "http://localhost:8080/v1"
api_key_env = "LOCAL_KEY"
timeout_seconds = 60
temperature = 0.2
max_tokens = 2048

[pipeline]
max_attempts = 5
retry_backoff_ms = 0
explanation_min_chars = 20
explanation_max_chars = 500

[input]
max_title_chars = 120
injection_patterns = ["jailbreak"]

[output]
language = "zh"
format = "json"
color = false

[logging]
transcript_path = "/tmp/bookbot.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, Model::Gpt4o);
        assert_eq!(config.llm.api_key_env, "LOCAL_KEY");
        assert_eq!(config.pipeline.max_attempts, 5);
        assert_eq!(config.input.injection_patterns, vec!["jailbreak"]);
        assert_eq!(config.output.language, Some(Language::Zh));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.color);
        assert_eq!(
            config.logging.transcript_path,
            Some(PathBuf::from("/tmp/bookbot.jsonl"))
        );
        assert!(config.validate().is_ok());

        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.retry.max_attempts, 5);
        assert!(pipeline.retry.backoff.is_zero());
        assert_eq!(pipeline.retry.timeout, Duration::from_secs(60));
        assert_eq!(pipeline.validation.min_explanation_chars, 20);
        assert_eq!(pipeline.sampling.max_tokens, 2048);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[llm]
model = "my-local-model"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, Model::Custom("my-local-model".to_string()));
        // Defaults should apply
        assert_eq!(config.llm.timeout_seconds, 30);
        assert_eq!(config.pipeline.max_attempts, 3);
        assert_eq!(config.input.injection_patterns.len(), DEFAULT_INJECTION_PATTERNS.len());
        assert!(config.output.color);
        assert_eq!(config.output.language, None);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.sanitizer().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout_and_attempts() {
        let config: FileConfig = toml::from_str("[llm]\ntimeout_seconds = 0\n").unwrap();
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));

        let config: FileConfig = toml::from_str("[pipeline]\nmax_attempts = 0\n").unwrap();
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidAttempts));
    }

    #[test]
    fn test_validate_bounds() {
        let config: FileConfig = toml::from_str(
            "[pipeline]\nexplanation_min_chars = 50\nexplanation_max_chars = 10\n",
        )
        .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidExplanationBounds { min: 50, max: 10 })
        );

        let config: FileConfig = toml::from_str("[llm]\ntemperature = 3.5\n").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidTemperature(3.5))
        );
    }

    #[test]
    fn test_validate_bad_pattern() {
        let config: FileConfig =
            toml::from_str("[input]\ninjection_patterns = [\"ok\", \"(unclosed\"]\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidPattern { pattern, .. }) if pattern == "(unclosed"
        ));
    }
}
