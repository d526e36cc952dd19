//! Presentation-level configuration
//!
//! Settings for how rounds are shown, resolved from config files and flags.

use bookbot_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress while the model is working
    pub show_progress: bool,
    /// Stop after the first round
    pub once: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            show_progress: true,
            once: false,
        }
    }
}

impl OutputConfig {
    /// Apply the color setting to the process-wide `colored` switch
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }
}
