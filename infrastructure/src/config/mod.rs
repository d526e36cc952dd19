//! Configuration file loading for bookbot
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `BOOKBOT_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./bookbot.toml` or `./.bookbot.toml`
//! 4. Global: `$XDG_CONFIG_HOME/bookbot/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileInputConfig, FileLlmConfig, FileLoggingConfig,
    FileOutputConfig, FilePipelineConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
