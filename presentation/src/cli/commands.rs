//! CLI command definitions

use bookbot_domain::{Language, OutputFormat};
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for bookbot
#[derive(Parser, Debug)]
#[command(name = "bookbot")]
#[command(author, version, about = "BookBot - personal book recommendations from an LLM")]
#[command(long_about = r#"
BookBot asks for a few reading preferences and returns 3 to 5 validated
book recommendations from an OpenAI-compatible chat completion API.

Anything not given on the command line is asked interactively. After each
round you can ask for more; titles already shown are never repeated in the
same session.

Configuration files are loaded from (lowest to highest priority):
1. ~/.config/bookbot/config.toml   Global config
2. ./bookbot.toml                  Project-level config
3. --config <path>                 Explicit config file
4. BOOKBOT_<SECTION>__<KEY>        Environment variables

Example:
  bookbot
  bookbot --lang en -g mystery -g fantasy -b "Dune" -b "The Hobbit" -a 3
  bookbot --lang zh -g 科幻 -b 三体 -b 活着 -a 2 --once --output json
"#)]
pub struct Cli {
    /// Preferred genre (1-3, repeatable)
    #[arg(short, long = "genre", value_name = "GENRE")]
    pub genres: Vec<String>,

    /// Favorite book title (2-3, repeatable)
    #[arg(short, long = "book", value_name = "TITLE")]
    pub books: Vec<String>,

    /// How adventurous the picks should be (1 = safe ... 4 = surprise me)
    #[arg(short, long, value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(1..=4))]
    pub adventurousness: Option<u8>,

    /// Language for prompts and messages (en, zh); asked when not set
    #[arg(short, long, value_name = "LANG")]
    pub lang: Option<Language>,

    /// Output format (text, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Model identifier, overrides `llm.model`
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Run a single round without asking for more
    #[arg(long)]
    pub once: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
