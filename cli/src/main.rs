//! CLI entrypoint for BookBot
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use bookbot_application::{RecommendBooksUseCase, TranscriptLogger};
use bookbot_domain::{InputSanitizer, Language, Model, OutputFormat, Preferences};
use bookbot_infrastructure::{ConfigLoader, FileConfig, JsonlTranscriptLogger, OpenAiGateway};
use bookbot_presentation::{
    Cli, CollectError, InputError, OutputConfig, PreferenceCollector, PresetPreferences,
    RecommendationSession, SessionEnd, TerminalLineSource, select_language,
};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr logger and, when `log_dir` is set, a daily file log.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "bookbot.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };

    // Flags override file values
    if let Some(model) = &cli.model {
        let Ok(model) = model.parse::<Model>();
        config.llm.model = model;
    }
    if let Some(format) = cli.output {
        config.output.format = format;
    }
    if cli.lang.is_some() {
        config.output.language = cli.lang;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Cancel `token` on the first Ctrl-C
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, cancelling");
            token.cancel();
        }
    });
}

/// Language and preferences, from flags where given and interactively otherwise
fn collect_preferences(
    cli: &Cli,
    config: &FileConfig,
    source: &mut TerminalLineSource,
    sanitizer: &InputSanitizer,
) -> Result<(Language, Preferences), CollectError> {
    let language = match config.output.language {
        Some(language) => language,
        None => {
            let language = select_language(source, std::io::stdout())?;
            println!();
            language
        }
    };
    let preset = PresetPreferences {
        genres: cli.genres.clone(),
        books: cli.books.clone(),
        adventurousness: cli.adventurousness,
    };
    let preferences =
        PreferenceCollector::new(source, std::io::stdout(), sanitizer, language).collect(&preset)?;
    Ok((language, preferences))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    let _log_guard = init_tracing(cli.verbose, config.logging.log_dir.as_deref());

    info!("Starting BookBot");

    let output = OutputConfig {
        format: config.output.format,
        color: config.output.color,
        show_progress: !cli.quiet,
        once: cli.once,
    };
    output.apply_color();

    let sanitizer = config.sanitizer()?;

    // === Dependency Injection ===
    let gateway = Arc::new(
        OpenAiGateway::from_env(
            config.llm.base_url.as_str(),
            &config.llm.api_key_env,
            config.llm_timeout(),
        )
        .context("could not set up the LLM provider")?,
    );

    let token = CancellationToken::new();
    cancel_on_ctrl_c(token.clone());

    let mut use_case =
        RecommendBooksUseCase::new(gateway, config.pipeline_config()).with_cancellation(token);
    if let Some(path) = &config.logging.transcript_path
        && let Some(logger) = JsonlTranscriptLogger::new(path)
    {
        info!(path = %logger.path().display(), "Writing transcript");
        let logger: Arc<dyn TranscriptLogger> = Arc::new(logger);
        use_case = use_case.with_transcript_logger(logger);
    }

    let mut source = TerminalLineSource::new()?;

    let collected = collect_preferences(&cli, &config, &mut source, &sanitizer);
    let (language, preferences) = match collected {
        Ok(collected) => collected,
        Err(CollectError::Input(InputError::Closed | InputError::Interrupted)) => {
            return Ok(ExitCode::SUCCESS);
        }
        Err(CollectError::Invalid(e)) => bail!("invalid preferences: {e}"),
        Err(e) => return Err(e.into()),
    };

    if output.format == OutputFormat::Json && !output.once {
        warn!("JSON output with follow-up rounds interleaves prompts with JSON; consider --once");
    }

    let summary = RecommendationSession::new(
        &use_case,
        &mut source,
        std::io::stdout(),
        &sanitizer,
        language,
        output,
    )
    .run(preferences)
    .await?;

    info!(
        rounds = summary.rounds,
        recommended = summary.recommended,
        "Session ended"
    );

    Ok(match summary.end {
        SessionEnd::Failed(_) => ExitCode::FAILURE,
        SessionEnd::Finished | SessionEnd::InputClosed => ExitCode::SUCCESS,
    })
}
