//! CLI entrypoint for Incident Quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use incident_application::{
    AnalysisLogger, NoAnalysisLogger, NoProgress, ProgressNotifier, RunAnalysisUseCase,
};
use incident_infrastructure::{
    BackendGateway, BackendKind, ConfigLoader, FileConfig, FileOutputFormat, IncidentInputLoader,
    JsonlAnalysisLogger,
};
use incident_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting Incident Quorum");

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli)?;

    let issues: Vec<String> = config
        .validate()
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect();

    if cli.show_config {
        if !cli.no_config {
            ConfigLoader::print_config_sources(cli.config.as_deref());
            println!();
        }
        println!("# Effective configuration");
        println!("{}", toml::to_string_pretty(&config)?);
        if !issues.is_empty() {
            println!("# Validation issues\n{}", issues.join("\n"));
        }
        return Ok(());
    }

    if !issues.is_empty() {
        bail!("Invalid configuration:\n{}", issues.join("\n"));
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let Some(facts_path) = cli.facts.as_deref() else {
        bail!("--facts <PATH> is required");
    };
    let input = IncidentInputLoader::new().load(
        facts_path,
        cli.log.as_deref(),
        cli.kb.as_deref(),
    )?;

    // === Dependency Injection ===
    let settings = config.backend.to_settings();
    let gateway = Arc::new(
        BackendGateway::from_settings(&settings)
            .with_context(|| format!("Could not set up the {} backend", settings.kind))?,
    );

    let logger: Arc<dyn AnalysisLogger> = match &config.logging.event_log {
        Some(path) => Arc::new(JsonlAnalysisLogger::open(path).with_context(|| {
            format!("Could not open event log {}", path.display())
        })?),
        None => Arc::new(NoAnalysisLogger),
    };

    if !cli.quiet {
        eprintln!();
        eprintln!("+============================================================+");
        eprintln!("|           Incident Quorum - Multi-Agent Analysis           |");
        eprintln!("+============================================================+");
        eprintln!();
        eprintln!(
            "System: {} ({}, confidence {:.2})",
            input.facts.system, input.facts.severity, input.facts.system_confidence
        );
        eprintln!("Backend: {} ({})", settings.kind, gateway.model());
        eprintln!();
    }

    let use_case = RunAnalysisUseCase::new(gateway)
        .with_params(config.analysis.to_params())
        .with_logger(logger);

    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if cli.plain_progress {
        Box::new(SimpleProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let result = use_case
        .execute_with_progress(input, progress.as_ref())
        .await?;

    if result.is_degraded() {
        warn!("{} role(s) degraded", result.errors.len());
    }

    let format = cli.output.unwrap_or(match config.output.format {
        Some(FileOutputFormat::Summary) => OutputFormat::Summary,
        Some(FileOutputFormat::Json) => OutputFormat::Json,
        Some(FileOutputFormat::Full) | None => OutputFormat::Full,
    });

    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Summary => ConsoleFormatter::format_summary(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };

    println!("{}", output);

    Ok(())
}

/// Install the tracing subscriber; file output goes through a non-blocking writer
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Could not open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// CLI flags win over every config source
fn apply_overrides(config: &mut FileConfig, cli: &Cli) -> Result<()> {
    if let Some(kind) = &cli.backend {
        let kind: BackendKind = kind.parse()?;
        if kind != config.backend.kind {
            // Model, URL and key variable were chosen for the other backend
            config.backend.kind = kind;
            config.backend.model = None;
            config.backend.base_url = None;
            config.backend.api_key_env = None;
        }
    }
    if let Some(model) = &cli.model {
        config.backend.model = Some(model.clone());
    }
    if let Some(path) = &cli.event_log {
        config.logging.event_log = Some(path.clone());
    }
    Ok(())
}
