//! CLI entrypoint for mixture-of-agents
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use moa_application::{CallContext, MixtureError, MixtureOfAgents, MixtureProgress, NoProgress};
use moa_domain::{OutputFormat, Severity};
use moa_infrastructure::{ConfigLoader, FileConfig, ProviderBackendFactory};
use moa_presentation::{Cli, ConsoleFormatter, MixtureReport, ProgressReporter, SimpleProgress};
use std::io::{IsTerminal, Read};
use std::process::ExitCode;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Conventional exit status for a run interrupted by SIGINT
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; stdout carries only the response
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting mixture-of-agents");

    // === Configuration ===
    let mut file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&cli, &mut file_config);

    if cli.no_color || !file_config.output.color {
        colored::control::set_override(false);
    }

    for issue in file_config.validate() {
        if issue.severity == Severity::Warning {
            warn!("{}", issue.message);
        }
    }
    let plan = file_config.to_mixture()?;

    let prompt = read_prompt(cli.prompt.clone())?;

    // === Dependency Injection ===
    let factory = ProviderBackendFactory::new().with_settings(file_config.providers.to_settings());
    let mixture = MixtureOfAgents::build(plan.config, &plan.layers, &plan.aggregator, &factory)?;

    // Ctrl-C cancels every in-flight call
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling in-flight calls");
                shutdown.cancel();
            }
        });
    }
    let ctx = CallContext::with_cancellation(shutdown);

    let progress: Box<dyn MixtureProgress> = if cli.quiet || !file_config.output.progress {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let started = Instant::now();
    let result = mixture
        .generate_with_progress(&ctx, &prompt, progress.as_ref())
        .await;
    drop(progress);

    let Some(response) = completed_response(result)? else {
        eprintln!("Cancelled");
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    };

    let report = MixtureReport {
        prompt,
        response,
        iterations: mixture.config().iterations,
        layers: mixture
            .layers()
            .iter()
            .map(|layer| layer.agent_names().into_iter().map(str::to_string).collect())
            .collect(),
        aggregator: mixture.aggregator_name().to_string(),
        elapsed_ms: started.elapsed().as_millis(),
    };

    let format = cli
        .output
        .map(OutputFormat::from)
        .or(file_config.output.format)
        .unwrap_or_default();
    println!("{}", ConsoleFormatter::render(&report, format));

    Ok(ExitCode::SUCCESS)
}

/// The response of a finished run, or `None` when the run was interrupted
fn completed_response(result: Result<String, MixtureError>) -> Result<Option<String>> {
    match result {
        Ok(response) => Ok(Some(response)),
        Err(e) if e.is_cancelled() => Ok(None),
        Err(e) => Err(e).context("Mixture run failed"),
    }
}

/// CLI flags win over every file source
fn apply_overrides(cli: &Cli, config: &mut FileConfig) {
    if let Some(iterations) = cli.iterations {
        config.mixture.iterations = iterations;
    }
    if let Some(max_parallel) = cli.max_parallel {
        config.mixture.max_parallel = max_parallel;
    }
    if let Some(timeout) = cli.timeout {
        config.mixture.agent_timeout_secs = timeout;
    }
}

/// Use the positional prompt, or read one from piped stdin
fn read_prompt(arg: Option<String>) -> Result<String> {
    if let Some(prompt) = arg {
        return Ok(prompt);
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("A prompt is required. Pass it as an argument or pipe it on stdin.");
    }

    let mut prompt = String::new();
    stdin
        .read_to_string(&mut prompt)
        .context("Failed to read prompt from stdin")?;
    if prompt.trim().is_empty() {
        bail!("The prompt read from stdin is empty");
    }
    Ok(prompt)
}
