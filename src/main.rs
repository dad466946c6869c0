//! Pagescope main entry point
//!
//! This is the command-line interface for the Pagescope URL analyzer.

use clap::Parser;
use pagescope::analysis::{AnalysisError, AnalysisMode, Orchestrator};
use pagescope::config::{load_config, load_credential, validate, Config};
use pagescope::output::{
    export, format_failures, print_summary, write_artifact, write_markdown_report, ExportFormat,
};
use pagescope::scoring::DeviceProfile;
use pagescope::url::{parse_url_list, validate_all};
use pagescope::{PagescopeError, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Pagescope: webpage performance and SEO snapshots
///
/// Pagescope scores a batch of URLs through the PageSpeed Insights API for
/// desktop and mobile, or fetches each page and counts its structural
/// elements, then exports the results as JSON, CSV or an Excel workbook.
#[derive(Parser, Debug)]
#[command(name = "pagescope")]
#[command(version)]
#[command(about = "Webpage performance and SEO snapshots", long_about = None)]
struct Cli {
    /// URLs to analyze
    #[arg(value_name = "URLS")]
    urls: Vec<String>,

    /// Read additional URLs from a file (one per line or first CSV column)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Export format: json, csv or excel
    #[arg(short, long)]
    format: Option<String>,

    /// Where to write the export (defaults to seo_audit_results.<ext>)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also write a markdown report to this path
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Count structural page elements instead of scoring
    #[arg(long)]
    structure: bool,

    /// Device profile to score (repeatable; defaults to the configured profiles)
    #[arg(long = "profile", value_name = "PROFILE", conflicts_with = "structure")]
    profiles: Vec<DeviceProfile>,

    /// Validate config and inputs and show what would be analyzed
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Environment file is optional
    dotenvy::dotenv().ok();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagescope=info,warn"),
            1 => EnvFilter::new("pagescope=debug,info"),
            2 => EnvFilter::new("pagescope=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let urls = collect_urls(&cli)?;
    let format: ExportFormat = config.output.format.parse()?;
    let mode = if cli.structure {
        AnalysisMode::Structure
    } else {
        AnalysisMode::Scoring(config.analysis.profiles.clone())
    };

    let output_path = config
        .output
        .path
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format.file_name()));
    let summary_path = config.output.summary_path.clone().map(PathBuf::from);

    if cli.dry_run {
        return handle_dry_run(&config, &urls, &mode, format, &output_path);
    }

    let api_key = match &mode {
        AnalysisMode::Scoring(_) => match load_credential(&config) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::error!("{}", e);
                return Err(e.into());
            }
        },
        AnalysisMode::Structure => None,
    };

    let orchestrator = Orchestrator::from_config(&config, api_key)?;

    let batch = tokio::select! {
        outcome = orchestrator.analyze(&urls, &mode) => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, abandoning in-flight requests");
            return Err(PagescopeError::Interrupted);
        }
    };

    let batch = match batch {
        Ok(batch) => batch,
        Err(AnalysisError::NoResults { diagnostics }) => {
            eprint!("{}", format_failures(&diagnostics));
            return Err(AnalysisError::NoResults { diagnostics }.into());
        }
        Err(e) => {
            tracing::error!("Analysis failed: {}", e);
            return Err(e.into());
        }
    };

    print_summary(&batch);

    let bytes = export(&batch, format)?;
    write_artifact(&bytes, &output_path)?;
    println!(
        "✓ {} export written to: {}",
        format,
        output_path.display()
    );

    if let Some(path) = summary_path {
        write_markdown_report(&batch, &path)?;
        println!("✓ Report written to: {}", path.display());
    }

    Ok(())
}

/// Loads the configuration file, if any, and applies command-line overrides
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => Config::default(),
    };

    if let Some(format) = &cli.format {
        config.output.format = format.clone();
    }
    if let Some(path) = &cli.output {
        config.output.path = Some(path.display().to_string());
    }
    if let Some(path) = &cli.summary {
        config.output.summary_path = Some(path.display().to_string());
    }
    if !cli.profiles.is_empty() {
        config.analysis.profiles = cli.profiles.clone();
    }

    validate(&config)?;
    Ok(config)
}

/// Gathers positional URLs followed by those read from `--input`
fn collect_urls(cli: &Cli) -> Result<Vec<String>> {
    let mut urls = cli.urls.clone();

    if let Some(path) = &cli.input {
        let listed = read_url_file(path)?;
        tracing::info!("Read {} URLs from {}", listed.len(), path.display());
        urls.extend(listed);
    }

    Ok(urls)
}

fn read_url_file(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_url_list(&content))
}

/// Handles the --dry-run mode: shows what would be analyzed
///
/// Fails the same way the real run would on an empty or invalid URL list.
fn handle_dry_run(
    config: &Config,
    urls: &[String],
    mode: &AnalysisMode,
    format: ExportFormat,
    output_path: &Path,
) -> Result<()> {
    println!("=== Pagescope Dry Run ===\n");

    match mode {
        AnalysisMode::Scoring(profiles) => {
            let names: Vec<&str> = profiles.iter().map(|p| p.as_str()).collect();
            println!("Mode: scoring ({})", names.join(", "));
            println!("  Endpoint: {}", config.scoring.endpoint);
            println!("  Timeout: {}s", config.scoring.timeout_secs);
            println!("  API key variable: {}", config.scoring.api_key_env);
        }
        AnalysisMode::Structure => {
            println!("Mode: structure");
            println!("  Timeout: {}s", config.fetcher.timeout_secs);
            println!("  User agent: {}", config.fetcher.user_agent);
        }
    }

    println!(
        "\nMax concurrent tasks: {}",
        config.analysis.max_concurrent_tasks
    );
    println!("Export: {} -> {}", format, output_path.display());

    println!("\nURLs ({}):", urls.len());
    for url in urls {
        println!("  - {}", url);
    }

    if urls.is_empty() {
        return Err(AnalysisError::EmptyRequest.into());
    }
    validate_all(urls)?;

    println!("\n✓ Configuration is valid");
    println!("✓ Would analyze {} URLs", urls.len());

    Ok(())
}
