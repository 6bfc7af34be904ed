//! CLI binary for venom: aggregate load-test metric snapshots and validate
//! them against threshold configuration.

mod orchestrator;
mod progress;
mod summary;

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use clap::Parser;
use venom_core::ConfigError;
use venom_merge::MergeStrategy;

use orchestrator::OrchestratorConfig;
use progress::IngestProgress;

#[derive(Parser)]
#[command(name = "venom", about = "Metrics aggregation and threshold validation for load-test snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Merge N metric snapshot files into one aggregate, optionally validating thresholds
    Aggregate {
        /// Input snapshot JSON files
        files: Vec<PathBuf>,

        /// Cardinality ceiling on distinct endpoint keys (env: VENOM_MAX_ENDPOINTS)
        #[arg(long, default_value_t = venom_normalize::env_max_endpoints())]
        max_endpoints: usize,

        /// Drop overflow endpoints instead of bucketing them under "other"
        #[arg(long)]
        no_bucket: bool,

        /// Trend merge strategy
        #[arg(long, default_value = "weighted")]
        strategy: String,

        /// Validate the aggregate against a threshold config
        #[arg(long)]
        check_thresholds: bool,

        /// Threshold config YAML path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write a JUnit XML breach report to this path
        #[arg(long)]
        junit: Option<PathBuf>,

        /// Promote error-severity breaches to a nonzero exit code
        #[arg(long)]
        hard_fail: bool,

        /// Aggregate JSON output path
        #[arg(long)]
        out: Option<PathBuf>,

        /// Increase log verbosity
        #[arg(short, long, action = clap::ArgAction::Count)]
        verbose: u8,

        /// Suppress progress output and non-essential logs
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let Commands::Aggregate {
        files,
        max_endpoints,
        no_bucket,
        strategy,
        check_thresholds,
        config,
        junit,
        hard_fail,
        out,
        verbose,
        quiet,
    } = cli.command;

    init_logging(verbose, quiet);

    if files.is_empty() {
        return Err(ConfigError::EmptyInputSet.into());
    }

    let strategy = MergeStrategy::parse(&strategy)
        .with_context(|| format!("unknown merge strategy: {strategy}"))?;

    let orchestrator_config = OrchestratorConfig {
        max_endpoints,
        no_bucket,
        strategy,
    };
    let cancel = AtomicBool::new(false);
    let progress = IngestProgress::new(files.len() as u64, quiet);

    let outcome = orchestrator::run(&files, &orchestrator_config, &cancel, &progress)
        .with_context(|| "snapshot ingest failed")?;

    let threshold_config = match &config {
        Some(path) => venom_thresholds::load_config(path)
            .with_context(|| format!("failed to load threshold config {}", path.display()))?,
        None => venom_core::ThresholdConfig::default(),
    };

    let breaches = if check_thresholds || config.is_some() {
        venom_thresholds::validate(&outcome.aggregate, &threshold_config)
    } else {
        Vec::new()
    };

    if let Some(path) = &out {
        let json = serde_json::to_string_pretty(&outcome.aggregate)
            .context("failed to serialize aggregate")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write aggregate output {}", path.display()))?;
    } else {
        let json = serde_json::to_string_pretty(&outcome.aggregate)
            .context("failed to serialize aggregate")?;
        println!("{json}");
    }

    if let Some(path) = &junit {
        let xml = venom_thresholds::to_junit_xml(&breaches);
        std::fs::write(path, xml)
            .with_context(|| format!("failed to write JUnit report {}", path.display()))?;
    }

    if !quiet {
        eprintln!(
            "{}",
            summary::format_summary(&outcome.aggregate, &breaches, outcome.endpoints_bucketed)
        );
    }

    tracing::info!(
        endpoint_count = outcome.aggregate.metrics.len(),
        breach_count = breaches.len(),
        "run complete"
    );

    let hard_fail_enabled = !threshold_config.options.soft_fail && hard_fail;
    let has_error_breach = breaches.iter().any(|b| b.severity == venom_core::Severity::Error);
    if hard_fail_enabled && has_error_breach {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}
