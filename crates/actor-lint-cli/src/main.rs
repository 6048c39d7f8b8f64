//! actor-lint CLI.
//!
//! ```bash
//! actor-lint [OPTIONS] [PATH]...
//! actor-lint list-rules
//! ```
//!
//! The process exit code is the total count of error-severity
//! diagnostics; 0 means a clean run.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use actor_lint_core::{Config, LintReport, Pipeline};
use actor_lint_rules::default_rules;
use actor_lint_syntax::SwiftExtractor;

/// Safety-convention linter for actor codebases.
#[derive(Parser)]
#[command(name = "actor-lint")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Root directories to scan.
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available rules.
    ListRules,
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    /// One diagnostic per line plus a summary.
    #[default]
    Text,
    /// The full report as JSON.
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(errors) => ExitCode::from(u8::try_from(errors).unwrap_or(u8::MAX)),
        Err(err) => {
            eprintln!("actor-lint: {err:#}");
            ExitCode::from(u8::MAX)
        }
    }
}

fn run(cli: Cli) -> Result<usize> {
    if let Some(Commands::ListRules) = cli.command {
        list_rules();
        return Ok(0);
    }

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => discover_config()?,
    };

    let pipeline = Pipeline::builder()
        .rules(default_rules())
        .config(config)
        .extractor(Arc::new(SwiftExtractor::new()))
        .build()
        .context("failed to build pipeline")?;

    tracing::info!(
        rules = pipeline.rule_count(),
        paths = cli.paths.len(),
        "scanning"
    );

    let report = pipeline.run(&cli.paths);
    print_report(&report, cli.format)?;
    Ok(report.errors)
}

fn print_report(report: &LintReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for diagnostic in &report.diagnostics {
                println!("{diagnostic}");
            }
            println!(
                "Found {} error(s), {} warning(s) in {} file(s)",
                report.errors, report.warnings, report.files_checked
            );
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(report).context("failed to serialize report")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Config file names searched in the working directory, in priority
/// order.
const CONFIG_CANDIDATES: &[&str] = &["actor-lint.toml", ".actor-lint.toml"];

fn discover_config() -> Result<Config> {
    for candidate in CONFIG_CANDIDATES {
        let path = PathBuf::from(candidate);
        if path.exists() {
            tracing::debug!(path = %path.display(), "using discovered config");
            return Config::from_file(&path)
                .with_context(|| format!("failed to load config {}", path.display()));
        }
    }
    Ok(Config::default())
}

fn list_rules() {
    for rule in default_rules() {
        let desc = rule.description();
        println!("{}: {}", desc.identifier, desc.description);
    }
}
