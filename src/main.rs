//! linkmend main entry point
//!
//! This is the command-line interface for the linkmend link checker.

use clap::Parser;
use linkmend::config::{load_config_with_hash, Config};
use linkmend::crawler::LinkManager;
use linkmend::repair::RepairSuggestion;
use linkmend::state::LinkStatus;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// linkmend: a link checker that suggests repairs
///
/// linkmend crawls a website, checks every link it finds, and ranks repair
/// suggestions for the broken ones from archive snapshots, similar pages on
/// the same site, and a generative fallback.
#[derive(Parser, Debug)]
#[command(name = "linkmend")]
#[command(version = "0.1.0")]
#[command(about = "Finds broken links and suggests repairs", long_about = None)]
struct Cli {
    /// Site URL to scan
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write a JSON report to this path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// JSON report for a completed scan
#[derive(Serialize)]
struct Report {
    site: String,
    generated_at: chrono::DateTime<chrono::Utc>,
    total_links: usize,
    broken_links: usize,
    links: Vec<ReportEntry>,
}

#[derive(Serialize)]
struct ReportEntry {
    #[serde(flatten)]
    status: LinkStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    suggestions: Vec<RepairSuggestion>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let mut manager = LinkManager::from_config(config)?;

    let statuses = match manager.scan_website(&cli.url).await {
        Ok(statuses) => statuses,
        Err(e) => {
            tracing::error!("Scan failed: {}", e);
            return Err(e.into());
        }
    };

    let mut links: Vec<LinkStatus> = statuses.into_values().collect();
    links.sort_by(|a, b| a.url.cmp(&b.url));

    let mut entries = Vec::with_capacity(links.len());
    for status in links {
        let suggestions = if status.is_broken {
            manager.repair_link(&status).await
        } else {
            Vec::new()
        };
        entries.push(ReportEntry {
            status,
            suggestions,
        });
    }

    let report = Report {
        site: cli.url.clone(),
        generated_at: chrono::Utc::now(),
        total_links: entries.len(),
        broken_links: entries.iter().filter(|e| e.status.is_broken).count(),
        links: entries,
    };

    print_report(&report);

    if let Some(path) = &cli.output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)?;
        println!("\n✓ Report written to: {}", path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkmend=info,warn"),
            1 => EnvFilter::new("linkmend=debug,info"),
            2 => EnvFilter::new("linkmend=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Prints a human-readable scan summary to stdout
fn print_report(report: &Report) {
    println!("\n=== Link scan: {} ===\n", report.site);
    println!("Links checked: {}", report.total_links);
    println!("Broken links:  {}", report.broken_links);

    for entry in &report.links {
        if !entry.status.is_broken {
            continue;
        }

        println!("\n✗ {} ({})", entry.status.url, describe(&entry.status));
        if entry.suggestions.is_empty() {
            println!("    no suggestions");
        }
        for suggestion in &entry.suggestions {
            println!(
                "    {:.2}  [{}] {}",
                suggestion.confidence, suggestion.source, suggestion.suggested_url
            );
        }
    }
}

/// One-line failure description for a broken link
fn describe(status: &LinkStatus) -> String {
    match status.status_code {
        Some(code) => format!("HTTP {}", code),
        None => status
            .error_message
            .clone()
            .unwrap_or_else(|| "unknown error".to_string()),
    }
}
