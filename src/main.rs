//! Burrow main entry point
//!
//! Command-line interface that starts one crawl job from a TOML config and
//! polls its status until the job reaches a terminal state.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use burrow::config::load_config;
use burrow::progress::LogSink;
use burrow::storage::open_storage;
use burrow::JobManager;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Burrow: a same-origin crawl job engine
///
/// Burrow fetches a start URL, follows in-domain links up to a configured
/// budget with a bounded worker pool, and persists every page it visits.
#[derive(Parser, Debug)]
#[command(name = "burrow")]
#[command(version = "0.1.0")]
#[command(about = "A same-origin crawl job engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Override the configured visitation budget
    #[arg(long)]
    max_links: Option<usize>,

    /// Override the configured worker pool size
    #[arg(long)]
    pool_size: Option<usize>,

    /// Override the configured per-request delay (milliseconds)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)?;

    let store = open_storage(Path::new(&config.output.database_path))?;
    let manager = JobManager::new(store);

    let mut spec = config.job_spec(&cli.url);
    if let Some(max_links) = cli.max_links {
        spec.max_links = max_links;
    }
    if let Some(pool_size) = cli.pool_size {
        spec.pool_size = pool_size;
    }
    if let Some(delay_ms) = cli.delay_ms {
        spec.request_delay = Duration::from_millis(delay_ms);
    }

    let job_id = manager.start_job(spec, Arc::new(LogSink))?;
    tracing::info!("Started job {}", job_id);

    // Poll the status surface until the job is terminal; Ctrl-C cancels
    // and the loop runs on to observe the canceled status.
    let mut poll = tokio::time::interval(Duration::from_millis(250));
    let snapshot = loop {
        tokio::select! {
            _ = poll.tick() => {
                let snapshot = manager.job_status(job_id)?;
                if snapshot.status.is_terminal() {
                    break snapshot;
                }
                tracing::debug!(
                    "Job {}: {} ({}/{})",
                    job_id,
                    snapshot.status,
                    snapshot.processed,
                    snapshot.total
                );
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received, canceling job {}", job_id);
                manager.cancel_job(job_id);
            }
        }
    };

    println!(
        "Job {} {}: {} pages fetched",
        job_id, snapshot.status, snapshot.processed
    );

    for page in manager.job_results(job_id)? {
        println!(
            "  [{}] {} - {}",
            page.status_code,
            page.url,
            page.title.as_deref().unwrap_or("(no title)")
        );
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("burrow=info,warn"),
            1 => EnvFilter::new("burrow=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
