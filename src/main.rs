//! Command-line interface for rev-verify
//!
//! # Usage Examples
//!
//! ```bash
//! # Verify with defaults (25 accounts per query, 50 queries per wave, 5000 accounts)
//! rev-verify verify
//!
//! # Tolerate zero-balance accounts the node does not report
//! rev-verify verify --allow-unreported-zero
//!
//! # Debug logging, including the block each response was evaluated at
//! RUST_LOG=debug rev-verify verify --max-to-process 100
//! ```
//!
//! The process exits with status 0 only when every verified account matched.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rev_verify::{ensure_success, RNodeOpts, ReferenceOpts};
use rev_verify_core::{
    ansi, paint, BalanceVerifier, ConsoleObserver, RunSummary, VerifyArgs, VerifyConfig,
};
use rev_verify_rnode::{ExploreDeployParser, RholangBalanceQuery};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rev-verify")]
#[command(about = "Verify a REV balance snapshot against an RChain node")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare snapshot balances with the balances the node reports
    Verify {
        #[command(flatten)]
        reference: ReferenceOpts,

        #[command(flatten)]
        rnode: RNodeOpts,

        #[command(flatten)]
        verify: VerifyArgs,

        /// Write the run summary as JSON
        #[arg(long, value_name = "PATH")]
        report_json: Option<PathBuf>,
    },

    /// Download the snapshot into the local cache without verifying
    Fetch {
        #[command(flatten)]
        reference: ReferenceOpts,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Verify {
            reference,
            rnode,
            verify,
            report_json,
        } => run_verify(reference, rnode, verify, report_json).await,
        Commands::Fetch { reference } => run_fetch(reference).await,
    }
}

async fn run_verify(
    reference: ReferenceOpts,
    rnode: RNodeOpts,
    args: VerifyArgs,
    report_json: Option<PathBuf>,
) -> anyhow::Result<()> {
    let transport = rnode
        .transport()
        .context("Failed to set up RNode transport")?;
    let verifier = BalanceVerifier::new(
        VerifyConfig::from(&args),
        Arc::new(RholangBalanceQuery),
        Arc::new(transport),
        Arc::new(ExploreDeployParser),
    );

    let color = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let loader = reference.loader();
    let mut observer = ConsoleObserver::new(color);
    let summary = verifier
        .run(&loader, &mut observer)
        .await
        .context("Verification aborted")?;

    print_summary(&summary, color);

    if let Some(path) = report_json {
        summary
            .write_json(&path)
            .with_context(|| format!("Failed to write summary to {path:?}"))?;
        tracing::info!("Run summary written to {}", path.display());
    }

    ensure_success(&summary)
}

fn print_summary(summary: &RunSummary, color: bool) {
    println!(
        "Total balance checked: {}",
        paint(&summary.processed.to_string(), ansi::GREEN, color)
    );
    if let Some(table) = summary.mismatch_table() {
        println!("{table}");
    }
    if !summary.batch_failures.is_empty() {
        let line = format!("{} batch(es) failed", summary.batch_failures.len());
        println!("{}", paint(&line, ansi::RED, color));
    }
    tracing::debug!(
        "Run took {:.1}s over {} wave(s)",
        summary.duration_secs(),
        summary.waves
    );
    println!("{}", summary.styled_summary_line(color));
}

async fn run_fetch(reference: ReferenceOpts) -> anyhow::Result<()> {
    let loader = reference.loader();
    let fetched = loader
        .ensure_cached()
        .await
        .context("Failed to fetch snapshot")?;
    if fetched {
        tracing::info!("Snapshot cached at {}", loader.cache_path().display());
    } else {
        tracing::info!(
            "{} already exists; remove it to download again",
            loader.cache_path().display()
        );
    }
    Ok(())
}
