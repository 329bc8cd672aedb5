//! rev-verify library
//!
//! Verifies a REV balance snapshot against the vault balances an RChain node
//! reports.
//!
//! # Crates
//!
//! - `rev_verify_core` - batching, wave scheduling, reconciliation, reporting
//! - `rev_verify_reference` - snapshot cache and download
//! - `rev_verify_rnode` - exploratory-deploy client
//!
//! # CLI Usage
//!
//! ```bash
//! # Verify the first 5000 accounts of the snapshot against the public observer
//! rev-verify verify
//!
//! # Smaller batches against a local node, summary written as JSON
//! rev-verify verify --rnode-endpoint http://localhost:40403 \
//!   --batch-size 10 --concurrency-limit 4 --report-json summary.json
//!
//! # Only download the snapshot into the cache
//! rev-verify fetch --wallets-file wallets.txt
//! ```

use clap::Parser;
use rev_verify_core::RunSummary;
use rev_verify_reference::{SnapshotLoader, DEFAULT_CACHE_FILE, DEFAULT_SNAPSHOT_URL};
use rev_verify_rnode::{RNodeHttpTransport, DEFAULT_OBSERVER_ENDPOINT};
use std::path::PathBuf;

pub mod config;

#[derive(Parser, Clone, Debug)]
pub struct ReferenceOpts {
    /// Local snapshot cache; downloaded from --snapshot-url when missing
    #[arg(long, default_value = DEFAULT_CACHE_FILE, env = "REV_VERIFY_WALLETS_FILE")]
    pub wallets_file: PathBuf,

    /// Snapshot source (HTTP/HTTPS URL or local path)
    #[arg(long, default_value = DEFAULT_SNAPSHOT_URL, env = "REV_VERIFY_SNAPSHOT_URL")]
    pub snapshot_url: String,
}

impl ReferenceOpts {
    pub fn loader(&self) -> SnapshotLoader {
        SnapshotLoader::new(&self.wallets_file, &self.snapshot_url)
    }
}

#[derive(Parser, Clone, Debug)]
pub struct RNodeOpts {
    /// RNode HTTP API endpoint
    #[arg(long, default_value = DEFAULT_OBSERVER_ENDPOINT, env = "RNODE_ENDPOINT")]
    pub rnode_endpoint: String,

    /// Per-request timeout (e.g. "60s", "2m")
    #[arg(long, default_value = "60s", env = "RNODE_REQUEST_TIMEOUT")]
    pub request_timeout: String,
}

impl RNodeOpts {
    pub fn transport(&self) -> anyhow::Result<RNodeHttpTransport> {
        let timeout = config::parse_timeout(&self.request_timeout)?;
        RNodeHttpTransport::new(&self.rnode_endpoint, timeout)
    }
}

/// Map a finished run onto the process result: `Ok` only when every verified
/// account matched, so `main` exits non-zero otherwise.
pub fn ensure_success(summary: &RunSummary) -> anyhow::Result<()> {
    if summary.success {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "Verification failed - {} account(s) did not match",
            summary.failed_accounts()
        ))
    }
}
