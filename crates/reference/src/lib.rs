//! Reference balance snapshot loading.
//!
//! The snapshot is a text file of `<address>,<balance>` lines. It is read from
//! a local cache file; when the cache is absent the snapshot is fetched from
//! its source (an HTTP/HTTPS URL or another local path) and written to the
//! cache first.
//!
//! # Example
//!
//! ```ignore
//! use rev_verify_reference::SnapshotLoader;
//!
//! let loader = SnapshotLoader::new("wallets.txt", DEFAULT_SNAPSHOT_URL);
//! let reference = loader.load_reference().await?;
//! println!("{} accounts", reference.loaded_pairs());
//! ```

mod error;
mod http;
mod local;
mod parse;

use rev_verify_core::{ReferenceData, ReferenceLoader, VerifyError};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use error::ReferenceError;
pub use parse::{parse_wallet_line, parse_wallets};

/// Final REV balances exported from mainnet block 908300.
pub const DEFAULT_SNAPSHOT_URL: &str =
    "https://raw.githubusercontent.com/rchain/rchain/dev/wallets_REV_BLOCK-908300.txt";

/// Default local cache file.
pub const DEFAULT_CACHE_FILE: &str = "wallets.txt";

/// Where the snapshot comes from when the cache is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    /// Local filesystem path
    Local(PathBuf),
    /// HTTP/HTTPS URL
    Http(String),
}

impl ReferenceSource {
    /// `http://` or `https://` -> Http, everything else -> Local
    pub fn parse(uri: &str) -> Self {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            ReferenceSource::Http(uri.to_string())
        } else {
            ReferenceSource::Local(PathBuf::from(uri))
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            ReferenceSource::Local(path) => path.display().to_string(),
            ReferenceSource::Http(url) => url.clone(),
        }
    }

    async fn fetch(&self) -> Result<String, ReferenceError> {
        match self {
            ReferenceSource::Local(path) => local::read(path).await,
            ReferenceSource::Http(url) => http::download(url).await,
        }
    }
}

/// Loads the snapshot through a local cache file.
#[derive(Debug, Clone)]
pub struct SnapshotLoader {
    cache_path: PathBuf,
    source: ReferenceSource,
}

impl SnapshotLoader {
    pub fn new(cache_path: impl Into<PathBuf>, source: &str) -> Self {
        Self {
            cache_path: cache_path.into(),
            source: ReferenceSource::parse(source),
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    pub fn source(&self) -> &ReferenceSource {
        &self.source
    }

    /// Make sure the cache holds the snapshot. Returns `true` when it had to
    /// be fetched.
    pub async fn ensure_cached(&self) -> Result<bool, ReferenceError> {
        if local::exists(&self.cache_path).await {
            return Ok(false);
        }
        let body = self.fetch_source().await?;
        local::write(&self.cache_path, &body).await?;
        Ok(true)
    }

    async fn fetch_source(&self) -> Result<String, ReferenceError> {
        info!(
            "{} does not exist. Downloading {}...",
            self.cache_path.display(),
            self.source.display_name()
        );
        self.source.fetch().await.map_err(|e| {
            ReferenceError::Unavailable(format!(
                "no cached snapshot at {} and {} could not be fetched: {e}",
                self.cache_path.display(),
                self.source.display_name()
            ))
        })
    }

    /// Read the snapshot text, fetching it into the cache if absent.
    pub async fn read_snapshot(&self) -> Result<String, ReferenceError> {
        if local::exists(&self.cache_path).await {
            return local::read(&self.cache_path).await;
        }
        let body = self.fetch_source().await?;
        if let Err(e) = local::write(&self.cache_path, &body).await {
            warn!("Could not cache snapshot: {}", e);
        }
        Ok(body)
    }

    /// Read and parse the snapshot.
    pub async fn load_reference(&self) -> Result<ReferenceData, ReferenceError> {
        let text = self.read_snapshot().await?;
        let (pairs, skipped) = parse_wallets(&text);
        if skipped > 0 {
            warn!("Skipped {} unparseable snapshot line(s)", skipped);
        }
        let reference = ReferenceData::from_pairs(pairs);
        info!(
            "Loaded {} REV balances ({} unique) from {}",
            reference.loaded_pairs(),
            reference.unique_keys(),
            self.cache_path.display()
        );
        Ok(reference)
    }
}

#[async_trait::async_trait]
impl ReferenceLoader for SnapshotLoader {
    async fn load(&self) -> Result<ReferenceData, VerifyError> {
        self.load_reference()
            .await
            .map_err(|e| VerifyError::ReferenceUnavailable(e.to_string()))
    }
}
