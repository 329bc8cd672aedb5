//! Reference dataset consumed by the pipeline.

use crate::error::VerifyError;
use std::collections::HashMap;

/// Read-only lookup from account key to expected balance.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    balances: HashMap<String, u64>,
}

impl ReferenceIndex {
    pub fn expected(&self, key: &str) -> Option<u64> {
        self.balances.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.balances.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// Loaded reference data: every pair in source order plus the index.
///
/// Duplicate keys are kept in the ordered sequence; the index holds the
/// value of the last occurrence.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    ordered_keys: Vec<String>,
    index: ReferenceIndex,
}

impl ReferenceData {
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        let mut ordered_keys = Vec::new();
        let mut balances = HashMap::new();
        for (key, value) in pairs {
            let key = key.into();
            balances.insert(key.clone(), value);
            ordered_keys.push(key);
        }
        Self {
            ordered_keys,
            index: ReferenceIndex { balances },
        }
    }

    pub fn ordered_keys(&self) -> &[String] {
        &self.ordered_keys
    }

    pub fn index(&self) -> &ReferenceIndex {
        &self.index
    }

    /// Number of `(key, value)` pairs loaded, duplicates included.
    pub fn loaded_pairs(&self) -> usize {
        self.ordered_keys.len()
    }

    pub fn unique_keys(&self) -> usize {
        self.index.len()
    }

    pub fn duplicate_count(&self) -> usize {
        self.loaded_pairs() - self.unique_keys()
    }

    pub fn has_duplicates(&self) -> bool {
        self.duplicate_count() > 0
    }
}

/// Source of reference data for a run.
///
/// Implementations fail with [`VerifyError::ReferenceUnavailable`] when
/// neither the source nor any local cache can be read.
#[async_trait::async_trait]
pub trait ReferenceLoader: Send + Sync {
    async fn load(&self) -> Result<ReferenceData, VerifyError>;
}
