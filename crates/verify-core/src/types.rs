//! Data model shared by every stage of the pipeline.

use serde::Serialize;
use std::fmt;

/// An ordered group of account keys queried together in one remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Position of the batch in the overall batch sequence.
    pub id: usize,
    /// Keys owned by this batch, in reference order.
    pub keys: Vec<String>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Query derived from one batch. The payload is opaque to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    /// Id of the batch this query was built from.
    pub batch_id: usize,
    /// Rendered query (for RNode this is a Rholang term).
    pub payload: String,
}

/// Structured response returned by a transport before parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub body: serde_json::Value,
}

impl RawResponse {
    pub fn new(body: serde_json::Value) -> Self {
        Self { body }
    }
}

/// A balance as reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedPair {
    pub key: String,
    pub reported: u64,
}

impl ReportedPair {
    pub fn new(key: impl Into<String>, reported: u64) -> Self {
        Self {
            key: key.into(),
            reported,
        }
    }
}

/// Outcome of comparing one reported balance with the reference value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerdictRecord {
    pub key: String,
    pub reported: u64,
    /// `None` when the reported key is not in the reference data.
    pub expected: Option<u64>,
    pub is_match: bool,
}

impl fmt::Display for VerdictRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected = match self.expected {
            Some(v) => v.to_string(),
            None => "<absent>".to_string(),
        };
        if self.is_match {
            write!(f, "OK: {}: {} == {}", self.key, expected, self.reported)
        } else {
            write!(f, "FAIL: {}: {} != {}", self.key, expected, self.reported)
        }
    }
}

/// A key that was queried but did not come back in a successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreportedKey {
    pub key: String,
    pub expected: u64,
}

/// A batch whose query failed; its keys have no verdicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub batch_id: usize,
    pub keys: Vec<String>,
    pub reason: String,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BATCH FAILED: batch {} ({} accounts): {}",
            self.batch_id,
            self.keys.len(),
            self.reason
        )
    }
}
