//! Error types for the verification pipeline.

use thiserror::Error;

/// Errors raised while executing a single batch query.
///
/// Both variants are per-batch: the wave records them and the run continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Network failure, timeout or non-success response from the service.
    #[error("Transport error: {reason}")]
    Transport { reason: String },

    /// The response did not have the expected structure.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl QueryError {
    pub fn transport(reason: impl Into<String>) -> Self {
        QueryError::Transport {
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        QueryError::MalformedResponse(reason.into())
    }
}

/// Errors that can occur during a verification run.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Reference data could not be obtained. Fatal, no wave runs.
    #[error("Reference data unavailable: {0}")]
    ReferenceUnavailable(String),

    /// A configured limit is out of range. Fatal, no wave runs.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// One batch query failed.
    #[error("Batch {batch} query failed: {source}")]
    BatchQueryFailed {
        batch: usize,
        #[source]
        source: QueryError,
    },
}
