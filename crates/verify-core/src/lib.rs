//! Batched reconciliation of a reference balance snapshot against an RNode.
//!
//! The pipeline takes an ordered list of accounts with their expected
//! balances, slices it into fixed-size batches, sends one query per batch,
//! runs the queries in waves of bounded concurrency and compares every
//! reported balance with the expected one.
//!
//! # Example
//!
//! ```ignore
//! use rev_verify_core::{BalanceVerifier, ConsoleObserver, VerifyConfig};
//!
//! let config = VerifyConfig::new().with_batch_size(25).with_concurrency_limit(50);
//! let verifier = BalanceVerifier::new(config, query_builder, transport, parser);
//!
//! let summary = verifier.run(&loader, &mut ConsoleObserver::new(true)).await?;
//! assert!(summary.success);
//! ```

pub mod args;
pub mod batch;
pub mod error;
pub mod executor;
pub mod reconcile;
pub mod reference;
pub mod report;
pub mod types;
pub mod verifier;
pub mod wave;

pub use args::VerifyArgs;
pub use batch::build_batches;
pub use error::{QueryError, VerifyError};
pub use executor::{QueryBuilder, QueryExecutor, QueryTransport, ResponseParser};
pub use reconcile::{reconcile, unreported_keys};
pub use reference::{ReferenceData, ReferenceIndex, ReferenceLoader};
pub use report::{ansi, paint, Aggregator, ConsoleObserver, RunObserver, RunSummary};
pub use types::{
    Batch, BatchFailure, QueryDescriptor, RawResponse, ReportedPair, UnreportedKey, VerdictRecord,
};
pub use verifier::{BalanceVerifier, Outcome, RunPhase, VerifyConfig};
pub use wave::{group_into_waves, BatchOutcome, WaveOutcome, WaveScheduler};
