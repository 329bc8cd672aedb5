//! Run orchestration: load, partition, run waves, finalize.

use crate::batch::{build_batches, describe_batches};
use crate::error::VerifyError;
use crate::executor::{QueryBuilder, QueryExecutor, QueryTransport, ResponseParser};
use crate::reconcile::{reconcile, unreported_keys};
use crate::reference::{ReferenceData, ReferenceIndex, ReferenceLoader};
use crate::report::{Aggregator, RunObserver, RunSummary};
use crate::types::BatchFailure;
use crate::wave::{WaveOutcome, WaveScheduler};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Configuration for a verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyConfig {
    /// Accounts per query.
    pub batch_size: usize,
    /// Maximum queries in flight (batches per wave).
    pub concurrency_limit: usize,
    /// Hard cap on accounts verified.
    pub max_to_process: usize,
    /// Tolerate zero-balance accounts missing from a successful response.
    pub allow_unreported_zero: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            batch_size: 25,
            concurrency_limit: 50,
            max_to_process: 5_000,
            allow_unreported_zero: false,
        }
    }
}

impl VerifyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    pub fn with_max_to_process(mut self, max: usize) -> Self {
        self.max_to_process = max;
        self
    }

    pub fn with_allow_unreported_zero(mut self, allow: bool) -> Self {
        self.allow_unreported_zero = allow;
        self
    }

    /// Every limit must be positive.
    pub fn validate(&self) -> Result<(), VerifyError> {
        let limits = [
            ("batch_size", self.batch_size),
            ("concurrency_limit", self.concurrency_limit),
            ("max_to_process", self.max_to_process),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(VerifyError::InvalidConfig(format!(
                    "{name} must be greater than zero"
                )));
            }
        }
        Ok(())
    }
}

/// Terminal outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
    Aborted,
}

/// Phases a run moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Loading,
    Partitioning,
    Wave(usize),
    Finalizing,
    Done(Outcome),
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Loading => write!(f, "loading"),
            Self::Partitioning => write!(f, "partitioning"),
            Self::Wave(n) => write!(f, "wave {n}"),
            Self::Finalizing => write!(f, "finalizing"),
            Self::Done(outcome) => write!(f, "done ({outcome:?})"),
        }
    }
}

fn enter(phase: RunPhase) {
    debug!("Run phase: {}", phase);
}

/// Verifies reference balances against the remote service.
pub struct BalanceVerifier {
    config: VerifyConfig,
    builder: Arc<dyn QueryBuilder>,
    executor: QueryExecutor,
}

impl BalanceVerifier {
    pub fn new(
        config: VerifyConfig,
        builder: Arc<dyn QueryBuilder>,
        transport: Arc<dyn QueryTransport>,
        parser: Arc<dyn ResponseParser>,
    ) -> Self {
        Self {
            config,
            builder,
            executor: QueryExecutor::new(transport, parser),
        }
    }

    pub fn config(&self) -> &VerifyConfig {
        &self.config
    }

    /// Load the reference data and verify it.
    ///
    /// Fails without a summary when the configuration is invalid or the
    /// reference data cannot be loaded.
    pub async fn run(
        &self,
        loader: &dyn ReferenceLoader,
        observer: &mut dyn RunObserver,
    ) -> Result<RunSummary, VerifyError> {
        enter(RunPhase::Init);
        if let Err(e) = self.config.validate() {
            enter(RunPhase::Done(Outcome::Aborted));
            return Err(e);
        }

        enter(RunPhase::Loading);
        let reference = match loader.load().await {
            Ok(reference) => reference,
            Err(e) => {
                error!("Failed to load reference data: {}", e);
                enter(RunPhase::Done(Outcome::Aborted));
                return Err(e);
            }
        };

        self.verify(&reference, observer).await
    }

    /// Verify already loaded reference data.
    pub async fn verify(
        &self,
        reference: &ReferenceData,
        observer: &mut dyn RunObserver,
    ) -> Result<RunSummary, VerifyError> {
        self.config.validate()?;

        enter(RunPhase::Partitioning);
        let batches = build_batches(
            reference.ordered_keys(),
            self.config.batch_size,
            self.config.max_to_process,
        );
        info!(
            "Validating {} REV balances.",
            batches.iter().map(|b| b.len()).sum::<usize>()
        );
        debug!("{}", describe_batches(&batches, self.config.batch_size));

        let index = reference.index();
        let mut aggregator = Aggregator::new(self.config.allow_unreported_zero);
        if reference.has_duplicates() {
            warn!(
                "REV addresses contain duplicates: {} loaded, {} unique",
                reference.loaded_pairs(),
                reference.unique_keys()
            );
            aggregator.record_duplicates(reference.duplicate_count());
        }
        let scheduler = WaveScheduler::new(
            self.builder.as_ref(),
            &self.executor,
            self.config.concurrency_limit,
        );

        let waves = scheduler
            .run(batches, |wave| {
                enter(RunPhase::Wave(wave.index));
                settle_wave(wave, index, &mut aggregator, observer);
            })
            .await;

        enter(RunPhase::Finalizing);
        let summary = aggregator.finalize();
        let outcome = if summary.success {
            Outcome::Success
        } else {
            Outcome::Failed
        };
        info!(
            "Verification complete: {} waves, {} checked, {} mismatched, {} batch(es) failed in {:.1}s",
            waves,
            summary.processed,
            summary.mismatches.len(),
            summary.batch_failures.len(),
            summary.duration_secs()
        );
        enter(RunPhase::Done(outcome));
        Ok(summary)
    }
}

/// Fold one settled wave into the aggregator, in batch order.
fn settle_wave(
    wave: WaveOutcome,
    index: &ReferenceIndex,
    aggregator: &mut Aggregator,
    observer: &mut dyn RunObserver,
) {
    debug!(
        "Wave {} settled in {:?} ({} batches)",
        wave.index,
        wave.duration,
        wave.outcomes.len()
    );
    for outcome in wave.outcomes {
        match outcome.result {
            Ok(reported) => {
                for missing in unreported_keys(&outcome.batch, &reported, index) {
                    aggregator.record_unreported(missing, observer);
                }
                for verdict in reconcile(&reported, index) {
                    aggregator.record_verdict(verdict, observer);
                }
            }
            Err(e) => {
                warn!("{}", e);
                aggregator.record_failure(
                    BatchFailure {
                        batch_id: outcome.batch.id,
                        keys: outcome.batch.keys,
                        reason: e.to_string(),
                    },
                    observer,
                );
            }
        }
    }
    aggregator.finish_wave(wave.index, observer);
}
