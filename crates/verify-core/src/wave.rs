//! Wave scheduling of batch queries.
//!
//! Consecutive batches are grouped into waves of at most `concurrency_limit`
//! batches. All queries of a wave run concurrently; the next wave is only
//! dispatched after every query of the current wave has settled.

use crate::error::VerifyError;
use crate::executor::{QueryBuilder, QueryExecutor};
use crate::types::{Batch, ReportedPair};
use futures::future::join_all;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Result of one batch query inside a wave.
#[derive(Debug)]
pub struct BatchOutcome {
    pub batch: Batch,
    pub result: Result<Vec<ReportedPair>, VerifyError>,
}

/// All outcomes of a settled wave, in batch order.
#[derive(Debug)]
pub struct WaveOutcome {
    pub index: usize,
    pub outcomes: Vec<BatchOutcome>,
    pub duration: Duration,
}

impl WaveOutcome {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

/// Group consecutive batches into waves of at most `concurrency_limit`.
pub fn group_into_waves(batches: Vec<Batch>, concurrency_limit: usize) -> Vec<Vec<Batch>> {
    let limit = concurrency_limit.max(1);
    let mut waves = Vec::with_capacity(batches.len().div_ceil(limit));
    let mut current = Vec::with_capacity(limit);
    for batch in batches {
        current.push(batch);
        if current.len() == limit {
            waves.push(std::mem::replace(&mut current, Vec::with_capacity(limit)));
        }
    }
    if !current.is_empty() {
        waves.push(current);
    }
    waves
}

/// Runs waves strictly in sequence with full parallelism inside a wave.
pub struct WaveScheduler<'a> {
    builder: &'a dyn QueryBuilder,
    executor: &'a QueryExecutor,
    concurrency_limit: usize,
}

impl<'a> WaveScheduler<'a> {
    pub fn new(
        builder: &'a dyn QueryBuilder,
        executor: &'a QueryExecutor,
        concurrency_limit: usize,
    ) -> Self {
        Self {
            builder,
            executor,
            concurrency_limit,
        }
    }

    /// Run every wave, handing each settled wave to `on_settled` before the
    /// next one is dispatched.
    pub async fn run<F>(&self, batches: Vec<Batch>, mut on_settled: F) -> usize
    where
        F: FnMut(WaveOutcome),
    {
        let waves = group_into_waves(batches, self.concurrency_limit);
        let total = waves.len();
        for (index, wave) in waves.into_iter().enumerate() {
            debug!("Dispatching wave {}/{} ({} batches)", index + 1, total, wave.len());
            let outcome = self.run_wave(index, wave).await;
            if outcome.failed() > 0 {
                warn!(
                    "Wave {} settled with {} failed batch(es)",
                    index + 1,
                    outcome.failed()
                );
            }
            on_settled(outcome);
        }
        total
    }

    /// Dispatch one wave and wait until all of its queries have settled.
    pub async fn run_wave(&self, index: usize, wave: Vec<Batch>) -> WaveOutcome {
        let start = Instant::now();
        let queries = wave.iter().map(|batch| {
            let query = self.builder.build_query(batch);
            async move { self.executor.execute(&query).await }
        });
        // join_all keeps input order, so outcomes follow batch order
        // regardless of completion order.
        let results = join_all(queries).await;
        let outcomes = wave
            .into_iter()
            .zip(results)
            .map(|(batch, result)| BatchOutcome { batch, result })
            .collect();
        WaveOutcome {
            index,
            outcomes,
            duration: start.elapsed(),
        }
    }
}
