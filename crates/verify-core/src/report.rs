//! Aggregation of verdicts across waves and the final run summary.

use crate::types::{BatchFailure, UnreportedKey, VerdictRecord};
use chrono::{DateTime, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Receives progress as the run advances.
pub trait RunObserver: Send {
    fn on_verdict(&mut self, verdict: &VerdictRecord);
    fn on_batch_failure(&mut self, failure: &BatchFailure);
    fn on_unreported(&mut self, unreported: &UnreportedKey, tolerated: bool);
    fn on_wave_settled(&mut self, wave: usize, processed: u64);
}

/// ANSI escapes used for console output.
pub mod ansi {
    pub const GREEN: &str = "\x1b[0;32m";
    pub const RED: &str = "\x1b[0;31m";
    pub const RESET: &str = "\x1b[0m";
}

/// Wrap `text` in `color` when `enabled`.
pub fn paint(text: &str, color: &str, enabled: bool) -> String {
    if enabled {
        format!("{color}{text}{}", ansi::RESET)
    } else {
        text.to_string()
    }
}

/// Prints every event to stdout, one line each. Matches are green and
/// failures red when `color` is set.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    color: bool,
}

impl ConsoleObserver {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn verdict_line(&self, verdict: &VerdictRecord) -> String {
        let color = if verdict.is_match {
            ansi::GREEN
        } else {
            ansi::RED
        };
        paint(&verdict.to_string(), color, self.color)
    }

    pub fn unreported_line(&self, unreported: &UnreportedKey, tolerated: bool) -> String {
        if tolerated {
            format!("SKIP: {}: {} not reported", unreported.key, unreported.expected)
        } else {
            let line = format!(
                "MISSING: {}: {} not reported",
                unreported.key, unreported.expected
            );
            paint(&line, ansi::RED, self.color)
        }
    }

    pub fn running_count_line(&self, processed: u64) -> String {
        format!(
            "Checked so far: {}",
            paint(&processed.to_string(), ansi::GREEN, self.color)
        )
    }
}

impl RunObserver for ConsoleObserver {
    fn on_verdict(&mut self, verdict: &VerdictRecord) {
        println!("{}", self.verdict_line(verdict));
    }

    fn on_batch_failure(&mut self, failure: &BatchFailure) {
        println!("{}", paint(&failure.to_string(), ansi::RED, self.color));
    }

    fn on_unreported(&mut self, unreported: &UnreportedKey, tolerated: bool) {
        println!("{}", self.unreported_line(unreported, tolerated));
    }

    fn on_wave_settled(&mut self, _wave: usize, processed: u64) {
        println!("{}", self.running_count_line(processed));
    }
}

/// Final outcome of a verification run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Number of verdict records produced.
    pub processed: u64,
    /// Number of waves executed.
    pub waves: usize,
    /// All verdicts with `is_match == false`.
    pub mismatches: Vec<VerdictRecord>,
    /// Batches whose query failed.
    pub batch_failures: Vec<BatchFailure>,
    /// Queried keys missing from successful responses that fail the run.
    pub unreported: Vec<UnreportedKey>,
    /// Unreported keys with an expected balance of zero that were tolerated.
    pub tolerated_unreported: u64,
    /// Reference pairs whose key already appeared earlier in the snapshot.
    pub duplicate_keys: usize,
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl RunSummary {
    /// Accounts that failed verification for any reason.
    pub fn failed_accounts(&self) -> usize {
        let failed_batch_keys: usize = self.batch_failures.iter().map(|f| f.keys.len()).sum();
        self.mismatches.len() + self.unreported.len() + failed_batch_keys
    }

    pub fn duration_secs(&self) -> f64 {
        (self.completed_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// The final line of a run.
    pub fn summary_line(&self) -> String {
        if self.success {
            "REV balance validation completed successfully!".to_string()
        } else {
            format!("Check failed for {} account(s).", self.failed_accounts())
        }
    }

    /// [`Self::summary_line`] in green on success and red on failure.
    pub fn styled_summary_line(&self, color: bool) -> String {
        let tint = if self.success { ansi::GREEN } else { ansi::RED };
        paint(&self.summary_line(), tint, color)
    }

    /// Table of mismatched balances, or `None` when there are none.
    pub fn mismatch_table(&self) -> Option<String> {
        if self.mismatches.is_empty() {
            return None;
        }
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Account", "Expected", "Reported"]);
        for verdict in &self.mismatches {
            let expected = match verdict.expected {
                Some(v) => Cell::new(v),
                None => Cell::new("absent").fg(Color::Yellow),
            };
            table.add_row(vec![
                Cell::new(&verdict.key),
                expected,
                Cell::new(verdict.reported).fg(Color::Red),
            ]);
        }
        Some(table.to_string())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Running accumulation of a run, updated only at wave boundaries.
#[derive(Debug)]
pub struct Aggregator {
    processed: u64,
    waves: usize,
    mismatches: Vec<VerdictRecord>,
    batch_failures: Vec<BatchFailure>,
    unreported: Vec<UnreportedKey>,
    tolerated_unreported: u64,
    duplicate_keys: usize,
    allow_unreported_zero: bool,
    started_at: DateTime<Utc>,
}

impl Aggregator {
    pub fn new(allow_unreported_zero: bool) -> Self {
        Self {
            processed: 0,
            waves: 0,
            mismatches: Vec::new(),
            batch_failures: Vec::new(),
            unreported: Vec::new(),
            tolerated_unreported: 0,
            duplicate_keys: 0,
            allow_unreported_zero,
            started_at: Utc::now(),
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Duplicates are reported but never fail the run.
    pub fn record_duplicates(&mut self, count: usize) {
        self.duplicate_keys = count;
    }

    /// Record one verdict, keeping it only when it is a mismatch.
    pub fn record_verdict(&mut self, verdict: VerdictRecord, observer: &mut dyn RunObserver) {
        observer.on_verdict(&verdict);
        self.processed += 1;
        if !verdict.is_match {
            self.mismatches.push(verdict);
        }
    }

    pub fn record_failure(&mut self, failure: BatchFailure, observer: &mut dyn RunObserver) {
        observer.on_batch_failure(&failure);
        self.batch_failures.push(failure);
    }

    pub fn record_unreported(&mut self, unreported: UnreportedKey, observer: &mut dyn RunObserver) {
        let tolerated = self.allow_unreported_zero && unreported.expected == 0;
        observer.on_unreported(&unreported, tolerated);
        if tolerated {
            self.tolerated_unreported += 1;
        } else {
            self.unreported.push(unreported);
        }
    }

    /// Close a wave and report the running count.
    pub fn finish_wave(&mut self, wave: usize, observer: &mut dyn RunObserver) {
        self.waves += 1;
        observer.on_wave_settled(wave, self.processed);
    }

    pub fn finalize(self) -> RunSummary {
        let success =
            self.mismatches.is_empty() && self.batch_failures.is_empty() && self.unreported.is_empty();
        debug!("Finalizing run after {} waves", self.waves);
        RunSummary {
            processed: self.processed,
            waves: self.waves,
            mismatches: self.mismatches,
            batch_failures: self.batch_failures,
            unreported: self.unreported,
            tolerated_unreported: self.tolerated_unreported,
            duplicate_keys: self.duplicate_keys,
            success,
            started_at: self.started_at,
            completed_at: Utc::now(),
        }
    }
}
