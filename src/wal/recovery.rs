//! WAL Recovery
//!
//! Rebuilds the durable disk from a possibly truncated recovery log with a
//! single backward scan.
//!
//! ## Scan Rules (newest record first)
//! - `END CKPT`: remember that a checkpoint completed
//! - `START CKPT`: stop if an `END CKPT` was already seen; otherwise every
//!   listed transaction is complete and later `START` records count
//! - `START T`: marks `T` complete, but only once a `START CKPT` was seen
//! - `COMMIT T`: marks `T` complete
//! - `<T, A, v>`: skipped when `T` is complete, otherwise `disk[A] = v`
//!
//! Completion is tracked per transaction, not per address. Once a
//! transaction is complete every older change it made is skipped, even
//! changes to addresses its newer records never touched.

use std::collections::HashMap;

use crate::storage::{format_pairs, Tier};

use super::{LogRecord, RecoveryLog};

/// Statistics from one recovery run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Records visited before the scan ended
    pub records_scanned: u64,

    /// Change records written to disk
    pub changes_applied: u64,

    /// Change records skipped because their transaction was complete
    pub changes_skipped: u64,

    /// Whether the scan stopped early at a checkpoint boundary
    pub stopped_at_checkpoint: bool,

    /// Malformed lines the reader ignored
    pub malformed_lines: usize,
}

/// Final disk image plus run statistics
#[derive(Debug, Clone)]
pub struct RecoveryOutcome {
    pub disk: Tier,
    pub result: RecoveryResult,
}

impl RecoveryOutcome {
    /// The recovery output artifact: one sorted-pairs line
    pub fn render(&self) -> String {
        format_pairs(&self.disk)
    }
}

/// Backward-scan REDO recovery
pub struct RecoveryEngine {
    disk: Tier,
    /// Transaction → complete. Absent means undetermined, never false.
    complete: HashMap<String, bool>,
    start_checkpoint_seen: bool,
    end_checkpoint_seen: bool,
    result: RecoveryResult,
}

impl RecoveryEngine {
    /// Start from the bootstrap disk with an empty completion map
    pub fn new(bootstrap: Tier) -> Self {
        Self {
            disk: bootstrap,
            complete: HashMap::new(),
            start_checkpoint_seen: false,
            end_checkpoint_seen: false,
            result: RecoveryResult::default(),
        }
    }

    /// Recover a parsed log in one call
    pub fn recover(log: &RecoveryLog) -> RecoveryOutcome {
        let mut engine = Self::new(log.bootstrap.clone());
        engine.result.malformed_lines = log.malformed;
        engine.scan(&log.records);
        engine.finish()
    }

    /// Scan `records` (chronological order) from newest to oldest
    pub fn scan(&mut self, records: &[LogRecord]) {
        for record in records.iter().rev() {
            self.result.records_scanned += 1;
            if !self.visit(record) {
                self.result.stopped_at_checkpoint = true;
                tracing::debug!(
                    "Stopping scan at {} after a completed checkpoint",
                    record
                );
                break;
            }
        }
    }

    /// Apply one record. Returns false when the scan must stop.
    fn visit(&mut self, record: &LogRecord) -> bool {
        match record {
            LogRecord::EndCheckpoint => {
                self.end_checkpoint_seen = true;
            }
            LogRecord::StartCheckpoint { active } => {
                if self.end_checkpoint_seen {
                    return false;
                }
                self.start_checkpoint_seen = true;
                for tx in active {
                    self.mark_complete(tx);
                }
            }
            LogRecord::Start { tx } => {
                if self.start_checkpoint_seen {
                    self.mark_complete(tx);
                }
            }
            LogRecord::Commit { tx } => {
                self.mark_complete(tx);
            }
            LogRecord::Change { tx, address, value } => {
                if self.is_complete(tx) {
                    self.result.changes_skipped += 1;
                    tracing::trace!("Skipping change {} (transaction complete)", record);
                } else {
                    self.result.changes_applied += 1;
                    tracing::trace!("Redoing change {}", record);
                    self.disk.insert(address.clone(), *value);
                }
            }
        }
        true
    }

    fn mark_complete(&mut self, tx: &str) {
        if !self.is_complete(tx) {
            self.complete.insert(tx.to_string(), true);
        }
    }

    /// Whether `tx` has been determined complete so far
    pub fn is_complete(&self, tx: &str) -> bool {
        self.complete.get(tx).copied().unwrap_or(false)
    }

    /// Current disk image
    pub fn disk(&self) -> &Tier {
        &self.disk
    }

    /// Consume the engine and return the final disk
    pub fn finish(self) -> RecoveryOutcome {
        tracing::info!(
            "Recovery scanned {} records: {} changes redone, {} skipped{}",
            self.result.records_scanned,
            self.result.changes_applied,
            self.result.changes_skipped,
            if self.result.stopped_at_checkpoint {
                ", stopped at checkpoint"
            } else {
                ""
            }
        );

        RecoveryOutcome {
            disk: self.disk,
            result: self.result,
        }
    }
}
