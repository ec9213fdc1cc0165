//! WAL Entry definitions
//!
//! Records emitted by the execution engine.

use std::fmt;

use crate::storage::{format_pairs, Tier};

use super::{LogRecord, RecoveryLog};

/// A logged engine event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalEntry {
    /// First slice of a transaction is about to run
    Start { tx: String },

    /// Memory is about to be overwritten; `before` is the old value
    Write {
        tx: String,
        address: String,
        before: i64,
    },

    /// Last command of a transaction has run
    Commit { tx: String },
}

impl WalEntry {
    /// Transaction this entry belongs to
    pub fn tx(&self) -> &str {
        match self {
            WalEntry::Start { tx } | WalEntry::Write { tx, .. } | WalEntry::Commit { tx } => tx,
        }
    }

    /// Equivalent line in the recovery grammar.
    ///
    /// A `Write` becomes a change record carrying the before-image.
    pub fn to_log_record(&self) -> LogRecord {
        match self {
            WalEntry::Start { tx } => LogRecord::Start { tx: tx.clone() },
            WalEntry::Write {
                tx,
                address,
                before,
            } => LogRecord::Change {
                tx: tx.clone(),
                address: address.clone(),
                value: *before,
            },
            WalEntry::Commit { tx } => LogRecord::Commit { tx: tx.clone() },
        }
    }
}

impl fmt::Display for WalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalEntry::Start { tx } => write!(f, "<START {}>", tx),
            WalEntry::Write {
                tx,
                address,
                before,
            } => write!(f, "<{}, {}, {}>", tx, address, before),
            WalEntry::Commit { tx } => write!(f, "<COMMIT {}>", tx),
        }
    }
}

/// Memory and disk contents captured right after an entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub memory: Tier,
    pub disk: Tier,
}

impl Snapshot {
    pub fn new(memory: &Tier, disk: &Tier) -> Self {
        Self {
            memory: memory.clone(),
            disk: disk.clone(),
        }
    }

    /// The two snapshot lines: memory, then disk
    pub fn lines(&self) -> [String; 2] {
        [format_pairs(&self.memory), format_pairs(&self.disk)]
    }
}

/// An entry together with its snapshot pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalRecord {
    pub entry: WalEntry,
    pub snapshot: Snapshot,
}

impl WalRecord {
    /// Marker line followed by the two snapshot lines
    pub fn lines(&self) -> [String; 3] {
        let [memory, disk] = self.snapshot.lines();
        [self.entry.to_string(), memory, disk]
    }
}

/// Append-only, in-memory execution log
#[derive(Debug, Clone, Default)]
pub struct Wal {
    records: Vec<WalRecord>,
}

impl Wal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its 0-based position
    pub fn append(&mut self, record: WalRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    pub fn records(&self) -> &[WalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &WalEntry> {
        self.records.iter().map(|record| &record.entry)
    }

    /// Render the execution log artifact, terminated by a trailing newline
    pub fn render(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            for line in record.lines() {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    /// Translate the first `retained` records into a recovery log.
    ///
    /// The bootstrap disk is the durable disk at the crash, i.e. the disk
    /// snapshot of the last surviving record, or `initial_disk` when no
    /// record survived.
    pub fn crash_image(&self, retained: usize, initial_disk: &Tier) -> RecoveryLog {
        let survivors = &self.records[..retained.min(self.records.len())];

        let bootstrap = survivors
            .last()
            .map(|record| record.snapshot.disk.clone())
            .unwrap_or_else(|| initial_disk.clone());

        RecoveryLog {
            bootstrap,
            records: survivors
                .iter()
                .map(|record| record.entry.to_log_record())
                .collect(),
            malformed: 0,
        }
    }
}
