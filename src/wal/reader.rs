//! WAL Reader
//!
//! Reads a recovery log: a bootstrap disk line followed by bracketed records.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use crate::error::Result;
use crate::storage::{format_pairs, parse_pairs, Tier};

use super::LogRecord;

/// A parsed recovery log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryLog {
    /// Disk contents recovery starts from
    pub bootstrap: Tier,

    /// Well-formed records in chronological order
    pub records: Vec<LogRecord>,

    /// Non-blank lines that were not valid records
    pub malformed: usize,
}

impl RecoveryLog {
    /// Parse a recovery log held in memory
    pub fn parse(text: &str) -> Result<Self> {
        WalReader::new(text.as_bytes())?.into_log()
    }

    /// Read a recovery log from a file
    pub fn read(path: &Path) -> Result<Self> {
        WalReader::open(path)?.into_log()
    }

    /// Render back to the recovery log format
    pub fn render(&self) -> String {
        let mut out = format_pairs(&self.bootstrap);
        out.push('\n');
        for record in &self.records {
            out.push_str(&record.to_string());
            out.push('\n');
        }
        out
    }
}

/// Line reader over a recovery log
pub struct WalReader<R = BufReader<File>> {
    lines: Lines<R>,
    /// 1-based number of the last line consumed
    line_no: usize,
    bootstrap: Tier,
    malformed: usize,
}

impl WalReader<BufReader<File>> {
    /// Open a recovery log file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: BufRead> WalReader<R> {
    /// Wrap a reader and consume the bootstrap line.
    ///
    /// A malformed bootstrap line is an error: without it there is no disk
    /// to recover onto.
    pub fn new(reader: R) -> Result<Self> {
        let mut lines = reader.lines();

        let bootstrap = match lines.next() {
            Some(line) => parse_pairs(&line?, 1)?,
            None => Tier::new(),
        };

        Ok(Self {
            lines,
            line_no: 1,
            bootstrap,
            malformed: 0,
        })
    }

    /// Disk contents from the first line
    pub fn bootstrap(&self) -> &Tier {
        &self.bootstrap
    }

    /// Malformed lines skipped so far
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Read the next well-formed record.
    ///
    /// Blank lines are skipped silently, malformed ones with a warning.
    pub fn next_record(&mut self) -> Result<Option<LogRecord>> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match LogRecord::parse(trimmed) {
                Some(record) => return Ok(Some(record)),
                None => {
                    self.malformed += 1;
                    tracing::warn!("Ignoring malformed log line {}: {}", self.line_no, trimmed);
                }
            }
        }

        Ok(None)
    }

    /// Drain the remaining records into a `RecoveryLog`
    pub fn into_log(mut self) -> Result<RecoveryLog> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record()? {
            records.push(record);
        }

        Ok(RecoveryLog {
            bootstrap: self.bootstrap,
            records,
            malformed: self.malformed,
        })
    }
}
