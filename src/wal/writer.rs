//! WAL Writer
//!
//! Streams execution log records to a file as the engine emits them.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::WalSyncStrategy;
use crate::error::Result;

use super::WalRecord;

/// Writes records to the WAL file
pub struct WalWriter {
    /// Output file path
    path: PathBuf,
    /// Buffered writer for performance
    writer: BufWriter<File>,
    /// When to flush + fsync
    sync_strategy: WalSyncStrategy,
    /// Records written since the last sync
    unsynced: usize,
    /// Records written in total
    records_written: u64,
}

impl WalWriter {
    /// Create (or truncate) a WAL file
    pub fn open(path: &Path, sync_strategy: WalSyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            sync_strategy,
            unsynced: 0,
            records_written: 0,
        })
    }

    /// Append a marker line and its two snapshot lines
    pub fn append(&mut self, record: &WalRecord) -> Result<()> {
        for line in record.lines() {
            self.writer.write_all(line.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }

        self.records_written += 1;
        self.unsynced += 1;

        let due = match self.sync_strategy {
            WalSyncStrategy::EveryWrite => true,
            WalSyncStrategy::EveryNEntries { count } => self.unsynced >= count,
        };
        if due {
            self.sync()?;
        }

        Ok(())
    }

    /// Truncate the file and start over, discarding anything written so far
    pub fn reset(&mut self) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;

        // Drop the old buffer unflushed so stale records never reach the new file
        let stale = std::mem::replace(&mut self.writer, BufWriter::new(file));
        drop(stale.into_parts());
        self.unsynced = 0;
        self.records_written = 0;
        Ok(())
    }

    /// Force buffered records to disk
    pub fn sync(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_data()?;
        self.unsynced = 0;
        Ok(())
    }

    /// Number of records appended so far
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
