//! Engine Module
//!
//! The execution engine: runs a program under round-robin scheduling and
//! emits the write-ahead log as it goes.
//!
//! ## Responsibilities
//! - Own registers, memory and disk for the run
//! - Interleave transactions with a fixed quantum
//! - Log `START`, `WRITE` (before-image) and `COMMIT`, each with a snapshot
//! - Stream records to the WAL file before the next command runs
//!
//! A fatal error stops the run where it happened. Records already emitted
//! stay in the WAL exactly as written, which is the state a real crash
//! leaves behind for recovery.

mod context;
mod scheduler;

pub use context::ExecutionContext;
pub use scheduler::{RoundRobin, Slice};

use crate::config::{check_quantum, Config};
use crate::error::Result;
use crate::program::{Command, DiskOp, Program, Transaction};
use crate::wal::{Wal, WalEntry, WalRecord, WalWriter};

/// Summary of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Transactions in the program
    pub transactions: usize,

    /// Commands executed across all transactions
    pub commands_executed: u64,

    /// WAL records emitted
    pub wal_records: usize,
}

/// The execution engine
pub struct Engine {
    /// Commands per transaction per round
    quantum: usize,

    /// Registers, memory and disk (reset by every run)
    context: ExecutionContext,

    /// Every record emitted so far
    wal: Wal,

    /// Optional file sink, fed as records are emitted
    writer: Option<WalWriter>,

    commands_executed: u64,
}

impl Engine {
    /// Create an engine with an in-memory WAL only
    pub fn new(quantum: usize) -> Result<Self> {
        check_quantum(quantum)?;

        Ok(Self {
            quantum,
            context: ExecutionContext::default(),
            wal: Wal::new(),
            writer: None,
            commands_executed: 0,
        })
    }

    /// Create an engine that streams its WAL to `config.wal_path`
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        let writer = WalWriter::open(&config.wal_path, config.wal_sync_strategy)?;
        Ok(Self::new(config.quantum)?.with_writer(writer))
    }

    /// Attach a WAL file sink
    pub fn with_writer(mut self, writer: WalWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Run every transaction of `program` to completion.
    ///
    /// Each run starts a fresh WAL: the file sink, if any, is truncated
    /// first and synced before returning, on success and on failure alike.
    pub fn run(&mut self, program: &Program) -> Result<ExecutionReport> {
        self.context = ExecutionContext::new(program.disk.clone());
        self.wal = Wal::new();
        self.commands_executed = 0;
        if let Some(writer) = self.writer.as_mut() {
            writer.reset()?;
        }

        tracing::info!(
            "Running {} transactions ({} commands) with quantum {}",
            program.transactions.len(),
            program.total_commands(),
            self.quantum
        );

        let outcome = self.run_slices(program);
        let synced = self.sync_writer();

        if let Err(e) = outcome {
            tracing::error!(
                "Run aborted after {} WAL records: {}",
                self.wal.len(),
                e
            );
            if let Err(sync_err) = synced {
                tracing::error!("WAL sync after aborted run failed: {}", sync_err);
            }
            return Err(e);
        }
        synced?;

        let report = ExecutionReport {
            transactions: program.transactions.len(),
            commands_executed: self.commands_executed,
            wal_records: self.wal.len(),
        };

        tracing::info!(
            "Run complete: {} commands executed, {} WAL records",
            report.commands_executed,
            report.wal_records
        );

        Ok(report)
    }

    fn sync_writer(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.sync()?;
            tracing::debug!(
                "Streamed {} WAL records to {}",
                writer.records_written(),
                writer.path().display()
            );
        }
        Ok(())
    }

    fn run_slices(&mut self, program: &Program) -> Result<()> {
        let sizes = program.transactions.iter().map(|tx| tx.size).collect();
        let scheduler = RoundRobin::new(sizes, self.quantum)?;

        for slice in scheduler {
            let tx = &program.transactions[slice.tx];
            tracing::debug!(
                "Scheduling {} commands {}..{}",
                tx.name,
                slice.start,
                slice.end
            );

            if slice.begins {
                self.log(WalEntry::Start {
                    tx: tx.name.clone(),
                })?;
            }

            for command in &tx.commands[slice.start..slice.end] {
                self.dispatch(tx, command)?;
            }

            if slice.commits {
                self.log(WalEntry::Commit {
                    tx: tx.name.clone(),
                })?;
            }
        }

        Ok(())
    }

    /// Execute one command on behalf of `tx`
    fn dispatch(&mut self, tx: &Transaction, command: &Command) -> Result<()> {
        tracing::trace!("{}: {}", tx.name, command);

        match command {
            Command::Disk(DiskOp::Read { address, register }) => {
                self.context.read(&tx.name, address, register)?
            }
            Command::Disk(DiskOp::Write { address, register }) => {
                let before = self.context.write(&tx.name, address, register)?;
                self.log(WalEntry::Write {
                    tx: tx.name.clone(),
                    address: address.clone(),
                    before,
                })?;
            }
            Command::Disk(DiskOp::Output { address }) => self.context.output(&tx.name, address)?,
            Command::Arith(op) => self.context.arith(&tx.name, op)?,
        }

        self.commands_executed += 1;
        Ok(())
    }

    /// Append an entry with the current snapshot, then stream it
    fn log(&mut self, entry: WalEntry) -> Result<()> {
        let record = WalRecord {
            entry,
            snapshot: self.context.snapshot(),
        };

        if let Some(writer) = self.writer.as_mut() {
            writer.append(&record)?;
        }
        self.wal.append(record);

        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn wal(&self) -> &Wal {
        &self.wal
    }

    pub fn commands_executed(&self) -> u64 {
        self.commands_executed
    }
}
