//! Configuration for redolog
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{RedoError, Result};

/// Main configuration shared by the execution and recovery binaries
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Scheduling Configuration
    // -------------------------------------------------------------------------
    /// Round-robin quantum: commands granted to a transaction per round
    pub quantum: usize,

    // -------------------------------------------------------------------------
    // WAL Configuration
    // -------------------------------------------------------------------------
    /// Where the execution engine streams its WAL
    pub wal_path: PathBuf,

    /// Sync strategy: how often to flush the WAL to the file
    pub wal_sync_strategy: WalSyncStrategy,

    // -------------------------------------------------------------------------
    // Crash Simulation
    // -------------------------------------------------------------------------
    /// Number of WAL records that survive the simulated crash
    pub crash_after: Option<usize>,

    /// Where the recovery-grammar crash image is written
    pub crash_image_path: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Recovery Configuration
    // -------------------------------------------------------------------------
    /// Where the recovery engine writes the reconstructed disk line
    pub disk_output_path: PathBuf,
}

/// WAL sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalSyncStrategy {
    /// flush + fsync after every record (safest, slowest)
    EveryWrite,

    /// flush + fsync after N records
    EveryNEntries { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quantum: 1,
            wal_path: PathBuf::from("execution.log"),
            wal_sync_strategy: WalSyncStrategy::EveryWrite,
            crash_after: None,
            crash_image_path: None,
            disk_output_path: PathBuf::from("recovered_disk.txt"),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings neither engine can run with
    pub fn validate(&self) -> Result<()> {
        check_quantum(self.quantum)?;

        if let WalSyncStrategy::EveryNEntries { count: 0 } = self.wal_sync_strategy {
            return Err(RedoError::Config(
                "WAL sync interval must be at least 1 record".to_string(),
            ));
        }

        if self.crash_after.is_some() && self.crash_image_path.is_none() {
            return Err(RedoError::Config(
                "a crash point needs a crash image path".to_string(),
            ));
        }

        Ok(())
    }
}

/// Reject a zero quantum, which would never advance the scheduler
pub(crate) fn check_quantum(quantum: usize) -> Result<()> {
    if quantum == 0 {
        return Err(RedoError::Config(
            "round-robin quantum must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the round-robin quantum
    pub fn quantum(mut self, quantum: usize) -> Self {
        self.config.quantum = quantum;
        self
    }

    /// Set the WAL output path
    pub fn wal_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.wal_path = path.into();
        self
    }

    /// Set the WAL sync strategy
    pub fn wal_sync_strategy(mut self, strategy: WalSyncStrategy) -> Self {
        self.config.wal_sync_strategy = strategy;
        self
    }

    /// Simulate a crash after `records` WAL records
    pub fn crash_after(mut self, records: usize) -> Self {
        self.config.crash_after = Some(records);
        self
    }

    /// Set the crash image output path
    pub fn crash_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.crash_image_path = Some(path.into());
        self
    }

    /// Set the recovered disk output path
    pub fn disk_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.disk_output_path = path.into();
        self
    }

    /// Build and validate the config
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
