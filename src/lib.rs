//! # redolog
//!
//! Crash recovery modelled end to end:
//! - A round-robin execution engine over registers, a memory buffer and disk
//! - A write-ahead log of `START`, before-image `WRITE` and `COMMIT` records
//! - A REDO recovery engine bounded by fuzzy checkpoints
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Program (text)                            │
//! │              bootstrap disk + transactions                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ parse_program
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                Execution Engine                              │
//! │      RoundRobin scheduler → ExecutionContext                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ WalRecord (entry + snapshot)
//!                       ▼
//!                ┌─────────────┐
//!                │     WAL     │ ──── crash point ────┐
//!                └─────────────┘                      │
//!                                                     ▼
//!                                           ┌──────────────────┐
//!                                           │ Recovery Engine  │
//!                                           │ (backward scan)  │
//!                                           └────────┬─────────┘
//!                                                    ▼
//!                                            reconstructed disk
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod program;
pub mod wal;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RedoError, Result};
pub use config::Config;
pub use engine::{Engine, ExecutionReport};
pub use program::{parse_program, Program};
pub use wal::{RecoveryEngine, RecoveryLog};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of redolog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
