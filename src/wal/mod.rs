//! Write-Ahead Log (WAL) Module
//!
//! Both log grammars and the recovery engine that consumes one of them.
//!
//! ## Responsibilities
//! - Append a record for every `START`, `WRITE` and `COMMIT` the engine performs
//! - Stream those records to a file as they happen
//! - Read a (possibly crash-truncated) recovery log back
//! - Reconstruct the durable disk with a single backward scan
//!
//! ## Execution Log Format
//! Every marker line is followed by the memory and disk snapshot taken right
//! after it; an empty tier is an empty line.
//! ```text
//! <START T1>
//!
//! A 10 B 20
//! <T1, A, 10>
//! A 15
//! A 10 B 20
//! <COMMIT T1>
//! A 15
//! A 10 B 20
//! ```
//!
//! ## Recovery Log Format
//! ```text
//! A 10 B 20
//! <START T1>
//! <T1, A, 10>
//! <START CKPT (T1)>
//! <END CKPT>
//! <COMMIT T1>
//! ```

mod entry;
mod record;
mod writer;
mod reader;
mod recovery;

pub use entry::{Snapshot, Wal, WalEntry, WalRecord};
pub use record::LogRecord;
pub use writer::WalWriter;
pub use reader::{RecoveryLog, WalReader};
pub use recovery::{RecoveryEngine, RecoveryOutcome, RecoveryResult};
