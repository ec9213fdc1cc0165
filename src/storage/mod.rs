//! Storage Module
//!
//! The two value tiers below the registers.
//!
//! ## Tiers
//! - **Memory** (buffer): lazily faulted in from disk, mutated by `WRITE`
//! - **Disk** (durable): mutated by `OUTPUT` or by applying a redo record
//!
//! Both tiers share one representation and one text form, the sorted-pairs
//! line used by bootstrap lines, WAL snapshots and the recovered disk image:
//!
//! ```text
//! A 10 B 20 C -3
//! ```

mod tier;

pub use tier::{format_pairs, parse_pairs, Tier};
