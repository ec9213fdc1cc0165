//! Program Module
//!
//! Parses transaction programs into an ordered, immutable transaction list.
//!
//! ## Input Format
//! ```text
//! A 10 B 20            <- bootstrap disk (address value pairs)
//!
//! T1 3                 <- header: name, declared command count
//! READ(A,R1)
//! R1 := R1 + 5
//! WRITE(A,R1)
//!
//! T2 1
//! OUTPUT(A)
//! ```
//!
//! Commands are classified once here, so the engine never re-parses text.

mod command;
mod parser;

pub use command::{ArithOp, Command, DiskKind, DiskOp, Operator};
pub use parser::parse_program;

use crate::storage::Tier;

/// A named transaction with its classified commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Unique transaction name
    pub name: String,

    /// Declared command count from the header line
    pub size: usize,

    /// Commands in program order (always `size` of them)
    pub commands: Vec<Command>,
}

/// A parsed program: bootstrap disk plus transactions in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Initial disk contents
    pub disk: Tier,

    /// Transactions in round-robin order
    pub transactions: Vec<Transaction>,
}

impl Program {
    /// Sum of every transaction's declared size
    pub fn total_commands(&self) -> usize {
        self.transactions.iter().map(|tx| tx.size).sum()
    }

    /// Look up a transaction by name
    pub fn transaction(&self, name: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.name == name)
    }
}
