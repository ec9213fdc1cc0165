//! Error types for redolog
//!
//! Provides a unified error type for both engines.

use thiserror::Error;

/// Result type alias using RedoError
pub type Result<T> = std::result::Result<T, RedoError>;

/// Unified error type for redolog operations
#[derive(Debug, Error)]
pub enum RedoError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Parse Errors (fatal before execution starts)
    // -------------------------------------------------------------------------
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Transaction name is not unique: {0}")]
    DuplicateTransaction(String),

    // -------------------------------------------------------------------------
    // Execution Errors (fatal mid-run, WAL retained as written)
    // -------------------------------------------------------------------------
    #[error("Division by zero in transaction {tx}: {command}")]
    DivisionByZero { tx: String, command: String },

    #[error("Arithmetic overflow in transaction {tx}: {command}")]
    ArithmeticOverflow { tx: String, command: String },

    #[error("Register {register} read before assignment in transaction {tx}")]
    UnknownRegister { tx: String, register: String },

    #[error("Address {address} not present on disk (transaction {tx})")]
    UnknownAddress { tx: String, address: String },
}

impl RedoError {
    /// Build a parse error for a 1-based line number
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        RedoError::Parse {
            line,
            message: message.into(),
        }
    }

    /// True for failures raised while transactions were executing.
    ///
    /// The WAL emitted before such a failure stays on disk untouched and is
    /// exactly what recovery is meant to repair.
    pub fn is_crash(&self) -> bool {
        matches!(
            self,
            RedoError::DivisionByZero { .. }
                | RedoError::ArithmeticOverflow { .. }
                | RedoError::UnknownRegister { .. }
                | RedoError::UnknownAddress { .. }
        )
    }
}
