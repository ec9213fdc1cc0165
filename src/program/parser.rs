//! Program parser
//!
//! Line-oriented reader for the transaction program format.

use std::collections::HashSet;

use crate::error::{RedoError, Result};
use crate::storage::parse_pairs;

use super::{Command, Program, Transaction};

/// Parse a whole program.
///
/// Line 1 bootstraps the disk. After that, blank lines are skipped; a header
/// `name size` opens a transaction and the next `size` non-blank lines are
/// its commands.
pub fn parse_program(text: &str) -> Result<Program> {
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line.trim()));

    let disk = match lines.next() {
        Some((line_no, line)) => parse_pairs(line, line_no)?,
        None => return Ok(Program::default()),
    };

    let mut transactions: Vec<Transaction> = Vec::new();
    let mut names: HashSet<String> = HashSet::new();
    let mut current: Option<Transaction> = None;

    for (line_no, line) in lines {
        if line.is_empty() {
            continue;
        }

        match current.take() {
            Some(mut tx) => {
                let command = Command::parse(line)
                    .map_err(|reason| RedoError::parse(line_no, reason))?;
                tx.commands.push(command);
                if tx.commands.len() == tx.size {
                    transactions.push(tx);
                } else {
                    current = Some(tx);
                }
            }
            None => {
                let tx = parse_header(line, line_no)?;
                if !names.insert(tx.name.clone()) {
                    return Err(RedoError::DuplicateTransaction(tx.name));
                }
                if tx.size == 0 {
                    transactions.push(tx);
                } else {
                    current = Some(tx);
                }
            }
        }
    }

    if let Some(tx) = current {
        return Err(RedoError::parse(
            text.lines().count(),
            format!(
                "transaction {} declares {} commands but only {} were given",
                tx.name,
                tx.size,
                tx.commands.len()
            ),
        ));
    }

    tracing::debug!(
        "Parsed program: {} transactions, {} disk addresses",
        transactions.len(),
        disk.len()
    );

    Ok(Program { disk, transactions })
}

/// Parse a `name size` header line
fn parse_header(line: &str, line_no: usize) -> Result<Transaction> {
    let mut parts = line.split_whitespace();

    let (name, size) = match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(size), None) => (name, size),
        _ => {
            return Err(RedoError::parse(
                line_no,
                format!("expected transaction header 'name size', got: {}", line),
            ))
        }
    };

    let size: usize = size.parse().map_err(|_| {
        RedoError::parse(
            line_no,
            format!("transaction {} has an invalid command count: {}", name, size),
        )
    })?;

    Ok(Transaction {
        name: name.to_string(),
        size,
        commands: Vec::with_capacity(size),
    })
}
