//! Recovery log records
//!
//! The bracketed line grammar read by the recovery engine.

use std::fmt;

/// One line of a recovery log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    /// `<START CKPT (T1 T2)>`: transactions active when the checkpoint began
    StartCheckpoint { active: Vec<String> },

    /// `<END CKPT>`
    EndCheckpoint,

    /// `<START T1>`
    Start { tx: String },

    /// `<COMMIT T1>`
    Commit { tx: String },

    /// `<T1, A, 10>`
    Change {
        tx: String,
        address: String,
        value: i64,
    },
}

impl LogRecord {
    /// Parse one line. Returns `None` for anything malformed.
    pub fn parse(line: &str) -> Option<Self> {
        let inner = line
            .trim()
            .strip_prefix('<')?
            .strip_suffix('>')?
            .trim();

        if inner == "END CKPT" {
            return Some(LogRecord::EndCheckpoint);
        }

        if let Some(rest) = inner.strip_prefix("START CKPT") {
            let names = rest.trim().strip_prefix('(')?.strip_suffix(')')?;
            let active = names
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            return Some(LogRecord::StartCheckpoint { active });
        }

        let fields: Vec<&str> = inner.split(',').map(str::trim).collect();
        if fields.len() == 3 {
            if fields[0].is_empty() || fields[1].is_empty() {
                return None;
            }
            return Some(LogRecord::Change {
                tx: fields[0].to_string(),
                address: fields[1].to_string(),
                value: fields[2].parse().ok()?,
            });
        }

        let mut tokens = inner.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some("START"), Some(tx), None) => Some(LogRecord::Start { tx: tx.to_string() }),
            (Some("COMMIT"), Some(tx), None) => Some(LogRecord::Commit { tx: tx.to_string() }),
            _ => None,
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogRecord::StartCheckpoint { active } => {
                write!(f, "<START CKPT ({})>", active.join(" "))
            }
            LogRecord::EndCheckpoint => write!(f, "<END CKPT>"),
            LogRecord::Start { tx } => write!(f, "<START {}>", tx),
            LogRecord::Commit { tx } => write!(f, "<COMMIT {}>", tx),
            LogRecord::Change { tx, address, value } => {
                write!(f, "<{}, {}, {}>", tx, address, value)
            }
        }
    }
}
