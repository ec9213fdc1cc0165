//! Round-robin scheduler
//!
//! Yields the command ranges each transaction runs, in execution order.

use crate::config::check_quantum;
use crate::error::Result;

/// One scheduling decision: run `start..end` of transaction `tx`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    /// Index into the program's transaction list
    pub tx: usize,
    pub start: usize,
    pub end: usize,
    /// First slice of the transaction; log `START` before running it
    pub begins: bool,
    /// Last slice of the transaction; log `COMMIT` after running it
    pub commits: bool,
}

/// Round-robin over transactions sharing one global offset.
///
/// Every pass visits unfinished transactions in declaration order and grants
/// each the commands `offset..min(offset + quantum, size)`. After the pass
/// the offset advances by the quantum.
#[derive(Debug, Clone)]
pub struct RoundRobin {
    sizes: Vec<usize>,
    quantum: usize,
    offset: usize,
    cursor: usize,
    /// Set once, never cleared
    finished: Vec<bool>,
    remaining: usize,
}

impl RoundRobin {
    /// Schedule transactions with the given declared sizes.
    ///
    /// Size-0 transactions start out finished and are never yielded.
    pub fn new(sizes: Vec<usize>, quantum: usize) -> Result<Self> {
        check_quantum(quantum)?;

        let finished: Vec<bool> = sizes.iter().map(|&size| size == 0).collect();
        let remaining = finished.iter().filter(|&&done| !done).count();

        Ok(Self {
            sizes,
            quantum,
            offset: 0,
            cursor: 0,
            finished,
            remaining,
        })
    }

    pub fn is_finished(&self, tx: usize) -> bool {
        self.finished.get(tx).copied().unwrap_or(true)
    }

    /// Transactions still owed commands
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Current global offset
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for RoundRobin {
    type Item = Slice;

    fn next(&mut self) -> Option<Slice> {
        while self.remaining > 0 {
            if self.cursor == self.sizes.len() {
                self.cursor = 0;
                self.offset += self.quantum;
                continue;
            }

            let tx = self.cursor;
            self.cursor += 1;
            if self.finished[tx] {
                continue;
            }

            let size = self.sizes[tx];
            let end = (self.offset + self.quantum).min(size);
            let commits = end == size;
            if commits {
                self.finished[tx] = true;
                self.remaining -= 1;
            }

            return Some(Slice {
                tx,
                start: self.offset,
                end,
                begins: self.offset == 0,
                commits,
            });
        }

        None
    }
}
