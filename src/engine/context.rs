//! Execution context
//!
//! Registers, memory and disk for one run, owned by the engine.

use std::collections::HashMap;

use crate::error::{RedoError, Result};
use crate::program::{ArithOp, Operator};
use crate::storage::Tier;
use crate::wal::Snapshot;

/// The three storage tiers of a run
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    registers: HashMap<String, i64>,
    memory: Tier,
    disk: Tier,
}

impl ExecutionContext {
    /// Fresh context with empty registers and memory
    pub fn new(disk: Tier) -> Self {
        Self {
            registers: HashMap::new(),
            memory: Tier::new(),
            disk,
        }
    }

    /// `READ(address, register)`
    pub fn read(&mut self, tx: &str, address: &str, register: &str) -> Result<()> {
        let value = self.fault_in(tx, address)?;
        self.registers.insert(register.to_string(), value);
        Ok(())
    }

    /// `WRITE(address, register)`. Returns the memory value it replaced.
    pub fn write(&mut self, tx: &str, address: &str, register: &str) -> Result<i64> {
        let value = self.register_value(tx, register)?;
        let before = self.fault_in(tx, address)?;
        self.memory.insert(address.to_string(), value);
        Ok(before)
    }

    /// `OUTPUT(address)`
    pub fn output(&mut self, tx: &str, address: &str) -> Result<()> {
        let value = self.fault_in(tx, address)?;
        self.disk.insert(address.to_string(), value);
        Ok(())
    }

    /// `dest := src <op> literal`
    pub fn arith(&mut self, tx: &str, op: &ArithOp) -> Result<()> {
        let src = self.register_value(tx, &op.src)?;

        if op.operator == Operator::Div && op.literal == 0 {
            return Err(RedoError::DivisionByZero {
                tx: tx.to_string(),
                command: op.to_string(),
            });
        }

        let value = op
            .operator
            .apply(src, op.literal)
            .ok_or_else(|| RedoError::ArithmeticOverflow {
                tx: tx.to_string(),
                command: op.to_string(),
            })?;

        self.registers.insert(op.dest.clone(), value);
        Ok(())
    }

    /// Load `address` into memory on first reference and return its value
    fn fault_in(&mut self, tx: &str, address: &str) -> Result<i64> {
        if let Some(value) = self.memory.get(address) {
            return Ok(*value);
        }

        let value = *self
            .disk
            .get(address)
            .ok_or_else(|| RedoError::UnknownAddress {
                tx: tx.to_string(),
                address: address.to_string(),
            })?;

        self.memory.insert(address.to_string(), value);
        Ok(value)
    }

    fn register_value(&self, tx: &str, register: &str) -> Result<i64> {
        self.registers
            .get(register)
            .copied()
            .ok_or_else(|| RedoError::UnknownRegister {
                tx: tx.to_string(),
                register: register.to_string(),
            })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn register(&self, name: &str) -> Option<i64> {
        self.registers.get(name).copied()
    }

    pub fn memory(&self) -> &Tier {
        &self.memory
    }

    pub fn disk(&self) -> &Tier {
        &self.disk
    }

    /// Copy of memory and disk as they are right now
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(&self.memory, &self.disk)
    }
}
