//! A single calculation record.

use crate::error::Result;
use crate::operations::OperationRegistry;
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable record of one operation invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    operation: String,
    operand_a: f64,
    operand_b: f64,
    result: f64,
    timestamp: Timestamp,
}

impl Calculation {
    /// Compute a new calculation, stamped with the current time.
    pub fn new(registry: &OperationRegistry, operation: &str, a: f64, b: f64) -> Result<Self> {
        Self::at(registry, operation, a, b, Timestamp::now())
    }

    /// Compute a new calculation with an explicit timestamp.
    pub fn at(
        registry: &OperationRegistry,
        operation: &str,
        a: f64,
        b: f64,
        timestamp: Timestamp,
    ) -> Result<Self> {
        let op = registry.resolve(operation)?;
        let result = registry.execute_resolved(op, a, b)?;
        Ok(Self {
            operation: registry.name_of(op)?.to_string(),
            operand_a: a,
            operand_b: b,
            result,
            timestamp,
        })
    }

    /// Rebuild a calculation from persisted fields.
    ///
    /// The operation must still be registered. If recomputing disagrees with
    /// the stored result (or now fails), the stored result wins and the
    /// discrepancy is logged.
    pub fn restore(
        registry: &OperationRegistry,
        operation: &str,
        a: f64,
        b: f64,
        stored_result: f64,
        timestamp: Timestamp,
    ) -> Result<Self> {
        let op = registry.resolve(operation)?;
        match registry.execute_resolved(op, a, b) {
            Ok(recomputed) if recomputed == stored_result => {}
            Ok(recomputed) => tracing::warn!(
                operation,
                a,
                b,
                stored_result,
                recomputed,
                "persisted result differs from recomputed value; keeping persisted result"
            ),
            Err(e) => tracing::warn!(
                operation,
                a,
                b,
                stored_result,
                error = %e,
                "persisted calculation no longer computes; keeping persisted result"
            ),
        }
        Ok(Self {
            operation: registry.name_of(op)?.to_string(),
            operand_a: a,
            operand_b: b,
            result: stored_result,
            timestamp,
        })
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn operand_a(&self) -> f64 {
        self.operand_a
    }

    pub fn operand_b(&self) -> f64 {
        self.operand_b
    }

    pub fn result(&self) -> f64 {
        self.result
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} {} = {}",
            self.timestamp, self.operand_a, self.operation, self.operand_b, self.result
        )
    }
}
