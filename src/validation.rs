//! Input validation: raw user input to bounded numbers.

use crate::error::{CalcError, Result};

/// Converts raw input into bounds-checked numbers.
#[derive(Clone, Copy, Debug)]
pub struct Validator {
    max_abs: f64,
}

impl Validator {
    /// Create a validator rejecting values whose magnitude exceeds `max_abs`.
    pub fn new(max_abs: f64) -> Self {
        Self { max_abs }
    }

    /// Parse and bounds-check a textual operand.
    pub fn parse(&self, input: &str) -> Result<f64> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CalcError::Validation(
                "No input provided. Expected a number.".into(),
            ));
        }
        let value: f64 = trimmed.parse().map_err(|_| {
            CalcError::Validation(format!("Invalid input: '{trimmed}' is not a valid number"))
        })?;
        self.check(value)
    }

    /// Bounds-check an already numeric operand.
    pub fn check(&self, value: f64) -> Result<f64> {
        if !value.is_finite() {
            return Err(CalcError::Validation(format!(
                "Invalid input: {value} is not a finite number"
            )));
        }
        if value.abs() > self.max_abs {
            return Err(CalcError::OutOfRange {
                value,
                max: self.max_abs,
            });
        }
        Ok(value)
    }
}

/// Trim and lower-case a command or operation name.
pub fn normalize_name(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}
