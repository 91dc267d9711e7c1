//! Error types for the calculator.

use thiserror::Error;

/// Broad family an error belongs to.
///
/// The REPL uses this to prefix messages; tests use it to assert on the
/// failure policy without matching every variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Operation,
    Validation,
    History,
    Persistence,
    Config,
}

impl ErrorCategory {
    /// Human-readable label used in REPL output.
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Operation => "Operation error",
            ErrorCategory::Validation => "Validation error",
            ErrorCategory::History => "History error",
            ErrorCategory::Persistence => "Persistence error",
            ErrorCategory::Config => "Configuration error",
        }
    }
}

/// Main error type for calculator operations.
#[derive(Debug, Error)]
pub enum CalcError {
    // --- Operation errors ---
    #[error("{operation}: division by zero")]
    DivisionByZero { operation: String },

    #[error("{operation}: {reason}")]
    Domain { operation: String, reason: String },

    #[error("{operation}: result is not a finite number")]
    NonFinite { operation: String },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Cannot register operation: {0}")]
    Registration(String),

    // --- Validation errors ---
    #[error("{0}")]
    Validation(String),

    #[error("Value {value} is out of range (maximum magnitude {max})")]
    OutOfRange { value: f64, max: f64 },

    // --- History errors ---
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    // --- Persistence errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Malformed history file: {0}")]
    Parse(String),

    #[error("History file is locked by another process")]
    Locked,

    // --- Configuration errors ---
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CalcError {
    /// Which family this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CalcError::DivisionByZero { .. }
            | CalcError::Domain { .. }
            | CalcError::NonFinite { .. }
            | CalcError::UnknownOperation(_)
            | CalcError::Registration(_) => ErrorCategory::Operation,
            CalcError::Validation(_) | CalcError::OutOfRange { .. } => ErrorCategory::Validation,
            CalcError::NothingToUndo | CalcError::NothingToRedo => ErrorCategory::History,
            CalcError::Io(_) | CalcError::Csv(_) | CalcError::Parse(_) | CalcError::Locked => {
                ErrorCategory::Persistence
            }
            CalcError::Config(_) => ErrorCategory::Config,
        }
    }

    pub(crate) fn domain(operation: &str, reason: impl Into<String>) -> Self {
        CalcError::Domain {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn division_by_zero(operation: &str) -> Self {
        CalcError::DivisionByZero {
            operation: operation.to_string(),
        }
    }
}

impl From<csv::Error> for CalcError {
    fn from(e: csv::Error) -> Self {
        match e.kind() {
            csv::ErrorKind::UnequalLengths { .. } => CalcError::Parse(e.to_string()),
            _ => CalcError::Csv(e.to_string()),
        }
    }
}

/// Result type for calculator operations.
pub type Result<T> = std::result::Result<T, CalcError>;
