//! # Reckon
//!
//! A command-line calculator with a bounded calculation history,
//! snapshot-based undo/redo, and CSV persistence.
//!
//! ## Core Concepts
//!
//! - **Operations**: a registry of named arithmetic behaviors with explicit
//!   failure rules (division by zero, even roots of negatives, ...)
//! - **History**: a bounded FIFO of immutable calculation records
//! - **Snapshots**: value copies of the history kept on undo/redo stacks
//! - **Observers**: callbacks run after each change (logging, auto-save)
//!
//! ## Example
//!
//! ```no_run
//! use reckon::{Calculator, CalculatorConfig};
//!
//! let mut calc = Calculator::new(CalculatorConfig::from_env()?);
//! calc.calculate("add", "2", "3")?;
//! calc.calculate("divide", "10", "4")?;
//! calc.undo()?;
//! calc.save()?;
//! # Ok::<(), reckon::CalcError>(())
//! ```

pub mod calculation;
pub mod calculator;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod observers;
pub mod operations;
pub mod persistence;
pub mod repl;
pub mod types;
pub mod undo;
pub mod validation;

// Re-exports
pub use calculation::Calculation;
pub use calculator::{format_number, Calculator};
pub use config::CalculatorConfig;
pub use error::{CalcError, ErrorCategory, Result};
pub use history::{HistoryStore, Snapshot};
pub use observers::{autosave_observer, logging_observer, CalculatorEvent, Observer};
pub use operations::{CustomId, Operation, OperationFn, OperationRegistry, RESERVED_WORDS};
pub use persistence::{HistoryFile, HEADER};
pub use repl::{Command, Repl, Reply};
pub use types::{OperationKind, Timestamp};
pub use undo::UndoRedo;
pub use validation::{normalize_name, Validator};
