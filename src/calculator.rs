//! The calculator session: owns history, undo/redo state and observers.
//!
//! Every mutation of the history goes through this type so that a snapshot
//! is recorded before it happens and observers are told after it succeeds.

use crate::calculation::Calculation;
use crate::config::CalculatorConfig;
use crate::error::Result;
use crate::history::HistoryStore;
use crate::observers::{autosave_observer, logging_observer, CalculatorEvent, Observer};
use crate::operations::OperationRegistry;
use crate::persistence::HistoryFile;
use crate::undo::UndoRedo;
use crate::validation::Validator;

/// A single calculator session.
pub struct Calculator {
    config: CalculatorConfig,
    registry: OperationRegistry,
    validator: Validator,
    history: HistoryStore,
    undo: UndoRedo,
    file: HistoryFile,
    observers: Vec<Observer>,
}

impl Calculator {
    /// Create a session with the built-in operations and default observers
    /// (logging, plus auto-save when enabled).
    pub fn new(config: CalculatorConfig) -> Self {
        Self::with_registry(config, OperationRegistry::new())
    }

    /// Create a session with a custom operation registry.
    pub fn with_registry(config: CalculatorConfig, registry: OperationRegistry) -> Self {
        let mut calculator = Self::bare(config, registry);
        calculator.add_observer(logging_observer());
        if calculator.config.auto_save {
            let file = calculator.file.clone();
            calculator.add_observer(autosave_observer(file));
        }
        tracing::info!(
            capacity = calculator.history.capacity(),
            auto_save = calculator.config.auto_save,
            history_file = %calculator.file.path().display(),
            "calculator initialized"
        );
        calculator
    }

    /// Create a session without any observers attached.
    pub fn bare(config: CalculatorConfig, registry: OperationRegistry) -> Self {
        Self {
            validator: Validator::new(config.max_input_value),
            history: HistoryStore::new(config.max_history_size),
            undo: UndoRedo::new(),
            file: HistoryFile::new(config.history_file.clone()),
            observers: Vec::new(),
            registry,
            config,
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Mutable access for registering custom operations.
    pub fn registry_mut(&mut self) -> &mut OperationRegistry {
        &mut self.registry
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn last(&self) -> Option<&Calculation> {
        self.history.last()
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn history_file(&self) -> &HistoryFile {
        &self.file
    }

    /// Attach an observer; observers run in attachment order.
    pub fn add_observer(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    /// Validate textual operands, then calculate.
    pub fn calculate(&mut self, operation: &str, a: &str, b: &str) -> Result<Calculation> {
        let a = self.validator.parse(a)?;
        let b = self.validator.parse(b)?;
        self.apply(operation, a, b)
    }

    /// Validate numeric operands, then calculate.
    pub fn calculate_values(&mut self, operation: &str, a: f64, b: f64) -> Result<Calculation> {
        let a = self.validator.check(a)?;
        let b = self.validator.check(b)?;
        self.apply(operation, a, b)
    }

    fn apply(&mut self, operation: &str, a: f64, b: f64) -> Result<Calculation> {
        let record = match Calculation::new(&self.registry, operation, a, b) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(operation, a, b, error = %e, "calculation failed");
                return Err(e);
            }
        };

        self.undo.record(self.history.snapshot());
        if let Some(evicted) = self.history.add(record.clone()) {
            tracing::debug!(evicted = %evicted, "history full; evicted oldest record");
        }
        self.notify(CalculatorEvent::Calculated {
            record: record.clone(),
        });
        Ok(record)
    }

    /// Empty the history. Returns `false` (and records nothing) when it was
    /// already empty.
    pub fn clear(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        self.undo.record(self.history.snapshot());
        self.history.clear();
        self.notify(CalculatorEvent::Cleared);
        true
    }

    /// Restore the state before the last mutation.
    pub fn undo(&mut self) -> Result<()> {
        let previous = self.undo.undo(self.history.snapshot())?;
        self.history.restore(previous);
        self.notify(CalculatorEvent::Undone);
        Ok(())
    }

    /// Re-apply the most recently undone mutation.
    pub fn redo(&mut self) -> Result<()> {
        let next = self.undo.redo(self.history.snapshot())?;
        self.history.restore(next);
        self.notify(CalculatorEvent::Redone);
        Ok(())
    }

    /// Write the history file. Returns the number of records written.
    pub fn save(&mut self) -> Result<usize> {
        let records = self.history.get_all();
        self.file.save(&records)?;
        self.notify(CalculatorEvent::Saved {
            count: records.len(),
        });
        Ok(records.len())
    }

    /// Replace the history with the contents of the history file.
    ///
    /// On error the in-memory history and undo/redo stacks are unchanged.
    /// Returns the number of records now in history.
    pub fn load(&mut self) -> Result<usize> {
        let records = match self.file.load(&self.registry) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %self.file.path().display(), error = %e, "history load failed");
                return Err(e);
            }
        };

        self.undo.record(self.history.snapshot());
        self.history.replace(records);
        let count = self.history.len();
        self.notify(CalculatorEvent::Loaded { count });
        Ok(count)
    }

    /// Format a number for display using the configured precision.
    ///
    /// Integral values print without decimals; others are rounded to
    /// `precision` places with trailing zeros removed.
    pub fn format_value(&self, value: f64) -> String {
        format_number(value, self.config.precision)
    }

    fn notify(&mut self, event: CalculatorEvent) {
        for observer in self.observers.iter_mut() {
            observer(&event, &self.history);
        }
    }
}

/// Display form of a number with at most `precision` decimal places.
pub fn format_number(value: f64, precision: usize) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{value:.0}");
    }
    let text = format!("{value:.precision$}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}
