//! Synchronous callbacks run after each successful history mutation.

use crate::calculation::Calculation;
use crate::history::HistoryStore;
use crate::persistence::HistoryFile;
use serde::Serialize;

/// Events emitted by the calculator session.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculatorEvent {
    /// A calculation was performed and appended to history.
    Calculated { record: Calculation },

    /// History was cleared.
    Cleared,

    /// The previous state was restored.
    Undone,

    /// An undone state was re-applied.
    Redone,

    /// History was replaced from the history file.
    Loaded { count: usize },

    /// History was written to the history file.
    Saved { count: usize },
}

impl CalculatorEvent {
    /// Whether this event changed the in-memory history.
    pub fn mutates_history(&self) -> bool {
        !matches!(self, CalculatorEvent::Saved { .. })
    }
}

/// Shared callback signature for observers.
pub type Observer = Box<dyn FnMut(&CalculatorEvent, &HistoryStore)>;

/// Logs every event through `tracing`.
pub fn logging_observer() -> Observer {
    Box::new(|event: &CalculatorEvent, history: &HistoryStore| match event {
        CalculatorEvent::Calculated { record } => tracing::info!(
            operation = record.operation(),
            a = record.operand_a(),
            b = record.operand_b(),
            result = record.result(),
            "calculation performed"
        ),
        CalculatorEvent::Cleared => tracing::info!("history cleared"),
        CalculatorEvent::Undone => tracing::info!(size = history.len(), "undo performed"),
        CalculatorEvent::Redone => tracing::info!(size = history.len(), "redo performed"),
        CalculatorEvent::Loaded { count } => tracing::info!(count, "history loaded"),
        CalculatorEvent::Saved { count } => tracing::info!(count, "history saved"),
    })
}

/// Writes the history file after every mutating event.
///
/// Save failures are logged and swallowed; an auto-save problem never fails
/// the command that triggered it.
pub fn autosave_observer(file: HistoryFile) -> Observer {
    Box::new(move |event: &CalculatorEvent, history: &HistoryStore| {
        if !event.mutates_history() {
            return;
        }
        if let Err(e) = file.save(&history.get_all()) {
            tracing::warn!(path = %file.path().display(), error = %e, "auto-save failed");
        }
    })
}
