//! Undo/redo over history snapshots.
//!
//! Two unbounded LIFO stacks. Recording a new state branches the timeline,
//! so it always discards the redo stack.

use crate::error::{CalcError, Result};
use crate::history::Snapshot;

/// Undo and redo stacks of history snapshots.
#[derive(Clone, Debug, Default)]
pub struct UndoRedo {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
}

impl UndoRedo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `current` as the state to return to, and drop redo history.
    pub fn record(&mut self, current: Snapshot) {
        self.undo.push(current);
        if !self.redo.is_empty() {
            tracing::debug!(discarded = self.redo.len(), "redo history invalidated");
            self.redo.clear();
        }
    }

    /// Step back: stash `current` for redo and return the previous state.
    pub fn undo(&mut self, current: Snapshot) -> Result<Snapshot> {
        let previous = self.undo.pop().ok_or(CalcError::NothingToUndo)?;
        self.redo.push(current);
        Ok(previous)
    }

    /// Step forward: stash `current` for undo and return the next state.
    pub fn redo(&mut self, current: Snapshot) -> Result<Snapshot> {
        let next = self.redo.pop().ok_or(CalcError::NothingToRedo)?;
        self.undo.push(current);
        Ok(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

}
