use super::{Command, HistoryError, HistoryResult};
use crate::error::StoreResult;
use crate::store::FormStore;

/// A recorded command together with the inverse captured just before it
/// ran; the inverse of a removal needs the field that no longer exists
/// afterwards.
#[derive(Debug)]
struct HistoryEntry {
    command: Command,
    inverse: Option<Command>,
}

/// Manages the history of executed commands for undo/redo.
///
/// Failed commands are never recorded, so undo always replays against the
/// state the command actually produced.
#[derive(Debug, Default)]
pub struct CommandHistory {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
}

impl CommandHistory {
    /// Creates a new empty command history
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute a command and record it if successful
    pub fn execute(&mut self, command: Command, store: &mut FormStore) -> StoreResult<()> {
        let inverse = command.inverse(store);
        command.execute(store)?;
        self.undo_stack.push(HistoryEntry { command, inverse });
        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the last executed command by running its captured inverse
    pub fn undo(&mut self, store: &mut FormStore) -> HistoryResult {
        let entry = self.undo_stack.pop().ok_or(HistoryError::NothingToUndo)?;
        if let Some(inverse) = &entry.inverse {
            inverse.execute(store)?;
        }
        self.redo_stack.push(entry);
        Ok(())
    }

    /// Redo the last undone command
    pub fn redo(&mut self, store: &mut FormStore) -> HistoryResult {
        let entry = self.redo_stack.pop().ok_or(HistoryError::NothingToRedo)?;
        // the store is back in the pre-command state, so the inverse can
        // be captured afresh
        let inverse = entry.command.inverse(store);
        entry.command.execute(store)?;
        self.undo_stack.push(HistoryEntry {
            command: entry.command,
            inverse,
        });
        Ok(())
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear the command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
