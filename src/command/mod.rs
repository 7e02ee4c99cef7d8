mod commands;
mod history;

pub use commands::Command;
pub use history::CommandHistory;

use thiserror::Error;

use crate::error::StoreError;

/// Errors that can occur when walking the undo/redo history
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for undo/redo operations
pub type HistoryResult = Result<(), HistoryError>;
