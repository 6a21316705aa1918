mod commands;
mod history;

use thiserror::Error;

use crate::error::DocumentError;

pub use commands::Command;
pub use history::{CommandHistory, TimelineEntry, ORIGINAL_STATE_LABEL};

/// Result type for command replay
pub type CommandResult = Result<(), CommandError>;

/// Errors that can occur while replaying a command against a document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// The document rejected the replayed mutation. For index errors this
    /// means the document was changed outside the history.
    #[error("replay failed: {0}")]
    Document(#[from] DocumentError),
}

/// Errors from history navigation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistoryError {
    #[error("history target {target} outside {min}..={max}")]
    TargetOutOfRange { target: isize, min: isize, max: isize },

    #[error(transparent)]
    Replay(#[from] CommandError),
}
