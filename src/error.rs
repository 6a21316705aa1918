use thiserror::Error;

use crate::command::{CommandError, HistoryError};
use crate::loader::LoadError;
use crate::value::ValueError;

/// Errors raised by document reads and mutations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    /// The value could not be coerced to the column's declared type.
    /// The document is left unchanged.
    #[error(transparent)]
    TypeMismatch(#[from] ValueError),

    #[error("row {row} out of range (document has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("column {col} out of range (document has {len} columns)")]
    ColumnOutOfRange { col: usize, len: usize },

    #[error("cannot insert at row {index}; valid positions are 0..={len}")]
    InsertOutOfRange { index: usize, len: usize },

    #[error("row has {found} values but the document has {expected} columns")]
    RowWidthMismatch { expected: usize, found: usize },

    #[error("no column named '{0}'")]
    UnknownColumn(String),

    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(String),
}

impl DocumentError {
    /// True for the coordinate errors that indicate a desynchronised replay
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            DocumentError::RowOutOfRange { .. }
                | DocumentError::ColumnOutOfRange { .. }
                | DocumentError::InsertOutOfRange { .. }
        )
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors surfaced by [`crate::EditorSession`]
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("edit rejected: {0}")]
    Document(#[from] DocumentError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("load failed: {0}")]
    Load(#[from] LoadError),
}

pub type SessionResult<T> = Result<T, SessionError>;
