use std::fmt;

use serde::{Deserialize, Serialize};

use super::CommandResult;
use crate::document::Document;
use crate::value::CellValue;

/// A reversible change to a [`Document`].
///
/// Each command carries everything it needs to replay in either direction,
/// so it never has to look at the commands recorded around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// A single cell write
    CellEdit {
        row: usize,
        col: usize,
        old_value: CellValue,
        new_value: CellValue,
    },

    /// A row inserted at `index`; `data` is the row as it was stored.
    /// `appended` marks a blank row added at the end.
    RowInsert {
        index: usize,
        data: Vec<CellValue>,
        #[serde(default)]
        appended: bool,
    },

    /// A row removed from `index`; `data` is the row as it was before removal
    RowDelete {
        index: usize,
        data: Vec<CellValue>,
    },
}

impl Command {
    /// Reverse the command's effect through the document's silent paths
    pub fn undo(&self, document: &mut Document) -> CommandResult {
        match self {
            Command::CellEdit { row, col, old_value, .. } => {
                document.silent_set(*row, *col, old_value.clone())?;
            }
            Command::RowInsert { index, .. } => {
                document.delete_row(*index, false)?;
            }
            Command::RowDelete { index, data } => {
                document.insert_row(*index, data.clone(), false)?;
            }
        }
        Ok(())
    }

    /// Re-apply the command's effect
    pub fn redo(&self, document: &mut Document) -> CommandResult {
        match self {
            Command::CellEdit { row, col, new_value, .. } => {
                document.silent_set(*row, *col, new_value.clone())?;
            }
            Command::RowInsert { index, data, .. } => {
                document.insert_row(*index, data.clone(), false)?;
            }
            Command::RowDelete { index, .. } => {
                document.delete_row(*index, false)?;
            }
        }
        Ok(())
    }

    /// Human-readable label, using the column name when the document still has it
    pub fn describe(&self, document: &Document) -> String {
        match self {
            Command::CellEdit { row, col, new_value, .. } => match document.column(*col) {
                Ok(column) => format!("Edit cell ({}, '{}') to '{}'", row, column.name, new_value),
                Err(_) => self.to_string(),
            },
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::CellEdit { row, col, new_value, .. } => {
                write!(f, "Edit cell ({}, {}) to '{}'", row, col, new_value)
            }
            Command::RowInsert { appended: true, .. } => f.write_str("Add new row"),
            Command::RowInsert { index, .. } => write!(f, "Insert row at index {}", index),
            Command::RowDelete { index, .. } => write!(f, "Delete row at index {}", index),
        }
    }
}
