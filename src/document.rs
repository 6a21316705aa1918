use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::{DocumentError, DocumentResult};
use crate::event::{EditorEvent, EventBus};
use crate::value::{CellValue, ColumnType};

/// A named column with a declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// The mutable table every command operates on.
///
/// Rows are kept contiguous: inserting or deleting re-indexes everything after
/// the affected position. Every row holds exactly one value per column, and
/// every stored value has already been coerced to its column's type.
///
/// Changes are announced on the attached [`EventBus`]. Cloning a document
/// copies its data but not its subscribers.
pub struct Document {
    columns: Vec<Column>,
    rows: Vec<Vec<CellValue>>,
    event_bus: Rc<EventBus>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .finish()
    }
}

impl Clone for Document {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.clone(),
            event_bus: Rc::new(EventBus::new()),
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.rows == other.rows
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl Document {
    /// A document with no columns and no rows
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            event_bus: Rc::new(EventBus::new()),
        }
    }

    /// A document with the given columns and no rows
    pub fn new(columns: Vec<Column>) -> DocumentResult<Self> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(DocumentError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
            event_bus: Rc::new(EventBus::new()),
        })
    }

    /// Build a document from raw rows, coercing each value to its column type
    pub fn from_rows(columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> DocumentResult<Self> {
        let mut document = Self::new(columns)?;
        let mut coerced = Vec::with_capacity(rows.len());
        for row in rows {
            coerced.push(document.coerce_row(row)?);
        }
        document.rows = coerced;
        Ok(document)
    }

    /// Attach a shared event bus, replacing the private one
    pub fn with_event_bus(mut self, event_bus: Rc<EventBus>) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn event_bus(&self) -> &Rc<EventBus> {
        &self.event_bus
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, col: usize) -> DocumentResult<&Column> {
        self.columns.get(col).ok_or(DocumentError::ColumnOutOfRange {
            col,
            len: self.columns.len(),
        })
    }

    pub fn column_index(&self, name: &str) -> DocumentResult<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| DocumentError::UnknownColumn(name.to_string()))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when the document has no rows or no columns
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> DocumentResult<&[CellValue]> {
        self.check_row(row)?;
        Ok(&self.rows[row])
    }

    pub fn get(&self, row: usize, col: usize) -> DocumentResult<&CellValue> {
        self.check_cell(row, col)?;
        Ok(&self.rows[row][col])
    }

    /// Write a cell, coercing `value` to the column type.
    ///
    /// Returns the previous value. On a type mismatch the document is left
    /// untouched and no notification is sent.
    pub fn set_value(
        &mut self,
        row: usize,
        col: usize,
        value: impl Into<CellValue>,
    ) -> DocumentResult<CellValue> {
        self.check_cell(row, col)?;
        let coerced = self.columns[col].column_type.coerce(value.into())?;
        let old = std::mem::replace(&mut self.rows[row][col], coerced);
        self.event_bus.emit(EditorEvent::CellChanged { row, col });
        Ok(old)
    }

    /// Same mutation and notification as [`Self::set_value`], used by replay.
    /// Never produces a command.
    pub fn silent_set(&mut self, row: usize, col: usize, value: CellValue) -> DocumentResult<()> {
        self.set_value(row, col, value).map(|_| ())
    }

    /// A user-initiated cell edit: writes the value and returns the command
    /// describing it.
    pub fn edit_cell(
        &mut self,
        row: usize,
        col: usize,
        value: impl Into<CellValue>,
    ) -> DocumentResult<Command> {
        let old_value = self.set_value(row, col, value)?;
        let new_value = self.rows[row][col].clone();
        Ok(Command::CellEdit {
            row,
            col,
            old_value,
            new_value,
        })
    }

    /// Insert `data` at `index` (valid range `0..=row_count`), shifting later
    /// rows down by one.
    ///
    /// With `emit_command` the matching [`Command::RowInsert`] is returned for
    /// the caller to record.
    pub fn insert_row(
        &mut self,
        index: usize,
        data: Vec<CellValue>,
        emit_command: bool,
    ) -> DocumentResult<Option<Command>> {
        if index > self.rows.len() {
            return Err(DocumentError::InsertOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        let row = self.coerce_row(data)?;
        let command = emit_command.then(|| Command::RowInsert {
            index,
            data: row.clone(),
            appended: false,
        });
        self.rows.insert(index, row);
        self.event_bus.emit(EditorEvent::RowsInserted(index..index + 1));
        Ok(command)
    }

    /// Append a row of missing values. The command, if any, is labelled as an
    /// added row rather than an insert.
    pub fn append_row(&mut self, emit_command: bool) -> DocumentResult<Option<Command>> {
        let blank = vec![CellValue::Missing; self.columns.len()];
        let command = self.insert_row(self.rows.len(), blank, emit_command)?;
        Ok(command.map(|command| match command {
            Command::RowInsert { index, data, .. } => Command::RowInsert {
                index,
                data,
                appended: true,
            },
            other => other,
        }))
    }

    /// Remove the row at `index`. With `emit_command` the row is captured in a
    /// [`Command::RowDelete`] so it can be restored.
    pub fn delete_row(&mut self, index: usize, emit_command: bool) -> DocumentResult<Option<Command>> {
        self.check_row(index)?;
        let data = self.rows.remove(index);
        self.event_bus.emit(EditorEvent::RowsRemoved(index..index + 1));
        Ok(emit_command.then_some(Command::RowDelete { index, data }))
    }

    /// Swap in the contents of `other` wholesale. Subscribers stay attached.
    ///
    /// The document has no reference to any history; whoever calls this is
    /// responsible for clearing it.
    pub fn replace_all(&mut self, other: Document) {
        self.columns = other.columns;
        self.rows = other.rows;
        self.event_bus.emit(EditorEvent::DocumentReset {
            rows: self.rows.len(),
            columns: self.columns.len(),
        });
    }

    fn coerce_row(&self, data: Vec<CellValue>) -> DocumentResult<Vec<CellValue>> {
        if data.len() != self.columns.len() {
            return Err(DocumentError::RowWidthMismatch {
                expected: self.columns.len(),
                found: data.len(),
            });
        }
        data.into_iter()
            .zip(&self.columns)
            .map(|(value, column)| column.column_type.coerce(value).map_err(DocumentError::from))
            .collect()
    }

    fn check_row(&self, row: usize) -> DocumentResult<()> {
        if row < self.rows.len() {
            Ok(())
        } else {
            Err(DocumentError::RowOutOfRange {
                row,
                len: self.rows.len(),
            })
        }
    }

    fn check_cell(&self, row: usize, col: usize) -> DocumentResult<()> {
        self.check_row(row)?;
        if col < self.columns.len() {
            Ok(())
        } else {
            Err(DocumentError::ColumnOutOfRange {
                col,
                len: self.columns.len(),
            })
        }
    }
}
