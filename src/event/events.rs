use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// A single cell's value was written
    CellChanged { row: usize, col: usize },
    /// Rows were inserted; the range covers their new indices
    RowsInserted(Range<usize>),
    /// Rows were removed; the range covers their former indices
    RowsRemoved(Range<usize>),
    /// The whole document was replaced (load, restart)
    DocumentReset { rows: usize, columns: usize },
    /// The command log or its cursor moved
    HistoryChanged {
        len: usize,
        current_index: isize,
    },
}
