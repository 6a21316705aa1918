/// Which user actions make sense right now.
///
/// Derived from the session on demand; a view re-reads it after every
/// `HistoryChanged` or `DocumentReset` event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState {
    /// Export, row operations, find and info need a non-empty document
    pub has_data: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    /// The pristine copy is non-empty and differs from the live document
    pub can_restart: bool,
    pub has_timeline: bool,
}
