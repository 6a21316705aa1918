use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use super::ActionState;
use crate::command::{CommandHistory, TimelineEntry};
use crate::config::SessionConfig;
use crate::document::Document;
use crate::error::{SessionError, SessionResult};
use crate::event::{EventBus, EventHandler, HandlerId};
use crate::inspect::DocumentInfo;
use crate::loader::{self, DocumentLoader};
use crate::metrics::{MetricsRecorder, OperationObserver, OperationTimer, PerformanceSummary};
use crate::value::CellValue;

/// One editing session over one document.
///
/// The session is the only way user edits reach the document: every
/// successful mutation is turned into a command and recorded, so replay
/// always runs against the coordinates it was captured with. The document is
/// handed out read-only.
///
/// It also keeps the pristine copy taken at load time, which `restart` goes
/// back to.
///
/// # Example
///
/// ```
/// use data_master::{Column, ColumnType, Document, EditorSession, MemoryLoader};
///
/// let columns = vec![
///     Column::new("id", ColumnType::Integer),
///     Column::new("name", ColumnType::Text),
/// ];
/// let rows = vec![vec![1.into(), "a".into()], vec![2.into(), "b".into()]];
/// let mut loader = MemoryLoader::new(Document::from_rows(columns, rows).unwrap());
///
/// let mut session = EditorSession::default();
/// session.load(&mut loader).unwrap();
/// session.set_value(0, 1, "z").unwrap();
/// assert!(session.can_undo());
///
/// session.undo().unwrap();
/// assert_eq!(session.document().get(0, 1).unwrap().as_text(), Some("a"));
/// ```
pub struct EditorSession {
    document: Document,
    history: CommandHistory,
    original: Document,
    event_bus: Rc<EventBus>,
    observer: Option<Box<dyn OperationObserver>>,
    metrics: Option<Rc<RefCell<MetricsRecorder>>>,
    config: SessionConfig,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("document", &self.document)
            .field("history", &self.history)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl EditorSession {
    /// An empty session. Document, history and any view share one event bus.
    pub fn new(config: SessionConfig) -> Self {
        let event_bus = Rc::new(EventBus::new());
        let metrics = config
            .record_metrics
            .then(|| Rc::new(RefCell::new(MetricsRecorder::new(config.max_metrics))));
        let observer = metrics
            .clone()
            .map(|recorder| Box::new(recorder) as Box<dyn OperationObserver>);
        Self {
            document: Document::empty().with_event_bus(Rc::clone(&event_bus)),
            history: CommandHistory::with_event_bus(Rc::clone(&event_bus)),
            original: Document::empty(),
            event_bus,
            observer,
            metrics,
            config,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// The pristine copy captured at the last load
    pub fn original(&self) -> &Document {
        &self.original
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &Rc<EventBus> {
        &self.event_bus
    }

    /// Attach a view or other listener to document and history changes
    pub fn subscribe(&self, handler: impl EventHandler + 'static) -> HandlerId {
        self.event_bus.subscribe(Box::new(handler))
    }

    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        self.event_bus.unsubscribe(id)
    }

    /// Replace the operation observer. This detaches the built-in metrics
    /// recorder.
    pub fn set_observer(&mut self, observer: Box<dyn OperationObserver>) {
        self.metrics = None;
        self.observer = Some(observer);
    }

    pub fn metrics(&self) -> Option<Rc<RefCell<MetricsRecorder>>> {
        self.metrics.clone()
    }

    pub fn performance_summary(&self) -> Option<PerformanceSummary> {
        self.metrics.as_ref().and_then(|m| m.borrow().summary())
    }

    /// Write a cell and record the edit.
    ///
    /// A value that cannot be coerced to the column type is rejected: the
    /// document is unchanged and nothing is recorded.
    pub fn set_value(&mut self, row: usize, col: usize, value: impl Into<CellValue>) -> SessionResult<()> {
        let value = value.into();
        self.instrumented("set_value", |session| {
            let command = session.document.edit_cell(row, col, value).inspect_err(|err| {
                log::warn!("Rejected edit at ({}, {}): {}", row, col, err);
            })?;
            session.history.record(command);
            Ok(())
        })
    }

    pub fn set_value_by_name(
        &mut self,
        row: usize,
        column: &str,
        value: impl Into<CellValue>,
    ) -> SessionResult<()> {
        let col = self.document.column_index(column)?;
        self.set_value(row, col, value)
    }

    /// Insert a row at `index` and record it
    pub fn insert_row(&mut self, index: usize, data: Vec<CellValue>) -> SessionResult<()> {
        self.instrumented("insert_row", |session| {
            if let Some(command) = session.document.insert_row(index, data, true)? {
                session.history.record(command);
            }
            Ok(())
        })
    }

    /// Append a row of missing values, returning its index
    pub fn add_row(&mut self) -> SessionResult<usize> {
        self.instrumented("add_row", |session| {
            if let Some(command) = session.document.append_row(true)? {
                session.history.record(command);
            }
            Ok(session.document.row_count() - 1)
        })
    }

    pub fn delete_row(&mut self, index: usize) -> SessionResult<()> {
        self.instrumented("delete_row", |session| {
            if let Some(command) = session.document.delete_row(index, true)? {
                session.history.record(command);
            }
            Ok(())
        })
    }

    /// Delete several rows, highest index first, one command per row.
    ///
    /// All indices are checked before anything is deleted. Duplicates are
    /// ignored. Returns the number of rows removed.
    pub fn delete_rows(&mut self, indices: &[usize]) -> SessionResult<usize> {
        let mut indices = indices.to_vec();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();
        self.instrumented("delete_rows", |session| {
            if let Some(&highest) = indices.first() {
                session.document.row(highest)?;
            }
            for &index in &indices {
                if let Some(command) = session.document.delete_row(index, true)? {
                    session.history.record(command);
                }
            }
            Ok(indices.len())
        })
    }

    pub fn undo(&mut self) -> SessionResult<bool> {
        self.instrumented("undo", |session| {
            session
                .history
                .undo(&mut session.document)
                .inspect_err(|err| log::error!("Undo failed: {}", err))
                .map_err(SessionError::from)
        })
    }

    pub fn redo(&mut self) -> SessionResult<bool> {
        self.instrumented("redo", |session| {
            session
                .history
                .redo(&mut session.document)
                .inspect_err(|err| log::error!("Redo failed: {}", err))
                .map_err(SessionError::from)
        })
    }

    /// Move to any point of the history; `-1` is the loaded state
    pub fn jump_to(&mut self, target: isize) -> SessionResult<usize> {
        self.instrumented("jump_to", |session| {
            let steps = session.history.jump_to(target, &mut session.document)?;
            log::debug!("Jumped to history index {} in {} step(s)", target, steps);
            Ok(steps)
        })
    }

    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.history.timeline(&self.document)
    }

    /// Jump to the state shown at position `entry` of [`Self::timeline`]
    pub fn select_timeline_entry(&mut self, entry: usize) -> SessionResult<usize> {
        self.jump_to(entry as isize - 1)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restart is offered only when there is a pristine copy to go back to and
    /// the live document has drifted from it.
    pub fn can_restart(&self) -> bool {
        !self.original.is_empty() && self.document != self.original
    }

    pub fn action_state(&self) -> ActionState {
        ActionState {
            has_data: !self.document.is_empty(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            can_restart: self.can_restart(),
            has_timeline: !self.history.is_empty(),
        }
    }

    /// Replace the document with whatever `loader` produces.
    ///
    /// On success the history is cleared and a new pristine copy taken. On
    /// failure the history is cleared as well, and unless the config says
    /// otherwise the document and pristine copy are emptied.
    pub fn load(&mut self, loader: &mut dyn DocumentLoader) -> SessionResult<()> {
        let source = loader.source();
        self.instrumented("load", |session| match loader.load() {
            Ok(document) => {
                session.install(document);
                log::info!(
                    "Loaded {} rows x {} columns from {}",
                    session.document.row_count(),
                    session.document.column_count(),
                    source
                );
                Ok(())
            }
            Err(err) => {
                log::warn!("Could not load from {}: {}", source, err);
                if session.config.reset_on_load_failure {
                    session.install(Document::empty());
                } else {
                    session.history.clear();
                }
                Err(err.into())
            }
        })
    }

    /// Load a document that is already in memory
    pub fn load_document(&mut self, document: Document) {
        self.install(document);
        log::info!("Loaded {} rows from memory", self.document.row_count());
    }

    /// Discard every edit made since the last load.
    ///
    /// Returns `Ok(false)` without touching anything when restart is not
    /// available.
    pub fn restart(&mut self) -> SessionResult<bool> {
        if !self.can_restart() {
            return Ok(false);
        }
        self.instrumented("restart", |session| {
            let original = session.original.clone();
            session.document.replace_all(original);
            session.history.clear();
            log::info!("Discarded all edits");
            Ok(true)
        })
    }

    pub fn find(&self, needle: &str) -> Option<(usize, usize)> {
        self.document.find(needle)
    }

    pub fn info(&self) -> DocumentInfo {
        self.document.info()
    }

    pub fn save_json(&mut self, path: impl AsRef<Path>) -> SessionResult<()> {
        let path = path.as_ref();
        self.instrumented("save", |session| Ok(loader::save_json(&session.document, path)?))
    }

    fn install(&mut self, document: Document) {
        self.original = document.clone();
        self.document.replace_all(document);
        self.history.clear();
    }

    fn instrumented<T>(
        &mut self,
        operation: &'static str,
        f: impl FnOnce(&mut Self) -> SessionResult<T>,
    ) -> SessionResult<T> {
        let timer = OperationTimer::start(operation, self.observer.as_deref_mut());
        let result = f(self);
        timer.finish(self.observer.as_deref_mut(), result.is_ok());
        result
    }
}
