use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::config::SessionConfig;
use crate::event::EditorEvent;
use crate::loader::JsonLoader;
use crate::panels;
use crate::state::EditorSession;
use crate::value::CellValue;

/// We derive Deserialize/Serialize so we can persist app settings on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct AppSettings {
    pub last_path: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            last_path: "data.json".to_string(),
        }
    }
}

/// Desktop front-end over an [`EditorSession`]
pub struct DataMasterApp {
    pub(crate) session: EditorSession,
    pub(crate) settings: AppSettings,
    /// Cell being edited and its text buffer
    pub(crate) editing: Option<(usize, usize)>,
    pub(crate) edit_buffer: String,
    pub(crate) focus_edit: bool,
    pub(crate) selected_rows: BTreeSet<usize>,
    pub(crate) highlight: Option<(usize, usize)>,
    pub(crate) find_text: String,
    pub(crate) show_timeline: bool,
    pub(crate) show_info: bool,
    pub(crate) confirm_restart: bool,
    pub(crate) status: String,
    last_event: Rc<RefCell<Option<EditorEvent>>>,
}

impl DataMasterApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: SessionConfig) -> Self {
        let settings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_session(EditorSession::new(config), settings)
    }

    pub fn with_session(session: EditorSession, settings: AppSettings) -> Self {
        let last_event = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&last_event);
        session.subscribe(move |event: &EditorEvent| {
            *sink.borrow_mut() = Some(event.clone());
        });
        Self {
            session,
            settings,
            editing: None,
            edit_buffer: String::new(),
            focus_edit: false,
            selected_rows: BTreeSet::new(),
            highlight: None,
            find_text: String::new(),
            show_timeline: false,
            show_info: false,
            confirm_restart: false,
            status: String::new(),
            last_event,
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub(crate) fn import(&mut self) {
        let mut loader = JsonLoader::new(self.settings.last_path.clone());
        self.reset_view();
        self.status = match self.session.load(&mut loader) {
            Ok(()) => format!("Loaded {}", loader.path().display()),
            Err(err) => format!("Could not load file: {}", err),
        };
    }

    pub(crate) fn export(&mut self) {
        let path = self.settings.last_path.clone();
        self.status = match self.session.save_json(&path) {
            Ok(()) => format!("Exported to {}", path),
            Err(err) => format!("Could not export file: {}", err),
        };
    }

    pub(crate) fn begin_edit(&mut self, row: usize, col: usize) {
        let text = match self.session.document().get(row, col) {
            Ok(CellValue::Missing) | Err(_) => String::new(),
            Ok(value) => value.to_string(),
        };
        self.editing = Some((row, col));
        self.edit_buffer = text;
        self.focus_edit = true;
    }

    pub(crate) fn commit_edit(&mut self) {
        let Some((row, col)) = self.editing.take() else {
            return;
        };
        let text = std::mem::take(&mut self.edit_buffer);
        if let Err(err) = self.session.set_value(row, col, text) {
            self.status = err.to_string();
        }
    }

    pub(crate) fn cancel_edit(&mut self) {
        self.editing = None;
        self.edit_buffer.clear();
    }

    pub(crate) fn undo(&mut self) {
        self.cancel_edit();
        if let Err(err) = self.session.undo() {
            self.status = err.to_string();
        }
    }

    pub(crate) fn redo(&mut self) {
        self.cancel_edit();
        if let Err(err) = self.session.redo() {
            self.status = err.to_string();
        }
    }

    pub(crate) fn add_row(&mut self) {
        if let Err(err) = self.session.add_row() {
            self.status = err.to_string();
        }
    }

    pub(crate) fn delete_selected_rows(&mut self) {
        let rows: Vec<usize> = std::mem::take(&mut self.selected_rows).into_iter().collect();
        self.cancel_edit();
        if let Err(err) = self.session.delete_rows(&rows) {
            self.status = err.to_string();
        }
    }

    pub(crate) fn restart(&mut self) {
        self.reset_view();
        match self.session.restart() {
            Ok(true) => self.status = "All edits discarded.".to_string(),
            Ok(false) => {}
            Err(err) => self.status = err.to_string(),
        }
    }

    /// Jump to a history index taken from a timeline entry
    pub(crate) fn jump_to(&mut self, target: isize) {
        self.cancel_edit();
        if let Err(err) = self.session.jump_to(target) {
            self.status = err.to_string();
        }
    }

    pub(crate) fn find(&mut self) {
        self.highlight = self.session.find(&self.find_text);
        if self.highlight.is_none() && !self.find_text.is_empty() {
            self.status = format!("Value '{}' not found.", self.find_text);
        }
    }

    pub(crate) fn last_event_text(&self) -> Option<String> {
        self.last_event.borrow().as_ref().map(|event| match event {
            EditorEvent::CellChanged { row, col } => format!("Cell ({}, {}) changed", row, col),
            EditorEvent::RowsInserted(range) => format!("Row {} inserted", range.start),
            EditorEvent::RowsRemoved(range) => format!("Row {} removed", range.start),
            EditorEvent::DocumentReset { rows, columns } => {
                format!("Document replaced ({} x {})", rows, columns)
            }
            EditorEvent::HistoryChanged { len, current_index } => {
                format!("History at {} of {}", current_index + 1, len)
            }
        })
    }

    fn reset_view(&mut self) {
        self.cancel_edit();
        self.selected_rows.clear();
        self.highlight = None;
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.editing.is_some() {
            return;
        }
        let (undo, redo) = ctx.input_mut(|i| {
            (
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z),
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::Y),
            )
        });
        if undo {
            self.undo();
        }
        if redo {
            self.redo();
        }
    }
}

impl eframe::App for DataMasterApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        panels::tools_panel(self, ctx);
        panels::status_bar(self, ctx);
        panels::table_panel(self, ctx);
        panels::timeline_window(self, ctx);
        panels::info_window(self, ctx);
        panels::restart_dialog(self, ctx);
    }
}
