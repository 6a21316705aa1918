#![warn(clippy::all, rust_2018_idioms)]

pub mod command;
pub mod config;
pub mod document;
pub mod error;
pub mod event;
pub mod inspect;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod state;
pub mod util;
pub mod value;

#[cfg(feature = "gui")]
pub mod app;
#[cfg(feature = "gui")]
pub mod panels;

pub use command::{Command, CommandError, CommandHistory, HistoryError, TimelineEntry};
pub use config::SessionConfig;
pub use document::{Column, Document};
pub use error::{DocumentError, SessionError};
pub use event::{EditorEvent, EventBus, EventHandler, HandlerId};
pub use inspect::{CategoricalSummary, ColumnInfo, ColumnStats, DocumentInfo, NumericSummary};
pub use loader::{DocumentLoader, JsonLoader, LoadError, MemoryLoader};
pub use state::{ActionState, EditorSession};
pub use value::{CellValue, ColumnType, ValueError};

#[cfg(feature = "gui")]
pub use app::DataMasterApp;
