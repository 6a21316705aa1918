use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{Column, Document};
use crate::error::DocumentError;
use crate::util::time;
use crate::value::CellValue;

/// Errors that can occur while producing a document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read or write document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid document data: {0}")]
    Invalid(#[from] DocumentError),

    #[error("{0}")]
    Failed(String),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Anything that can hand the session a fully formed document: files,
/// databases, network sources.
pub trait DocumentLoader {
    /// Short description of where the data comes from, for logs
    fn source(&self) -> String;

    fn load(&mut self) -> LoadResult<Document>;
}

/// Serialisable form of a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub saved_at: u64,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
}

impl DocumentSnapshot {
    pub fn capture(document: &Document) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: time::timestamp_secs(),
            columns: document.columns().to_vec(),
            rows: document.rows().to_vec(),
        }
    }

    /// Rebuild the document, coercing every value to its column type
    pub fn into_document(self) -> LoadResult<Document> {
        if !self.version.is_empty() && self.version != env!("CARGO_PKG_VERSION") {
            log::warn!(
                "Snapshot version {} differs from current version {}",
                self.version,
                env!("CARGO_PKG_VERSION")
            );
        }
        Ok(Document::from_rows(self.columns, self.rows)?)
    }
}

/// Hands out copies of a document held in memory
#[derive(Debug, Clone)]
pub struct MemoryLoader {
    document: Document,
}

impl MemoryLoader {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn from_rows(columns: Vec<Column>, rows: Vec<Vec<CellValue>>) -> LoadResult<Self> {
        Ok(Self::new(Document::from_rows(columns, rows)?))
    }
}

impl DocumentLoader for MemoryLoader {
    fn source(&self) -> String {
        "memory".to_string()
    }

    fn load(&mut self) -> LoadResult<Document> {
        Ok(self.document.clone())
    }
}

/// Reads a [`DocumentSnapshot`] from a JSON file
#[derive(Debug, Clone)]
pub struct JsonLoader {
    path: PathBuf,
}

impl JsonLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentLoader for JsonLoader {
    fn source(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&mut self) -> LoadResult<Document> {
        let json = fs::read_to_string(&self.path)?;
        from_json_str(&json)
    }
}

pub fn from_json_str(json: &str) -> LoadResult<Document> {
    let snapshot: DocumentSnapshot = serde_json::from_str(json)?;
    snapshot.into_document()
}

/// Write the document as pretty-printed JSON, creating parent directories
pub fn save_json(document: &Document, path: impl AsRef<Path>) -> LoadResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(&DocumentSnapshot::capture(document))?;
    fs::write(path, json)?;
    log::info!("Saved {} rows to {}", document.row_count(), path.display());
    Ok(())
}
