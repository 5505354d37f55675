//! Override document sources.
//!
//! Persistence of override documents belongs to an external store; the engine
//! only needs list/read/write with modification timestamps. Two stores are
//! provided: an in-memory map and a directory of JSON or TOML files laid out
//! as
//!
//! ```text
//! <root>/studio.json
//! <root>/projects/<project>.json
//! <root>/projects/<project>/tasks/<task>.json
//! ```

use crate::error::SourceError;
use crate::layers::scope::Scope;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A document as held by a store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub scope: Scope,
    pub document: Value,
    pub modified_at: DateTime<Utc>,
}

/// Key-value store of override documents
pub trait DocumentSource: Send + Sync {
    /// Scopes with a stored document
    fn list(&self) -> Result<Vec<Scope>, SourceError>;

    /// Read one document; `None` when nothing is stored for the scope
    fn read(&self, scope: &Scope) -> Result<Option<StoredDocument>, SourceError>;

    /// Store a document, returning its new modification time
    fn write(&self, scope: &Scope, document: &Value) -> Result<DateTime<Utc>, SourceError>;
}

/// In-memory document store, mainly for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryDocumentSource {
    documents: RwLock<BTreeMap<Scope, StoredDocument>>,
}

impl MemoryDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delete(&self, scope: &Scope) -> Option<StoredDocument> {
        self.documents.write().remove(scope)
    }
}

impl DocumentSource for MemoryDocumentSource {
    fn list(&self) -> Result<Vec<Scope>, SourceError> {
        Ok(self.documents.read().keys().cloned().collect())
    }

    fn read(&self, scope: &Scope) -> Result<Option<StoredDocument>, SourceError> {
        Ok(self.documents.read().get(scope).cloned())
    }

    fn write(&self, scope: &Scope, document: &Value) -> Result<DateTime<Utc>, SourceError> {
        if !document.is_object() {
            return Err(SourceError::NotAnObject(scope.to_string()));
        }
        let modified_at = Utc::now();
        self.documents.write().insert(
            scope.clone(),
            StoredDocument {
                scope: scope.clone(),
                document: document.clone(),
                modified_at,
            },
        );
        Ok(modified_at)
    }
}

const EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Directory of override documents
#[derive(Debug, Clone)]
pub struct FileDocumentSource {
    root: PathBuf,
}

impl FileDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File stem location of a scope, without extension
    fn stem_for(&self, scope: &Scope) -> PathBuf {
        match scope {
            Scope::Studio => self.root.join("studio"),
            Scope::Project(project) => self.root.join("projects").join(project),
            Scope::Task { project, task } => self
                .root
                .join("projects")
                .join(project)
                .join("tasks")
                .join(task),
        }
    }

    /// Existing file for a scope; JSON wins over TOML when both exist
    fn existing_file(&self, scope: &Scope) -> Option<PathBuf> {
        let stem = self.stem_for(scope);
        EXTENSIONS
            .iter()
            .map(|ext| with_ext(&stem, ext))
            .find(|p| p.is_file())
    }

    /// Map a file below the root back to its scope
    fn scope_for(&self, path: &Path) -> Option<Scope> {
        let ext = path.extension().and_then(OsStr::to_str)?;
        if !EXTENSIONS.contains(&ext) {
            return None;
        }
        let relative = path.strip_prefix(&self.root).ok()?.with_extension("");
        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        let name = match parts.as_slice() {
            ["studio"] => "studio".to_string(),
            ["projects", project] => format!("project:{}", project),
            ["projects", project, "tasks", task] => format!("task:{}/{}", project, task),
            _ => return None,
        };
        name.parse().ok()
    }

    fn parse(path: &Path, contents: &str) -> Result<Value, SourceError> {
        let parse_error = |message: String| SourceError::Parse {
            path: path.to_path_buf(),
            message,
        };
        match path.extension().and_then(OsStr::to_str) {
            Some("toml") => {
                let value: toml::Value =
                    toml::from_str(contents).map_err(|e| parse_error(e.to_string()))?;
                Ok(toml_to_json(value))
            }
            _ => serde_json::from_str(contents).map_err(|e| parse_error(e.to_string())),
        }
    }
}

impl DocumentSource for FileDocumentSource {
    fn list(&self) -> Result<Vec<Scope>, SourceError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut scopes = Vec::new();
        for entry in WalkDir::new(&self.root).max_depth(4).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(scope) = self.scope_for(entry.path()) {
                if !scopes.contains(&scope) {
                    scopes.push(scope);
                }
            }
        }
        scopes.sort();
        Ok(scopes)
    }

    fn read(&self, scope: &Scope) -> Result<Option<StoredDocument>, SourceError> {
        let Some(path) = self.existing_file(scope) else {
            return Ok(None);
        };
        let io_error = |source| SourceError::Io {
            path: path.clone(),
            source,
        };
        let contents = fs::read_to_string(&path).map_err(io_error)?;
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(io_error)?;
        let document = Self::parse(&path, &contents)?;
        if !document.is_object() {
            return Err(SourceError::NotAnObject(scope.to_string()));
        }
        Ok(Some(StoredDocument {
            scope: scope.clone(),
            document,
            modified_at: DateTime::<Utc>::from(modified),
        }))
    }

    fn write(&self, scope: &Scope, document: &Value) -> Result<DateTime<Utc>, SourceError> {
        if !document.is_object() {
            return Err(SourceError::NotAnObject(scope.to_string()));
        }
        let path = with_ext(&self.stem_for(scope), "json");
        let io_error = |source| SourceError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let contents = serde_json::to_string_pretty(document).map_err(|e| SourceError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&path, contents).map_err(io_error)?;
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(io_error)?;
        Ok(DateTime::<Utc>::from(modified))
    }
}

/// Read and parse a single JSON or TOML override document
pub fn read_document_file(path: &Path) -> Result<Value, SourceError> {
    let contents = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FileDocumentSource::parse(path, &contents)
}

/// Append an extension without touching dots already in the name
fn with_ext(stem: &Path, ext: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Convert a TOML value to JSON
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
