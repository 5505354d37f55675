//! Error types for the settings resolution engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while describing, loading, resolving or selecting settings
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("Unknown settings path: {path}")]
    UnknownPath { path: String },

    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Schema mismatch at {path}: {reason}")]
    SchemaMismatch { path: String, reason: String },

    #[error("No preset matching '{key}' for plugin {plugin} (available: {})", available.join(", "))]
    NoMatchingPreset {
        plugin: String,
        key: String,
        available: Vec<String>,
    },

    #[error("Invalid settings path: {0:?}")]
    InvalidPath(String),

    #[error("Invalid layer name: {0:?} (expected studio, project:<name> or task:<project>/<task>)")]
    InvalidLayerName(String),

    #[error("Layer already loaded: {0}")]
    LayerExists(String),

    #[error("Layer not loaded: {0}")]
    LayerNotFound(String),
}

impl SettingsError {
    /// Path the error refers to, when it has one
    pub fn path(&self) -> Option<&str> {
        match self {
            SettingsError::UnknownPath { path }
            | SettingsError::TypeMismatch { path, .. }
            | SettingsError::SchemaMismatch { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Errors raised by override document sources
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Document source I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Document for {0} must be a JSON object")]
    NotAnObject(String),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
