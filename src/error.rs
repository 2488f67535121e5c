//! Centralized error handling for Sorcerer
//!
//! This module provides a unified error type that covers all error scenarios
//! in the application: snapshot storage, snapshot parsing, and configuration.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the application.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the application.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Storage Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to read a value from the key-value store
    StorageRead { key: String, source: io::Error },

    /// Failed to write a value to the key-value store
    StorageWrite { key: String, source: io::Error },

    /// Storage directory not found or inaccessible
    StorageDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshot Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The persisted document snapshot is not valid raw content JSON
    SnapshotParse {
        key: String,
        source: serde_json::Error,
    },

    /// The document could not be serialized for saving
    SnapshotSerialize(serde_json::Error),

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Storage Errors
            Error::StorageRead { key, source } => {
                write!(f, "Failed to read '{}' from storage: {}", key, source)
            }
            Error::StorageWrite { key, source } => {
                write!(f, "Failed to write '{}' to storage: {}", key, source)
            }
            Error::StorageDirNotFound => write!(f, "Storage directory not found"),

            // Snapshot Errors
            Error::SnapshotParse { key, source } => {
                write!(f, "Saved content under '{}' is malformed: {}", key, source)
            }
            Error::SnapshotSerialize(source) => {
                write!(f, "Failed to serialize content: {}", source)
            }

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::StorageRead { source, .. } => Some(source),
            Error::StorageWrite { source, .. } => Some(source),
            Error::SnapshotParse { source, .. } => Some(source),
            Error::SnapshotSerialize(source) => Some(source),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::StorageDirNotFound | Error::ConfigDirNotFound => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
