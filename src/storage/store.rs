//! Local key-value storage
//!
//! A tiny string store with the same shape as browser local storage: values
//! are looked up by key, written wholesale, and survive restarts. The default
//! backend keeps one JSON file per key under the platform data directory.

use crate::config::APP_DIR_NAME;
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sub-directory of the data directory holding stored values
const STORAGE_DIR_NAME: &str = "storage";

/// Extension of the file holding one value
const VALUE_EXTENSION: &str = "json";

/// Persistent string storage addressed by key.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` when nothing was stored.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// File Store
// ─────────────────────────────────────────────────────────────────────────────

/// Key-value store keeping each value in its own file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the platform data directory, or in `override_dir` when given.
    ///
    /// - **Windows**: `%LOCALAPPDATA%\sorcerer\storage\`
    /// - **macOS**: `~/Library/Application Support/sorcerer/storage/`
    /// - **Linux**: `~/.local/share/sorcerer/storage/`
    pub fn open_default(override_dir: Option<&Path>) -> Result<Self> {
        if let Some(dir) = override_dir {
            return Ok(Self::new(dir));
        }
        dirs::data_local_dir()
            .map(|base| Self::new(base.join(APP_DIR_NAME).join(STORAGE_DIR_NAME)))
            .ok_or(Error::StorageDirNotFound)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.{}", file_stem, VALUE_EXTENSION))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => {
                debug!("Read {} bytes for '{}' from {}", value.len(), key, path.display());
                Ok(Some(value))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::StorageRead {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let write_err = |source| Error::StorageWrite {
            key: key.to_string(),
            source,
        };

        if !self.dir.exists() {
            debug!("Creating storage directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir).map_err(write_err)?;
        }

        let path = self.value_path(key);
        let temp_path = path.with_extension(format!("{}.tmp", VALUE_EXTENSION));

        // Write to a temporary file first, then rename over the real one
        fs::write(&temp_path, value).map_err(write_err)?;
        fs::rename(&temp_path, &path).map_err(write_err)?;

        debug!("Stored {} bytes for '{}' at {}", value.len(), key, path.display());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store for tests.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: std::collections::HashMap<String, String>,
    /// When set, every write fails
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    /// Store that rejects every write.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(Error::StorageWrite {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only store"),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
