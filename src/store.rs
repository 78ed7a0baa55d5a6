//! Persistence of the single note document.
//!
//! The whole document is read and written as UTF-8 text in one piece. Load
//! never fails from the caller's point of view; a missing document is created empty and an
//! unreadable one is logged and treated as empty.

use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
/// Failures talking to the file system.
pub enum StoreError {
    /// The document exists but could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// Document location.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The document could not be written.
    #[error("cannot write {path}: {source}")]
    Write {
        /// Document location.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The directory that should hold the document could not be created.
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        /// Directory location.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

/// Loads and saves the document text.
pub trait DocumentStore {
    /// Return the persisted text, or an empty document if none can be read.
    fn load(&self) -> String;

    /// Persist `text`, replacing the previous document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn save(&self, text: &str) -> Result<(), StoreError>;
}

#[derive(Clone, Debug)]
/// A document kept in a plain text file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    /// A store for the document at `path`. Nothing is touched until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the document, creating it empty when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or created.
    pub fn try_load(&self) -> Result<String, StoreError> {
        if !self.path.exists() {
            self.save("")?;
            info!(path = %self.path.display(), "created empty document");
            return Ok(String::new());
        }
        fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn ensure_parent(&self) -> Result<(), StoreError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })
            }
            _ => Ok(()),
        }
    }
}

impl DocumentStore for FileStore {
    fn load(&self) -> String {
        match self.try_load() {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "treating document as empty");
                String::new()
            }
        }
    }

    fn save(&self, text: &str) -> Result<(), StoreError> {
        self.ensure_parent()?;
        fs::write(&self.path, text).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), bytes = text.len(), "document saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
