//! Key-value persistence slots.
//!
//! The task store never touches the file system directly; it talks to a
//! `KeyValueStore`, which maps a string key to a serialized blob. `FileStore`
//! keeps one JSON file per key in a data directory, `MemoryStore` keeps
//! everything in process for tests.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error at {path}: {source}")]
    Io {
        /// Path of the slot file.
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The payload could not be encoded or decoded.
    #[error("failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The backend refused the write.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string-keyed slot holding a single serialized blob.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed slots: `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path).map(Some).map_err(io_err(&path))
    }

    /// Atomic-ish write via temp + rename.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp).map_err(io_err(&tmp))?;
        f.write_all(value.as_bytes()).map_err(io_err(&tmp))?;
        f.flush().map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;
        Ok(())
    }
}

/// In-process slots for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, as a full or disabled storage area would.
    pub fn read_only() -> Self {
        MemoryStore {
            slots: HashMap::new(),
            read_only: true,
        }
    }

    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.slots.insert(key.to_string(), value.to_string());
        store
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Unavailable(format!("slot '{key}' is read-only")));
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
