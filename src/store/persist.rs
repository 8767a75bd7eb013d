//! Key-value persistence backends.
//!
//! Values are stored as JSON under string keys. A missing key loads as the
//! type's default value.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Failure to read or write a stored value.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored value for '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous key-value storage.
pub trait KeyValueStore {
    /// Load the value under `key`, or `T::default()` when nothing is stored.
    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, PersistError>;

    /// Store `value` under `key`, replacing any previous value.
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PersistError>;
}

/// One pretty-printed JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the store files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, PersistError> {
        let path = self.path_for(key);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No stored value at {}, using default", path.display());
                return Ok(T::default());
            }
            Err(source) => return Err(PersistError::Io { path, source }),
        };

        serde_json::from_str(&content).map_err(|source| PersistError::Corrupt {
            key: key.to_string(),
            source,
        })
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PersistError> {
        let path = self.path_for(key);
        let io_err = |source: std::io::Error| PersistError::Io {
            path: path.clone(),
            source,
        };

        let content = serde_json::to_string_pretty(value).map_err(|source| {
            PersistError::Serialize {
                key: key.to_string(),
                source,
            }
        })?;

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Write next to the target and rename, so readers never see a partial file
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        debug!("Saved '{}' to {}", key, path.display());
        Ok(())
    }
}

/// In-process store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, PersistError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        match values.get(key) {
            Some(json) => serde_json::from_str(json).map_err(|source| PersistError::Corrupt {
                key: key.to_string(),
                source,
            }),
            None => Ok(T::default()),
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PersistError> {
        let json = serde_json::to_string(value).map_err(|source| PersistError::Serialize {
            key: key.to_string(),
            source,
        })?;

        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_loads_default() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("data"));

        let value: Vec<String> = store.load("forms").unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn test_file_store_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("data"));

        store
            .save("forms", &vec!["a".to_string(), "b".to_string()])
            .unwrap();

        assert!(store.path_for("forms").exists());
        let value: Vec<String> = store.load("forms").unwrap();
        assert_eq!(value, vec!["a", "b"]);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.path_for("forms"), "{not json").unwrap();

        let result: Result<Vec<String>, _> = store.load("forms");
        assert!(matches!(result, Err(PersistError::Corrupt { .. })));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::default();
        let empty: Vec<u32> = store.load("n").unwrap();
        assert!(empty.is_empty());

        store.save("n", &vec![1u32, 2, 3]).unwrap();
        let value: Vec<u32> = store.load("n").unwrap();
        assert_eq!(value, vec![1, 2, 3]);
    }
}
