//! Key-value persistence for habits and preferences.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::habit::Habit;

/// Key holding the JSON array of habits.
pub const HABITS_KEY: &str = "habitflow_habits";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String-valued storage addressed by key, in the manner of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// One file per key inside a directory: `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

fn io_err(key: &str) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(key)(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(io_err(key))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(io_err(key))?;
        std::fs::rename(&tmp, &path).map_err(io_err(key))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(key)(e)),
        }
    }
}

/// Volatile store, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Read the persisted habits. Missing, unreadable or malformed state loads as
/// an empty collection.
pub fn load_habits(store: &impl KeyValueStore) -> Vec<Habit> {
    let content = match store.get(HABITS_KEY) {
        Ok(Some(content)) => content,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::warn!("Failed to read habits, starting empty: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(habits) => habits,
        Err(e) => {
            log::warn!("Ignoring malformed habits data: {}", e);
            Vec::new()
        }
    }
}

pub fn save_habits(store: &mut impl KeyValueStore, habits: &[Habit]) -> Result<(), StorageError> {
    let json = serde_json::to_string(habits).map_err(|source| StorageError::Serialize {
        key: HABITS_KEY.to_string(),
        source,
    })?;
    store.set(HABITS_KEY, &json)
}
