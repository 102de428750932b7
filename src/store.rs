//! Persistence of the whole entry collection in one named string slot.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    entry::Entry,
    error::{JournalError, Result},
};

pub const DEFAULT_STORAGE_KEY: &str = "xinqing-journal-entries";

/// A key-value medium holding string values.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.slots.insert(key.to_string(), value.to_string());
        storage
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn checked_slot_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.slot_path(key))
    }
}

/// Slot keys become file names, so they must stay inside the data directory.
pub fn validate_key(key: &str) -> Result<()> {
    let escapes = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\'])
        || key.contains('\0');
    if escapes {
        return Err(JournalError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.checked_slot_path(key)?) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(JournalError::Storage {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let storage_err = |source| JournalError::Storage {
            key: key.to_string(),
            source,
        };
        let path = self.checked_slot_path(key)?;
        fs::create_dir_all(&self.dir).map_err(storage_err)?;

        // rename over the old file so readers never see a half-written slot
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(storage_err)?;
        fs::rename(&tmp, &path).map_err(storage_err)?;
        Ok(())
    }
}

/// Reads and writes the entry collection through a [`Storage`] slot.
#[derive(Debug)]
pub struct EntryStore<S> {
    storage: S,
    key: String,
}

impl<S: Storage> EntryStore<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        EntryStore {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Never fails: a missing, empty or unreadable slot yields no entries.
    pub fn load(&self) -> Vec<Entry> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read journal entries");
                return Vec::new();
            }
        };

        let elements: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(serde_json::Value::Array(elements)) => elements,
            Ok(_) => {
                warn!(key = %self.key, "journal entries are not a list, ignoring them");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to parse journal entries");
                return Vec::new();
            }
        };

        elements
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| match serde_json::from_value(element) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(key = %self.key, index, error = %e, "skipping malformed journal entry");
                    None
                }
            })
            .collect()
    }

    pub fn save(&mut self, entries: &[Entry]) -> Result<()> {
        let data = serde_json::to_string(entries)?;
        self.storage.set(&self.key, &data)?;
        debug!(key = %self.key, count = entries.len(), "saved journal entries");
        Ok(())
    }
}
