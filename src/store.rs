//! Durable key-value storage for the task and category collections.
//!
//! `KeyValueStore` is the byte-level seam; `FileStore` keeps one JSON file per
//! key in a data directory and `MemoryStore` keeps everything in process.
//! `Persistence` sits on top and knows how to turn the two collections into
//! bytes and back, falling back to safe defaults when stored data is missing
//! or corrupt.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::category::{default_categories, Category};
use crate::error::StoreError;
use crate::task::Task;

/// Key holding the serialized task collection.
pub const TASKS_KEY: &str = "todos";
/// Key holding the serialized category collection.
pub const CATEGORIES_KEY: &str = "categories";

/// A byte store addressed by string keys. Last write wins.
pub trait KeyValueStore {
    /// Read the value under `key`, `None` if nothing was ever written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.key_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        // Atomic-ish write via temp + rename.
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        let write_tmp = || -> std::io::Result<()> {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(value)?;
            f.flush()
        };
        write_tmp().map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
    }
}

/// In-process store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, value: impl Into<Vec<u8>>) -> Self {
        self.entries.borrow_mut().insert(key.to_string(), value.into());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Serializes the two collections into a `KeyValueStore`.
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Persistence {
            store: Box::new(store),
        }
    }

    /// Stored tasks, or an empty list if nothing usable is stored.
    pub fn load_tasks(&self) -> Vec<Task> {
        self.load(TASKS_KEY).unwrap_or_default()
    }

    /// Stored categories, or the default seed if nothing usable is stored.
    pub fn load_categories(&self) -> Vec<Category> {
        self.load(CATEGORIES_KEY).unwrap_or_else(default_categories)
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<(), StoreError> {
        self.save(TASKS_KEY, tasks)
    }

    pub fn save_categories(&self, categories: &[Category]) -> Result<(), StoreError> {
        self.save(CATEGORIES_KEY, categories)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let bytes = match self.store.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key, "nothing stored, starting fresh");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "error reading store, starting fresh");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(items) => Some(items),
            Err(e) => {
                warn!(key, error = %e, "error parsing stored data, starting fresh");
                None
            }
        }
    }

    fn save<T: serde::Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(items)?;
        self.store.set(key, &data)?;
        debug!(key, count = items.len(), "collection written");
        Ok(())
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::fields::Priority;
    use crate::task::TaskDraft;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_missing_values_fall_back() {
        let p = Persistence::new(MemoryStore::new());
        assert!(p.load_tasks().is_empty());
        assert_eq!(p.load_categories(), default_categories());
    }

    #[test]
    fn test_corrupt_values_fall_back() {
        let store = MemoryStore::new()
            .with_entry(TASKS_KEY, "{not json")
            .with_entry(CATEGORIES_KEY, "[{\"id\": \"x\"}]");
        let p = Persistence::new(store);
        assert!(p.load_tasks().is_empty());
        assert_eq!(p.load_categories().len(), 5);
    }

    #[test]
    fn test_stored_empty_categories_are_kept() {
        let p = Persistence::new(MemoryStore::new().with_entry(CATEGORIES_KEY, "[]"));
        assert!(p.load_categories().is_empty());
    }

    #[test]
    fn test_round_trip_collections() {
        let store = Rc::new(MemoryStore::new());
        let p = Persistence::new(Rc::clone(&store));
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut draft = TaskDraft::new("Dentist");
        draft.priority = Priority::High;
        draft.tags = vec!["health".into()];
        draft.due_date = chrono::NaiveDate::from_ymd_opt(2024, 3, 9);
        let with_due = draft.clone().into_task(1, now);
        let mut bare = TaskDraft::new("Bare").into_task(2, now);
        bare.created_at = None;
        let tasks = vec![with_due, bare];
        p.save_tasks(&tasks).unwrap();

        let mut categories = default_categories();
        categories[0].icon = Some("briefcase".into());
        p.save_categories(&categories).unwrap();

        let reloaded = Persistence::new(store);
        assert_eq!(reloaded.load_tasks(), tasks);
        assert_eq!(reloaded.load_categories(), categories);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        assert_eq!(store.get("todos").unwrap(), None);
        store.set("todos", b"[1,2]").unwrap();
        store.set("todos", b"[3]").unwrap();
        assert_eq!(store.get("todos").unwrap(), Some(b"[3]".to_vec()));
        assert!(dir.path().join("nested").join("todos.json").exists());
        assert!(!dir.path().join("nested").join("todos.json.tmp").exists());
    }
}
