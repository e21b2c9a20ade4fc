//! Progression persistence - two id lists under fixed keys.
//!
//! The seam is a plain string key-value surface with the semantics of
//! browser local storage: each key holds one JSON array of node ids.
//! Corrupt values are logged and treated as missing; the engine's restore
//! step repairs whatever is left.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use story_atlas::NodeId;

/// Storage key for the visited list.
pub const VISITED_KEY: &str = "webdoc-progression";

/// Storage key for the unlocked list.
pub const UNLOCKED_KEY: &str = "webdoc-unlocked";

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding failure: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// A progression snapshot: the two id lists, exactly as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProgression {
    pub visited: Vec<NodeId>,
    pub unlocked: Vec<NodeId>,
}

/// Where progression lives between visits.
///
/// Implementations provide raw key access; the JSON framing of the two
/// lists is shared by the provided methods.
pub trait ProgressionStore {
    fn read_key(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn write_key(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Read both lists. Missing or corrupt values come back empty; an empty
    /// unlocked list later degrades to `{start}` on restore.
    fn load_progression(&self) -> Result<StoredProgression, StoreError> {
        Ok(StoredProgression {
            visited: read_id_list(self, VISITED_KEY)?,
            unlocked: read_id_list(self, UNLOCKED_KEY)?,
        })
    }

    /// Write both lists under their fixed keys.
    fn save_progression(&mut self, progression: &StoredProgression) -> Result<(), StoreError> {
        let visited = serde_json::to_string(&progression.visited)?;
        let unlocked = serde_json::to_string(&progression.unlocked)?;
        self.write_key(VISITED_KEY, &visited)?;
        self.write_key(UNLOCKED_KEY, &unlocked)
    }
}

fn read_id_list<S>(store: &S, key: &str) -> Result<Vec<NodeId>, StoreError>
where
    S: ProgressionStore + ?Sized,
{
    let Some(raw) = store.read_key(key)? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str(&raw) {
        Ok(ids) => Ok(ids),
        Err(error) => {
            tracing::warn!(key, %error, "corrupt stored list, treating as missing");
            Ok(Vec::new())
        }
    }
}

/// Volatile in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressionStore for MemoryStore {
    fn read_key(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn write_key(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Durable store backed by a single JSON object file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFileStore {
    /// Open a store file. A missing file starts empty, and so does a
    /// malformed one; corruption never surfaces past a warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(values) => values,
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "corrupt store file, starting empty");
                    HashMap::new()
                }
            },
            Err(error) if error.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(error) => return Err(error.into()),
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl ProgressionStore for JsonFileStore {
    fn read_key(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn write_key(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<NodeId> {
        raw.iter().map(|id| NodeId::new(*id)).collect()
    }

    #[test]
    fn test_memory_roundtrip() {
        let mut store = MemoryStore::new();
        let progression = StoredProgression {
            visited: ids(&["les-racines", "le-vertige"]),
            unlocked: ids(&["les-racines", "le-vertige", "la-boussole"]),
        };

        store.save_progression(&progression).unwrap();
        let loaded = store.load_progression().unwrap();

        assert_eq!(loaded, progression);
    }

    #[test]
    fn test_empty_store_loads_empty_lists() {
        let store = MemoryStore::new();
        let loaded = store.load_progression().unwrap();

        assert!(loaded.visited.is_empty());
        assert!(loaded.unlocked.is_empty());
    }

    #[test]
    fn test_lists_live_under_fixed_keys() {
        let mut store = MemoryStore::new();
        store
            .save_progression(&StoredProgression {
                visited: ids(&["les-racines"]),
                unlocked: ids(&["les-racines"]),
            })
            .unwrap();

        assert_eq!(
            store.read_key(VISITED_KEY).unwrap().as_deref(),
            Some("[\"les-racines\"]")
        );
        assert!(store.read_key(UNLOCKED_KEY).unwrap().is_some());
    }

    #[test]
    fn test_corrupt_value_is_treated_as_missing() {
        let mut store = MemoryStore::new();
        store.write_key(VISITED_KEY, "[\"les-racines\"]").unwrap();
        store.write_key(UNLOCKED_KEY, "not json at all").unwrap();

        let loaded = store.load_progression().unwrap();
        assert_eq!(loaded.visited, ids(&["les-racines"]));
        assert!(loaded.unlocked.is_empty());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progression.json");

        let progression = StoredProgression {
            visited: ids(&["les-racines"]),
            unlocked: ids(&["les-racines", "le-vertige"]),
        };

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            store.save_progression(&progression).unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.load_progression().unwrap(), progression);
    }

    #[test]
    fn test_file_store_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nothing-here.json")).unwrap();

        assert_eq!(store.load_progression().unwrap(), StoredProgression::default());
    }

    #[test]
    fn test_file_store_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progression.json");
        std::fs::write(&path, "{{{{ definitely not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.load_progression().unwrap(), StoredProgression::default());
    }
}
