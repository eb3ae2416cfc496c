//! Persistence collaborator for entity collections
//!
//! Each entity type is a flat collection of YAML documents keyed by id.
//! [`Collection`] is the minimal store contract the core logic depends on:
//! a full-collection snapshot, whole-document put, and delete. Filtering by
//! folder, status, and so on happens in the consuming layer over snapshots;
//! there is no query language, no batching, and no transaction - every put
//! is an independent write and the last writer of a file wins.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::entity::Entity;
use crate::core::identity::EntityId;

/// Filename suffix for entity documents
pub const DOC_SUFFIX: &str = ".pft.yaml";

/// Minimal store contract for one entity collection
pub trait Collection<T: Entity> {
    /// Load and decode the full collection
    ///
    /// Malformed documents are skipped at the boundary rather than
    /// propagated; `pft validate` reports them.
    fn snapshot(&self) -> Result<Vec<T>, StoreError>;

    /// Create or overwrite one entity document
    fn put(&self, item: &T) -> Result<(), StoreError>;

    /// Delete one entity document
    fn remove(&self, id: &EntityId) -> Result<(), StoreError>;
}

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("failed to encode {id}: {message}")]
    Encode { id: String, message: String },

    #[error("no such entity: {0}")]
    NotFound(String),

    #[error("write rejected for {0}")]
    Rejected(String),
}

/// Filesystem-backed store rooted at a project directory
pub struct YamlStore {
    root: PathBuf,
}

impl YamlStore {
    /// Create a store rooted at the given project root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory of a collection
    pub fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    /// Path of one entity document
    pub fn document_path<T: Entity>(&self, id: &EntityId) -> PathBuf {
        self.collection_dir(T::COLLECTION)
            .join(format!("{}{}", id, DOC_SUFFIX))
    }

    /// Count documents in a collection that fail to decode as `T`
    pub fn malformed_count<T: Entity>(&self) -> usize {
        let dir = self.collection_dir(T::COLLECTION);
        document_files(&dir)
            .filter(|path| {
                fs::read_to_string(path)
                    .map(|content| serde_yml::from_str::<T>(&content).is_err())
                    .unwrap_or(true)
            })
            .count()
    }
}

/// Iterate entity document files under a collection directory
fn document_files(dir: &Path) -> impl Iterator<Item = PathBuf> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().to_string_lossy().ends_with(DOC_SUFFIX))
        .map(|e| e.path().to_path_buf())
}

impl<T: Entity> Collection<T> for YamlStore {
    fn snapshot(&self) -> Result<Vec<T>, StoreError> {
        let dir = self.collection_dir(T::COLLECTION);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut items: Vec<T> = Vec::new();
        for path in document_files(&dir) {
            let content = fs::read_to_string(&path).map_err(|e| StoreError::Read {
                path: path.clone(),
                message: e.to_string(),
            })?;
            // Malformed documents are skipped at the boundary
            if let Ok(item) = serde_yml::from_str::<T>(&content) {
                items.push(item);
            }
        }

        items.sort_by(|a, b| {
            a.created()
                .cmp(&b.created())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(items)
    }

    fn put(&self, item: &T) -> Result<(), StoreError> {
        let dir = self.collection_dir(T::COLLECTION);
        fs::create_dir_all(&dir).map_err(|e| StoreError::Write {
            path: dir.clone(),
            message: e.to_string(),
        })?;

        let content = serde_yml::to_string(item).map_err(|e| StoreError::Encode {
            id: item.id().to_string(),
            message: e.to_string(),
        })?;

        let path = self.document_path::<T>(item.id());
        fs::write(&path, content).map_err(|e| StoreError::Write {
            path: path.clone(),
            message: e.to_string(),
        })
    }

    fn remove(&self, id: &EntityId) -> Result<(), StoreError> {
        let path = self.document_path::<T>(id);
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        fs::remove_file(&path).map_err(|e| StoreError::Write {
            path: path.clone(),
            message: e.to_string(),
        })
    }
}

/// In-memory store for tests, with per-id write-failure injection
#[derive(Default)]
pub struct MemStore<T> {
    items: RefCell<BTreeMap<String, T>>,
    failing_puts: RefCell<HashSet<String>>,
}

impl<T: Entity + Clone> MemStore<T> {
    pub fn new() -> Self {
        Self {
            items: RefCell::new(BTreeMap::new()),
            failing_puts: RefCell::new(HashSet::new()),
        }
    }

    /// Seed the store without going through `put`
    pub fn seed(&self, item: T) {
        self.items
            .borrow_mut()
            .insert(item.id().to_string(), item);
    }

    /// Make every `put` of the given id fail with `StoreError::Rejected`
    pub fn fail_puts_for(&self, id: &EntityId) {
        self.failing_puts.borrow_mut().insert(id.to_string());
    }

    /// Fetch one item by id
    pub fn get(&self, id: &EntityId) -> Option<T> {
        self.items.borrow().get(&id.to_string()).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl<T: Entity + Clone> Collection<T> for MemStore<T> {
    fn snapshot(&self) -> Result<Vec<T>, StoreError> {
        let mut items: Vec<T> = self.items.borrow().values().cloned().collect();
        items.sort_by(|a, b| {
            a.created()
                .cmp(&b.created())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(items)
    }

    fn put(&self, item: &T) -> Result<(), StoreError> {
        let key = item.id().to_string();
        if self.failing_puts.borrow().contains(&key) {
            return Err(StoreError::Rejected(key));
        }
        self.items.borrow_mut().insert(key, item.clone());
        Ok(())
    }

    fn remove(&self, id: &EntityId) -> Result<(), StoreError> {
        self.items
            .borrow_mut()
            .remove(&id.to_string())
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Shelf;
    use tempfile::tempdir;

    #[test]
    fn test_yaml_store_put_snapshot_remove() {
        let tmp = tempdir().unwrap();
        let store = YamlStore::new(tmp.path());

        let shelf = Shelf::new("North".to_string(), "S1".to_string(), "test".to_string());
        store.put(&shelf).unwrap();

        let snapshot: Vec<Shelf> = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].code, "S1");

        Collection::<Shelf>::remove(&store, &shelf.id).unwrap();
        let snapshot: Vec<Shelf> = store.snapshot().unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_yaml_store_remove_missing_is_not_found() {
        let tmp = tempdir().unwrap();
        let store = YamlStore::new(tmp.path());
        let shelf = Shelf::new("North".to_string(), "S1".to_string(), "test".to_string());
        let err = Collection::<Shelf>::remove(&store, &shelf.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_yaml_store_skips_malformed_documents() {
        let tmp = tempdir().unwrap();
        let store = YamlStore::new(tmp.path());

        let shelf = Shelf::new("North".to_string(), "S1".to_string(), "test".to_string());
        store.put(&shelf).unwrap();
        std::fs::write(
            store.collection_dir(Shelf::COLLECTION).join("junk.pft.yaml"),
            "not: [valid",
        )
        .unwrap();

        let snapshot: Vec<Shelf> = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.malformed_count::<Shelf>(), 1);
    }

    #[test]
    fn test_mem_store_failure_injection() {
        let store: MemStore<Shelf> = MemStore::new();
        let shelf = Shelf::new("North".to_string(), "S1".to_string(), "test".to_string());
        store.fail_puts_for(&shelf.id);
        assert!(matches!(store.put(&shelf), Err(StoreError::Rejected(_))));
        assert!(store.is_empty());
    }
}
