//! Persisted set of favorite entry ids.
//!
//! [`FavoritesStore`] is loaded once at startup and written back after
//! every mutation. Favorites are a convenience feature, so persistence
//! problems are logged and swallowed: a missing or corrupt file loads as
//! an empty set, and a failed write leaves the in-memory set authoritative
//! for the rest of the session.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::types::EntryId;

/// Storage key used by the browser build; also the default file stem.
pub const FAVORITES_KEY: &str = "pokemon-favorites";

/// Errors from reading or writing the persisted favorites.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Favorites storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Favorites payload is not a JSON array of ids: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Favorites storage unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// Storage backends
// ---------------------------------------------------------------------------

/// Durable home for the serialized favorites payload.
pub trait FavoritesStorage {
    /// Raw payload, or `None` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    fn write(&self, payload: &str) -> Result<(), PersistenceError>;
}

/// One JSON file holding the id array.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FavoritesStorage for JsonFileStorage {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, payload: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// Shared in-memory payload. Clones see the same contents, which lets a
/// test hold one handle while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    payload: Arc<Mutex<Option<String>>>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Arc::new(Mutex::new(Some(payload.into()))),
            read_only: false,
        }
    }

    /// A storage whose writes always fail.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn payload(&self) -> Option<String> {
        self.payload.lock().ok().and_then(|p| p.clone())
    }
}

impl FavoritesStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        self.payload
            .lock()
            .map(|p| p.clone())
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))
    }

    fn write(&self, payload: &str) -> Result<(), PersistenceError> {
        if self.read_only {
            return Err(PersistenceError::Unavailable("storage is read-only".into()));
        }
        let mut slot = self
            .payload
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        *slot = Some(payload.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// The favorites set plus the storage it persists to.
///
/// Callers hold this handle explicitly; mutations take `&mut self`, so
/// they apply one at a time.
pub struct FavoritesStore {
    ids: BTreeSet<EntryId>,
    storage: Box<dyn FavoritesStorage + Send>,
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore").field("ids", &self.ids).finish_non_exhaustive()
    }
}

impl FavoritesStore {
    /// Load the persisted set. Never fails: any read or parse problem
    /// yields an empty set.
    pub fn load(storage: impl FavoritesStorage + Send + 'static) -> Self {
        let ids = match read_ids(&storage) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load favorites, starting empty");
                BTreeSet::new()
            }
        };
        tracing::debug!(count = ids.len(), "Favorites loaded");

        Self {
            ids,
            storage: Box::new(storage),
        }
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.ids.contains(&id)
    }

    /// Add `id` and persist. Adding an existing member changes nothing
    /// but still writes, so the file always mirrors memory.
    pub fn add(&mut self, id: EntryId) -> &BTreeSet<EntryId> {
        self.ids.insert(id);
        self.persist();
        &self.ids
    }

    /// Remove `id` and persist. Removing a non-member is a no-op.
    pub fn remove(&mut self, id: EntryId) -> &BTreeSet<EntryId> {
        self.ids.remove(&id);
        self.persist();
        &self.ids
    }

    /// Flip membership of `id`. Returns whether it is now a favorite.
    pub fn toggle(&mut self, id: EntryId) -> bool {
        if self.contains(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    /// All favorites in ascending order.
    pub fn ids(&self) -> Vec<EntryId> {
        self.ids.iter().copied().collect()
    }

    pub fn as_set(&self) -> &BTreeSet<EntryId> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.ids)
            .map_err(PersistenceError::from)
            .and_then(|payload| self.storage.write(&payload));

        if let Err(e) = result {
            tracing::warn!(error = %e, count = self.ids.len(), "Failed to persist favorites");
        }
    }
}

fn read_ids(storage: &dyn FavoritesStorage) -> Result<BTreeSet<EntryId>, PersistenceError> {
    match storage.read()? {
        None => Ok(BTreeSet::new()),
        Some(payload) if payload.trim().is_empty() => Ok(BTreeSet::new()),
        Some(payload) => {
            let ids: Vec<EntryId> = serde_json::from_str(&payload)?;
            Ok(ids.into_iter().filter(|id| *id > 0).collect())
        }
    }
}
