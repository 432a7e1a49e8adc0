//! Durable storage for held orders and the order sequence counter.
//!
//! Persistence goes through the [`KeyValueStore`] capability so the
//! store is testable with an in-memory fake; production uses
//! [`JsonFileStore`], one JSON file per key under the data directory.
//! Corrupt contents degrade to an empty store with a warning instead
//! of failing startup.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;
use uuid::Uuid;

use crate::Result;
use crate::models::draft::Draft;

/// Key holding the serialized held-order list.
const DRAFTS_KEY: &str = "held_orders";

/// Key holding the last issued display-facing order sequence number.
const SEQUENCE_KEY: &str = "order_sequence";

/// Minimal persistent key-value capability.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the key cannot be removed.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile in-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("store lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().expect("store lock poisoned").remove(key);
        Ok(())
    }
}

/// File-backed store: each key maps to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates if needed) the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            crate::KebubbiError::Io(format!("failed to create {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .map_err(|e| crate::KebubbiError::Io(format!("failed to write {}: {e}", path.display())))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(crate::KebubbiError::Io(format!(
                "failed to remove {}: {e}",
                path.display()
            ))),
        }
    }
}

/// Held-order store plus the display-facing order sequence counter.
pub struct DraftStore<S> {
    store: S,
}

impl<S: KeyValueStore> DraftStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads every held order. Unparsable contents are treated as an
    /// empty store; startup never crashes on corruption.
    pub fn load_all(&self) -> Vec<Draft> {
        let Some(raw) = self.store.get(DRAFTS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(drafts) => drafts,
            Err(e) => {
                warn!(error = %e, "held orders unparsable, treating store as empty");
                Vec::new()
            }
        }
    }

    /// Saves a draft, replacing any existing draft with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn save(&self, draft: &Draft) -> Result<()> {
        let mut drafts = self.load_all();
        match drafts.iter_mut().find(|d| d.id == draft.id) {
            Some(existing) => *existing = draft.clone(),
            None => drafts.push(draft.clone()),
        }
        self.persist(&drafts)
    }

    /// Deletes a held order. Deleting an unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn delete(&self, draft_id: Uuid) -> Result<()> {
        let mut drafts = self.load_all();
        let before = drafts.len();
        drafts.retain(|d| d.id != draft_id);
        if drafts.len() == before {
            return Ok(());
        }
        self.persist(&drafts)
    }

    /// Removes a draft from the store and returns it for editing.
    /// Loading into the composition buffer is the other way (besides
    /// [`delete`](Self::delete)) a held order leaves the list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store write fails.
    pub fn take(&self, draft_id: Uuid) -> Result<Option<Draft>> {
        let mut drafts = self.load_all();
        let Some(index) = drafts.iter().position(|d| d.id == draft_id) else {
            return Ok(None);
        };
        let draft = drafts.remove(index);
        self.persist(&drafts)?;
        Ok(Some(draft))
    }

    /// Issues the next display-facing order number, resuming from the
    /// last locally observed value so a restart never reuses a number
    /// already shown to staff.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be persisted.
    pub fn next_order_sequence(&self) -> Result<u64> {
        let next = self.peek_next_sequence();
        self.store.set(SEQUENCE_KEY, &next.to_string())?;
        Ok(next)
    }

    /// The number the next call to
    /// [`next_order_sequence`](Self::next_order_sequence) will issue.
    pub fn peek_next_sequence(&self) -> u64 {
        let last = self
            .store
            .get(SEQUENCE_KEY)
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(error = %e, "order sequence unparsable, restarting from 1");
                    None
                }
            })
            .unwrap_or(0);
        last + 1
    }

    fn persist(&self, drafts: &[Draft]) -> Result<()> {
        let raw = serde_json::to_string(drafts)?;
        self.store.set(DRAFTS_KEY, &raw)
    }
}
