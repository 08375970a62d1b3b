//! KeyStore implementation
//!
//! HashMap-based store with RwLock for concurrency.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Key-value entries for one logical node.
///
/// Coarse-grained locking: one `RwLock` guards the whole map, held only for
/// the duration of a single access. Fine for the small per-node key counts
/// this router targets.
pub struct KeyStore {
    /// Immutable identifier of the owning node.
    id: String,

    entries: RwLock<HashMap<String, String>>,
}

impl KeyStore {
    /// Create an empty store for the node named `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The identifier of the node this store belongs to.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Insert or overwrite the value for `key` (write lock).
    ///
    /// Last writer wins under concurrent writers to the same key.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().insert(key.into(), value.into());
    }

    /// Get the current value for `key` (read lock).
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    /// True if `key` currently has a value.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore")
            .field("id", &self.id)
            .field("entries", &self.len())
            .finish()
    }
}
