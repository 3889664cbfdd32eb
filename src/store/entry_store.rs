use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use crate::model::Entry;

/// The authoritative `key -> Entry` mapping.
///
/// `EntryStore` only ever needs its own lock for single-component reads
/// (`get`, `contains`, `entries`). Multi-component mutations (`add`,
/// `remove`, `clear`, `set_score`) are orchestrated by the façade, which
/// needs B, C, and D held together in the fixed B → C → D order — so the
/// lock is exposed directly as a crate-visible field, the same way
/// `query::cache::QueryCache` exposes its `LruCache` lock as a plain `pub`
/// field rather than hiding it behind single-purpose methods.
pub struct EntryStore<K, V> {
    pub(crate) entries: RwLock<HashMap<K, Arc<Entry<K, V>>>>,
}

impl<K: Eq + Hash + Clone, V> EntryStore<K, V> {
    pub fn new() -> Self {
        EntryStore {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<Arc<Entry<K, V>>> {
        self.entries.read().get(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.read().contains_key(key)
    }

    /// A defensive snapshot, independent of subsequent mutations — the
    /// persistence collaborator iterates it without holding any of the
    /// core's locks.
    pub fn entries(&self) -> Vec<Arc<Entry<K, V>>> {
        self.entries.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}

impl<K: Eq + Hash + Clone, V> Default for EntryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
