use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::model::Entry;

/// An ordered multimap from exact fragment text to the entries that
/// registered it.
///
/// Score is deliberately kept out of the sort key: records are grouped by
/// exact text only (a `BTreeMap<String, Vec<...>>`), and ranking happens at
/// query time over the scanned candidates. Baking score into the ordering
/// (`(text, score, key)`) would force a remove/reinsert on every score
/// change; this shape needs none. Within one bucket, multiple entries
/// sharing an identical fragment (two entities both fragmenting to
/// `"obama"`, say) sit in insertion order — harmless, since every bucket
/// touched by a scan feeds into score-based top-K selection anyway.
pub(crate) type Records<K, V> = BTreeMap<String, Vec<Arc<Entry<K, V>>>>;

pub struct FragmentIndex<K, V> {
    pub(crate) records: RwLock<Records<K, V>>,
}

/// Inserts one fragment record directly into an already-locked map. Exposed
/// as a free function so the façade can call it while holding B, C, and D
/// together for the duration of a mutation, rather than re-acquiring this
/// lock per fragment.
pub(crate) fn insert_record<K: Eq + Clone, V>(records: &mut Records<K, V>, text: &str, entry: Arc<Entry<K, V>>) {
    records.entry(text.to_string()).or_default().push(entry);
}

/// Removes every fragment record belonging to `key`, against an
/// already-locked map. See [`insert_record`].
pub(crate) fn remove_records<K: Eq + Clone, V>(records: &mut Records<K, V>, fragments: &[String], key: &K) {
    for text in fragments {
        if let Some(bucket) = records.get_mut(text) {
            bucket.retain(|e| e.key() != key);
            if bucket.is_empty() {
                records.remove(text);
            }
        }
    }
}

impl<K: Eq + Clone, V> FragmentIndex<K, V> {
    pub fn new() -> Self {
        FragmentIndex {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Inserts one fragment record, self-locking. See [`insert_record`] for
    /// the variant used when the façade already holds C's lock.
    pub fn insert(&self, text: &str, entry: Arc<Entry<K, V>>) {
        insert_record(&mut self.records.write(), text, entry);
    }

    /// Removes every fragment record belonging to `key`, self-locking.
    pub fn remove(&self, fragments: &[String], key: &K) {
        remove_records(&mut self.records.write(), fragments, key);
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }

    /// Every entry with at least one fragment in `[prefix, succ(prefix))`.
    /// `prefix` must be non-empty — callers scanning the whole index (the
    /// empty-query case) never reach here; `autocomplete` returns early per
    /// empty-query lookups return early before a scan is attempted.
    pub fn scan_prefix(&self, prefix: &str) -> Vec<Arc<Entry<K, V>>> {
        debug_assert!(!prefix.is_empty(), "empty-prefix scans never reach the fragment index");
        let hi = succ(prefix);
        self.records
            .read()
            .range(prefix.to_string()..hi)
            .flat_map(|(_, bucket)| bucket.iter().cloned())
            .collect()
    }
}

impl<K: Eq + Clone, V> Default for FragmentIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// `p` with its last codepoint replaced by the next codepoint — the
/// exclusive upper bound of the prefix range `[p, succ(p))`. Operating on
/// `char`s rather than bytes is safe here only because
/// every string that reaches this function is the output of `normalize`,
/// which emits ASCII-only text.
fn succ(prefix: &str) -> String {
    let mut chars: Vec<char> = prefix.chars().collect();
    let last = chars.pop().expect("prefix must be non-empty");
    let bumped = char::from_u32(last as u32 + 1).unwrap_or(char::MAX);
    chars.push(bumped);
    chars.into_iter().collect()
}
