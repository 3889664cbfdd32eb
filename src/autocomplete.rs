use std::hash::Hash;
use std::sync::Arc;

use crate::cache::prefix_cache::{self, PrefixCache};
use crate::core::config::IndexConfig;
use crate::core::error::{Error, Result};
use crate::fragment::fragmenter::{DefaultFragmenter, Fragmenter};
use crate::index::fragment_index::{self, FragmentIndex};
use crate::model::{Entry, NewEntry};
use crate::search::TopK;
use crate::store::EntryStore;

/// The in-memory autocomplete index: the façade that orchestrates the entry
/// store, fragment index, and prefix cache behind the locking discipline
/// each of those components only half-enforces on its own.
///
/// `add`/`remove`/`clear`/`set_score` acquire the entry store, fragment
/// index, and cache locks together, in that fixed order, and hold all
/// three through the entire mutation — this is what keeps the cache
/// coherent with the fragment index and the fragment index coherent with
/// the entry store even under concurrent readers. `autocomplete` never
/// holds more than one of them at a time: it probes the cache, releases,
/// scans the fragment index, releases, then briefly re-takes the cache
/// lock to install the computed page.
pub struct AutocompleteIndex<K, V> {
    entries: EntryStore<K, V>,
    fragments: FragmentIndex<K, V>,
    cache: PrefixCache<K, V>,
    fragmenter: Box<dyn Fragmenter<V>>,
}

impl<K, V> AutocompleteIndex<K, V>
where
    K: Eq + Hash + Clone + Ord,
    V: std::fmt::Display,
{
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    pub fn with_config(config: IndexConfig) -> Self {
        AutocompleteIndex {
            entries: EntryStore::new(),
            fragments: FragmentIndex::new(),
            cache: PrefixCache::new(config),
            fragmenter: Box::new(DefaultFragmenter),
        }
    }
}

impl<K, V> AutocompleteIndex<K, V>
where
    K: Eq + Hash + Clone + Ord + std::fmt::Debug,
{
    pub fn with_fragmenter(fragmenter: Box<dyn Fragmenter<V>>) -> Self {
        Self::with_fragmenter_and_config(fragmenter, IndexConfig::default())
    }

    pub fn with_fragmenter_and_config(fragmenter: Box<dyn Fragmenter<V>>, config: IndexConfig) -> Self {
        AutocompleteIndex {
            entries: EntryStore::new(),
            fragments: FragmentIndex::new(),
            cache: PrefixCache::new(config),
            fragmenter,
        }
    }

    /// Registers a new entity. A duplicate key is a silent no-op — the
    /// existing entry (and its score) is left untouched, matching the
    /// established behavior this index preserves.
    pub fn add(&self, new_entry: NewEntry<K, V>) {
        let NewEntry { key, value, score } = new_entry;

        let mut entries = self.entries.entries.write();
        if entries.contains_key(&key) {
            return;
        }

        let fragments = self.fragmenter.fragments_of(&value);
        let entry = Arc::new(Entry::new(key.clone(), value, fragments.clone(), score));

        let mut records = self.fragments.records.write();
        let mut cache_state = self.cache.state.write();

        entries.insert(key, entry.clone());
        for fragment in &fragments {
            fragment_index::insert_record(&mut records, fragment, entry.clone());
        }
        prefix_cache::invalidate_rising(&mut cache_state, &entry, score);
    }

    pub fn add_value(&self, key: K, value: V) {
        self.add(NewEntry::new(key, value, 0.0));
    }

    pub fn add_scored(&self, key: K, value: V, score: f64) {
        self.add(NewEntry::new(key, value, score));
    }

    /// Removes an entity. A key absent from the store is a silent no-op.
    pub fn remove(&self, key: &K) {
        let mut entries = self.entries.entries.write();
        let Some(entry) = entries.get(key).cloned() else {
            return;
        };

        let mut records = self.fragments.records.write();
        let mut cache_state = self.cache.state.write();

        prefix_cache::invalidate_falling(&mut cache_state, &entry);
        fragment_index::remove_records(&mut records, entry.fragments(), key);
        entries.remove(key);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.entries.write();
        let mut records = self.fragments.records.write();
        let mut cache_state = self.cache.state.write();

        entries.clear();
        records.clear();
        cache_state.clear();
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    pub fn get(&self, key: &K) -> Option<Arc<Entry<K, V>>> {
        self.entries.get(key)
    }

    /// A defensive snapshot of every entry currently in the index, in no
    /// particular order — the shape a persistence collaborator would use
    /// to serialize a reload, paired with `clear()` and repeated `add()`
    /// on the other end.
    pub fn entries(&self) -> Vec<Arc<Entry<K, V>>> {
        self.entries.entries()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    /// Sets `key`'s score directly. `UnknownKey` if `key` is not present;
    /// no state changes in that case.
    pub fn set_score(&self, key: &K, score: f64) -> Result<()> {
        let entries = self.entries.entries.read();
        let Some(entry) = entries.get(key).cloned() else {
            return Err(Error::unknown_key(format!("{key:?}")));
        };

        // Held, not mutated: serializes this score change against any
        // in-flight fragment-index range scan, giving `set_score` a
        // linearization point even though C's contents never change.
        let _records = self.fragments.records.write();
        let mut cache_state = self.cache.state.write();

        if score > entry.score() {
            prefix_cache::invalidate_rising(&mut cache_state, &entry, score);
        } else if score < entry.score() {
            prefix_cache::invalidate_falling(&mut cache_state, &entry);
        }
        entry.set_score(score);
        Ok(())
    }

    pub fn increment(&self, key: &K) -> Result<()> {
        let current = self.get(key).ok_or_else(|| Error::unknown_key(format!("{key:?}")))?.score();
        self.set_score(key, current + 1.0)
    }

    pub fn decrement(&self, key: &K) -> Result<()> {
        let current = self.get(key).ok_or_else(|| Error::unknown_key(format!("{key:?}")))?.score();
        self.set_score(key, current - 1.0)
    }

    /// Returns up to `max_results` entries whose fragments start with
    /// `query`, best-first under the score comparator. An empty normalized
    /// query returns an empty vector — `succ` is never called on an empty
    /// string.
    pub fn autocomplete(&self, query: &str, max_results: usize) -> Vec<Arc<Entry<K, V>>> {
        if max_results == 0 {
            return Vec::new();
        }
        let normalized = self.fragmenter.normalize(query);
        if normalized.is_empty() {
            return Vec::new();
        }

        if normalized.len() <= self.cache.max_prefix_len() {
            if let Some(mut cached) = self.cache.get(&normalized) {
                cached.truncate(max_results);
                return cached;
            }
        }

        let cacheable = normalized.len() <= self.cache.max_prefix_len();
        // A cacheable prefix's page must hold num_cache_results entries
        // regardless of this call's max_results, or a later call asking for
        // more results against the same cached prefix would get a truncated
        // answer the cache can't satisfy.
        let collector_capacity = if cacheable {
            max_results.max(self.cache.num_cache_results())
        } else {
            max_results
        };

        let candidates = self.fragments.scan_prefix(&normalized);
        let mut top_k = TopK::new(collector_capacity);
        for candidate in candidates {
            top_k.offer(candidate);
        }
        let ranked = top_k.into_sorted_vec();

        if cacheable {
            self.cache.put(normalized, ranked.clone());
        }

        let mut results = ranked;
        results.truncate(max_results);
        results
    }

    pub fn set_max_cache_prefix_len(&self, n: i64) -> Result<()> {
        if n < 0 {
            return Err(Error::invalid_config(format!("max_cache_prefix_len must be >= 0, got {n}")));
        }
        self.cache.set_max_prefix_len(n as usize);
        Ok(())
    }

    pub fn get_max_cache_prefix_len(&self) -> usize {
        self.cache.max_prefix_len()
    }

    pub fn set_num_cache_results(&self, n: i64) -> Result<()> {
        if n < 1 {
            return Err(Error::invalid_config(format!("num_cache_results must be >= 1, got {n}")));
        }
        self.cache.set_num_cache_results(n as usize);
        Ok(())
    }

    pub fn get_num_cache_results(&self) -> usize {
        self.cache.num_cache_results()
    }
}

impl<K, V> Default for AutocompleteIndex<K, V>
where
    K: Eq + Hash + Clone + Ord + std::fmt::Debug,
    V: std::fmt::Display,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx() -> AutocompleteIndex<u32, String> {
        AutocompleteIndex::new()
    }

    fn seed(index: &AutocompleteIndex<u32, String>) {
        index.add_value(1, "Chicago".to_string());
        index.add_value(2, "Charleston".to_string());
        index.add_value(3, "Boston".to_string());
        index.add_value(4, "Cincinnati".to_string());
        index.add_value(5, "Cleveland".to_string());
    }

    #[test]
    fn duplicate_add_is_a_silent_no_op() {
        let index = idx();
        index.add_scored(1, "Chicago".to_string(), 5.0);
        index.add_scored(1, "Chicago".to_string(), 99.0);
        assert_eq!(index.get(&1).unwrap().score(), 5.0);
    }

    #[test]
    fn remove_of_unknown_key_is_a_silent_no_op() {
        let index = idx();
        index.remove(&42);
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn set_score_on_unknown_key_errors_without_side_effects() {
        let index = idx();
        assert!(index.set_score(&1, 5.0).is_err());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn autocomplete_on_empty_query_returns_nothing() {
        let index = idx();
        seed(&index);
        assert!(index.autocomplete("", 10).is_empty());
    }

    #[test]
    fn incrementing_a_score_moves_it_to_the_front_then_ties_break_by_key() {
        let index = idx();
        seed(&index);
        index.increment(&5).unwrap();
        let top = index.autocomplete("C", 2);
        let keys: Vec<u32> = top.iter().map(|e| *e.key()).collect();
        assert_eq!(keys, vec![5, 1]);
    }

    #[test]
    fn cache_stays_coherent_across_a_falling_score() {
        let index = AutocompleteIndex::with_config(IndexConfig {
            max_cache_prefix_len: 2,
            num_cache_results: 20,
        });
        seed(&index);
        index.increment(&5).unwrap();
        assert_eq!(
            index.autocomplete("C", 2).iter().map(|e| *e.key()).collect::<Vec<_>>(),
            vec![5, 1]
        );

        index.decrement(&5).unwrap();
        index.decrement(&5).unwrap();

        let keys: Vec<u32> = index.autocomplete("C", 2).iter().map(|e| *e.key()).collect();
        assert_eq!(keys, vec![1, 2]);
    }

    #[test]
    fn set_max_cache_prefix_len_rejects_negative_values() {
        let index = idx();
        assert!(index.set_max_cache_prefix_len(-1).is_err());
        assert_eq!(index.get_max_cache_prefix_len(), 2);
    }

    #[test]
    fn set_num_cache_results_rejects_less_than_one() {
        let index = idx();
        assert!(index.set_num_cache_results(0).is_err());
        assert_eq!(index.get_num_cache_results(), 20);
    }

    #[test]
    fn clear_empties_every_component() {
        let index = idx();
        seed(&index);
        index.autocomplete("C", 10);
        index.clear();
        assert_eq!(index.len(), 0);
        assert!(index.autocomplete("C", 10).is_empty());
    }

    #[test]
    fn rising_score_invalidates_the_cache_against_its_target_not_its_stale_value() {
        // num_cache_results strictly below the candidate count for "ap" is
        // what exposes this: with apple(1, 0) and apricot(2, 10), caching
        // "ap" keeps only apricot. Raising apple from 0 straight to 20 must
        // invalidate that cached page even though apple's *old* score (0)
        // could never have displaced apricot's 10 — only the *new* score
        // (20) can, and the check must use it.
        let index = AutocompleteIndex::with_config(IndexConfig {
            max_cache_prefix_len: 2,
            num_cache_results: 1,
        });
        index.add_value(1, "apple".to_string());
        index.add_scored(2, "apricot".to_string(), 10.0);

        let cached = index.autocomplete("ap", 1);
        assert_eq!(*cached[0].key(), 2);

        index.set_score(&1, 20.0).unwrap();

        let after = index.autocomplete("ap", 1);
        assert_eq!(*after[0].key(), 1);
    }
}
