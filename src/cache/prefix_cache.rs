use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::config::IndexConfig;
use crate::model::Entry;

/// A cached page for one normalized prefix: the top `min(num_cache_results,
/// total_matches)` entries under the score comparator, already sorted
/// best-first (Invariant D1).
struct CachedResult<K, V> {
    results: Vec<Arc<Entry<K, V>>>,
}

/// Holding the cache map and its two tunables under one lock means changing
/// either tunable and clearing the map happen in a single critical section
/// — changing either parameter and clearing the map happen together instead
/// of needing their own coordination step.
pub(crate) struct CacheState<K, V> {
    map: HashMap<String, CachedResult<K, V>>,
    pub(crate) max_prefix_len: usize,
    pub(crate) num_cache_results: usize,
}

/// Eviction on a score increase, called against an already-locked
/// `CacheState` *before* the façade applies the new score. `new_score` is
/// the target value `entry` is about to take on — it must be passed in
/// explicitly rather than re-derived from `entry.score()` after the fact,
/// since by the time this runs `entry.score()` still reports the
/// pre-change value and the comparison needs the value `entry` is rising
/// *to*, not the one it's rising *from*. For every fragment `f` of `entry`
/// and every cacheable prefix length `n`, evicts `D[f[..n]]` if `new_score`
/// could now gain or re-rank `entry`. Exposed as a free function, like
/// [`crate::index::fragment_index::insert_record`], so the façade can run
/// it while already holding B, C, and D together for the whole mutation.
pub(crate) fn invalidate_rising<K: Eq, V>(state: &mut CacheState<K, V>, entry: &Arc<Entry<K, V>>, new_score: f64) {
    let max_len = state.max_prefix_len;
    let num_results = state.num_cache_results;
    for fragment in entry.fragments() {
        for n in 1..=max_len.min(fragment.len()) {
            let prefix = &fragment[0..n];
            let should_evict = match state.map.get(prefix) {
                Some(cached) => {
                    cached.results.len() < num_results
                        || cached.results.last().map_or(true, |worst| worst.score() <= new_score)
                }
                None => false,
            };
            if should_evict {
                state.map.remove(prefix);
            }
        }
    }
}

/// Eviction on a score decrease, including full removal,
/// against an already-locked `CacheState`, called before the change/removal
/// is applied. See [`invalidate_rising`].
pub(crate) fn invalidate_falling<K: Eq, V>(state: &mut CacheState<K, V>, entry: &Arc<Entry<K, V>>) {
    let max_len = state.max_prefix_len;
    for fragment in entry.fragments() {
        for n in 1..=max_len.min(fragment.len()) {
            let prefix = &fragment[0..n];
            let contains_entry = state
                .map
                .get(prefix)
                .is_some_and(|cached| cached.results.iter().any(|e| e.key() == entry.key()));
            if contains_entry {
                state.map.remove(prefix);
            }
        }
    }
}

/// The coherent short-prefix autocomplete result cache.
pub struct PrefixCache<K, V> {
    pub(crate) state: RwLock<CacheState<K, V>>,
}

impl<K: Eq + Clone, V> PrefixCache<K, V> {
    pub fn new(config: IndexConfig) -> Self {
        PrefixCache {
            state: RwLock::new(CacheState {
                map: HashMap::new(),
                max_prefix_len: config.max_cache_prefix_len,
                num_cache_results: config.num_cache_results,
            }),
        }
    }

    pub fn max_prefix_len(&self) -> usize {
        self.state.read().max_prefix_len
    }

    pub fn num_cache_results(&self) -> usize {
        self.state.read().num_cache_results
    }

    pub fn set_max_prefix_len(&self, n: usize) {
        let mut state = self.state.write();
        state.max_prefix_len = n;
        state.map.clear();
    }

    pub fn set_num_cache_results(&self, n: usize) {
        let mut state = self.state.write();
        state.num_cache_results = n;
        state.map.clear();
    }

    /// Exact-match lookup; returns a clone of the cached page (cheap — it's
    /// a `Vec` of `Arc`s) so the caller can truncate/return it without
    /// holding D past this call.
    pub fn get(&self, prefix: &str) -> Option<Vec<Arc<Entry<K, V>>>> {
        self.state.read().map.get(prefix).map(|c| c.results.clone())
    }

    /// Installs a freshly computed page, capped at `num_cache_results`.
    /// `results` must already be sorted best-first under the score
    /// comparator.
    pub fn put(&self, prefix: String, mut results: Vec<Arc<Entry<K, V>>>) {
        let mut state = self.state.write();
        results.truncate(state.num_cache_results);
        state.map.insert(prefix, CachedResult { results });
    }

    pub fn clear(&self) {
        self.state.write().map.clear();
    }

    pub fn invalidate_rising(&self, entry: &Arc<Entry<K, V>>, new_score: f64) {
        invalidate_rising(&mut self.state.write(), entry, new_score);
    }

    pub fn invalidate_falling(&self, entry: &Arc<Entry<K, V>>) {
        invalidate_falling(&mut self.state.write(), entry);
    }
}
