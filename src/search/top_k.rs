use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;
use std::sync::Arc;

use crate::model::Entry;

/// The score comparator: `a < b` iff `a.score > b.score`,
/// or the scores are equal and `a.key < b.key`. A total order on entries
/// since keys are unique in the entry store — required for correct use as a
/// `BTreeSet` ordering key.
///
/// `f64::total_cmp` (stable since 1.62) gives a full order over all `f64`
/// bit patterns including NaN, so this never panics even if a caller-
/// supplied score happens to be non-finite.
pub(crate) fn score_cmp<K: Ord, V>(a: &Entry<K, V>, b: &Entry<K, V>) -> std::cmp::Ordering {
    b.score().total_cmp(&a.score()).then_with(|| a.key().cmp(b.key()))
}

struct RankedEntry<K, V>(Arc<Entry<K, V>>);

impl<K: Ord, V> PartialEq for RankedEntry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        score_cmp(&self.0, &other.0) == std::cmp::Ordering::Equal
    }
}
impl<K: Ord, V> Eq for RankedEntry<K, V> {}
impl<K: Ord, V> PartialOrd for RankedEntry<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<K: Ord, V> Ord for RankedEntry<K, V> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        score_cmp(&self.0, &other.0)
    }
}

/// A bounded ordered set of the best `limit` entries seen so far, under the
/// score comparator, used for bounded top-K selection on a cache miss.
///
/// Implemented as an ordered-set eviction rather than a binary heap:
/// `BTreeSet::pop_last` (stable since 1.66) makes "evict the current worst"
/// a single call.
pub(crate) struct TopK<K, V> {
    limit: usize,
    ranked: BTreeSet<RankedEntry<K, V>>,
    seen: HashSet<K>,
}

impl<K: Ord + Hash + Clone, V> TopK<K, V> {
    pub(crate) fn new(limit: usize) -> Self {
        TopK {
            limit,
            ranked: BTreeSet::new(),
            seen: HashSet::new(),
        }
    }

    /// Offers a candidate entry. Entries already present (by key — the same
    /// entity reached via a different one of its own fragments) are
    /// skipped, never double-counted (Invariant 2, uniqueness).
    pub(crate) fn offer(&mut self, entry: Arc<Entry<K, V>>) {
        if self.limit == 0 || self.seen.contains(entry.key()) {
            return;
        }
        if self.ranked.len() < self.limit {
            self.seen.insert(entry.key().clone());
            self.ranked.insert(RankedEntry(entry));
            return;
        }
        let outranks_worst = match self.ranked.iter().next_back() {
            Some(worst) => score_cmp(&entry, &worst.0) == std::cmp::Ordering::Less,
            None => false,
        };
        if outranks_worst {
            if let Some(worst) = self.ranked.pop_last() {
                self.seen.remove(worst.0.key());
            }
            self.seen.insert(entry.key().clone());
            self.ranked.insert(RankedEntry(entry));
        }
    }

    /// Drains into the best-first sequence under the score comparator.
    pub(crate) fn into_sorted_vec(self) -> Vec<Arc<Entry<K, V>>> {
        self.ranked.into_iter().map(|r| r.0).collect()
    }
}
