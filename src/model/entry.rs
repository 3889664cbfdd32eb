use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// An `f64` that can be read and swapped from behind a shared reference.
///
/// Score participates in two orderings read concurrently by any number of
/// readers (the prefix cache's score comparator and top-K selection during a
/// scan), so storing it as a plain field behind the entry store's lock would
/// force every comparator evaluation to also contend for that lock. Bit-
/// reinterpreting as `u64` keeps reads lock-free, the same tradeoff the
/// teacher makes for `query_count`/`write_count`/`current_version`.
#[derive(Debug)]
struct AtomicScore(AtomicU64);

impl AtomicScore {
    fn new(score: f64) -> Self {
        AtomicScore(AtomicU64::new(score.to_bits()))
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }

    fn store(&self, score: f64) {
        self.0.store(score.to_bits(), Ordering::Release);
    }
}

/// The pre-insertion value passed to `add`. Fragments don't exist yet —
/// they're computed by the façade's fragmenter once the entry is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntry<K, V> {
    pub key: K,
    pub value: V,
    pub score: f64,
}

impl<K, V> NewEntry<K, V> {
    pub fn new(key: K, value: V, score: f64) -> Self {
        NewEntry { key, value, score }
    }
}

/// The authoritative record for one indexed entity.
///
/// `key`, `value`, and `fragments` are frozen at construction (Invariant E1);
/// `score` is the one mutable field, and every change to it must go through
/// the façade so the prefix cache stays coherent (Invariant E2). `Entry` is
/// always handed to callers wrapped in `Arc`, which plays the role of the
/// "non-owning reference bounded by the entry store's lifetime" described in
/// the data model — the `Arc` refcount keeps the referent alive for exactly
/// as long as a caller holds it, with no separate lifetime parameter needed.
pub struct Entry<K, V> {
    key: K,
    value: V,
    fragments: Vec<String>,
    score: AtomicScore,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V, fragments: Vec<String>, score: f64) -> Self {
        Entry {
            key,
            value,
            fragments,
            score: AtomicScore::new(score),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn score(&self) -> f64 {
        self.score.load()
    }

    pub(crate) fn set_score(&self, score: f64) {
        self.score.store(score);
    }
}

impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("score", &self.score())
            .field("fragments", &self.fragments)
            .finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.value == other.value
            && self.fragments == other.fragments
            && self.score() == other.score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_reads_reflect_latest_store() {
        let entry = Entry::new("k".to_string(), "v".to_string(), vec!["v".to_string()], 0.0);
        assert_eq!(entry.score(), 0.0);
        entry.set_score(3.5);
        assert_eq!(entry.score(), 3.5);
    }

    #[test]
    fn equality_is_by_value_including_current_score() {
        let a = Entry::new(1u32, "obama".to_string(), vec!["obama".to_string()], 0.0);
        let b = Entry::new(1u32, "obama".to_string(), vec!["obama".to_string()], 0.0);
        assert_eq!(a, b);
        a.set_score(1.0);
        assert_ne!(a, b);
    }
}
