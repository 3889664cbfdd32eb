/// Tunables for the prefix result cache (component D).
///
/// `max_cache_prefix_len = 0` disables caching entirely; `num_cache_results`
/// should be at least as large as the biggest `max_results` callers pass to
/// `autocomplete`, or cached pages will need re-truncation more often than
/// necessary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexConfig {
    pub max_cache_prefix_len: usize,
    pub num_cache_results: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            max_cache_prefix_len: 2,
            num_cache_results: 20,
        }
    }
}
