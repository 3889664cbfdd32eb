use super::normalize::normalize;

/// Extension point for normalization and fragment generation.
///
/// The core treats fragments opaquely beyond requiring each be the output of
/// `normalize`: an alternative fragmenter may emit synonyms or other
/// normalized strings that have nothing to do with suffix phrases of the
/// entity's display name.
pub trait Fragmenter<V>: Send + Sync {
    fn normalize(&self, s: &str) -> String;
    fn fragments_of(&self, value: &V) -> Vec<String>;
}

/// The default fragmenter: suffix-phrase fragmentation of the value's
/// `Display` output.
///
/// If `n = "w1 w2 … wK"` is the normalized name, the fragments are
/// `"w1 w2 … wK"`, `"w2 … wK"`, …, `"wK"`, each emitted once in that order.
/// An empty normalized name yields no fragments — the entry is still
/// accepted by the entry store but is unreachable via `autocomplete` (only
/// via `get`).
pub struct DefaultFragmenter;

impl<V: std::fmt::Display> Fragmenter<V> for DefaultFragmenter {
    fn normalize(&self, s: &str) -> String {
        normalize(s)
    }

    fn fragments_of(&self, value: &V) -> Vec<String> {
        suffix_phrases(&normalize(&value.to_string()))
    }
}

/// Splits a normalized, single-spaced name into its suffix phrases.
fn suffix_phrases(normalized_name: &str) -> Vec<String> {
    if normalized_name.is_empty() {
        return Vec::new();
    }
    let words: Vec<&str> = normalized_name.split(' ').collect();
    (0..words.len())
        .map(|start| words[start..].join(" "))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_phrases_of_a_three_word_name() {
        let fragments = suffix_phrases(&normalize("Barack Hussein Obama"));
        assert_eq!(
            fragments,
            vec![
                "barack hussein obama".to_string(),
                "hussein obama".to_string(),
                "obama".to_string(),
            ]
        );
    }

    #[test]
    fn single_word_yields_one_fragment() {
        assert_eq!(suffix_phrases(&normalize("Chicago")), vec!["chicago".to_string()]);
    }

    #[test]
    fn empty_normalized_name_yields_no_fragments() {
        assert!(suffix_phrases("").is_empty());
    }

    #[test]
    fn default_fragmenter_uses_display_impl() {
        struct City(&'static str);
        impl std::fmt::Display for City {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
        let f = DefaultFragmenter;
        assert_eq!(
            Fragmenter::fragments_of(&f, &City("St. Paul")),
            vec!["st paul".to_string(), "paul".to_string()]
        );
    }
}
