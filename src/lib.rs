pub mod autocomplete;
pub mod cache;
pub mod core;
pub mod fragment;
pub mod index;
pub mod model;
pub mod search;
pub mod store;

pub use autocomplete::AutocompleteIndex;
pub use core::config::IndexConfig;
pub use core::error::{Error, ErrorKind, Result};
pub use fragment::{DefaultFragmenter, Fragmenter};
pub use model::{Entry, NewEntry};

/*
┌──────────────────────────────────────────────────────────────────────┐
│                      AUTOCOMPLETE-INDEX LAYOUT                       │
└──────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────────────────────────────────────┐
│                   struct AutocompleteIndex<K, V>                │
│  entries: EntryStore<K, V>        // B: key -> Entry, RwLock    │
│  fragments: FragmentIndex<K, V>   // C: fragment -> [Entry]     │
│  cache: PrefixCache<K, V>         // D: short-prefix result page│
│  fragmenter: Box<dyn Fragmenter<V>>                             │
└────────────────────────────────────────────────────────────────┘

  add/remove/clear/set_score  ── acquire B, then C, then D, hold
                                 all three through the mutation
  autocomplete                ── probe D, release; scan C, release;
                                 re-take D to install

┌──────────────────┐   ┌──────────────────────┐   ┌───────────────────┐
│ model::Entry<K,V> │   │ fragment::normalize   │   │ search::TopK<K,V>  │
│ • key, value      │   │ fragment::fragmenter  │   │ bounded ranked set │
│ • fragments: [..] │   │ deterministic text    │   │ under score_cmp    │
│ • score: AtomicU64│   │ canonicalization and  │   │ (score desc, key   │
│   (bits of f64)   │   │ suffix-phrase split   │   │  asc)              │
└──────────────────┘   └──────────────────────┘   └───────────────────┘
*/
