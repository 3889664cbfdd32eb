pub(crate) mod fragment_index;

pub use fragment_index::FragmentIndex;
