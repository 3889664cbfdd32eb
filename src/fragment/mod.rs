pub mod fragmenter;
pub mod normalize;

pub use fragmenter::{DefaultFragmenter, Fragmenter};
pub use normalize::normalize;
