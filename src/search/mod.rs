mod top_k;

pub(crate) use top_k::{score_cmp, TopK};
