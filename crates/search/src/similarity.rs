//! All four metrics for one pair of strings.

use crate::{partial_ratio, ratio, token_set_ratio, token_sort_ratio};
use serde::{Deserialize, Serialize};

/// Similarity of a query against one text, each metric in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Similarity {
    /// Whole-string ratio
    pub ratio: u8,
    /// Best-aligned substring ratio
    pub partial: u8,
    /// Word-order-insensitive ratio
    pub token_sort: u8,
    /// Word-set ratio
    pub token_set: u8,
}

impl Similarity {
    /// Compute every metric for `query` against `text` as given (no case folding).
    #[must_use]
    pub fn between(query: &str, text: &str) -> Self {
        Self {
            ratio: ratio(query, text),
            partial: partial_ratio(query, text),
            token_sort: token_sort_ratio(query, text),
            token_set: token_set_ratio(query, text),
        }
    }
}
