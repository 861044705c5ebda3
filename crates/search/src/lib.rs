//! Fuzzy string similarity for dish matching.
//!
//! This crate provides the four classic percentage metrics:
//! - Whole-string ratio (indel similarity)
//! - Partial ratio (best-aligned substring)
//! - Token-sort ratio (word order ignored)
//! - Token-set ratio (duplicates and extra words discounted)
//!
//! All metrics return integers in `0..=100`.

mod fuzzy;
mod similarity;
mod token;

pub use fuzzy::{indel_distance, partial_ratio, ratio};
pub use similarity::Similarity;
pub use token::{full_process, token_set_ratio, token_sort_ratio};
