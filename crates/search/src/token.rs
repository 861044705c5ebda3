//! Token-based similarity ratios.

use crate::fuzzy::ratio;
use std::collections::BTreeSet;

/// Normalize text for token comparison.
///
/// Drops Latin-1 supplement characters, turns everything that is not a
/// letter, digit or underscore into a space, lower-cases and trims.
pub fn full_process(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        if ('\u{80}'..='\u{ff}').contains(&c) {
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            out.extend(c.to_lowercase());
        } else {
            out.push(' ');
        }
    }

    out.trim().to_string()
}

fn sorted_tokens(text: &str) -> String {
    let processed = full_process(text);
    let mut tokens: Vec<&str> = processed.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Ratio of both strings after sorting their words.
///
/// Word order is ignored: "cheese macaroni" and "macaroni cheese" score 100.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Ratio built from the shared and the leftover words of both strings.
///
/// Compares the sorted intersection against intersection + leftovers on
/// each side and keeps the best pairing, so a description that contains
/// every query word scores 100 however many extra words it carries.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let processed_a = full_process(a);
    let processed_b = full_process(b);
    if processed_a.is_empty() || processed_b.is_empty() {
        return 0;
    }

    let tokens_a: BTreeSet<&str> = processed_a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = processed_b.split_whitespace().collect();

    let join = |set: BTreeSet<&str>| set.into_iter().collect::<Vec<_>>().join(" ");
    let intersection = join(tokens_a.intersection(&tokens_b).copied().collect());
    let only_a = join(tokens_a.difference(&tokens_b).copied().collect());
    let only_b = join(tokens_b.difference(&tokens_a).copied().collect());

    let combined_a = format!("{intersection} {only_a}").trim().to_string();
    let combined_b = format!("{intersection} {only_b}").trim().to_string();

    [
        ratio(&intersection, &combined_a),
        ratio(&intersection, &combined_b),
        ratio(&combined_a, &combined_b),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}
