//! Character-level similarity ratios.

use std::collections::HashMap;

/// Length of the longest common subsequence of two char slices.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Use two rows for space optimization
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Calculate the indel distance between two strings.
///
/// Counts the insertions and deletions needed to turn `a` into `b`
/// (a substitution costs two edits).
pub fn indel_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    a_chars.len() + b_chars.len() - 2 * lcs_len(&a_chars, &b_chars)
}

/// Normalized indel similarity in `0.0..=1.0`.
#[allow(clippy::cast_precision_loss)]
fn normalized_similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_len(a, b)) as f64 / total as f64
}

/// Round a percentage to an integer, ties to even.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_percent(similarity: f64) -> u8 {
    (similarity * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
}

/// Whole-string similarity ratio.
///
/// Identical strings score 100 (even when both are empty); otherwise an
/// empty side scores 0.
///
/// # Arguments
/// * `a` - First string
/// * `b` - Second string
///
/// # Returns
/// Similarity percentage in `0..=100`
pub fn ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    to_percent(normalized_similarity(&a_chars, &b_chars))
}

/// Below this many chars the longer string gets no popular-char pruning
const AUTOJUNK_MIN_LEN: usize = 200;

/// Positions of each char of `b`, minus chars too common to anchor a match.
///
/// In strings of at least [`AUTOJUNK_MIN_LEN`] chars, a char that appears in
/// more than 1% of positions is dropped from the index.
fn index_positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        positions.entry(c).or_default().push(j);
    }

    if b.len() >= AUTOJUNK_MIN_LEN {
        let limit = b.len() / 100 + 1;
        positions.retain(|_, js| js.len() <= limit);
    }
    positions
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
///
/// Among equally long runs the one starting earliest in `a`, then in `b`,
/// wins. Runs found through the index are then widened over equal
/// neighbouring chars, including pruned ones.
fn longest_match(
    a: &[char],
    b: &[char],
    positions: &HashMap<char, Vec<usize>>,
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    let mut run_ending_at: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        for &j in positions.get(c).map_or(&[][..], Vec::as_slice) {
            if j < blo {
                continue;
            }
            if j >= bhi {
                break;
            }
            let len = j
                .checked_sub(1)
                .and_then(|prev| run_ending_at.get(&prev))
                .map_or(1, |l| l + 1);
            next.insert(j, len);
            if len > best_len {
                best_i = i + 1 - len;
                best_j = j + 1 - len;
                best_len = len;
            }
        }
        run_ending_at = next;
    }

    while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
        best_i -= 1;
        best_j -= 1;
        best_len += 1;
    }
    while best_i + best_len < ahi && best_j + best_len < bhi && a[best_i + best_len] == b[best_j + best_len]
    {
        best_len += 1;
    }

    (best_i, best_j, best_len)
}

/// Matching blocks `(i, j, len)` of `a` within `b`, sorted, ending with the
/// `(a.len(), b.len(), 0)` sentinel.
fn matching_blocks(a: &[char], b: &[char]) -> Vec<(usize, usize, usize)> {
    let positions = index_positions(b);
    let mut pending = vec![((0, a.len()), (0, b.len()))];
    let mut blocks = Vec::new();

    while let Some(((alo, ahi), (blo, bhi))) = pending.pop() {
        let (i, j, len) = longest_match(a, b, &positions, (alo, ahi), (blo, bhi));
        if len == 0 {
            continue;
        }
        blocks.push((i, j, len));
        if alo < i && blo < j {
            pending.push(((alo, i), (blo, j)));
        }
        if i + len < ahi && j + len < bhi {
            pending.push(((i + len, ahi), (j + len, bhi)));
        }
    }

    blocks.sort_unstable();
    blocks.push((a.len(), b.len(), 0));
    blocks
}

/// Best ratio of the shorter string against windows of the longer one.
///
/// Each window starts where a matching block aligns the two strings and
/// spans the shorter string's length, cut short at the end of the longer
/// string. A short query fully contained in a long description scores 100.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    let mut best = 0.0_f64;
    for (i, j, _) in matching_blocks(&shorter, &longer) {
        let start = j.saturating_sub(i);
        let end = (start + shorter.len()).min(longer.len());
        let similarity = normalized_similarity(&shorter, &longer[start..end]);
        if similarity > 0.995 {
            return 100;
        }
        best = best.max(similarity);
    }

    to_percent(best)
}
