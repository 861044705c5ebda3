//! Best-match selection among search candidates.
//!
//! Each candidate gets a weighted blend of four similarity metrics against
//! the query, plus a bonus for better-curated data types. The reported
//! confidence uses only the text metrics, so it does not move with the bonus.

use calorie_search::Similarity;
use fooddata_client::FoodRecord;
use serde::Serialize;
use tracing::trace;

const RATIO_WEIGHT: f64 = 0.30;
const PARTIAL_WEIGHT: f64 = 0.20;
const TOKEN_SORT_WEIGHT: f64 = 0.25;
const TOKEN_SET_WEIGHT: f64 = 0.25;

/// Points per data-type rank step
const RANK_BONUS: f64 = 2.0;

/// The chosen candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Winning record
    pub record: FoodRecord,
    /// Trust in the match, `0..=100`
    pub confidence: f64,
    /// Ranking score the record won with
    pub score: f64,
}

/// Weighted text similarity, without the data-type bonus
#[must_use]
pub fn base_score(similarity: &Similarity) -> f64 {
    f64::from(similarity.ratio) * RATIO_WEIGHT
        + f64::from(similarity.partial) * PARTIAL_WEIGHT
        + f64::from(similarity.token_sort) * TOKEN_SORT_WEIGHT
        + f64::from(similarity.token_set) * TOKEN_SET_WEIGHT
}

/// Confidence reported for a match, `0..=100`
#[must_use]
pub fn confidence(similarity: &Similarity) -> f64 {
    (f64::from(similarity.ratio) + f64::from(similarity.token_set)) / 2.0
}

/// Full ranking score of one candidate
#[must_use]
pub fn score(query: &str, record: &FoodRecord) -> f64 {
    let similarity = similarity(query, record);
    base_score(&similarity) + f64::from(record.data_type().rank()) * RANK_BONUS
}

fn similarity(query: &str, record: &FoodRecord) -> Similarity {
    Similarity::between(&query.to_lowercase(), &record.description().to_lowercase())
}

/// Pick the highest-scoring candidate
///
/// Candidates are compared with a strict `>`, so the earliest of equally
/// scored candidates wins. Returns `None` when there are no candidates or
/// none scores above zero.
#[must_use]
pub fn pick_best(query: &str, candidates: Vec<FoodRecord>) -> Option<MatchResult> {
    let mut best: Option<(f64, FoodRecord)> = None;
    let mut best_score = 0.0;

    for candidate in candidates {
        let combined = score(query, &candidate);
        trace!(
            description = %candidate.description(),
            data_type = %candidate.data_type(),
            score = combined,
            "Scored candidate"
        );
        if combined > best_score {
            best_score = combined;
            best = Some((combined, candidate));
        }
    }

    let (score, record) = best?;
    let confidence = confidence(&similarity(query, &record));

    Some(MatchResult {
        record,
        confidence,
        score,
    })
}
