//! Dish query to calorie estimate.

use crate::extract::{ExtractedNutrition, extract};
use crate::select::pick_best;
use crate::source::FoodSource;
use calorie_telemetry::{Timer, metrics};
use fooddata_client::{ApiResult, FoodRecord};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Candidates requested per search
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Resolved calorie figures for one dish
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalorieEstimate {
    /// FoodData Central id of the matched record
    pub fdc_id: Option<i64>,
    /// Matched description, or the query when the record has none
    pub description: String,
    /// Calories in one serving, 2 dp
    pub calories_per_serving: f64,
    /// Calories for all servings, 2 dp
    pub total_calories: f64,
    /// Ingredient text of the matched record
    pub ingredients: Option<String>,
    /// Match confidence, 2 dp
    pub confidence_score: f64,
}

/// Why a lookup produced no estimate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupFailure {
    /// Search request failed
    #[error("nutrition database unavailable: {0}")]
    UpstreamUnavailable(String),
    /// Search returned no records
    #[error("no candidates found")]
    NoCandidates,
    /// No candidate scored above zero
    #[error("no candidate matched")]
    NoMatch,
    /// Best match carries neither label nor per-100g calories
    #[error("matched record has no calorie data")]
    NoCalorieData,
}

impl LookupFailure {
    /// Short cause name, used in metric names and logs
    #[must_use]
    pub fn cause(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::NoCandidates => "no_candidates",
            Self::NoMatch => "no_match",
            Self::NoCalorieData => "no_calorie_data",
        }
    }
}

/// Calories per serving from extracted nutrition
///
/// Priority: label value; per-100g scaled by a gram serving size; per-100g
/// as-is; otherwise nothing.
#[must_use]
pub fn reconcile(nutrition: &ExtractedNutrition) -> Option<f64> {
    if let Some(per_serving) = nutrition.calories_per_serving {
        return Some(per_serving);
    }

    let per_100g = nutrition.calories_per_100g?;
    let unit = nutrition
        .serving_unit
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    match nutrition.serving_size {
        Some(size) if matches!(unit.as_str(), "g" | "gram" | "grams") => {
            Some(per_100g * size / 100.0)
        }
        _ => Some(per_100g),
    }
}

/// Round to 2 decimal places the way Python's `round(x, 2)` does
///
/// The exact binary value is rounded with ties to even, so `0.125` gives
/// `0.12` and `2.675` (stored just below 2.675) gives `2.67`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
pub fn round2(value: f64) -> f64 {
    // Past 2^53 / 100 the scaled quotient no longer fits an f64 mantissa
    const EXACT_LIMIT: f64 = 9.0e13;

    if value == 0.0 || !value.is_finite() || value.abs() >= EXACT_LIMIT {
        return value;
    }

    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1 << 52), biased - 1075)
    };
    if exponent >= 0 {
        return value;
    }

    let shift = exponent.unsigned_abs();
    if shift > 120 {
        return 0.0_f64.copysign(value);
    }

    // value * 100 = scaled / 2^shift, exactly
    let scaled = u128::from(mantissa) * 100;
    let mut quotient = scaled >> shift;
    let remainder = scaled - (quotient << shift);
    let half = 1_u128 << (shift - 1);
    if remainder > half || (remainder == half && quotient & 1 == 1) {
        quotient += 1;
    }

    (quotient as f64 / 100.0).copysign(value)
}

/// Turns dish queries into calorie estimates using a [`FoodSource`]
pub struct Resolver<S> {
    source: S,
    page_size: u32,
}

impl<S: FoodSource> Resolver<S> {
    /// Create a resolver with the default page size
    pub fn new(source: S) -> Self {
        Self {
            source,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Builder-style method to set the search page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// The underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve a dish, or `None` for any failure
    pub async fn resolve(&self, query: &str, servings: u32) -> Option<CalorieEstimate> {
        self.resolve_detailed(query, servings).await.ok()
    }

    /// Resolve a dish, naming the cause on failure
    pub async fn resolve_detailed(
        &self,
        query: &str,
        servings: u32,
    ) -> Result<CalorieEstimate, LookupFailure> {
        let timer = Timer::start("lookup.duration_ms");
        metrics().increment("lookup.requests");

        let outcome = self.run(query, servings).await;
        timer.stop();

        match &outcome {
            Ok(estimate) => {
                metrics().increment("lookup.found");
                info!(
                    query = %query,
                    fdc_id = ?estimate.fdc_id,
                    description = %estimate.description,
                    confidence = estimate.confidence_score,
                    "Dish resolved"
                );
            }
            Err(failure) => {
                metrics().increment(&format!("lookup.not_found.{}", failure.cause()));
                match failure {
                    LookupFailure::UpstreamUnavailable(reason) => {
                        warn!(query = %query, reason = %reason, "Nutrition search failed");
                    }
                    _ => info!(query = %query, cause = failure.cause(), "Dish not resolved"),
                }
            }
        }

        outcome
    }

    async fn run(&self, query: &str, servings: u32) -> Result<CalorieEstimate, LookupFailure> {
        let candidates = self
            .source
            .search(query, self.page_size)
            .await
            .map_err(|e| LookupFailure::UpstreamUnavailable(e.to_string()))?;
        if candidates.is_empty() {
            return Err(LookupFailure::NoCandidates);
        }
        debug!(query = %query, candidates = candidates.len(), "Scoring candidates");

        let matched = pick_best(query, candidates).ok_or(LookupFailure::NoMatch)?;
        let nutrition = extract(&matched.record);
        debug!(?nutrition, score = matched.score, "Extracted nutrition");

        let per_serving = reconcile(&nutrition).ok_or(LookupFailure::NoCalorieData)?;
        let total = per_serving * f64::from(servings);

        let description = matched
            .record
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| query.to_string());

        Ok(CalorieEstimate {
            fdc_id: matched.record.fdc_id,
            description,
            calories_per_serving: round2(per_serving),
            total_calories: round2(total),
            ingredients: nutrition.ingredients,
            confidence_score: round2(matched.confidence),
        })
    }

    /// Full record for one food id, through the same source
    pub async fn food_detail(&self, fdc_id: i64) -> ApiResult<FoodRecord> {
        self.source.food_detail(fdc_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeSource, record};
    use crate::source::CachingSource;
    use calorie_core::cache::CacheConfig;
    use fooddata_client::{LabelNutrients, LabelValue, NutrientEntry};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn nutrition(
        per_serving: Option<f64>,
        per_100g: Option<f64>,
        size: Option<f64>,
        unit: Option<&str>,
    ) -> ExtractedNutrition {
        ExtractedNutrition {
            calories_per_serving: per_serving,
            calories_per_100g: per_100g,
            serving_size: size,
            serving_unit: unit.map(str::to_string),
            ingredients: None,
        }
    }

    fn energy(value: f64) -> NutrientEntry {
        NutrientEntry {
            nutrient_name: Some("Energy".to_string()),
            value: Some(value),
            ..NutrientEntry::default()
        }
    }

    fn with_label(mut food: FoodRecord, calories: f64) -> FoodRecord {
        food.label_nutrients = Some(LabelNutrients {
            calories: Some(LabelValue {
                value: Some(calories),
            }),
        });
        food
    }

    #[test]
    fn test_reconcile_label_wins() {
        let n = nutrition(Some(150.0), Some(400.0), Some(50.0), Some("g"));
        assert_eq!(reconcile(&n), Some(150.0));
    }

    #[test]
    fn test_reconcile_scales_grams() {
        let n = nutrition(None, Some(200.0), Some(50.0), Some("grams"));
        assert_eq!(reconcile(&n), Some(100.0));

        let n = nutrition(None, Some(200.0), Some(50.0), Some("G"));
        assert_eq!(reconcile(&n), Some(100.0));
    }

    #[test]
    fn test_reconcile_other_unit_uses_per_100g() {
        let n = nutrition(None, Some(200.0), Some(50.0), Some("oz"));
        assert_eq!(reconcile(&n), Some(200.0));

        let n = nutrition(None, Some(200.0), None, None);
        assert_eq!(reconcile(&n), Some(200.0));

        let n = nutrition(None, Some(200.0), Some(50.0), None);
        assert_eq!(reconcile(&n), Some(200.0));
    }

    #[test]
    fn test_reconcile_nothing() {
        let n = nutrition(None, None, Some(50.0), Some("g"));
        assert_eq!(reconcile(&n), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(123.456), 123.46);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(100.0), 100.0);
        assert_eq!(round2(296.25), 296.25);
        assert_eq!(round2(-1.239), -1.24);
    }

    #[test]
    fn test_round2_ties_to_even_on_exact_value() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(1.005), 1.0);
        assert_eq!(round2(100.125), 100.12);
    }

    #[test]
    fn test_round2_scaled_serving_tie() {
        // 200.25 kcal per 100 g at a 50 g serving
        let n = nutrition(None, Some(200.25), Some(50.0), Some("g"));
        assert_eq!(round2(reconcile(&n).unwrap()), 100.12);
    }

    #[tokio::test]
    async fn test_resolve_scaled_servings() {
        let mut food = record("Oatmeal, cooked", "SR Legacy");
        food.fdc_id = Some(173_905);
        food.food_nutrients = vec![energy(200.0)];
        food.serving_size = Some(50.0);
        food.serving_size_unit = Some("grams".to_string());

        let resolver = Resolver::new(FakeSource::with_foods(vec![food]));
        let estimate = resolver.resolve("oatmeal cooked", 3).await.unwrap();

        assert_eq!(estimate.fdc_id, Some(173_905));
        assert_eq!(estimate.description, "Oatmeal, cooked");
        assert_eq!(estimate.calories_per_serving, 100.0);
        assert_eq!(estimate.total_calories, 300.0);
    }

    #[tokio::test]
    async fn test_resolve_label_value() {
        let mut food = with_label(record("Macaroni and cheese", "Survey (FNDDS)"), 150.0);
        food.food_nutrients = vec![energy(400.0)];
        food.ingredients = Some("PASTA, CHEESE".to_string());

        let resolver = Resolver::new(FakeSource::with_foods(vec![food]));
        let estimate = resolver.resolve("macaroni and cheese", 2).await.unwrap();

        assert_eq!(estimate.calories_per_serving, 150.0);
        assert_eq!(estimate.total_calories, 300.0);
        assert_eq!(estimate.ingredients.as_deref(), Some("PASTA, CHEESE"));
        assert_eq!(estimate.confidence_score, 100.0);
    }

    #[tokio::test]
    async fn test_resolve_rounds() {
        let mut food = record("Apple juice, canned", "SR Legacy");
        food.food_nutrients = vec![energy(46.333)];

        let resolver = Resolver::new(FakeSource::with_foods(vec![food]));
        let estimate = resolver.resolve("apple", 3).await.unwrap();

        assert_eq!(estimate.calories_per_serving, 46.33);
        assert_eq!(estimate.total_calories, 139.0);
        assert_eq!(estimate.confidence_score, 71.0);
    }

    #[tokio::test]
    async fn test_description_falls_back_to_query() {
        let mut food = record("", "Foundation");
        food.food_nutrients = vec![energy(10.0)];

        let resolver = Resolver::new(FakeSource::with_foods(vec![food]));
        let estimate = resolver.resolve("mystery stew", 1).await.unwrap();
        assert_eq!(estimate.description, "mystery stew");
    }

    #[tokio::test]
    async fn test_failure_causes() {
        let resolver = Resolver::new(FakeSource::failing());
        assert!(matches!(
            resolver.resolve_detailed("apple", 1).await,
            Err(LookupFailure::UpstreamUnavailable(_))
        ));

        let resolver = Resolver::new(FakeSource::with_foods(vec![]));
        assert_eq!(
            resolver.resolve_detailed("apple", 1).await,
            Err(LookupFailure::NoCandidates)
        );

        let resolver = Resolver::new(FakeSource::with_foods(vec![record("Apples, raw", "Foundation")]));
        assert_eq!(
            resolver.resolve_detailed("apple", 1).await,
            Err(LookupFailure::NoCalorieData)
        );
        assert_eq!(resolver.resolve("apple", 1).await, None);
    }

    #[tokio::test]
    async fn test_repeated_resolve_hits_upstream_once() {
        let mut food = record("Banana, raw", "Foundation");
        food.food_nutrients = vec![energy(89.0)];

        let fake = Arc::new(FakeSource::with_foods(vec![food]));
        let source = CachingSource::new(Arc::clone(&fake), CacheConfig::new(8));
        let resolver = Resolver::new(source);

        let first = resolver.resolve("banana", 1).await;
        let second = resolver.resolve("Banana", 1).await;

        assert!(first.is_some());
        assert_eq!(first.map(|e| e.calories_per_serving), second.map(|e| e.calories_per_serving));
        assert_eq!(fake.search_calls(), 1);
    }

    #[tokio::test]
    async fn test_food_detail_passthrough() {
        let mut food = record("Banana, raw", "Foundation");
        food.fdc_id = Some(1_105_314);

        let resolver = Resolver::new(FakeSource::with_foods(vec![food.clone()]));
        assert_eq!(resolver.food_detail(1_105_314).await.unwrap(), food);
        assert!(resolver.food_detail(1).await.is_err());
    }

    proptest! {
        #[test]
        fn confidence_stays_in_range(query in "[a-zA-Z ,]{1,24}", description in "[a-zA-Z ,()]{0,40}") {
            let mut food = record(&description, "Foundation");
            food.food_nutrients = vec![energy(100.0)];

            let resolver = Resolver::new(FakeSource::with_foods(vec![food]));
            let estimate = tokio_test::block_on(resolver.resolve(&query, 1));

            let estimate = estimate.expect("a single candidate always matches on its bonus");
            prop_assert!((0.0..=100.0).contains(&estimate.confidence_score));
        }

        #[test]
        fn total_scales_with_servings(per_100g in 0.0f64..2000.0, servings in 1u32..20) {
            let mut food = record("Rice, white, cooked", "SR Legacy");
            food.food_nutrients = vec![energy(per_100g)];

            let resolver = Resolver::new(FakeSource::with_foods(vec![food]));
            let estimate = tokio_test::block_on(resolver.resolve("rice", servings)).unwrap();

            let expected = round2(per_100g * f64::from(servings));
            prop_assert!((estimate.total_calories - expected).abs() < 1e-9);
        }
    }
}
