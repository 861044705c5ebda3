//! In-memory food source for tests.

use crate::source::FoodSource;
use async_trait::async_trait;
use fooddata_client::{ApiError, ApiResult, FoodRecord};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns a fixed candidate list for every search and counts calls.
#[derive(Debug, Default)]
pub struct FakeSource {
    foods: Vec<FoodRecord>,
    fail: bool,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_foods(foods: Vec<FoodRecord>) -> Self {
        Self {
            foods,
            ..Self::default()
        }
    }

    /// Every call fails as if upstream were down
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FoodSource for FakeSource {
    async fn search(&self, _query: &str, _page_size: u32) -> ApiResult<Vec<FoodRecord>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ApiError::api_response(503, "unavailable"));
        }
        Ok(self.foods.clone())
    }

    async fn food_detail(&self, fdc_id: i64) -> ApiResult<FoodRecord> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ApiError::api_response(503, "unavailable"));
        }
        self.foods
            .iter()
            .find(|f| f.fdc_id == Some(fdc_id))
            .cloned()
            .ok_or_else(|| ApiError::api_response(404, "not found"))
    }
}

/// A bare record with a description and data type label
pub fn record(description: &str, data_type: &str) -> FoodRecord {
    FoodRecord {
        description: Some(description.to_string()),
        data_type: Some(data_type.to_string()),
        ..FoodRecord::default()
    }
}
