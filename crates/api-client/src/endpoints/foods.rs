//! Food detail endpoint

use crate::client::FoodDataClient;
use crate::error::ApiResult;
use crate::models::FoodRecord;

/// Food detail API interface
#[derive(Clone)]
pub struct FoodsApi {
    client: FoodDataClient,
}

impl FoodsApi {
    /// Create a new food detail API interface
    pub(crate) fn new(client: FoodDataClient) -> Self {
        Self { client }
    }

    /// Full record for one food id
    ///
    /// GET `<food_detail_url with id>?api_key=..`
    pub async fn get(&self, fdc_id: i64) -> ApiResult<FoodRecord> {
        let url = self.client.config().food_detail_url_for(fdc_id);
        self.client.get_url(&url, &[]).await
    }
}
