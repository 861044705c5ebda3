//! Food search endpoint

use crate::client::FoodDataClient;
use crate::error::ApiResult;
use crate::models::{DataType, FoodRecord, SearchResponse};
use tracing::debug;

/// Search API interface
#[derive(Clone)]
pub struct SearchApi {
    client: FoodDataClient,
}

impl SearchApi {
    /// Create a new search API interface
    pub(crate) fn new(client: FoodDataClient) -> Self {
        Self { client }
    }

    /// Candidate records for free text, restricted to the curated data types
    /// and sorted by data type
    ///
    /// GET `<search_url>?query=..&pageSize=..&dataType=..&sortBy=dataType.keyword&sortOrder=asc`
    pub async fn query(&self, query: &str, page_size: u32) -> ApiResult<Vec<FoodRecord>> {
        let params = search_params(query, page_size);
        let response: SearchResponse = self
            .client
            .get_url(&self.client.config().search_url, &params)
            .await?;

        debug!(
            query = %query,
            returned = response.foods.len(),
            total_hits = ?response.total_hits,
            "Search completed"
        );
        Ok(response.foods)
    }
}

fn search_params(query: &str, page_size: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("query", query.to_string()),
        ("pageSize", page_size.to_string()),
    ];
    params.extend(
        DataType::SEARCHED
            .iter()
            .map(|data_type| ("dataType", data_type.label().to_string())),
    );
    params.push(("sortBy", "dataType.keyword".to_string()));
    params.push(("sortOrder", "asc".to_string()));
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params() {
        let params = search_params("mac and cheese", 25);
        let data_types: Vec<&str> = params
            .iter()
            .filter(|(k, _)| *k == "dataType")
            .map(|(_, v)| v.as_str())
            .collect();

        assert_eq!(params[0], ("query", "mac and cheese".to_string()));
        assert_eq!(params[1], ("pageSize", "25".to_string()));
        assert_eq!(data_types, ["Foundation", "SR Legacy", "Survey (FNDDS)"]);
        assert!(params.contains(&("sortBy", "dataType.keyword".to_string())));
        assert!(params.contains(&("sortOrder", "asc".to_string())));
    }
}
