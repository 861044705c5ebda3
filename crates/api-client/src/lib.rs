//! Client for the USDA FoodData Central API
//!
//! This crate provides a typed HTTP client for the two endpoints the calorie
//! lookup needs: free-text food search and food detail by id.
//!
//! # Features
//!
//! - **Settings-based configuration**: Build from `calorie-counter.toml` or the `USDA_*` environment variables
//! - **Fixed timeout**: One attempt per call, bounded by the configured timeout
//! - **Lenient record model**: Unexpected field types degrade to absent values
//! - **Request correlation**: Track requests with unique IDs in logs
//!
//! # Example
//!
//! ```rust,no_run
//! use fooddata_client::{ClientConfig, FoodDataClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FoodDataClient::with_config(ClientConfig::default().with_api_key("DEMO_KEY"))?;
//!
//!     let foods = client.search().query("apple pie", 25).await?;
//!     println!("Got {} candidates", foods.len());
//!
//!     if let Some(id) = foods.first().and_then(|f| f.fdc_id) {
//!         let detail = client.foods().get(id).await?;
//!         println!("{}", detail.description());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod models;

pub use client::FoodDataClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use models::{DataType, FoodRecord, LabelNutrients, LabelValue, NutrientEntry, NutrientRef};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::FoodDataClient;
    pub use crate::config::ClientConfig;
    pub use crate::endpoints::{FoodsApi, SearchApi};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::models::{DataType, FoodRecord};
}
