//! Calorie estimation for free-text dish names
//!
//! A lookup searches FoodData Central, picks the best-matching record,
//! extracts its calorie and serving data and scales the result to the
//! requested number of servings.
//!
//! - [`source`]: the upstream seam, plus a caching decorator
//! - [`select`]: fuzzy best-match ranking with a data-type bonus
//! - [`extract`]: normalization of heterogeneous record shapes
//! - [`resolve`]: the end-to-end lookup
//! - [`service`]: rate limiting, bearer auth and request validation in front of it
//!
//! # Example
//!
//! ```rust,no_run
//! use calorie_core::config::Config;
//! use calorie_estimator::{CalorieRequest, CalorieService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let service = CalorieService::from_config(&config)?;
//!
//!     let token = service.issuer().issue("alice@example.com")?;
//!     let header = format!("Bearer {token}");
//!     let response = service
//!         .get_calories("127.0.0.1", Some(&header), &CalorieRequest::new("apple pie", 2))
//!         .await?;
//!
//!     println!("{} kcal", response.total_calories);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod extract;
pub mod resolve;
pub mod select;
pub mod service;
pub mod source;

#[cfg(test)]
mod fake;

pub use extract::{ExtractedNutrition, extract};
pub use resolve::{CalorieEstimate, LookupFailure, Resolver};
pub use select::{MatchResult, pick_best};
pub use service::{CalorieRequest, CalorieResponse, CalorieService, ServiceError};
pub use source::{CachingSource, FoodSource};
