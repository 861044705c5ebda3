//! Endpoint-specific API implementations
//!
//! | Module | Upstream endpoint | Description |
//! |--------|-------------------|-------------|
//! | `search` | `GET /foods/search` | Candidate records for free text |
//! | `foods` | `GET /food/{fdcId}` | Full record for one food id |

pub mod foods;
pub mod search;

pub use foods::FoodsApi;
pub use search::SearchApi;
