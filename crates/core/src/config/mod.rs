//! Configuration loading and schema definitions
//!
//! Settings come from an optional TOML file and are then overridden by the
//! environment variables the deployed service reads.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
