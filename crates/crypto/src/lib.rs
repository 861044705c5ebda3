//! Bearer token support for the calorie counter.
//!
//! This crate provides:
//! - HS256 JWT issuance and verification with subject and expiry claims
//! - `Authorization: Bearer` header parsing

#![warn(missing_docs)]

mod error;
mod token;

pub use error::{AuthError, Result};
pub use token::{Claims, TokenIssuer, parse_bearer};
