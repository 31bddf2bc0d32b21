//! Core domain types for the accommodation reviews front end.
//!
//! This crate provides:
//! - `Review` / `ReviewRecord` - Review records and their wire form
//! - `RatingPolicy` - Validation of ratings at ingestion
//! - `summarize` - Review summary calculator
//! - `PagedResponse` - Paging wrapper owned by the booking API
//! - `ReviewsConfig` - File-based configuration
//! - `RequestId` - Request correlation

mod accommodation;
mod config;
mod context;
mod error;
mod ids;
mod page;
mod review;
mod sort;
mod summary;

pub use accommodation::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use ids::*;
pub use page::*;
pub use review::*;
pub use sort::*;
pub use summary::*;
