//! Booking API access for the accommodation reviews front end.
//!
//! This crate provides:
//! - `Request` / `Response` - Transport-neutral HTTP values
//! - `HttpTransport` - Outbound HTTP (Spin on `wasm32`)
//! - `ApiClient` - Base URL handling and JSON decoding
//! - `ReviewGateway` - The `/reviews` endpoints, behind `ReviewSource`
//!
//! No call is retried or cached; every failure is handed to the caller.

mod client;
mod error;
mod request;
mod response;
mod reviews;
mod transport;

#[cfg(any(test, feature = "test-util"))]
mod mock;

pub use client::ApiClient;
pub use error::{ApiError, FetchError};
pub use request::Request;
pub use response::Response;
pub use reviews::{ReviewGateway, ReviewQuery, ReviewSource};
pub use transport::HttpTransport;

#[cfg(target_arch = "wasm32")]
pub use transport::SpinTransport;

#[cfg(any(test, feature = "test-util"))]
pub use mock::MockTransport;
