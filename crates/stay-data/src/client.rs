//! Booking API client.

use http::Method;
use serde::de::DeserializeOwned;

use crate::{FetchError, HttpTransport, Request, Response};

/// Client for the booking API.
///
/// Relative paths are resolved against the base URL; every request asks for
/// JSON.
pub struct ApiClient<T> {
    base_url: String,
    transport: T,
}

impl<T: HttpTransport> ApiClient<T> {
    /// Create a client for `base_url` (trailing slashes are ignored).
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create a GET request.
    pub fn get(&self, path: &str) -> Request {
        self.request(Method::GET, path)
    }

    /// Create a POST request.
    pub fn post(&self, path: &str) -> Request {
        self.request(Method::POST, path)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, path: &str) -> Request {
        let url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        };

        Request::new(method, url).accept("application/json")
    }

    /// Send a request and fail on non-2xx statuses.
    pub async fn send(&self, request: Request) -> Result<Response, FetchError> {
        self.transport.send(request).await?.error_for_status()
    }

    /// Send a request and decode the JSON body.
    pub async fn send_json<R: DeserializeOwned>(&self, request: Request) -> Result<R, FetchError> {
        self.send(request).await?.json()
    }

    /// Send a request whose success body may be empty.
    pub async fn send_optional_json<R: DeserializeOwned>(
        &self,
        request: Request,
    ) -> Result<Option<R>, FetchError> {
        let response = self.send(request).await?;
        if response.is_body_empty() {
            Ok(None)
        } else {
            response.json().map(Some)
        }
    }
}
