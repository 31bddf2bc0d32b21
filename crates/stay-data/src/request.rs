//! Outbound HTTP request.

use std::collections::BTreeMap;

use http::Method;
use serde::Serialize;

use crate::FetchError;

/// A fully built request, ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Create a new request.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Append query parameters, percent-encoding the values.
    pub fn query<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let encoded: Vec<String> = params
            .into_iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    urlencoding::encode(k.as_ref()),
                    urlencoding::encode(v.as_ref())
                )
            })
            .collect();

        if !encoded.is_empty() {
            let separator = if self.url.contains('?') { '&' } else { '?' };
            self.url.push(separator);
            self.url.push_str(&encoded.join("&"));
        }
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        let json = serde_json::to_vec(value)?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(json);
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON, for inspection.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_encoding() {
        let req = Request::new(Method::GET, "https://api.test/reviews/hotel/a b")
            .query([("page", "1"), ("sortBy", "rating high")]);
        assert_eq!(
            req.url,
            "https://api.test/reviews/hotel/a b?page=1&sortBy=rating%20high"
        );

        let req = req.query([("limit", "5")]);
        assert!(req.url.ends_with("&limit=5"));
    }

    #[test]
    fn test_empty_query_leaves_url() {
        let req = Request::new(Method::GET, "https://api.test/x").query(Vec::<(&str, &str)>::new());
        assert_eq!(req.url, "https://api.test/x");
    }

    #[test]
    fn test_json_and_bearer() {
        let req = Request::new(Method::POST, "https://api.test/reviews/helpful")
            .json(&serde_json::json!({"reviewId": "r1"}))
            .unwrap()
            .bearer_auth("abc");

        assert_eq!(req.header_value("content-type"), Some("application/json"));
        assert_eq!(req.header_value("authorization"), Some("Bearer abc"));
        assert_eq!(req.json_body().unwrap()["reviewId"], "r1");
    }
}
