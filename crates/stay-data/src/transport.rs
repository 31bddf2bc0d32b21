//! Outbound HTTP transports.

use async_trait::async_trait;

use crate::{FetchError, Request, Response};

/// Sends a request and returns whatever the server answered.
///
/// Error statuses are returned as responses; only failures to get an answer
/// at all are errors.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError>;
}

#[async_trait(?Send)]
impl<T: HttpTransport + ?Sized> HttpTransport for std::rc::Rc<T> {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        (**self).send(request).await
    }
}

/// Spin outbound HTTP.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinTransport;

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl HttpTransport for SpinTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        use spin_sdk::http::{Method as SpinMethod, Request as SpinRequest, Response as SpinResponse};

        let method = if request.method == http::Method::GET {
            SpinMethod::Get
        } else if request.method == http::Method::POST {
            SpinMethod::Post
        } else if request.method == http::Method::PUT {
            SpinMethod::Put
        } else if request.method == http::Method::PATCH {
            SpinMethod::Patch
        } else if request.method == http::Method::DELETE {
            SpinMethod::Delete
        } else {
            return Err(FetchError::Transport(format!(
                "unsupported method {}",
                request.method
            )));
        };

        let mut builder = SpinRequest::builder();
        builder.method(method);
        builder.uri(request.url.as_str());
        for (key, value) in &request.headers {
            builder.header(key.as_str(), value.as_str());
        }
        builder.body(request.body.unwrap_or_default());
        let outgoing = builder.build();

        let response: SpinResponse = spin_sdk::http::send(outgoing)
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = *response.status();
        let headers = response
            .headers()
            .map(|(k, v)| (k.to_string(), v.as_str().unwrap_or("").to_string()))
            .collect();

        Ok(Response::new(status, headers, response.into_body()))
    }
}
