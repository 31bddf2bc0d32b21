//! Scripted transport for tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;

use crate::{FetchError, HttpTransport, Request, Response};

/// Answers requests from a queue of scripted results and records every request.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<Result<Response, FetchError>>>,
    requests: RefCell<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response.
    pub fn push_json(&self, status: u16, value: serde_json::Value) -> &Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(Response::json_value(status, &value)));
        self
    }

    /// Queue a raw response.
    pub fn push_response(&self, response: Response) -> &Self {
        self.responses.borrow_mut().push_back(Ok(response));
        self
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: FetchError) -> &Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Scripted results not consumed yet.
    pub fn pending(&self) -> usize {
        self.responses.borrow().len()
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport("no scripted response".to_string())))
    }
}
