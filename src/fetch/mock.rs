//! Mock fetcher for testing
//!
//! Returns configurable responses without touching the network.
//! Responses can be routed per URL or queued (FIFO) for any URL, and each
//! can carry a delay so tests can control which of several in-flight loads
//! resolves last.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use super::Fetcher;
use crate::error::{Result, ViewError};

/// What a mocked request resolves to
#[derive(Debug, Clone)]
enum Outcome {
    Json(Value),
    /// Raw body, parsed like a real response
    Body(String),
    Status(u16),
    NetworkError(String),
}

/// One mocked response
#[derive(Debug, Clone)]
pub struct MockResponse {
    outcome: Outcome,
    delay: Option<Duration>,
}

impl MockResponse {
    pub fn json(value: Value) -> Self {
        Self::from_outcome(Outcome::Json(value))
    }

    /// Raw response body (200), parsed as JSON on delivery
    pub fn body(body: impl Into<String>) -> Self {
        Self::from_outcome(Outcome::Body(body.into()))
    }

    /// Non-success HTTP status
    pub fn status(status: u16) -> Self {
        Self::from_outcome(Outcome::Status(status))
    }

    /// Transport failure with the given message
    pub fn network_error(message: impl Into<String>) -> Self {
        Self::from_outcome(Outcome::NetworkError(message.into()))
    }

    /// Resolve only after `delay`
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn from_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            delay: None,
        }
    }

    fn resolve(self, url: &str) -> Result<Value> {
        match self.outcome {
            Outcome::Json(value) => Ok(value),
            Outcome::Body(body) => serde_json::from_str(&body).map_err(|e| ViewError::json(&e)),
            Outcome::Status(status) => Err(ViewError::HttpStatus {
                url: url.to_string(),
                status,
            }),
            Outcome::NetworkError(message) => Err(ViewError::Network {
                url: url.to_string(),
                details: message,
            }),
        }
    }
}

/// Mock fetcher that returns predefined responses
#[derive(Default)]
pub struct MockFetcher {
    /// Per-URL responses; the last one for a URL is sticky
    routes: Mutex<FxHashMap<String, VecDeque<MockResponse>>>,
    /// Responses for any URL (FIFO), used when no route matches
    queue: Mutex<VecDeque<MockResponse>>,
    /// Track all requested URLs (for assertions)
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for `url`
    pub fn route(self, url: impl Into<String>, response: MockResponse) -> Self {
        self.routes
            .lock()
            .entry(url.into())
            .or_default()
            .push_back(response);
        self
    }

    /// Queue a response for the next unrouted request
    pub fn queue_response(&self, response: MockResponse) {
        self.queue.lock().push_back(response);
    }

    /// Get all requested URLs in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn next_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(responses) = self.routes.lock().get_mut(url) {
            if responses.len() > 1 {
                return responses.pop_front();
            }
            if let Some(last) = responses.front() {
                return Some(last.clone());
            }
        }
        self.queue.lock().pop_front()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        self.requests.lock().push(url.to_string());

        let response = self
            .next_response(url)
            .ok_or_else(|| ViewError::MockExhausted {
                url: url.to_string(),
            })?;

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }

        response.resolve(url)
    }
}
