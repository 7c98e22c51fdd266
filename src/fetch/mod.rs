//! # Fetch Abstraction Layer
//!
//! The table view never talks to the network directly: it is handed a
//! [`Fetcher`] that turns a URL into a JSON payload.
//!
//! - [`Fetcher`] - Core async trait
//! - [`HttpFetcher`] - Production fetcher over `reqwest`
//! - [`MockFetcher`] - Test fetcher with routed/queued responses and delays
//!
//! ## Creating Fetchers
//!
//! ```rust
//! use viewbind::fetch::create_fetcher;
//!
//! assert!(create_fetcher("http").is_ok());
//! assert!(create_fetcher("mock").is_ok());
//! assert!(create_fetcher("ftp").is_err());
//! ```

mod http;
mod mock;

pub use http::HttpFetcher;
pub use mock::{MockFetcher, MockResponse};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Result, ViewError};

/// Core trait for data sources
///
/// Implementations report every failure (bad URL, transport, status, body)
/// as a [`ViewError`]; callers decide how to surface it.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the fetcher name (e.g., "http", "mock")
    fn name(&self) -> &str;

    /// GET `url` and parse the body as JSON
    async fn get_json(&self, url: &str) -> Result<Value>;
}

/// Create a fetcher instance by name
///
/// | Name | Description |
/// |------|-------------|
/// | `http` | Real HTTP GET via reqwest |
/// | `mock` | Empty mock (every request fails until configured) |
pub fn create_fetcher(name: &str) -> Result<Box<dyn Fetcher>> {
    match name.to_lowercase().as_str() {
        "http" => Ok(Box::new(HttpFetcher::new())),
        "mock" => Ok(Box::new(MockFetcher::new())),
        _ => Err(ViewError::UnknownFetcher {
            name: name.to_string(),
        }),
    }
}
