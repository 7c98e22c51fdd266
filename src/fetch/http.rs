//! HTTP fetcher using reqwest
//!
//! Issues one GET per call. No overall request timeout is set: a request
//! that never completes keeps its caller pending.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::Fetcher;
use crate::error::{Result, ViewError};

const USER_AGENT: &str = concat!("viewbind/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_REDIRECTS: usize = 5;

/// Fetcher backed by a shared reqwest client (connection pooling)
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }

    /// Use a preconfigured client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Accept only absolute http(s) URLs
fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| ViewError::InvalidUrl {
        url: url.to_string(),
        details: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ViewError::InvalidUrl {
            url: url.to_string(),
            details: format!("unsupported scheme '{}'", other),
        }),
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self))]
    async fn get_json(&self, url: &str) -> Result<Value> {
        let parsed = parse_url(url)?;

        debug!(fetcher = "http", "Sending GET request");
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| ViewError::Network {
                url: url.to_string(),
                details: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ViewError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| ViewError::Network {
            url: url.to_string(),
            details: e.to_string(),
        })?;
        debug!(fetcher = "http", status = %status, body_len = body.len(), "Response received");

        serde_json::from_str(&body).map_err(|e| ViewError::json(&e))
    }
}
