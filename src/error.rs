//! Error types with fix suggestions
//!
//! Components never surface these across their public boundary: load
//! failures are folded into the table's error view using the `Display`
//! text. Fetchers and the balance checker return them directly.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ViewError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum ViewError {
    // ─────────────────────────────────────────────────────────────
    // Fetch errors
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid URL '{url}': {details}")]
    InvalidUrl { url: String, details: String },

    #[error("Network error for '{url}': {details}")]
    Network { url: String, details: String },

    #[error("HTTP error! status: {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Invalid JSON payload: {details}")]
    InvalidJson { details: String },

    #[error("Unexpected payload: expected {expected}, got {actual}")]
    UnexpectedShape { expected: String, actual: String },

    #[error("No mock response configured for '{url}'")]
    MockExhausted { url: String },

    #[error("No async runtime available to load '{url}'")]
    NoRuntime { url: String },

    #[error("Unknown fetcher: '{name}'. Available: http, mock")]
    UnknownFetcher { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ViewError {
    /// Build the JSON error for a serde_json failure
    pub fn json(err: &serde_json::Error) -> Self {
        ViewError::InvalidJson {
            details: err.to_string(),
        }
    }
}

impl FixSuggestion for ViewError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ViewError::InvalidUrl { .. } => Some("Use an absolute http:// or https:// URL"),
            ViewError::Network { .. } => Some("Check the data source is reachable"),
            ViewError::HttpStatus { .. } => Some("Check the URL path and server logs"),
            ViewError::InvalidJson { .. } => Some("Ensure the response body is valid JSON"),
            ViewError::UnexpectedShape { .. } => {
                Some("The data source must return a JSON array of objects")
            }
            ViewError::MockExhausted { .. } => Some("Queue a response or add a route to the mock"),
            ViewError::NoRuntime { .. } => {
                Some("Set the data source from within a tokio runtime, or call `load` directly")
            }
            ViewError::UnknownFetcher { .. } => Some("Use 'http' or 'mock'"),
            ViewError::Io(_) => Some("Check file path and permissions"),
        }
    }
}

/// Name the JSON kind of a value, for shape errors
pub fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
