//! Error types for the API layer
//!
//! Parsing and analysis never fail; only moving values across the host
//! boundary can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// JSON input could not be read into the expected shape
    #[error("Invalid {context} JSON: {source}")]
    InvalidJson {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A result could not be written as JSON
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    pub fn invalid_json(context: &'static str, source: serde_json::Error) -> Self {
        ApiError::InvalidJson { context, source }
    }
}
