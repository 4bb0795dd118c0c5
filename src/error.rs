//! Error types for the crypto tracker SDK

use thiserror::Error;

/// Errors that can occur when fetching data from the market API
///
/// The engines never retry automatically; a failed fetch leaves engine
/// state unchanged apart from recording the error into published state.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Malformed URL or invalid input (empty id, empty query)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    DecodeFailure(String),

    /// Underlying transport failed
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Anything that does not fit the other categories
    #[error("Unknown error")]
    Unknown,
}

impl NetworkError {
    /// Creates an InvalidRequest error
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Creates a DecodeFailure error
    pub fn decode_failure(msg: impl Into<String>) -> Self {
        Self::DecodeFailure(msg.into())
    }
}
