//! Shared error types for the bridge crate.

use thiserror::Error;

/// Errors emitted while mounting a player.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BridgeError {
    #[error("no content URL was provided")]
    MissingContentUrl,
    #[error("the SCORM bridge must be mounted from inside a tokio runtime")]
    NoRuntime,
}

/// Errors emitted by `HttpProgressSink`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrackingError {
    #[error("tracking base URL is not a valid URL: {0}")]
    InvalidBaseUrl(String),
    #[error("tracking request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
