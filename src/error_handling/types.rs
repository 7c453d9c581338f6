//! Error type definitions.
//!
//! This module defines the error types that cross the library boundary. Per-source
//! failures reported by the aggregator are *data* (see `models::SourceError`) and
//! never appear here.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// The configured API base URL could not be parsed.
    #[error("Invalid API URL '{0}': {1}")]
    InvalidApiUrl(String, url::ParseError),
}

/// Connection-level failure of a live session.
///
/// Any of these ends the session in the `Failed` phase. They are distinct from the
/// per-source error tags carried inside `fetching_error` events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The HTTP request could not be sent or the body stream broke.
    #[error("Event stream transport error: {0}")]
    Transport(String),

    /// The execute endpoint answered with a non-success status.
    #[error("Event stream rejected with HTTP {0}")]
    Status(u16),

    /// The API rejected our credentials; the caller's session has expired.
    #[error("Authentication expired (HTTP 401)")]
    Unauthorized,

    /// The session was superseded or closed before it settled.
    #[error("Session closed")]
    Closed,
}

impl From<ReqwestError> for StreamError {
    fn from(e: ReqwestError) -> Self {
        match e.status() {
            Some(status) if status.as_u16() == crate::config::HTTP_STATUS_UNAUTHORIZED => {
                StreamError::Unauthorized
            }
            Some(status) => StreamError::Status(status.as_u16()),
            None => StreamError::Transport(e.to_string()),
        }
    }
}

/// Error types for the history query.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// No request with the given id exists.
    #[error("Request '{0}' not found")]
    NotFound(String),

    /// The API rejected our credentials; the caller's session has expired.
    #[error("Authentication expired (HTTP 401)")]
    Unauthorized,

    /// Any other non-success status.
    #[error("History query failed with HTTP {0}")]
    Status(u16),

    /// Network or decoding failure.
    #[error("History query error: {0}")]
    Request(#[from] ReqwestError),
}

/// Failure to decode one named event from the stream.
///
/// Decode failures are logged and the frame is skipped; they never end a session.
#[derive(Error, Debug)]
pub enum EventDecodeError {
    /// The event name is not one of the known stream events.
    #[error("Unknown event type '{0}'")]
    UnknownEvent(String),

    /// A per-source event arrived without the id naming its source.
    #[error("Event '{0}' has no correlation id")]
    MissingId(&'static str),

    /// The payload did not match the event's schema.
    #[error("Malformed '{event}' payload: {source}")]
    Payload {
        /// Wire name of the event.
        event: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}
