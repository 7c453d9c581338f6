//! Error handling.
//!
//! This module provides the library's error types:
//! - Initialization failures (logger, HTTP client, configuration)
//! - Connection-level stream failures that end a live session
//! - History query failures
//! - Event decode failures (logged and skipped, never fatal)

mod types;

// Re-export public API
pub use types::{EventDecodeError, HistoryError, InitializationError, StreamError};
