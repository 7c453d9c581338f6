//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - Logger (plain or JSON)
//! - HTTP client (connect timeout, user agent)
//! - Event transport and history client bound to the configured API
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use std::sync::Arc;

use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::history::HistoryClient;
use crate::session::HttpTransport;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Builds the event-stream transport for the configured API.
pub fn init_transport(
    config: &Config,
    client: Arc<reqwest::Client>,
) -> Result<HttpTransport, InitializationError> {
    HttpTransport::new(client, &config.api_url, config.api_token.clone())
}

/// Builds the history query client for the configured API.
pub fn init_history_client(
    config: &Config,
    client: Arc<reqwest::Client>,
) -> Result<HistoryClient, InitializationError> {
    HistoryClient::new(client, &config.api_url, config.api_token.clone())
}
