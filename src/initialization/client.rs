//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::Config;

/// Initializes the HTTP client shared by the event stream and history query.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration
/// - TCP connect timeout from the configuration
/// - No overall request timeout, since the event stream stays open until every
///   source has resolved
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_client_from_default_config() {
        assert!(init_client(&Config::default()).is_ok());
    }
}
