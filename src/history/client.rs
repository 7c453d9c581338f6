//! History query client.

use std::sync::Arc;

use log::{debug, info};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use url::Url;

use super::replay::RequestHistory;
use crate::config::{HTTP_STATUS_UNAUTHORIZED, REQUESTS_PATH};
use crate::error_handling::{HistoryError, InitializationError};
use crate::session::endpoint_url;

/// Fetches persisted requests by id.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    client: Arc<reqwest::Client>,
    requests_url: Url,
    api_token: Option<String>,
}

impl HistoryClient {
    pub fn new(
        client: Arc<reqwest::Client>,
        api_url: &str,
        api_token: Option<String>,
    ) -> Result<Self, InitializationError> {
        Ok(Self {
            client,
            requests_url: endpoint_url(api_url, REQUESTS_PATH)?,
            api_token,
        })
    }

    /// URL of one request. The id is percent-encoded as a single path segment.
    pub fn request_url(&self, request_id: &str) -> Url {
        let mut url = self.requests_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(request_id);
        }
        url
    }

    pub async fn fetch(&self, request_id: &str) -> Result<RequestHistory, HistoryError> {
        let url = self.request_url(request_id);
        debug!("Fetching request history from {}", url);

        let mut builder = self.client.get(url);
        if let Some(token) = &self.api_token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.as_u16() == HTTP_STATUS_UNAUTHORIZED {
            return Err(HistoryError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(HistoryError::NotFound(request_id.to_string()));
        }
        if !status.is_success() {
            return Err(HistoryError::Status(status.as_u16()));
        }

        let history: RequestHistory = response.json().await?;
        info!(
            "Loaded request {} ({} source record(s))",
            history.id,
            history.sources.len()
        );
        Ok(history)
    }
}
