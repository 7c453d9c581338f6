//! Event transports.
//!
//! [`EventTransport`] is the seam between the session manager and the network.
//! [`HttpTransport`] opens the execute endpoint over HTTP and turns the
//! `text/event-stream` body into typed events; tests substitute in-memory
//! streams.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use log::{debug, info, warn};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use url::Url;

use super::event::StreamEvent;
use super::request::LookupRequest;
use super::sse::{SseFrame, SseParser};
use crate::config::{
    EXECUTE_PATH, HTTP_STATUS_UNAUTHORIZED, PARAM_DATA, PARAM_KIND, PARAM_SOURCES,
};
use crate::error_handling::{EventDecodeError, InitializationError, StreamError};

/// Typed events of one connection. Ends when the server closes the stream; an
/// `Err` item is a connection-level failure and is always the last item.
pub type EventStream = BoxStream<'static, Result<StreamEvent, StreamError>>;

#[async_trait]
pub trait EventTransport: Send + Sync + 'static {
    /// Opens the stream for `request`. Resolves once the connection is
    /// established (response headers received).
    async fn connect(&self, request: &LookupRequest) -> Result<EventStream, StreamError>;
}

/// Joins a relative path onto the API base URL, tolerating a missing trailing slash.
pub(crate) fn endpoint_url(api_url: &str, path: &str) -> Result<Url, InitializationError> {
    let mut base = api_url.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base)
        .and_then(|b| b.join(path))
        .map_err(|e| InitializationError::InvalidApiUrl(api_url.to_string(), e))
}

/// Server-sent-event transport over the execute endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Arc<reqwest::Client>,
    execute_url: Url,
    api_token: Option<String>,
}

impl HttpTransport {
    pub fn new(
        client: Arc<reqwest::Client>,
        api_url: &str,
        api_token: Option<String>,
    ) -> Result<Self, InitializationError> {
        Ok(Self {
            client,
            execute_url: endpoint_url(api_url, EXECUTE_PATH)?,
            api_token,
        })
    }

    /// Full URL for `request`: `data`, `kind`, and one `sources` pair per id.
    pub fn request_url(&self, request: &LookupRequest) -> Url {
        let mut url = self.execute_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(PARAM_DATA, &request.data);
            pairs.append_pair(PARAM_KIND, request.kind.as_str());
            for source in &request.sources {
                pairs.append_pair(PARAM_SOURCES, &source.id);
            }
        }
        url
    }
}

#[async_trait]
impl EventTransport for HttpTransport {
    async fn connect(&self, request: &LookupRequest) -> Result<EventStream, StreamError> {
        let url = self.request_url(request);
        info!(
            "Opening event stream for {} ({}) against {} source(s)",
            request.data,
            request.kind,
            if request.sources.is_empty() {
                "all enabled".to_string()
            } else {
                request.sources.len().to_string()
            }
        );

        let mut builder = self
            .client
            .get(url)
            .header(ACCEPT, "text/event-stream");
        if let Some(token) = &self.api_token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.as_u16() == HTTP_STATUS_UNAUTHORIZED {
            return Err(StreamError::Unauthorized);
        }
        if !status.is_success() {
            return Err(StreamError::Status(status.as_u16()));
        }

        Ok(decode_event_stream(response.bytes_stream()))
    }
}

struct DecodeState<S> {
    bytes: Pin<Box<S>>,
    parser: SseParser,
    pending: VecDeque<SseFrame>,
    done: bool,
}

/// Turns a raw `text/event-stream` body into typed events.
///
/// Frames that fail to decode are logged and skipped. A body error is yielded
/// once as [`StreamError::Transport`] and ends the stream.
pub fn decode_event_stream<S, B, E>(bytes: S) -> EventStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        parser: SseParser::new(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if let Some(frame) = st.pending.pop_front() {
                match StreamEvent::decode(&frame) {
                    Ok(event) => return Some((Ok(event), st)),
                    Err(EventDecodeError::UnknownEvent(name)) => {
                        debug!("Skipping unknown stream event '{}'", name);
                    }
                    Err(e) => warn!("Skipping undecodable stream event: {}", e),
                }
                continue;
            }
            if st.done {
                return None;
            }
            match st.bytes.next().await {
                Some(Ok(chunk)) => {
                    let frames = st.parser.push(chunk.as_ref());
                    st.pending.extend(frames);
                }
                Some(Err(e)) => {
                    st.done = true;
                    return Some((Err(StreamError::Transport(e.to_string())), st));
                }
                None => return None,
            }
        }
    })
    .boxed()
}
