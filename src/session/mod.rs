//! Live request sessions.
//!
//! This module drives one streaming lookup at a time:
//! - `sse`: incremental `text/event-stream` framing
//! - `event`: the three typed stream events
//! - `reducer`: folding events into the per-source result map
//! - `machine`: session lifecycle (Idle, Connecting, Streaming, Completed, Failed, Closed)
//! - `transport`: the network seam and its HTTP implementation
//! - `manager`: opening, reusing, superseding, and closing sessions
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use indicator_console::session::{HttpTransport, LookupRequest, SessionManager};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(reqwest::Client::new());
//! let transport = HttpTransport::new(client, "http://localhost:3000/api", None)?;
//! let mut manager = SessionManager::new(transport);
//!
//! let handle = manager.open(LookupRequest::detect("8.8.8.8", vec![]));
//! let session = handle.settled().await?;
//! println!("{} sources reported", session.state().results().len());
//! # Ok(())
//! # }
//! ```

mod capabilities;
mod event;
mod machine;
mod manager;
mod reducer;
mod request;
mod sse;
mod transport;

// Re-export public API
pub use capabilities::{
    CacheInvalidator, FnInvalidator, FnSink, NoopInvalidator, NoopSink, RequestIdSink,
};
pub use event::{DataPayload, StartEntry, StreamEvent};
pub use machine::{Effect, Session, SessionId, SessionMessage, SessionPhase};
pub use manager::{SessionHandle, SessionManager};
pub use reducer::{reduce, SessionState};
pub use request::{LookupRequest, RequestKey};
pub use sse::{SseFrame, SseParser};
pub(crate) use transport::endpoint_url;
pub use transport::{decode_event_stream, EventStream, EventTransport, HttpTransport};
