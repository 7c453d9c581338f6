//! Typed stream events.
//!
//! The execute endpoint emits three named events. Each is decoded into one
//! variant of [`StreamEvent`]; anything else is rejected at decode time so the
//! reducer can match exhaustively.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::sse::SseFrame;
use crate::config::{EVENT_FETCHING_DATA, EVENT_FETCHING_ERROR, EVENT_FETCHING_START};
use crate::error_handling::EventDecodeError;
use crate::models::{decode_source_errors, CacheInfo, SourceDescriptor, SourceError, Timing};

/// One entry of the `fetching_start` roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartEntry {
    pub source: SourceDescriptor,
    pub has_source_code: bool,
}

/// Payload of `fetching_data`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPayload {
    #[serde(default)]
    pub cache: Option<CacheInfo>,
    #[serde(default)]
    pub timing: Option<Timing>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Source roster; the event id is the request id.
    Start {
        request_id: Option<String>,
        sources: Vec<StartEntry>,
    },
    /// Full current error set of one source.
    Error {
        source_id: String,
        errors: Vec<SourceError>,
    },
    /// Terminal result of one source.
    Data {
        source_id: String,
        payload: DataPayload,
    },
}

impl StreamEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            StreamEvent::Start { .. } => EVENT_FETCHING_START,
            StreamEvent::Error { .. } => EVENT_FETCHING_ERROR,
            StreamEvent::Data { .. } => EVENT_FETCHING_DATA,
        }
    }

    pub fn decode(frame: &SseFrame) -> Result<Self, EventDecodeError> {
        match frame.event.as_str() {
            EVENT_FETCHING_START => Ok(StreamEvent::Start {
                request_id: frame.id.clone(),
                sources: parse_payload(EVENT_FETCHING_START, &frame.data)?,
            }),
            EVENT_FETCHING_ERROR => Ok(StreamEvent::Error {
                source_id: required_id(EVENT_FETCHING_ERROR, frame)?,
                errors: decode_source_errors(&parse_payload::<Vec<Value>>(
                    EVENT_FETCHING_ERROR,
                    &frame.data,
                )?),
            }),
            EVENT_FETCHING_DATA => Ok(StreamEvent::Data {
                source_id: required_id(EVENT_FETCHING_DATA, frame)?,
                payload: parse_payload(EVENT_FETCHING_DATA, &frame.data)?,
            }),
            other => Err(EventDecodeError::UnknownEvent(other.to_string())),
        }
    }
}

fn required_id(event: &'static str, frame: &SseFrame) -> Result<String, EventDecodeError> {
    frame.id.clone().ok_or(EventDecodeError::MissingId(event))
}

fn parse_payload<T: serde::de::DeserializeOwned>(
    event: &'static str,
    data: &str,
) -> Result<T, EventDecodeError> {
    serde_json::from_str(data).map_err(|source| EventDecodeError::Payload { event, source })
}
