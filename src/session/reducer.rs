//! Folding stream events into the per-source result map.
//!
//! This is the only place the map is written. Every update is a merge into the
//! entry for the event's source id, creating the entry when the source has not
//! been seen yet; events for different sources commute.

use serde::Serialize;

use super::event::StreamEvent;
use crate::models::{ResultMap, SourceResultEntry};

static EMPTY_RESULTS: ResultMap = ResultMap::new();

/// Accumulated state of one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Assigned by the server with the start event.
    pub request_id: Option<String>,
    /// `None` until the first event of the session arrives.
    pub data: Option<ResultMap>,
}

impl SessionState {
    /// Results so far (empty before the first event).
    pub fn results(&self) -> &ResultMap {
        self.data.as_ref().unwrap_or(&EMPTY_RESULTS)
    }

    /// Merges one event into the state.
    pub fn apply(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::Start {
                request_id,
                sources,
            } => {
                if request_id.is_some() {
                    self.request_id = request_id.clone();
                }
                let map = self.data.get_or_insert_with(ResultMap::new);
                for start in sources {
                    let entry = map.entry(start.source.id.clone()).or_default();
                    entry.source = Some(start.source.clone());
                    entry.has_source_code = start.has_source_code;
                }
            }
            StreamEvent::Error { source_id, errors } => {
                // The server sends the full current error set, not a delta.
                self.entry_mut(source_id).errors = errors.clone();
            }
            StreamEvent::Data { source_id, payload } => {
                let entry = self.entry_mut(source_id);
                entry.cache = payload.cache.clone();
                entry.timing = payload.timing;
                entry.data = payload.data.clone();
            }
        }
    }

    fn entry_mut(&mut self, source_id: &str) -> &mut SourceResultEntry {
        self.data
            .get_or_insert_with(ResultMap::new)
            .entry(source_id.to_string())
            .or_default()
    }
}

/// Pure form of [`SessionState::apply`].
pub fn reduce(mut state: SessionState, event: &StreamEvent) -> SessionState {
    state.apply(event);
    state
}
