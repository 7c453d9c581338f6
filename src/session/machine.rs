//! Session lifecycle state machine.
//!
//! ```text
//! Idle
//! Connecting --Connected--> Connecting --Event--> Streaming --Event--> Streaming
//!     |                                              |
//!     +--Ended / Failed / Close--+------------------+
//!                                v
//!                  Completed | Failed | Closed   (terminal)
//! ```
//!
//! `Session::handle` is the single mutation entry point. It returns the side
//! effects the owner must run; it performs none itself, so the machine can be
//! driven with synthetic messages.

use std::fmt;

use log::debug;
use serde::Serialize;

use super::event::StreamEvent;
use super::reducer::SessionState;
use crate::error_handling::StreamError;

/// Identity of one opened session, unique per manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No request submitted.
    Idle,
    /// Request sent, nothing received yet.
    Connecting,
    /// At least one event received.
    Streaming,
    /// The server closed the stream after every source resolved.
    Completed,
    /// Connection-level failure.
    Failed,
    /// Superseded by another request or closed by the consumer.
    Closed,
}

impl SessionPhase {
    pub fn is_fetching(self) -> bool {
        matches!(self, SessionPhase::Connecting | SessionPhase::Streaming)
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionPhase::Completed | SessionPhase::Failed | SessionPhase::Closed
        )
    }

    /// Whether a session in this phase still satisfies a repeat of its request.
    pub fn is_reusable(self) -> bool {
        !matches!(self, SessionPhase::Failed | SessionPhase::Closed)
    }
}

/// Input to the state machine.
#[derive(Debug)]
pub enum SessionMessage {
    /// The transport connection is established.
    Connected,
    Event(StreamEvent),
    /// The server closed the stream normally.
    Ended,
    Failed(StreamError),
    Close,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Mark derived aggregate counters stale.
    InvalidateCache,
    /// Hand the server-assigned request id to the outside world.
    PublishRequestId(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: SessionId,
    phase: SessionPhase,
    state: SessionState,
    #[serde(skip)]
    failure: Option<StreamError>,
    #[serde(skip)]
    cache_invalidated: bool,
    #[serde(skip)]
    request_id_published: bool,
}

impl Session {
    fn new(id: SessionId, phase: SessionPhase) -> Self {
        Self {
            id,
            phase,
            state: SessionState::default(),
            failure: None,
            cache_invalidated: false,
            request_id_published: false,
        }
    }

    /// A session for "nothing submitted yet".
    pub fn idle(id: SessionId) -> Self {
        Self::new(id, SessionPhase::Idle)
    }

    /// A session whose request has just been issued.
    pub fn connecting(id: SessionId) -> Self {
        Self::new(id, SessionPhase::Connecting)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn request_id(&self) -> Option<&str> {
        self.state.request_id.as_deref()
    }

    pub fn failure(&self) -> Option<&StreamError> {
        self.failure.as_ref()
    }

    pub fn is_fetching(&self) -> bool {
        self.phase.is_fetching()
    }

    /// Applies one message and returns the effects to run.
    ///
    /// Messages reaching a terminal session are ignored.
    pub fn handle(&mut self, message: SessionMessage) -> Vec<Effect> {
        if self.phase.is_terminal() {
            debug!("{} is {:?}; ignoring {:?}", self.id, self.phase, message);
            return Vec::new();
        }

        let mut effects = Vec::new();
        match message {
            SessionMessage::Close => self.transition(SessionPhase::Closed),
            _ if self.phase == SessionPhase::Idle => {
                debug!("{} is idle; ignoring {:?}", self.id, message);
            }
            SessionMessage::Connected => {
                if !self.cache_invalidated {
                    self.cache_invalidated = true;
                    effects.push(Effect::InvalidateCache);
                }
            }
            SessionMessage::Event(event) => {
                self.transition(SessionPhase::Streaming);
                self.state.apply(&event);
                if !self.request_id_published {
                    if let Some(request_id) = &self.state.request_id {
                        self.request_id_published = true;
                        effects.push(Effect::PublishRequestId(request_id.clone()));
                    }
                }
            }
            SessionMessage::Ended => self.transition(SessionPhase::Completed),
            SessionMessage::Failed(error) => {
                self.failure = Some(error);
                self.transition(SessionPhase::Failed);
            }
        }
        effects
    }

    fn transition(&mut self, next: SessionPhase) {
        if self.phase != next {
            debug!("{}: {:?} -> {:?}", self.id, self.phase, next);
            self.phase = next;
        }
    }
}
