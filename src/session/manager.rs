//! Session manager: at most one live session per logical request view.
//!
//! Each opened session gets its own [`SessionId`], cancellation token, and
//! `watch` channel. A background pump task reads the transport and feeds the
//! session's state machine. Before every update the pump re-checks that its
//! session is still the manager's active one and has not been cancelled, and
//! it does so under the channel's write lock, so a superseded session can
//! never publish another update.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use log::{debug, info, warn};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::capabilities::{CacheInvalidator, NoopInvalidator, NoopSink, RequestIdSink};
use super::machine::{Effect, Session, SessionId, SessionMessage, SessionPhase};
use super::request::{LookupRequest, RequestKey};
use super::transport::EventTransport;
use crate::config::REQUESTS_COUNT_CACHE_KEY;
use crate::error_handling::StreamError;

/// Consumer's view of one session.
///
/// Cloning yields another view of the same session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    tx: Arc<watch::Sender<Session>>,
    rx: watch::Receiver<Session>,
    cancel: CancellationToken,
}

impl SessionHandle {
    fn new(session: Session) -> Self {
        let id = session.id();
        let (tx, rx) = watch::channel(session);
        Self {
            id,
            tx: Arc::new(tx),
            rx,
            cancel: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Current state of the session.
    pub fn snapshot(&self) -> Session {
        self.rx.borrow().clone()
    }

    /// Receiver notified on every update.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.rx.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.rx.borrow().phase()
    }

    pub fn is_fetching(&self) -> bool {
        self.phase().is_fetching()
    }

    pub fn request_id(&self) -> Option<String> {
        self.rx.borrow().request_id().map(str::to_string)
    }

    /// Waits until the session completes, fails, or is closed.
    ///
    /// An idle session is settled immediately. A connection-level failure or
    /// closing the session is returned as an error.
    pub async fn settled(&self) -> Result<Session, StreamError> {
        let mut rx = self.rx.clone();
        let session = match rx
            .wait_for(|s| s.phase().is_terminal() || s.phase() == SessionPhase::Idle)
            .await
        {
            Ok(session) => session.clone(),
            Err(_) => return Err(StreamError::Closed),
        };

        match session.phase() {
            SessionPhase::Failed => Err(session
                .failure()
                .cloned()
                .unwrap_or_else(|| StreamError::Transport("unknown failure".to_string()))),
            SessionPhase::Closed => Err(StreamError::Closed),
            _ => Ok(session),
        }
    }

    /// Closes the session. The connection is released and no further update
    /// becomes observable.
    pub fn close(&self) {
        self.cancel.cancel();
        self.tx.send_if_modified(|session| {
            let before = session.phase();
            session.handle(SessionMessage::Close);
            before != session.phase()
        });
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

struct ActiveSession {
    key: Option<RequestKey>,
    handle: SessionHandle,
}

/// Opens, reuses, and supersedes sessions.
///
/// Must be used from within a Tokio runtime.
pub struct SessionManager<T: EventTransport> {
    transport: Arc<T>,
    invalidator: Arc<dyn CacheInvalidator>,
    request_id_sink: Arc<dyn RequestIdSink>,
    next_id: u64,
    active_id: Arc<AtomicU64>,
    current: Option<ActiveSession>,
}

impl<T: EventTransport> SessionManager<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            invalidator: Arc::new(NoopInvalidator),
            request_id_sink: Arc::new(NoopSink),
            next_id: 1,
            active_id: Arc::new(AtomicU64::new(0)),
            current: None,
        }
    }

    pub fn with_invalidator(mut self, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        self.invalidator = invalidator;
        self
    }

    pub fn with_request_id_sink(mut self, sink: Arc<dyn RequestIdSink>) -> Self {
        self.request_id_sink = sink;
        self
    }

    /// Handle of the active session, if any.
    pub fn active(&self) -> Option<SessionHandle> {
        self.current.as_ref().map(|c| c.handle.clone())
    }

    /// Opens a session for `request`.
    ///
    /// `None` yields an idle session without touching the network. Repeating the
    /// active session's request returns its handle unless that session failed or
    /// was closed. Any other request closes the active session first.
    pub fn open(&mut self, request: Option<LookupRequest>) -> SessionHandle {
        let key = request.as_ref().map(LookupRequest::key);

        if let Some(current) = &self.current {
            if current.key == key && current.handle.phase().is_reusable() {
                debug!("Reusing {} for identical request", current.handle.id());
                return current.handle.clone();
            }
        }

        self.close();

        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.active_id.store(id.0, Ordering::SeqCst);

        let handle = match request {
            None => {
                debug!("{} opened idle", id);
                SessionHandle::new(Session::idle(id))
            }
            Some(request) => {
                info!("{} opened for {} ({})", id, request.data, request.kind);
                let handle = SessionHandle::new(Session::connecting(id));
                let pump = Pump {
                    id,
                    tx: Arc::clone(&handle.tx),
                    cancel: handle.cancel.clone(),
                    active_id: Arc::clone(&self.active_id),
                    invalidator: Arc::clone(&self.invalidator),
                    request_id_sink: Arc::clone(&self.request_id_sink),
                };
                tokio::spawn(pump.run(Arc::clone(&self.transport), request));
                handle
            }
        };

        self.current = Some(ActiveSession {
            key,
            handle: handle.clone(),
        });
        handle
    }

    /// Closes the active session, if any.
    pub fn close(&mut self) {
        if let Some(previous) = self.current.take() {
            if !previous.handle.is_cancelled() {
                debug!("Closing {}", previous.handle.id());
            }
            previous.handle.close();
        }
    }
}

impl<T: EventTransport> Drop for SessionManager<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Background task feeding one session.
struct Pump {
    id: SessionId,
    tx: Arc<watch::Sender<Session>>,
    cancel: CancellationToken,
    active_id: Arc<AtomicU64>,
    invalidator: Arc<dyn CacheInvalidator>,
    request_id_sink: Arc<dyn RequestIdSink>,
}

impl Pump {
    async fn run<T: EventTransport>(self, transport: Arc<T>, request: LookupRequest) {
        let connected = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                debug!("{} cancelled while connecting", self.id);
                return;
            }
            result = transport.connect(&request) => result,
        };

        let mut events = match connected {
            Ok(events) => events,
            Err(e) => {
                warn!("{} failed to connect: {}", self.id, e);
                self.dispatch(SessionMessage::Failed(e));
                return;
            }
        };
        self.dispatch(SessionMessage::Connected);

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("{} cancelled; releasing connection", self.id);
                    return;
                }
                next = events.next() => next,
            };

            match next {
                Some(Ok(event)) => {
                    debug!("{} received {}", self.id, event.name());
                    self.dispatch(SessionMessage::Event(event));
                }
                Some(Err(e)) => {
                    warn!("{} stream failed: {}", self.id, e);
                    self.dispatch(SessionMessage::Failed(e));
                    return;
                }
                None => {
                    info!("{} completed", self.id);
                    self.dispatch(SessionMessage::Ended);
                    return;
                }
            }
        }
    }

    fn is_current(&self) -> bool {
        !self.cancel.is_cancelled() && self.active_id.load(Ordering::SeqCst) == self.id.0
    }

    /// Applies a message unless this session has been superseded or closed.
    fn dispatch(&self, message: SessionMessage) {
        let mut effects = Vec::new();
        self.tx.send_if_modified(|session| {
            if !self.is_current() {
                debug!("{} is no longer current; dropping {:?}", self.id, message);
                return false;
            }
            effects = session.handle(message);
            true
        });

        for effect in effects {
            match effect {
                Effect::InvalidateCache => self.invalidator.invalidate(REQUESTS_COUNT_CACHE_KEY),
                Effect::PublishRequestId(request_id) => {
                    self.request_id_sink.publish(&request_id)
                }
            }
        }
    }
}
