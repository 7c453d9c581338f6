//! Capabilities injected into the session manager.

use log::debug;

/// Marks cached aggregates stale so whoever owns them refetches.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, key: &str);
}

/// Receives the server-assigned request id (for deep links, resumable views).
///
/// Called at most once per session.
pub trait RequestIdSink: Send + Sync {
    fn publish(&self, request_id: &str);
}

/// Invalidator for callers that keep no derived caches.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInvalidator;

impl CacheInvalidator for NoopInvalidator {
    fn invalidate(&self, key: &str) {
        debug!("No cache to invalidate for '{}'", key);
    }
}

/// Sink for callers that do not track request ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl RequestIdSink for NoopSink {
    fn publish(&self, _request_id: &str) {}
}

/// Adapts a closure into a [`CacheInvalidator`].
pub struct FnInvalidator<F>(pub F);

impl<F> CacheInvalidator for FnInvalidator<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn invalidate(&self, key: &str) {
        (self.0)(key)
    }
}

/// Adapts a closure into a [`RequestIdSink`].
pub struct FnSink<F>(pub F);

impl<F> RequestIdSink for FnSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn publish(&self, request_id: &str) {
        (self.0)(request_id)
    }
}
