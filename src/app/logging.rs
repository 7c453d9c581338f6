//! Progress logging for a live session.

use log::info;
use tokio::sync::watch;

use crate::models::ResultMap;
use crate::session::Session;

/// Resolved and announced source counts of a result map.
pub fn progress(results: &ResultMap) -> (usize, usize) {
    let resolved = results.values().filter(|e| e.is_resolved()).count();
    (resolved, results.len())
}

/// Logs each change in the number of resolved sources until the session settles.
pub async fn log_progress(mut rx: watch::Receiver<Session>) {
    let mut last = None;
    while rx.changed().await.is_ok() {
        let (current, terminal) = {
            let session = rx.borrow_and_update();
            (
                progress(session.state().results()),
                session.phase().is_terminal(),
            )
        };
        if last != Some(current) && current.1 > 0 {
            info!("{}/{} sources resolved", current.0, current.1);
            last = Some(current);
        }
        if terminal {
            break;
        }
    }
}
