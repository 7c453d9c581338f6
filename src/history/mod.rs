//! Request history replay.
//!
//! A completed request is stored server-side as one record per source. This
//! module fetches those records and rebuilds the same result map a live session
//! holds at completion, so result classification runs unchanged on either.

mod client;
mod replay;

// Re-export public API
pub use client::HistoryClient;
pub use replay::{from_history, RequestHistory, SourceRequestHistoryRecord};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
