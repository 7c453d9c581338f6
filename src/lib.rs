//! indicator_console library: live multi-source indicator lookups
//!
//! This library drives the request view of an indicator aggregator. It submits an
//! indicator (domain, IP, URL, email, hash) to the aggregator's execute endpoint,
//! follows the server-sent event stream as every source resolves, merges the
//! per-source outcomes into one result map, and classifies that map into the
//! partitions a view renders. Completed requests can be replayed from history into
//! the same shape.
//!
//! # Example
//!
//! ```no_run
//! use indicator_console::{classify_indicator, run_lookup, Config, LookupRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let kind = classify_indicator("8.8.8.8").ok_or("unrecognized indicator")?;
//! let request = LookupRequest::new("8.8.8.8", kind, vec![]);
//!
//! let report = run_lookup(Config::default(), request).await?;
//! let classification = report.classification();
//! println!(
//!     "{} sources with results, {} with errors",
//!     classification.without_errors.len(),
//!     classification.with_errors.len()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod app;
pub mod config;
pub mod error_handling;
pub mod history;
pub mod indicator;
pub mod initialization;
pub mod models;
pub mod results;
pub mod session;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, OutputFormat};
pub use error_handling::{HistoryError, InitializationError, StreamError};
pub use history::{from_history, HistoryClient, RequestHistory, SourceRequestHistoryRecord};
pub use indicator::{classify as classify_indicator, IndicatorKind};
pub use models::{ResultMap, SourceError, SourceErrorKind, SourceRef, SourceResultEntry};
pub use results::{classify as classify_results, Classification, EmptyState, RankedSource};
pub use run::{run_history, run_lookup, HistoryReport, LookupReport};
pub use session::{LookupRequest, SessionHandle, SessionManager, SessionPhase};

// Internal run module (contains the high-level lookup and replay flows)
mod run {
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{bail, Context, Result};
    use log::{info, warn};

    use crate::app::log_progress;
    use crate::config::Config;
    use crate::history::RequestHistory;
    use crate::initialization::{init_client, init_history_client, init_transport};
    use crate::models::ResultMap;
    use crate::results::{classify, Classification};
    use crate::session::{FnSink, LookupRequest, Session, SessionManager, SessionPhase};

    /// Outcome of a live lookup.
    #[derive(Debug, Clone)]
    pub struct LookupReport {
        /// The submitted request
        pub request: LookupRequest,
        /// Final session state (phase, request id, result map)
        pub session: Session,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    impl LookupReport {
        /// Server-assigned request id, if the stream delivered one.
        pub fn request_id(&self) -> Option<&str> {
            self.session.request_id()
        }

        pub fn results(&self) -> &ResultMap {
            self.session.state().results()
        }

        pub fn classification(&self) -> Classification<'_> {
            classify(self.results())
        }
    }

    /// Outcome of a history replay.
    #[derive(Debug, Clone)]
    pub struct HistoryReport {
        /// Request metadata and raw records
        pub history: RequestHistory,
        /// Result map rebuilt from the records
        pub results: ResultMap,
    }

    impl HistoryReport {
        pub fn classification(&self) -> Classification<'_> {
            classify(&self.results)
        }
    }

    /// Runs a live lookup and waits until every source has resolved.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The HTTP client or transport cannot be initialized
    /// - The stream fails at the connection level (per-source errors are results,
    ///   not failures)
    /// - The process is interrupted with Ctrl-C
    pub async fn run_lookup(config: Config, request: LookupRequest) -> Result<LookupReport> {
        let client = init_client(&config).context("Failed to initialize HTTP client")?;
        let transport =
            init_transport(&config, client).context("Failed to initialize event transport")?;

        let mut manager = SessionManager::new(transport).with_request_id_sink(Arc::new(FnSink(
            |request_id: &str| info!("Request id: {}", request_id),
        )));

        let start_time = Instant::now();
        let handle = manager.open(Some(request.clone()));
        let progress_task = tokio::spawn(log_progress(handle.subscribe()));

        let outcome = tokio::select! {
            outcome = handle.settled() => outcome,
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted; closing the event stream");
                manager.close();
                progress_task.abort();
                bail!("Lookup interrupted");
            }
        };
        manager.close();
        let _ = progress_task.await;

        let session = outcome.context("Lookup failed")?;
        if session.phase() != SessionPhase::Completed {
            bail!("Lookup ended in unexpected phase {:?}", session.phase());
        }

        let elapsed_seconds = start_time.elapsed().as_secs_f64();
        info!(
            "Lookup of {} completed: {} source(s) in {:.2}s",
            request.data,
            session.state().results().len(),
            elapsed_seconds
        );

        Ok(LookupReport {
            request,
            session,
            elapsed_seconds,
        })
    }

    /// Loads a completed request and rebuilds its result map.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be initialized or the history query
    /// fails (unknown id, expired credentials, network failure).
    pub async fn run_history(config: Config, request_id: &str) -> Result<HistoryReport> {
        let client = init_client(&config).context("Failed to initialize HTTP client")?;
        let history_client = init_history_client(&config, client)
            .context("Failed to initialize history client")?;

        let history = history_client
            .fetch(request_id)
            .await
            .with_context(|| format!("Failed to load request {}", request_id))?;
        let results = history.results();

        Ok(HistoryReport { history, results })
    }
}
