//! Main application modules.
//!
//! This module provides progress logging and result summaries used by the
//! command-line front end.

pub mod logging;
pub mod report;

// Re-export public API
pub use logging::{log_progress, progress};
pub use report::{print_report, render_json, render_plain};
