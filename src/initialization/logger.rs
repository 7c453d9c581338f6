//! Logger initialization.
//!
//! Records from this crate are labelled by component (`session::manager`,
//! `history::client`, ...) instead of the full module path, so a lookup's log
//! reads as a conversation between the session, the transport and the history
//! client. Records from dependencies keep their own target.
//!
//! Plain output is colored for terminals; JSON output writes one object per line
//! for log shippers.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::{Level, LevelFilter, Record};
use serde_json::json;

const CRATE_TARGET: &str = "indicator_console";

/// HTTP and TLS internals stay quiet unless they have something to warn about.
const DEPENDENCY_FILTERS: &[(&str, LevelFilter)] = &[
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
    ("rustls", LevelFilter::Warn),
];

/// Component label for a log target.
///
/// `indicator_console::session::transport` becomes `session::transport`, the
/// crate root (the binary and `run`) becomes `console`, and foreign targets are
/// returned unchanged.
pub fn component(target: &str) -> &str {
    if target == CRATE_TARGET {
        return "console";
    }
    target
        .strip_prefix(CRATE_TARGET)
        .and_then(|rest| rest.strip_prefix("::"))
        .unwrap_or(target)
}

fn is_own(target: &str) -> bool {
    target == CRATE_TARGET || target.starts_with("indicator_console::")
}

fn json_line(timestamp_ms: i64, record: &Record<'_>) -> String {
    let target = record.target();
    json!({
        "ts": timestamp_ms,
        "level": record.level().as_str(),
        "component": component(target),
        "external": !is_own(target),
        "msg": record.args().to_string(),
    })
    .to_string()
}

fn plain_line(record: &Record<'_>) -> String {
    let level = record.level();
    let (marker, label) = match level {
        Level::Error => ("✖", "ERROR".red().bold()),
        Level::Warn => ("!", "WARN ".yellow()),
        Level::Info => ("•", "INFO ".green()),
        Level::Debug => ("·", "DEBUG".blue()),
        Level::Trace => ("·", "TRACE".purple()),
    };
    let target = record.target();
    let component = if is_own(target) {
        component(target).cyan()
    } else {
        target.dimmed()
    };
    format!("{} {} {:<18} {}", marker, label, component, record.args())
}

/// Installs the global logger.
///
/// `RUST_LOG` is read first; `level` then overrides it for this crate and as the
/// default, so `--log-level` always wins. Per-module directives such as
/// `RUST_LOG=indicator_console::session=trace` still apply below the override.
///
/// ```bash
/// RUST_LOG=indicator_console::session=debug indicator_console lookup example.com
/// indicator_console --log-format json lookup 8.8.8.8
/// ```
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` when a logger is already installed.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, filter) in DEPENDENCY_FILTERS {
        builder.filter_module(module, *filter);
    }
    builder.filter_module(CRATE_TARGET, level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(chrono::Utc::now().timestamp_millis(), record)
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| writeln!(buf, "{}", plain_line(record)));
        }
    }

    // try_init: tests may install the logger more than once per process.
    builder.try_init().map_err(InitializationError::from)?;
    Ok(())
}
