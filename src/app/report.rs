//! Result summaries printed at the end of a lookup or history replay.

use std::fmt::Write as _;

use colored::*;
use serde::Serialize;

use crate::config::OutputFormat;
use crate::models::CacheAction;
use crate::results::{Classification, EmptyState, RankedSource};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary<'a> {
    title: &'a str,
    request_id: Option<&'a str>,
    #[serde(flatten)]
    classification: &'a Classification<'a>,
}

fn timing_suffix(source: &RankedSource<'_>) -> String {
    let mut suffix = String::new();
    if let Some(cache) = &source.entry.cache {
        suffix.push_str(match cache.action {
            CacheAction::FromCache => " (cached)",
            CacheAction::SavedToCache => " (saved to cache)",
        });
    }
    if let Some(timing) = source.entry.timing {
        let secs = timing.duration().num_milliseconds() as f64 / 1000.0;
        let _ = write!(suffix, " {:.2}s", secs);
    }
    suffix
}

fn result_count(count: usize) -> String {
    match count {
        1 => "1 result".to_string(),
        n => format!("{} results", n),
    }
}

/// Human-readable summary of a classification.
pub fn render_plain(
    title: &str,
    request_id: Option<&str>,
    classification: &Classification<'_>,
    fetching: bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title.bold());
    if let Some(id) = request_id {
        let _ = writeln!(out, "Request: {}", id);
    }

    match classification.empty_state(fetching) {
        Some(EmptyState::Waiting) => {
            let _ = writeln!(out, "Waiting for sources...");
            return out;
        }
        Some(EmptyState::NothingSubmitted) => {
            let _ = writeln!(out, "No request submitted.");
            return out;
        }
        None => {}
    }

    let _ = writeln!(
        out,
        "{} with results, {} with errors, {} missing source code",
        classification.without_errors.len(),
        classification.with_errors.len(),
        classification.missing_source_code.len()
    );

    if !classification.without_errors.is_empty() {
        let _ = writeln!(out, "\n{}", "Results".green().bold());
        for source in &classification.without_errors {
            let _ = writeln!(
                out,
                "  {} {}: {}{}",
                "✔".green(),
                source.name(),
                result_count(source.cardinality()),
                timing_suffix(source)
            );
        }
    }

    if !classification.with_errors.is_empty() {
        let _ = writeln!(out, "\n{}", "Errors".red().bold());
        for source in &classification.with_errors {
            let kinds: Vec<&str> = source.error_kinds().iter().map(|k| k.as_str()).collect();
            let partial = if source.has_partial_data() {
                format!(" [partial data: {}]", result_count(source.cardinality()))
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "  {} {}: {}{}{}",
                "✖".red(),
                source.name(),
                kinds.join(", "),
                partial,
                timing_suffix(source)
            );
        }
    }

    if !classification.missing_source_code.is_empty() {
        let _ = writeln!(out, "\n{}", "Missing source code".dimmed());
        for source in &classification.missing_source_code {
            let _ = writeln!(out, "  {}", source.name().dimmed());
        }
    }

    let buckets: Vec<String> = classification
        .tag_counts()
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(kind, count)| format!("{}: {}", kind, count))
        .collect();
    if !buckets.is_empty() {
        let _ = writeln!(out, "\nErrors by kind: {}", buckets.join(", "));
    }

    out
}

/// JSON summary of a classification.
pub fn render_json(
    title: &str,
    request_id: Option<&str>,
    classification: &Classification<'_>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonSummary {
        title,
        request_id,
        classification,
    })
}

/// Prints the summary in the requested format to stdout.
pub fn print_report(
    format: OutputFormat,
    title: &str,
    request_id: Option<&str>,
    classification: &Classification<'_>,
) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Plain => print!("{}", render_plain(title, request_id, classification, false)),
        OutputFormat::Json => println!("{}", render_json(title, request_id, classification)?),
    }
    Ok(())
}
