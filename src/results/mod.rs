//! Result classification.
//!
//! Turns the per-source result map of a live session or a replayed history into
//! the partitions a view renders: sources with usable data, sources with errors,
//! and sources without executable code, plus error-kind buckets for summaries.

mod classification;

// Re-export public API
pub use classification::{classify, Classification, EmptyState, RankedSource};

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
