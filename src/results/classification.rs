//! Partitioning and ranking of a result map.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::models::{ResultMap, SourceErrorKind, SourceResultEntry};

/// One source placed in a partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedSource<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub entry: &'a SourceResultEntry,
}

impl<'a> RankedSource<'a> {
    pub fn name(&self) -> &'a str {
        self.entry.display_name(self.id)
    }

    pub fn cardinality(&self) -> usize {
        self.entry.cardinality()
    }

    /// True for an entry that reported errors and still delivered data.
    ///
    /// Such entries are listed with the errors; the data is kept on the entry.
    pub fn has_partial_data(&self) -> bool {
        self.entry.has_errors() && self.entry.cardinality() > 0
    }

    /// Distinct error kinds carried by the entry, in taxonomy order.
    pub fn error_kinds(&self) -> BTreeSet<SourceErrorKind> {
        self.entry.errors.iter().map(|e| e.kind()).collect()
    }
}

/// What to show when there is nothing to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// A request is in flight and no source has been announced yet.
    Waiting,
    /// No request has been submitted.
    NothingSubmitted,
}

/// Render-ready view of a result map.
///
/// The three partitions are disjoint and together hold every entry of the map.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification<'a> {
    /// Clean entries, most results first.
    pub without_errors: Vec<RankedSource<'a>>,
    /// Entries carrying at least one error tag, by name.
    pub with_errors: Vec<RankedSource<'a>>,
    /// Entries whose source has no executable code, by name.
    pub missing_source_code: Vec<RankedSource<'a>>,
    /// `with_errors` entries grouped by error kind. An entry appears once in
    /// each bucket of a kind it carries.
    pub tag_buckets: BTreeMap<SourceErrorKind, Vec<RankedSource<'a>>>,
}

impl<'a> Classification<'a> {
    /// Number of classified entries.
    pub fn len(&self) -> usize {
        self.without_errors.len() + self.with_errors.len() + self.missing_source_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty-state message to show, or `None` when there are entries.
    pub fn empty_state(&self, fetching: bool) -> Option<EmptyState> {
        if !self.is_empty() {
            None
        } else if fetching {
            Some(EmptyState::Waiting)
        } else {
            Some(EmptyState::NothingSubmitted)
        }
    }

    /// Bucket size for every error kind, in taxonomy order.
    pub fn tag_counts(&self) -> Vec<(SourceErrorKind, usize)> {
        SourceErrorKind::iter()
            .map(|kind| (kind, self.tag_buckets.get(&kind).map_or(0, Vec::len)))
            .collect()
    }

    /// Every classified source, partition by partition.
    pub fn iter(&self) -> impl Iterator<Item = &RankedSource<'a>> {
        self.without_errors
            .iter()
            .chain(&self.with_errors)
            .chain(&self.missing_source_code)
    }
}

/// Partitions `results` into clean, errored, and missing-code entries.
///
/// Precedence is missing source code, then errors, then clean. Clean entries are
/// ranked by descending result count, then by case-insensitive name; the other
/// partitions by name alone. The source id breaks remaining ties.
pub fn classify(results: &ResultMap) -> Classification<'_> {
    let mut out = Classification::default();

    for (id, entry) in results {
        let ranked = RankedSource { id, entry };
        if !entry.has_source_code {
            out.missing_source_code.push(ranked);
        } else if entry.has_errors() {
            out.with_errors.push(ranked);
        } else {
            out.without_errors.push(ranked);
        }
    }

    out.without_errors
        .sort_by_cached_key(|r| (Reverse(r.cardinality()), r.name().to_lowercase(), r.id));
    out.with_errors
        .sort_by_cached_key(|r| (r.name().to_lowercase(), r.id));
    out.missing_source_code
        .sort_by_cached_key(|r| (r.name().to_lowercase(), r.id));

    for ranked in &out.with_errors {
        for kind in ranked.error_kinds() {
            out.tag_buckets.entry(kind).or_default().push(*ranked);
        }
    }

    out
}
