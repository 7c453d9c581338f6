//! Lookup requests and their identity.

use serde::Serialize;

use crate::indicator::{classify, IndicatorKind};
use crate::models::SourceRef;

/// What the user asked for.
#[derive(Debug, Clone, Serialize)]
pub struct LookupRequest {
    pub data: String,
    pub kind: IndicatorKind,
    /// Sources to query; empty means every enabled source for the kind.
    pub sources: Vec<SourceRef>,
}

/// Identity of a request: indicator text, kind, and the ordered source ids.
///
/// Source names are display-only and do not take part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    data: String,
    kind: IndicatorKind,
    source_ids: Vec<String>,
}

impl LookupRequest {
    pub fn new(data: impl Into<String>, kind: IndicatorKind, sources: Vec<SourceRef>) -> Self {
        Self {
            data: data.into(),
            kind,
            sources,
        }
    }

    /// Builds a request with an auto-detected kind, or `None` if the kind cannot
    /// be detected.
    pub fn detect(data: &str, sources: Vec<SourceRef>) -> Option<Self> {
        let kind = classify(data)?;
        Some(Self::new(data.trim(), kind, sources))
    }

    pub fn key(&self) -> RequestKey {
        RequestKey {
            data: self.data.clone(),
            kind: self.kind,
            source_ids: self.sources.iter().map(|s| s.id.clone()).collect(),
        }
    }
}

impl PartialEq for LookupRequest {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for LookupRequest {}
