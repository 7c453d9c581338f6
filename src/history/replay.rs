//! Persisted request history and its conversion to a result map.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::indicator::IndicatorKind;
use crate::models::{
    deserialize_source_errors, CacheAction, CacheInfo, ResultMap, SourceDescriptor, SourceError,
    SourceResultEntry, Timing,
};

/// A completed request as returned by the history query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHistory {
    pub id: String,
    pub data: String,
    pub kind: IndicatorKind,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub trace_id: Option<String>,
    #[serde(default)]
    pub sources: Vec<SourceRequestHistoryRecord>,
}

impl RequestHistory {
    /// Per-source results, shaped like a completed live session.
    pub fn results(&self) -> ResultMap {
        from_history(&self.sources)
    }
}

/// Terminal outcome of one source within a persisted request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRequestHistoryRecord {
    pub id: String,
    /// Absent when the source has been deleted since.
    #[serde(default)]
    pub source_id: Option<String>,
    pub source_name: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_favicon: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_source_errors")]
    pub errors: Vec<SourceError>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub cache_action: Option<CacheAction>,
    #[serde(default)]
    pub cache_expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cache_cached_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cache_key: Option<String>,
}

impl SourceRequestHistoryRecord {
    /// Map key of the record: its source id, or the record id for a deleted source.
    pub fn key(&self) -> &str {
        self.source_id.as_deref().unwrap_or(&self.id)
    }

    fn cache(&self) -> Option<CacheInfo> {
        match (self.cache_action, self.cache_cached_at, &self.cache_key) {
            (Some(action), Some(cached_at), Some(cache_key)) => Some(CacheInfo {
                action,
                cached_at,
                expires_at: self.cache_expires_at,
                cache_key: cache_key.clone(),
            }),
            _ => None,
        }
    }

    /// The entry a live session would hold for this source once it completed.
    pub fn to_entry(&self) -> SourceResultEntry {
        SourceResultEntry {
            source: Some(SourceDescriptor {
                id: self.key().to_string(),
                slug: None,
                name: self.source_name.clone(),
                url: self.source_url.clone(),
                favicon: self.source_favicon.clone(),
            }),
            has_source_code: true,
            errors: self.errors.clone(),
            timing: Some(Timing {
                started_at: self.started_at,
                ended_at: self.ended_at,
            }),
            cache: self.cache(),
            data: self.data.clone(),
        }
    }
}

/// Rebuilds the result map of a completed request from its history records.
///
/// Historical records always belong to sources with code, so every entry has
/// `has_source_code` set. When two records share a key the later one wins.
pub fn from_history(records: &[SourceRequestHistoryRecord]) -> ResultMap {
    let mut results = ResultMap::new();
    for record in records {
        if results
            .insert(record.key().to_string(), record.to_entry())
            .is_some()
        {
            warn!("Duplicate history record for source '{}'", record.key());
        }
    }
    results
}
