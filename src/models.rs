//! Per-source result model shared by the live session, the history replay, and the
//! result classifier.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum_macros::EnumIter;

/// Results of one request, keyed by source id.
pub type ResultMap = BTreeMap<String, SourceResultEntry>;

/// Source selection for a lookup. Only `id` is used for correlation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    pub id: String,
    pub name: String,
}

impl SourceRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Descriptive identity of a source, as announced by the start event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub favicon: Option<String>,
}

/// When a source fetch started and ended on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl Timing {
    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }
}

/// What the server's result cache did for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheAction {
    /// The result was served from cache; the source was not contacted.
    FromCache,
    /// The source was contacted and its result was stored.
    SavedToCache,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub action: CacheAction,
    pub cached_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub cache_key: String,
}

/// Structured per-source error tag.
///
/// These are data, not failures of the session: a source may carry several of them
/// and still be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceError {
    UnsupportedIndicatorKind,
    IndicatorKindDisabled,
    SourceDisabled,
    #[serde(rename_all = "camelCase")]
    ProviderDisabled {
        provider_id: String,
    },
    #[serde(rename_all = "camelCase")]
    WithinIgnoreList {
        ignore_list_ids: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    MissingSecret {
        secret_ids: Vec<String>,
    },
    Timeout,
    NotFound,
    Unauthorized,
    RequestError,
    ResponseError,
    DatabaseError,
    InternalServerError,
    MissingSourceCode,
    RateLimited,
    /// A tag this client does not know, or an element that did not decode.
    #[serde(other)]
    Unknown,
}

/// Discriminant of [`SourceError`], used to bucket sources by error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceErrorKind {
    UnsupportedIndicatorKind,
    IndicatorKindDisabled,
    SourceDisabled,
    ProviderDisabled,
    WithinIgnoreList,
    MissingSecret,
    Timeout,
    NotFound,
    Unauthorized,
    RequestError,
    ResponseError,
    DatabaseError,
    InternalServerError,
    MissingSourceCode,
    RateLimited,
    Unknown,
}

impl SourceError {
    pub fn kind(&self) -> SourceErrorKind {
        match self {
            SourceError::UnsupportedIndicatorKind => SourceErrorKind::UnsupportedIndicatorKind,
            SourceError::IndicatorKindDisabled => SourceErrorKind::IndicatorKindDisabled,
            SourceError::SourceDisabled => SourceErrorKind::SourceDisabled,
            SourceError::ProviderDisabled { .. } => SourceErrorKind::ProviderDisabled,
            SourceError::WithinIgnoreList { .. } => SourceErrorKind::WithinIgnoreList,
            SourceError::MissingSecret { .. } => SourceErrorKind::MissingSecret,
            SourceError::Timeout => SourceErrorKind::Timeout,
            SourceError::NotFound => SourceErrorKind::NotFound,
            SourceError::Unauthorized => SourceErrorKind::Unauthorized,
            SourceError::RequestError => SourceErrorKind::RequestError,
            SourceError::ResponseError => SourceErrorKind::ResponseError,
            SourceError::DatabaseError => SourceErrorKind::DatabaseError,
            SourceError::InternalServerError => SourceErrorKind::InternalServerError,
            SourceError::MissingSourceCode => SourceErrorKind::MissingSourceCode,
            SourceError::RateLimited => SourceErrorKind::RateLimited,
            SourceError::Unknown => SourceErrorKind::Unknown,
        }
    }
}

impl std::fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SourceErrorKind {
    /// Returns a human-readable label for summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceErrorKind::UnsupportedIndicatorKind => "Unsupported indicator kind",
            SourceErrorKind::IndicatorKindDisabled => "Indicator kind disabled",
            SourceErrorKind::SourceDisabled => "Source disabled",
            SourceErrorKind::ProviderDisabled => "Provider disabled",
            SourceErrorKind::WithinIgnoreList => "Within ignore list",
            SourceErrorKind::MissingSecret => "Missing secret",
            SourceErrorKind::Timeout => "Timeout",
            SourceErrorKind::NotFound => "Not found",
            SourceErrorKind::Unauthorized => "Unauthorized",
            SourceErrorKind::RequestError => "Request error",
            SourceErrorKind::ResponseError => "Response error",
            SourceErrorKind::DatabaseError => "Database error",
            SourceErrorKind::InternalServerError => "Internal server error",
            SourceErrorKind::MissingSourceCode => "Missing source code",
            SourceErrorKind::RateLimited => "Rate limited",
            SourceErrorKind::Unknown => "Unknown error",
        }
    }
}

/// Decodes an error list one element at a time.
///
/// A malformed element still marks the source as errored, as [`SourceError::Unknown`].
pub fn decode_source_errors(values: &[Value]) -> Vec<SourceError> {
    values
        .iter()
        .map(|value| {
            SourceError::deserialize(value).unwrap_or_else(|e| {
                warn!("Unrecognized source error {}: {}", value, e);
                SourceError::Unknown
            })
        })
        .collect()
}

/// `deserialize_with` adapter for error lists, see [`decode_source_errors`].
pub(crate) fn deserialize_source_errors<'de, D>(deserializer: D) -> Result<Vec<SourceError>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(decode_source_errors(&values))
}

/// Everything known about one source within one request.
///
/// Entries are only ever merged into: a later event fills in its own fields and
/// leaves the others alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceResultEntry {
    #[serde(default)]
    pub source: Option<SourceDescriptor>,
    /// True until a start event says otherwise.
    pub has_source_code: bool,
    #[serde(default, deserialize_with = "deserialize_source_errors")]
    pub errors: Vec<SourceError>,
    #[serde(default)]
    pub timing: Option<Timing>,
    #[serde(default)]
    pub cache: Option<CacheInfo>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Default for SourceResultEntry {
    fn default() -> Self {
        Self {
            source: None,
            has_source_code: true,
            errors: Vec::new(),
            timing: None,
            cache: None,
            data: None,
        }
    }
}

impl SourceResultEntry {
    /// Display name of the source, falling back to its map key.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.source.as_ref().map(|s| s.name.as_str()).unwrap_or(id)
    }

    /// Number of results: list length, 1 for any other value, 0 when absent.
    pub fn cardinality(&self) -> usize {
        match &self.data {
            None | Some(Value::Null) => 0,
            Some(Value::Array(items)) => items.len(),
            Some(_) => 1,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether the source has reported an outcome (data or errors).
    pub fn is_resolved(&self) -> bool {
        self.timing.is_some() || self.has_errors()
    }
}
