//! Configuration constants.
//!
//! Endpoint paths, wire names, and default values shared by the library and CLI.

/// Default aggregator API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Path (relative to the API base) of the streaming execute endpoint.
pub const EXECUTE_PATH: &str = "execute";

/// Path (relative to the API base) of the request history lookup.
pub const REQUESTS_PATH: &str = "requests";

// Execute endpoint query parameter names
pub const PARAM_DATA: &str = "data";
pub const PARAM_KIND: &str = "kind";
pub const PARAM_SOURCES: &str = "sources";

// Stream event names
pub const EVENT_FETCHING_START: &str = "fetching_start";
pub const EVENT_FETCHING_ERROR: &str = "fetching_error";
pub const EVENT_FETCHING_DATA: &str = "fetching_data";

/// Cache key of the aggregate request counter, invalidated once per session open.
pub const REQUESTS_COUNT_CACHE_KEY: &str = "requests-count";

/// TCP connect timeout in seconds.
///
/// The event stream itself has no timeout; the server closes it once every
/// source has resolved.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent string for API requests.
pub const DEFAULT_USER_AGENT: &str = concat!("indicator_console/", env!("CARGO_PKG_VERSION"));

/// HTTP status treated as "authentication expired".
pub const HTTP_STATUS_UNAUTHORIZED: u16 = 401;

/// Longest raw indicator accepted by the classifier.
pub const MAX_INDICATOR_LENGTH: usize = 2048;
