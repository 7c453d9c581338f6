//! Indicator kinds and auto-detection.
//!
//! `classify()` maps raw user input to an [`IndicatorKind`] by trying an ordered
//! list of recognizers and returning the first match. It runs on every keystroke
//! when auto-detect is enabled, so it never allocates beyond trimming, performs
//! no I/O, and returns `None` instead of failing on malformed input.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::config::MAX_INDICATOR_LENGTH;

/// Kind of indicator a lookup is made for.
///
/// Serialized in the aggregator's wire format (`DOMAIN`, `IPV4`, `SHA256`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
    ValueEnum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndicatorKind {
    Domain,
    Ipv4,
    Ipv6,
    Url,
    Email,
    Sha1,
    Sha256,
    Sha512,
    Md5,
    Tlsh,
    Ssdeep,
}

impl IndicatorKind {
    /// Wire representation, as sent in the `kind` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::Domain => "DOMAIN",
            IndicatorKind::Ipv4 => "IPV4",
            IndicatorKind::Ipv6 => "IPV6",
            IndicatorKind::Url => "URL",
            IndicatorKind::Email => "EMAIL",
            IndicatorKind::Sha1 => "SHA1",
            IndicatorKind::Sha256 => "SHA256",
            IndicatorKind::Sha512 => "SHA512",
            IndicatorKind::Md5 => "MD5",
            IndicatorKind::Tlsh => "TLSH",
            IndicatorKind::Ssdeep => "SSDEEP",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// TLSH digests are 70 hex chars, optionally prefixed with the "T1" version tag.
static TLSH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:T1)?[0-9A-Fa-f]{70}$").expect("TLSH pattern is a valid regex")
});

static SSDEEP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,10}:[0-9A-Za-z/+]+:[0-9A-Za-z/+]+$")
        .expect("ssdeep pattern is a valid regex")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@(?:[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$")
        .expect("email pattern is a valid regex")
});

static DOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i)(?:[a-z0-9_](?:[a-z0-9\-_]{0,61}[a-z0-9])?\.)+(?:[a-z]{2,63}|xn--[a-z0-9\-]{1,59})\.?$",
    )
    .expect("domain pattern is a valid regex")
});

/// URL schemes accepted as a URL indicator.
const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "ftps", "ws", "wss"];

type Recognizer = fn(&str) -> bool;

/// Recognizers in evaluation order. Earlier entries win.
const RECOGNIZERS: &[(IndicatorKind, Recognizer)] = &[
    (IndicatorKind::Ipv4, is_ipv4),
    (IndicatorKind::Ipv6, is_ipv6),
    (IndicatorKind::Md5, |s| is_hex_of_len(s, 32)),
    (IndicatorKind::Sha1, |s| is_hex_of_len(s, 40)),
    (IndicatorKind::Sha256, |s| is_hex_of_len(s, 64)),
    (IndicatorKind::Sha512, |s| is_hex_of_len(s, 128)),
    (IndicatorKind::Tlsh, |s| TLSH_PATTERN.is_match(s)),
    (IndicatorKind::Ssdeep, |s| SSDEEP_PATTERN.is_match(s)),
    (IndicatorKind::Email, |s| EMAIL_PATTERN.is_match(s)),
    (IndicatorKind::Url, is_url),
    (IndicatorKind::Domain, |s| DOMAIN_PATTERN.is_match(s)),
];

/// Detects the kind of a raw indicator.
///
/// Surrounding whitespace is ignored. Returns `None` for empty input, input longer
/// than `MAX_INDICATOR_LENGTH`, or anything no recognizer accepts.
///
/// # Examples
///
/// ```
/// use indicator_console::{classify_indicator, IndicatorKind};
///
/// assert_eq!(classify_indicator("8.8.8.8"), Some(IndicatorKind::Ipv4));
/// assert_eq!(classify_indicator("https://x.test"), Some(IndicatorKind::Url));
/// assert_eq!(classify_indicator("   "), None);
/// ```
pub fn classify(raw: &str) -> Option<IndicatorKind> {
    let value = raw.trim();
    if value.is_empty() || value.len() > MAX_INDICATOR_LENGTH {
        return None;
    }
    RECOGNIZERS
        .iter()
        .find(|(_, recognizes)| recognizes(value))
        .map(|(kind, _)| *kind)
}

fn is_ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

fn is_ipv6(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

fn is_hex_of_len(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit())
}

fn is_url(s: &str) -> bool {
    match url::Url::parse(s) {
        Ok(parsed) => parsed.has_host() && URL_SCHEMES.contains(&parsed.scheme()),
        Err(_) => false,
    }
}
