use super::*;
use proptest::prelude::*;
use strum::IntoEnumIterator;

#[test]
fn test_classify_ip_addresses() {
    assert_eq!(classify("1.2.3.4"), Some(IndicatorKind::Ipv4));
    assert_eq!(classify("8.8.8.8"), Some(IndicatorKind::Ipv4));
    assert_eq!(classify("::1"), Some(IndicatorKind::Ipv6));
    assert_eq!(
        classify("2001:4860:4860::8888"),
        Some(IndicatorKind::Ipv6)
    );
}

#[test]
fn test_classify_hashes_by_length() {
    assert_eq!(classify(&"a".repeat(32)), Some(IndicatorKind::Md5));
    assert_eq!(classify(&"b".repeat(40)), Some(IndicatorKind::Sha1));
    assert_eq!(classify(&"c".repeat(64)), Some(IndicatorKind::Sha256));
    assert_eq!(classify(&"D".repeat(128)), Some(IndicatorKind::Sha512));
    assert_eq!(
        classify("d41d8cd98f00b204e9800998ecf8427e"),
        Some(IndicatorKind::Md5)
    );
}

#[test]
fn test_classify_fuzzy_hashes() {
    let tlsh = format!("T1{}", "A".repeat(70));
    assert_eq!(classify(&tlsh), Some(IndicatorKind::Tlsh));
    assert_eq!(classify(&"0".repeat(70)), Some(IndicatorKind::Tlsh));
    assert_eq!(
        classify("3:AXGBicFlgVNhBGcL6wCrFQEv:AXGHsNhxLsr2C"),
        Some(IndicatorKind::Ssdeep)
    );
}

#[test]
fn test_classify_email_url_domain() {
    assert_eq!(classify("a@b.com"), Some(IndicatorKind::Email));
    assert_eq!(classify("https://x.test"), Some(IndicatorKind::Url));
    assert_eq!(
        classify("http://example.com/path?q=1"),
        Some(IndicatorKind::Url)
    );
    assert_eq!(classify("example.com"), Some(IndicatorKind::Domain));
    assert_eq!(classify("sub.example.co.uk"), Some(IndicatorKind::Domain));
}

#[test]
fn test_classify_trims_whitespace() {
    assert_eq!(classify("  example.com\n"), Some(IndicatorKind::Domain));
    assert_eq!(classify("\t1.2.3.4 "), Some(IndicatorKind::Ipv4));
}

#[test]
fn test_classify_empty_and_whitespace() {
    assert_eq!(classify(""), None);
    assert_eq!(classify("   "), None);
    assert_eq!(classify("\n\t"), None);
}

#[test]
fn test_classify_unrecognized() {
    assert_eq!(classify("not an indicator"), None);
    assert_eq!(classify("localhost"), None);
    assert_eq!(classify("mailto:"), None);
    assert_eq!(classify("1.2.3"), None);
    assert_eq!(classify(&"a".repeat(MAX_INDICATOR_LENGTH + 1)), None);
}

#[test]
fn test_classify_rejects_non_web_schemes() {
    assert_eq!(classify("javascript:alert(1)"), None);
    assert_eq!(classify("file:///etc/passwd"), None);
}

#[test]
fn test_kind_wire_names_match_serde() {
    for kind in IndicatorKind::iter() {
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, format!("\"{}\"", kind.as_str()));
        let back: IndicatorKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);
    }
}

#[test]
fn test_classify_is_idempotent() {
    for input in ["8.8.8.8", "example.com", "a@b.com", "", "???"] {
        assert_eq!(classify(input), classify(input));
    }
}

proptest! {
    #[test]
    fn test_classify_never_panics(input in ".{0,300}") {
        let _ = classify(&input);
    }

    #[test]
    fn test_classify_any_ipv4(a in any::<u8>(), b in any::<u8>(), c in any::<u8>(), d in any::<u8>()) {
        let ip = format!("{a}.{b}.{c}.{d}");
        prop_assert_eq!(classify(&ip), Some(IndicatorKind::Ipv4));
    }
}
