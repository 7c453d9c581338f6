//! Tests for CLI subcommand parsing.

use clap::Parser;
use indicator_console::config::{Cli, Command, DEFAULT_API_URL};
use indicator_console::{Config, IndicatorKind, LogFormat, LogLevel, OutputFormat};

#[test]
fn test_lookup_minimal() {
    let cli = Cli::try_parse_from(["indicator_console", "lookup", "8.8.8.8"]).unwrap();
    match cli.command {
        Command::Lookup(args) => {
            assert_eq!(args.indicator, "8.8.8.8");
            assert!(args.kind.is_none());
            assert!(args.sources.is_empty());
        }
        other => panic!("expected lookup, got {:?}", other),
    }
    assert_eq!(cli.global.output, OutputFormat::Plain);
}

#[test]
fn test_lookup_with_kind_and_sources() {
    let cli = Cli::try_parse_from([
        "indicator_console",
        "lookup",
        "example.com",
        "--kind",
        "domain",
        "--source",
        "s1",
        "--source",
        "s2",
    ])
    .unwrap();
    match cli.command {
        Command::Lookup(args) => {
            assert_eq!(args.kind, Some(IndicatorKind::Domain));
            assert_eq!(args.sources, vec!["s1", "s2"]);
        }
        other => panic!("expected lookup, got {:?}", other),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "indicator_console",
        "history",
        "req-1",
        "--api-url",
        "https://agg.test/api",
        "--api-token",
        "t0k",
        "--output",
        "json",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--connect-timeout-seconds",
        "3",
    ])
    .unwrap();

    let config = Config::from(&cli.global);
    assert_eq!(config.api_url, "https://agg.test/api");
    assert_eq!(config.api_token.as_deref(), Some("t0k"));
    assert_eq!(config.output, OutputFormat::Json);
    assert_eq!(config.connect_timeout_seconds, 3);
    assert!(matches!(config.log_level, LogLevel::Debug));
    assert!(matches!(config.log_format, LogFormat::Json));
    match cli.command {
        Command::History(args) => assert_eq!(args.request_id, "req-1"),
        other => panic!("expected history, got {:?}", other),
    }
}

#[test]
fn test_defaults() {
    let cli = Cli::try_parse_from(["indicator_console", "lookup", "x"]).unwrap();
    // The environment may carry INDICATOR_API_URL; only check it when unset.
    if std::env::var("INDICATOR_API_URL").is_err() {
        assert_eq!(cli.global.api_url, DEFAULT_API_URL);
    }
    assert!(matches!(cli.global.log_level, LogLevel::Info));
    assert!(matches!(cli.global.log_format, LogFormat::Plain));
}

#[test]
fn test_invalid_kind_rejected() {
    assert!(
        Cli::try_parse_from(["indicator_console", "lookup", "x", "--kind", "bogus"]).is_err()
    );
}

#[test]
fn test_missing_subcommand_rejected() {
    assert!(Cli::try_parse_from(["indicator_console"]).is_err());
}
