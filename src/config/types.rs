//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    DEFAULT_API_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::indicator::IndicatorKind;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Format of the final result summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable grouped listing
    Plain,
    /// Single JSON document
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use indicator_console::Config;
///
/// let config = Config {
///     api_url: "https://aggregator.internal/api".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Aggregator API base URL
    pub api_url: String,

    /// Bearer token sent with every request
    pub api_token: Option<String>,

    /// TCP connect timeout in seconds
    pub connect_timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Result summary format
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            output: OutputFormat::Plain,
        }
    }
}

/// Command-line interface.
///
/// # Examples
///
/// ```bash
/// # Look up an IP against every enabled source (kind auto-detected)
/// indicator_console lookup 8.8.8.8
///
/// # Restrict to two sources and force the kind
/// indicator_console lookup example.com --kind domain --source s1 --source s2
///
/// # Replay a finished request
/// indicator_console history 01J9Z3Q4
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "indicator_console",
    about = "Queries every threat-intelligence source for an indicator and summarizes the results."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Aggregator API base URL
    #[arg(long, global = true, env = "INDICATOR_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Bearer token for the API
    #[arg(long, global = true, env = "INDICATOR_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// TCP connect timeout in seconds (the stream itself has no timeout)
    #[arg(long, global = true, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout_seconds: u64,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Summary format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Plain)]
    pub output: OutputFormat,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a live lookup and follow its progress until every source resolves
    Lookup(LookupArgs),
    /// Show the results of a previously completed request
    History(HistoryArgs),
}

/// Arguments of `lookup`.
#[derive(Debug, Args)]
pub struct LookupArgs {
    /// Indicator to look up (domain, IP, URL, email, hash)
    pub indicator: String,

    /// Indicator kind; detected from the indicator when omitted
    #[arg(long, value_enum)]
    pub kind: Option<IndicatorKind>,

    /// Source id to query (repeatable); all enabled sources when omitted
    #[arg(long = "source")]
    pub sources: Vec<String>,
}

/// Arguments of `history`.
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Id of the request to replay
    pub request_id: String,
}

impl From<&GlobalArgs> for Config {
    fn from(args: &GlobalArgs) -> Self {
        Config {
            api_url: args.api_url.clone(),
            api_token: args.api_token.clone(),
            connect_timeout_seconds: args.connect_timeout_seconds,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: args.log_level.clone(),
            log_format: args.log_format.clone(),
            output: args.output,
        }
    }
}
