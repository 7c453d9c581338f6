//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoint paths, wire names, defaults)
//! - The library `Config`
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    Cli, Command, Config, GlobalArgs, HistoryArgs, LogFormat, LogLevel, LookupArgs, OutputFormat,
};
