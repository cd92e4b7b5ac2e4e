//! Mothball: an incremental, resumable message-group archiver
//!
//! This crate archives every message in a numeric message-ID space exposed by
//! a Yahoo-Groups-style API, one file per message, surviving interruption and
//! restart without loss or duplication.

pub mod archiver;
pub mod client;
pub mod config;
pub mod planner;
pub mod store;

use thiserror::Error;

/// Main error type for mothball operations
///
/// Only fatal conditions become errors. Expected holes (404), undated
/// messages, transient network failures and failed attachment fetches are
/// handled where they occur and surface as outcomes or log lines instead.
#[derive(Debug, Error)]
pub enum MothballError {
    #[error("invalid mode '{value}' (expected update, retry, restart, reverse-update or reverse-retry)")]
    InvalidMode { value: String },

    #[error("could not determine last message id for group '{group}': {reason}")]
    UpstreamUnavailable { group: String, reason: String },

    #[error("group '{group}' requires authentication: supply the session cookie pair for a signed-in account")]
    AuthRequired { group: String },

    #[error("aborting after {count} consecutive server errors")]
    TooManyServerErrors { count: u32 },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for mothball operations
pub type Result<T> = std::result::Result<T, MothballError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use archiver::{ArchiveSummary, GroupArchiver};
pub use client::FetchClient;
pub use config::Config;
pub use planner::ArchiveMode;
