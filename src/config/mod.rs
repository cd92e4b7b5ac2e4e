//! Configuration module for mothball
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, plus the environment override for the session cookie
//! pair.
//!
//! # Example
//!
//! ```no_run
//! use mothball::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Some(Path::new("mothball.toml"))).unwrap();
//! println!("Archiving into: {}", config.output.root_dir.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, OutputConfig, PacingConfig, SessionConfig};

// Re-export parser functions
pub use parser::{load_config, COOKIE_T_ENV, COOKIE_Y_ENV};

// Re-export validation for callers that build a Config in code
pub use validation::validate;
