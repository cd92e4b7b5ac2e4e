use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for mothball
///
/// Every table and key is optional; defaults reproduce the archiver's
/// historical constants (100ms/10s pacing, 10-error abort threshold).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub session: Option<SessionConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Upstream API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the message API
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,
}

/// Request pacing and abort thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    /// Minimum wait between requests (milliseconds)
    #[serde(rename = "min-wait-ms", default = "default_min_wait_ms")]
    pub min_wait_ms: u64,

    /// Cap for the escalating wait between requests (milliseconds)
    #[serde(rename = "max-wait-ms", default = "default_max_wait_ms")]
    pub max_wait_ms: u64,

    /// Abort a group's run after this many consecutive 5xx responses
    #[serde(rename = "max-server-errors", default = "default_max_server_errors")]
    pub max_server_errors: u32,
}

/// Session cookie pair for private groups
///
/// Both values come from a signed-in browser session. Supplying only one of
/// the two is a validation error.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(rename = "cookie-t")]
    pub cookie_t: String,

    #[serde(rename = "cookie-y")]
    pub cookie_y: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory under which each group's archive tree is written
    #[serde(rename = "root-dir", default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Also fetch and save message attachments
    #[serde(rename = "save-attachments", default)]
    pub save_attachments: bool,

    /// Write an append-only <group>.txt run log next to each group directory
    #[serde(rename = "run-log", default = "default_run_log")]
    pub run_log: bool,
}

fn default_base_url() -> String {
    "https://groups.yahoo.com/api/v1".to_string()
}

fn default_min_wait_ms() -> u64 {
    100
}

fn default_max_wait_ms() -> u64 {
    10_000
}

fn default_max_server_errors() -> u32 {
    10
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_run_log() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_wait_ms: default_min_wait_ms(),
            max_wait_ms: default_max_wait_ms(),
            max_server_errors: default_max_server_errors(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            save_attachments: false,
            run_log: default_run_log(),
        }
    }
}
