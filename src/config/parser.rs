use crate::config::types::{Config, SessionConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Environment variables that override the `[session]` cookie pair
pub const COOKIE_T_ENV: &str = "YGROUPS_COOKIE_T";
pub const COOKIE_Y_ENV: &str = "YGROUPS_COOKIE_Y";

/// Loads the configuration, applies environment overrides and validates it
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file; when `None` the
///   built-in defaults are used
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the configuration
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => Config::default(),
    };

    let cookie_t = std::env::var(COOKIE_T_ENV).ok();
    let cookie_y = std::env::var(COOKIE_Y_ENV).ok();
    apply_cookie_pair(&mut config, cookie_t, cookie_y)?;

    validate(&config)?;

    Ok(config)
}

/// Overrides the configured session with a cookie pair from the environment
///
/// The environment wins over the config file. Setting exactly one of the two
/// variables is an error: the upstream service needs both cookies together to
/// recognize a signed-in session.
fn apply_cookie_pair(
    config: &mut Config,
    cookie_t: Option<String>,
    cookie_y: Option<String>,
) -> Result<(), ConfigError> {
    match (cookie_t, cookie_y) {
        (Some(cookie_t), Some(cookie_y)) => {
            config.session = Some(SessionConfig { cookie_t, cookie_y });
            Ok(())
        }
        (None, None) => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "{} and {} must be set together or not at all",
            COOKIE_T_ENV, COOKIE_Y_ENV
        ))),
    }
}
