//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `ROUTEKIT_BASE_PATH` | `base_path` |
//! | `ROUTEKIT_CHECK_ALLOWED_METHODS` | `check_allowed_methods` |
//! | `ROUTEKIT_ALWAYS_ALLOWED_METHODS` | `always_allowed_methods` (comma-separated) |
//! | `ROUTEKIT_DEBUG` | `debug` |
//! | `ROUTEKIT_LOG_LEVEL` | `log_level` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use routekit_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/router.toml").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/router.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::RouteError;
use crate::settings::RouterSettings;

/// Loads settings from a TOML string. Fields not present keep their defaults.
///
/// # Errors
///
/// Returns [`RouteError::ConfigurationError`] if the TOML is malformed or
/// cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<RouterSettings, RouteError> {
    toml::from_str(toml_str)
        .map_err(|e| RouteError::ConfigurationError(format!("Failed to parse TOML: {e}")))
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<RouterSettings, RouteError> {
    let content = read_config(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<RouterSettings, RouteError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string. Fields not present keep their defaults.
///
/// # Errors
///
/// Returns [`RouteError::ConfigurationError`] if the JSON is malformed.
pub fn from_json_str(json_str: &str) -> Result<RouterSettings, RouteError> {
    serde_json::from_str(json_str)
        .map_err(|e| RouteError::ConfigurationError(format!("Failed to parse JSON: {e}")))
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<RouterSettings, RouteError> {
    let content = read_config(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> RouterSettings {
    let mut settings = RouterSettings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `ROUTEKIT_*` environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut RouterSettings) {
    apply_env_overrides_from(settings, |key| std::env::var(key).ok());
}

/// Applies overrides using `lookup` in place of the process environment.
///
/// Boolean values accept "true"/"1"/"yes" (case-insensitive); anything else
/// is `false`.
pub fn apply_env_overrides_from<F>(settings: &mut RouterSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("ROUTEKIT_BASE_PATH") {
        settings.base_path = val;
    }

    if let Some(val) = lookup("ROUTEKIT_CHECK_ALLOWED_METHODS") {
        settings.check_allowed_methods = parse_bool(&val);
    }

    if let Some(val) = lookup("ROUTEKIT_ALWAYS_ALLOWED_METHODS") {
        settings.always_allowed_methods = val
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(val) = lookup("ROUTEKIT_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Some(val) = lookup("ROUTEKIT_LOG_LEVEL") {
        settings.log_level = val;
    }
}

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_config(path: &Path, format: &str) -> Result<String, RouteError> {
    std::fs::read_to_string(path).map_err(|e| {
        RouteError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}
