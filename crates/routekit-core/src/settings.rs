//! Settings for the routekit router.
//!
//! [`RouterSettings`] holds the values a router and its dispatch boundary
//! read at startup. Every field has a default, so a settings file only needs
//! to name what it changes.

use serde::{Deserialize, Serialize};

/// The complete set of router settings.
///
/// # Examples
///
/// ```
/// use routekit_core::settings::RouterSettings;
///
/// let settings = RouterSettings::default();
/// assert_eq!(settings.base_path, "/");
/// assert!(settings.check_allowed_methods);
/// assert_eq!(settings.always_allowed_methods, vec!["HEAD".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
    // ── Matching ─────────────────────────────────────────────────────

    /// The application mount point. Stripped from incoming request paths and
    /// prepended to generated ones. `"/"` means "mounted at the root".
    pub base_path: String,
    /// When `true`, a path that only matches routes declaring other methods is
    /// reported as "not found" instead of "method not allowed".
    pub check_allowed_methods: bool,
    /// Methods accepted on every matched path regardless of the route's own
    /// method set. Also appended to the `Allow` list of a 405 outcome.
    pub always_allowed_methods: Vec<String>,

    // ── Logging ──────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty log output).
    pub debug: bool,
    /// The log level filter (e.g. "info", "debug", "routekit_http=trace").
    pub log_level: String,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            check_allowed_methods: true,
            always_allowed_methods: vec!["HEAD".to_string()],
            debug: false,
            log_level: "info".to_string(),
        }
    }
}

impl RouterSettings {
    /// Returns the base path, falling back to `"/"` when it is empty.
    pub fn normalized_base_path(&self) -> &str {
        if self.base_path.is_empty() {
            "/"
        } else {
            &self.base_path
        }
    }
}
