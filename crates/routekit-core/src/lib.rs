//! # routekit-core
//!
//! Core types for the routekit router. This crate has no HTTP dependency and
//! provides the foundation shared by the other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Router settings with defaults
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{RouteError, RouteResult};
pub use settings::RouterSettings;
