//! Core error types for the routekit router.
//!
//! This module provides the error enum [`RouteError`] covering route
//! registration, name lookup, URL generation, and configuration failures.

use thiserror::Error;

/// The primary error type for routekit.
///
/// Registration errors (`DuplicateRouteName`, `InvalidRouteMethod`,
/// `InvalidPattern`) are raised while the route table is being built and are
/// normally fatal at boot. Lookup and generation errors are raised to the
/// immediate caller. Nothing is retried or degraded.
///
/// Each variant maps to an HTTP status code via [`RouteError::status_code`].
#[derive(Error, Debug)]
pub enum RouteError {
    // ── Registration ─────────────────────────────────────────────────

    /// A second route was registered under an already-used name.
    #[error("Route [{0}] already added")]
    DuplicateRouteName(String),

    /// A declared request method is not a valid HTTP method token.
    #[error("Invalid request method [{0}], must be a valid method token")]
    InvalidRouteMethod(String),

    /// The route pattern (or one of its placeholder subpatterns) is malformed.
    #[error("Invalid route pattern [{pattern}]: {message}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// What went wrong while compiling it.
        message: String,
    },

    // ── Lookup ───────────────────────────────────────────────────────

    /// No route is registered under the requested name.
    #[error("Route [{0}] not found")]
    RouteNotFound(String),

    // ── URL generation ───────────────────────────────────────────────

    /// A placeholder had no supplied value, or the value did not satisfy the
    /// placeholder's subpattern.
    #[error("Parameter [{0}] is not passed or is invalid")]
    MissingOrInvalidParameter(String),

    /// The generated path could not be turned into a URI.
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl RouteError {
    /// Returns the HTTP status code a dispatch boundary should report.
    ///
    /// - `RouteNotFound` -> 404
    /// - `MissingOrInvalidParameter` -> 400
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::RouteNotFound(_) => 404,
            Self::MissingOrInvalidParameter(_) => 400,
            Self::DuplicateRouteName(_)
            | Self::InvalidRouteMethod(_)
            | Self::InvalidPattern { .. }
            | Self::InvalidUri(_)
            | Self::ConfigurationError(_) => 500,
        }
    }

    /// Returns `true` for errors that can only occur while registering routes.
    pub const fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateRouteName(_) | Self::InvalidRouteMethod(_) | Self::InvalidPattern { .. }
        )
    }
}

/// A convenience type alias for `Result<T, RouteError>`.
pub type RouteResult<T> = Result<T, RouteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_error_status_codes() {
        assert_eq!(RouteError::RouteNotFound("x".into()).status_code(), 404);
        assert_eq!(
            RouteError::MissingOrInvalidParameter("id".into()).status_code(),
            400
        );
        assert_eq!(RouteError::DuplicateRouteName("x".into()).status_code(), 500);
        assert_eq!(RouteError::InvalidRouteMethod("x".into()).status_code(), 500);
        assert_eq!(RouteError::InvalidUri("x".into()).status_code(), 500);
        assert_eq!(
            RouteError::ConfigurationError("x".into()).status_code(),
            500
        );
        assert_eq!(
            RouteError::InvalidPattern {
                pattern: "/{".into(),
                message: "unclosed".into(),
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_route_error_display() {
        let err = RouteError::RouteNotFound("home".into());
        assert_eq!(err.to_string(), "Route [home] not found");

        let err = RouteError::DuplicateRouteName("home".into());
        assert_eq!(err.to_string(), "Route [home] already added");

        let err = RouteError::MissingOrInvalidParameter("id".into());
        assert!(err.to_string().contains("[id]"));
    }

    #[test]
    fn test_registration_errors() {
        assert!(RouteError::DuplicateRouteName("x".into()).is_registration_error());
        assert!(RouteError::InvalidRouteMethod("x".into()).is_registration_error());
        assert!(RouteError::InvalidPattern {
            pattern: "x".into(),
            message: "y".into(),
        }
        .is_registration_error());
        assert!(!RouteError::RouteNotFound("x".into()).is_registration_error());
        assert!(!RouteError::MissingOrInvalidParameter("x".into()).is_registration_error());
    }
}
