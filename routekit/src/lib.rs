//! # routekit
//!
//! Request-path matching and URL generation for web applications.
//!
//! This is the meta-crate that re-exports the routekit sub-crates. Depend on
//! `routekit` for everything, or on the individual crates for finer-grained
//! control.
//!
//! ```
//! use routekit::prelude::*;
//!
//! let settings = RouterSettings::default();
//! setup_logging(&settings);
//!
//! let mut router: Router<&str> = Router::from_settings(&settings);
//! router.get("/hello/{name}", "greet", "hello").unwrap();
//!
//! let matcher = RouteMatcher::from_settings(&router, &settings);
//! match matcher.dispatch(&RequestParts::get("/hello/world")) {
//!     Dispatch::Matched(m) => assert_eq!(m.param("name"), Some("world")),
//!     other => panic!("unexpected: {:?}", other.status_code()),
//! }
//! ```

/// Error types, settings, settings loading, and logging setup.
pub use routekit_core as core;

/// Patterns, routes, the router, and dispatch.
#[cfg(feature = "http")]
pub use routekit_http as http;

/// Commonly used types, for glob import.
pub mod prelude {
    pub use routekit_core::logging::{dispatch_span, setup_logging};
    pub use routekit_core::{RouteError, RouteResult, RouterSettings};

    #[cfg(feature = "http")]
    pub use routekit_http::{
        Dispatch, Parameter, ParameterCollection, ParameterSource, RequestParts, ResourceHandler,
        Route, RouteCollection, RouteGroup, RouteMatch, RouteMatcher, RouteRegistrar,
        RouteRequest, Router,
    };
}

/// Re-export of `tracing` for instrumenting handlers alongside the router.
pub use tracing;

/// Re-export of `serde_json`, the value type of route attributes.
pub use serde_json;
