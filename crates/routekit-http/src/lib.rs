//! # routekit-http
//!
//! The routing engine of routekit: compiles `{name}` / `{name:regex}` route
//! patterns, dispatches requests against a route table, and generates URLs
//! from named routes.
//!
//! ## Modules
//!
//! - [`request`] - The two request capabilities the router consumes
//! - [`urls`] - Patterns, routes, the route collection, the router, and dispatch

pub mod request;
pub mod urls;

pub use request::{RequestParts, RouteRequest};
pub use urls::collection::RouteCollection;
pub use urls::dispatch::{Dispatch, RouteMatcher};
pub use urls::parameter::{Parameter, ParameterCollection, ParameterSource};
pub use urls::route::{Route, RouteMatch};
pub use urls::router::{ResourceHandler, RouteGroup, RouteRegistrar, Router};
