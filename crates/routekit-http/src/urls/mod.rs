//! Route patterns, matching, and URL generation.
//!
//! This module provides:
//!
//! - [`pattern`]: Compiling `{name}` / `{name:regex}` patterns into a matcher and per-placeholder validators
//! - [`parameter`]: Named parameter values and the sources used to fill placeholders
//! - [`route`]: A pattern bound to a handler, name, methods, and attributes
//! - [`collection`]: The ordered route table with its name index
//! - [`router`]: Registration helpers, groups, resources, and named URL generation
//! - [`dispatch`]: Turning a request into a matched / 405 / 404 outcome
//!
//! # Examples
//!
//! ```
//! use routekit_http::{RequestParts, RouteRegistrar, Router};
//! use std::collections::HashMap;
//!
//! let mut router: Router<String> = Router::new().with_base_path("/shop");
//! router.resource("/product", "products".to_string(), "", true).unwrap();
//!
//! // Forward matching
//! let m = router
//!     .match_request(&RequestParts::get("/shop/product/detail/5"), true)
//!     .unwrap();
//! assert_eq!(m.handler(), "products@detail");
//! assert_eq!(m.param("id"), Some("5"));
//!
//! // URL generation
//! let url = router
//!     .path("product_update", &HashMap::from([("id", 5)]))
//!     .unwrap();
//! assert_eq!(url, "/shop/product/update/5");
//! ```

pub mod collection;
pub mod dispatch;
pub mod parameter;
pub mod pattern;
pub mod route;
pub mod router;
