//! Request capabilities consumed by the router.
//!
//! The router only ever asks a request for two things: its raw path and its
//! method. [`RouteRequest`] captures exactly that, so any request type can be
//! dispatched without converting it first.

/// The request view used by [`Router::match_request`](crate::Router::match_request).
pub trait RouteRequest {
    /// Returns the raw, possibly percent-encoded request path.
    fn path(&self) -> &str;

    /// Returns the request method (e.g. `"GET"`).
    fn method(&self) -> &str;
}

impl<B> RouteRequest for http::Request<B> {
    fn path(&self) -> &str {
        self.uri().path()
    }

    fn method(&self) -> &str {
        self.method().as_str()
    }
}

impl RouteRequest for http::request::Parts {
    fn path(&self) -> &str {
        self.uri.path()
    }

    fn method(&self) -> &str {
        self.method.as_str()
    }
}

/// A minimal owned request: just a method and a path.
///
/// # Examples
///
/// ```
/// use routekit_http::{RequestParts, RouteRequest};
///
/// let request = RequestParts::new("get", "/articles/2024");
/// assert_eq!(request.method(), "GET");
/// assert_eq!(request.path(), "/articles/2024");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParts {
    method: String,
    path: String,
}

impl RequestParts {
    /// Creates a request with the given method (upper-cased) and path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            path: path.into(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }
}

impl RouteRequest for RequestParts {
    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> &str {
        &self.method
    }
}
