//! Turning a request into a dispatch outcome.
//!
//! [`RouteMatcher`] sits at the request boundary: it asks the [`Router`] for
//! a route and decides whether the request proceeds ([`Dispatch::Matched`]),
//! is rejected with `405 Method Not Allowed` ([`Dispatch::MethodNotAllowed`]),
//! or falls through to whatever handles unrouted requests
//! ([`Dispatch::NotFound`]).
//!
//! # Examples
//!
//! ```
//! use routekit_http::{Dispatch, RequestParts, RouteMatcher, RouteRegistrar, Router};
//!
//! let mut router: Router<&str> = Router::new();
//! router.get("/articles/{id:i}", "articles@show", "article_show").unwrap();
//!
//! let matcher = RouteMatcher::new(&router);
//!
//! let outcome = matcher.dispatch(&RequestParts::get("/articles/7"));
//! assert_eq!(outcome.status_code(), http::StatusCode::OK);
//!
//! let outcome = matcher.dispatch(&RequestParts::new("DELETE", "/articles/7"));
//! assert_eq!(outcome.status_code(), http::StatusCode::METHOD_NOT_ALLOWED);
//! assert_eq!(outcome.allow_header().unwrap(), "GET, HEAD");
//! ```

use http::{HeaderValue, StatusCode};

use routekit_core::logging::dispatch_span;
use routekit_core::RouterSettings;

use super::route::{Route, RouteMatch};
use super::router::Router;
use crate::request::RouteRequest;

/// The outcome of dispatching one request.
#[derive(Debug)]
pub enum Dispatch<'r, H> {
    /// A route accepts the request.
    Matched(RouteMatch<'r, H>),
    /// A route matched the path but not the method.
    MethodNotAllowed {
        /// The first route whose path matched.
        route: &'r Route<H>,
        /// The methods to advertise in the `Allow` header.
        allow: Vec<String>,
    },
    /// No route matched the path.
    NotFound,
}

impl<'r, H> Dispatch<'r, H> {
    /// The HTTP status this outcome corresponds to.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Matched(_) => StatusCode::OK,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// The `Allow` header value of a [`Dispatch::MethodNotAllowed`] outcome.
    ///
    /// Returns `None` for the other outcomes, or if a method is not a valid
    /// header value.
    pub fn allow_header(&self) -> Option<HeaderValue> {
        match self {
            Self::MethodNotAllowed { allow, .. } => HeaderValue::from_str(&allow.join(", ")).ok(),
            _ => None,
        }
    }

    /// Returns the match of a [`Dispatch::Matched`] outcome.
    pub fn into_match(self) -> Option<RouteMatch<'r, H>> {
        match self {
            Self::Matched(m) => Some(m),
            _ => None,
        }
    }

    /// Whether a route accepted the request.
    pub const fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// Dispatches requests against a [`Router`].
#[derive(Debug, Clone)]
pub struct RouteMatcher<'r, H> {
    router: &'r Router<H>,
    always_allowed: Vec<String>,
    check_allowed_methods: bool,
}

impl<'r, H> RouteMatcher<'r, H> {
    /// Creates a matcher that always allows `HEAD` and reports method
    /// mismatches as [`Dispatch::MethodNotAllowed`].
    pub fn new(router: &'r Router<H>) -> Self {
        Self {
            router,
            always_allowed: vec!["HEAD".to_string()],
            check_allowed_methods: false,
        }
    }

    /// Creates a matcher configured from `settings`.
    pub fn from_settings(router: &'r Router<H>, settings: &RouterSettings) -> Self {
        Self::new(router)
            .with_always_allowed(&settings.always_allowed_methods)
            .check_allowed_methods(settings.check_allowed_methods)
    }

    /// Replaces the methods accepted on every matched path.
    ///
    /// An empty list accepts every method on every matched path.
    #[must_use]
    pub fn with_always_allowed<S: AsRef<str>>(mut self, methods: &[S]) -> Self {
        self.always_allowed = methods
            .iter()
            .map(|m| m.as_ref().to_ascii_uppercase())
            .collect();
        self
    }

    /// When `true`, the router only returns routes whose methods agree with
    /// the request, so mismatches become [`Dispatch::NotFound`].
    #[must_use]
    pub const fn check_allowed_methods(mut self, check: bool) -> Self {
        self.check_allowed_methods = check;
        self
    }

    /// Returns the always-allowed methods.
    pub fn always_allowed(&self) -> &[String] {
        &self.always_allowed
    }

    /// Dispatches one request.
    pub fn dispatch<R>(&self, request: &R) -> Dispatch<'r, H>
    where
        R: RouteRequest + ?Sized,
    {
        let method = request.method();
        let span = dispatch_span(method, request.path());
        let _guard = span.enter();

        let Some(matched) = self
            .router
            .match_request(request, self.check_allowed_methods)
        else {
            tracing::debug!("no route matched");
            return Dispatch::NotFound;
        };

        if self.is_always_allowed(method) || matched.is_method_allowed(method) {
            tracing::debug!(route = matched.route().name(), "dispatching to route");
            return Dispatch::Matched(matched);
        }

        let route = matched.route();
        let allow = self.allow_list(route);
        tracing::info!(allow = ?allow, "method not allowed");
        Dispatch::MethodNotAllowed { route, allow }
    }

    fn is_always_allowed(&self, method: &str) -> bool {
        self.always_allowed.is_empty()
            || self
                .always_allowed
                .iter()
                .any(|m| m.eq_ignore_ascii_case(method))
    }

    /// The route's methods followed by the always-allowed ones, deduplicated.
    fn allow_list(&self, route: &Route<H>) -> Vec<String> {
        let mut allow: Vec<String> = Vec::new();
        for method in route.methods().iter().chain(&self.always_allowed) {
            if !method.is_empty() && !allow.contains(method) {
                allow.push(method.clone());
            }
        }
        allow
    }
}
