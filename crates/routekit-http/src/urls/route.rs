//! A single route: pattern, handler, name, allowed methods, and attributes.
//!
//! A [`Route`] is immutable once registered. Matching returns a fresh
//! [`RouteMatch`] carrying the extracted parameters, so one route table can be
//! shared between threads and matched concurrently.

use std::collections::HashMap;

use serde_json::Value;

use routekit_core::{RouteError, RouteResult};

use super::parameter::{Parameter, ParameterCollection, ParameterSource};
use super::pattern::CompiledPattern;
use crate::request::RouteRequest;

/// A route pattern bound to a handler.
///
/// # Examples
///
/// ```
/// use routekit_http::Route;
///
/// let route = Route::new("/foo/{id:i}", "show", Some("foo_show"), &["get"]).unwrap();
/// assert_eq!(route.methods(), ["GET"]);
///
/// let m = route.match_path("/foo/34", "/").unwrap();
/// assert_eq!(m.param("id"), Some("34"));
/// assert!(route.match_path("/foo/bar", "/").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Route<H> {
    pattern: CompiledPattern,
    handler: H,
    name: String,
    methods: Vec<String>,
    attributes: HashMap<String, Value>,
    parameters: ParameterCollection,
}

impl<H> Route<H> {
    /// Creates a route, compiling its pattern.
    ///
    /// Methods are upper-cased; an empty list allows every method.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidRouteMethod`] if a method is not a valid
    /// HTTP method token, or [`RouteError::InvalidPattern`] if the pattern does
    /// not compile.
    pub fn new<S: AsRef<str>>(
        pattern: &str,
        handler: H,
        name: Option<&str>,
        methods: &[S],
    ) -> RouteResult<Self> {
        let methods = methods
            .iter()
            .map(|m| normalize_method(m.as_ref()))
            .collect::<RouteResult<Vec<_>>>()?;
        let pattern = CompiledPattern::compile(pattern)?;
        let parameters = pattern
            .placeholders()
            .iter()
            .map(|p| Parameter::new(p.name(), None))
            .collect();

        Ok(Self {
            pattern,
            handler,
            name: name.unwrap_or_default().to_string(),
            methods,
            attributes: HashMap::new(),
            parameters,
        })
    }

    /// Replaces the attribute map.
    #[must_use]
    pub fn with_attributes(mut self, attributes: HashMap<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Sets one attribute, builder style.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns the route name (empty when unnamed).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the route. Only meaningful before it is added to a collection.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Returns the pattern as registered.
    pub fn pattern(&self) -> &str {
        self.pattern.source()
    }

    /// Returns the compiled pattern.
    pub const fn compiled(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Returns the handler.
    pub const fn handler(&self) -> &H {
        &self.handler
    }

    /// Returns the allowed methods, upper-cased. Empty means "all methods".
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Returns the declared parameters in placeholder order, all unset.
    pub const fn parameters(&self) -> &ParameterCollection {
        &self.parameters
    }

    /// Whether `method` is allowed on this route (case-insensitive).
    pub fn is_allowed_method(&self, method: &str) -> bool {
        self.methods.is_empty() || self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }

    // ── Attributes ───────────────────────────────────────────────────

    /// Returns all attributes.
    pub const fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    /// Whether the attribute is set.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Returns the attribute value, if set.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Sets an attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Removes an attribute.
    pub fn remove_attribute(&mut self, name: &str) -> &mut Self {
        self.attributes.remove(name);
        self
    }

    // ── Matching ─────────────────────────────────────────────────────

    /// Matches a raw request path.
    ///
    /// `base_path` is stripped from the front of `path` when it is not `"/"`
    /// and `path` starts with it. The rest is percent-decoded and matched
    /// case-insensitively against the whole pattern.
    pub fn match_path(&self, path: &str, base_path: &str) -> Option<RouteMatch<'_, H>> {
        let path = strip_base_path(path, base_path);
        let values = self.pattern.captures(path)?;
        let parameters = self
            .pattern
            .placeholders()
            .iter()
            .zip(values)
            .map(|(placeholder, value)| Parameter::new(placeholder.name(), value))
            .collect();

        tracing::trace!(pattern = self.pattern(), path, "route pattern matched");
        Some(RouteMatch {
            route: self,
            parameters,
        })
    }

    /// Matches the path of `request`. The method is not considered.
    pub fn match_request<R>(&self, request: &R, base_path: &str) -> Option<RouteMatch<'_, H>>
    where
        R: RouteRequest + ?Sized,
    {
        self.match_path(request.path(), base_path)
    }

    // ── URL generation ───────────────────────────────────────────────

    /// Builds the URI for this route from placeholder values.
    ///
    /// When `base_path` is not `"/"` it is prepended verbatim, minus any
    /// trailing `/`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::MissingOrInvalidParameter`] if a placeholder has
    /// no value or a value that does not match its subpattern, and
    /// [`RouteError::InvalidUri`] if the result is not a valid URI path.
    pub fn uri<P>(&self, params: &P, base_path: &str) -> RouteResult<http::Uri>
    where
        P: ParameterSource + ?Sized,
    {
        let mut path = String::new();
        if base_path != "/" {
            path.push_str(base_path.trim_end_matches('/'));
        }
        path.push_str(&self.pattern.expand(params)?);

        http::Uri::builder()
            .path_and_query(path)
            .build()
            .map_err(|e| RouteError::InvalidUri(e.to_string()))
    }

    /// Builds the URL path for this route from placeholder values.
    ///
    /// # Errors
    ///
    /// See [`uri`](Self::uri).
    pub fn path<P>(&self, params: &P, base_path: &str) -> RouteResult<String>
    where
        P: ParameterSource + ?Sized,
    {
        Ok(self.uri(params, base_path)?.path().to_string())
    }
}

/// The result of a successful path match.
#[derive(Debug, Clone)]
pub struct RouteMatch<'r, H> {
    route: &'r Route<H>,
    parameters: ParameterCollection,
}

impl<'r, H> RouteMatch<'r, H> {
    /// Returns the matched route.
    pub const fn route(&self) -> &'r Route<H> {
        self.route
    }

    /// Returns the matched route's handler.
    pub const fn handler(&self) -> &'r H {
        &self.route.handler
    }

    /// Returns the extracted parameters, in placeholder order.
    pub const fn parameters(&self) -> &ParameterCollection {
        &self.parameters
    }

    /// Returns the extracted value of parameter `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.parameters.value(name)
    }

    /// Whether the request method is allowed on the matched route.
    pub fn is_method_allowed(&self, method: &str) -> bool {
        self.route.is_allowed_method(method)
    }

    /// Yields `(name, value)` pairs for injection as request attributes.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.parameters.iter()
    }

    /// Consumes the match, returning the extracted parameters.
    pub fn into_parameters(self) -> ParameterCollection {
        self.parameters
    }
}

fn normalize_method(method: &str) -> RouteResult<String> {
    let upper = method.to_ascii_uppercase();
    http::Method::from_bytes(upper.as_bytes())
        .map(|_| upper)
        .map_err(|_| RouteError::InvalidRouteMethod(method.to_string()))
}

fn strip_base_path<'a>(path: &'a str, base_path: &str) -> &'a str {
    if base_path == "/" {
        return path;
    }
    path.strip_prefix(base_path).unwrap_or(path)
}
