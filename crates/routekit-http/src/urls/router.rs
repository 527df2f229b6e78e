//! The router: route registration, grouping, dispatch, and named URL generation.
//!
//! Registration goes through the [`RouteRegistrar`] trait, implemented by both
//! [`Router`] and [`RouteGroup`]. A group carries its accumulated prefix as a
//! value, so nested groups compose by string concatenation and the router
//! itself never tracks a "current prefix".
//!
//! # Examples
//!
//! ```
//! use routekit_http::{RequestParts, RouteRegistrar, Router};
//! use std::collections::HashMap;
//!
//! let mut router: Router<&str> = Router::new();
//! router.group("/api", |api| {
//!     api.get("/users/{id:i}", "users@show", "user_show")?;
//!     api.post("/users", "users@store", "user_store")?;
//!     Ok::<_, routekit_core::RouteError>(())
//! }).unwrap();
//!
//! let m = router.match_request(&RequestParts::get("/api/users/42"), true).unwrap();
//! assert_eq!(*m.handler(), "users@show");
//! assert_eq!(m.param("id"), Some("42"));
//!
//! let url = router.path("user_show", &HashMap::from([("id", 7)])).unwrap();
//! assert_eq!(url, "/api/users/7");
//! ```

use std::collections::HashMap;

use serde_json::Value;

use routekit_core::{RouteResult, RouterSettings};

use super::collection::RouteCollection;
use super::parameter::ParameterSource;
use super::route::{Route, RouteMatch};
use crate::request::RouteRequest;

/// A handler type that can derive per-action handlers for
/// [`RouteRegistrar::resource`].
pub trait ResourceHandler: Sized {
    /// Returns the handler for `action` (e.g. `index`, `detail`).
    fn action(&self, action: &str) -> Self;
}

impl ResourceHandler for String {
    /// `"users"` becomes `"users@index"`.
    fn action(&self, action: &str) -> Self {
        format!("{self}@{action}")
    }
}

/// The five conventional resource routes:
/// `(path suffix, handler action, route name suffix, methods)`.
const RESOURCE_ROUTES: [(&str, &str, &str, &[&str]); 5] = [
    ("", "index", "list", &["GET"]),
    ("/detail/{id}", "detail", "detail", &["GET"]),
    ("/create", "create", "create", &["GET", "POST"]),
    ("/update/{id}", "update", "update", &["GET", "POST"]),
    ("/delete/{id}", "delete", "delete", &["GET"]),
];

/// Route registration helpers shared by [`Router`] and [`RouteGroup`].
pub trait RouteRegistrar<H> {
    /// The route table new routes are inserted into.
    fn route_table(&mut self) -> &mut RouteCollection<H>;

    /// The prefix prepended to every pattern registered through `self`.
    fn group_prefix(&self) -> &str;

    /// Registers a route with attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if a method or the pattern is invalid, or the name is
    /// already in use.
    fn add_with_attributes(
        &mut self,
        pattern: &str,
        handler: H,
        methods: &[&str],
        name: &str,
        attributes: HashMap<String, Value>,
    ) -> RouteResult<&Route<H>> {
        let pattern = format!("{}{pattern}", self.group_prefix());
        let route = Route::new(&pattern, handler, Some(name), methods)?.with_attributes(attributes);
        tracing::debug!(
            pattern = route.pattern(),
            name = route.name(),
            methods = ?route.methods(),
            "route registered"
        );
        self.route_table().insert(route)
    }

    /// Registers a route. An empty `methods` slice allows every method.
    ///
    /// # Errors
    ///
    /// See [`add_with_attributes`](Self::add_with_attributes).
    fn add(
        &mut self,
        pattern: &str,
        handler: H,
        methods: &[&str],
        name: &str,
    ) -> RouteResult<&Route<H>> {
        self.add_with_attributes(pattern, handler, methods, name, HashMap::new())
    }

    /// Registers a route for any request method.
    fn any(&mut self, pattern: &str, handler: H, name: &str) -> RouteResult<&Route<H>> {
        self.add(pattern, handler, &[], name)
    }

    /// Registers a `GET` route.
    fn get(&mut self, pattern: &str, handler: H, name: &str) -> RouteResult<&Route<H>> {
        self.add(pattern, handler, &["GET"], name)
    }

    /// Registers a `POST` route.
    fn post(&mut self, pattern: &str, handler: H, name: &str) -> RouteResult<&Route<H>> {
        self.add(pattern, handler, &["POST"], name)
    }

    /// Registers a `PUT` route.
    fn put(&mut self, pattern: &str, handler: H, name: &str) -> RouteResult<&Route<H>> {
        self.add(pattern, handler, &["PUT"], name)
    }

    /// Registers a `PATCH` route.
    fn patch(&mut self, pattern: &str, handler: H, name: &str) -> RouteResult<&Route<H>> {
        self.add(pattern, handler, &["PATCH"], name)
    }

    /// Registers a `DELETE` route.
    fn delete(&mut self, pattern: &str, handler: H, name: &str) -> RouteResult<&Route<H>> {
        self.add(pattern, handler, &["DELETE"], name)
    }

    /// Registers a `HEAD` route.
    fn head(&mut self, pattern: &str, handler: H, name: &str) -> RouteResult<&Route<H>> {
        self.add(pattern, handler, &["HEAD"], name)
    }

    /// Registers an `OPTIONS` route.
    fn options(&mut self, pattern: &str, handler: H, name: &str) -> RouteResult<&Route<H>> {
        self.add(pattern, handler, &["OPTIONS"], name)
    }

    /// Registers a form route: `GET` to show it, `POST` to submit it.
    fn form(&mut self, pattern: &str, handler: H, name: &str) -> RouteResult<&Route<H>> {
        self.add(pattern, handler, &["GET", "POST"], name)
    }

    /// Runs `callback` with a [`RouteGroup`] whose prefix is this registrar's
    /// prefix followed by `prefix`.
    fn group<F, T>(&mut self, prefix: &str, callback: F) -> T
    where
        Self: Sized,
        F: FnOnce(&mut RouteGroup<'_, H>) -> T,
    {
        let prefix = format!("{}{prefix}", self.group_prefix());
        let mut group = RouteGroup {
            routes: self.route_table(),
            prefix,
        };
        callback(&mut group)
    }

    /// Registers the five conventional routes of a resource under `pattern`.
    ///
    /// | Name | Pattern | Handler | Methods |
    /// |---|---|---|---|
    /// | `{name}_list` | `{pattern}` | `handler@index` | `GET` |
    /// | `{name}_detail` | `{pattern}/detail/{id}` | `handler@detail` | `GET` |
    /// | `{name}_create` | `{pattern}/create` | `handler@create` | `GET`, `POST` |
    /// | `{name}_update` | `{pattern}/update/{id}` | `handler@update` | `GET`, `POST` |
    /// | `{name}_delete` | `{pattern}/delete/{id}` | `handler@delete` | `GET` |
    ///
    /// An empty `name` is derived from the pattern (`/admin/user-role` gives
    /// `admin_user_role`). With `use_permission`, each route gets a
    /// `permission` attribute holding its name. The delete route always gets
    /// `csrf = true`.
    ///
    /// # Errors
    ///
    /// Returns the first registration error; earlier routes stay registered.
    fn resource(
        &mut self,
        pattern: &str,
        handler: H,
        name: &str,
        use_permission: bool,
    ) -> RouteResult<()>
    where
        Self: Sized,
        H: ResourceHandler,
    {
        let name = if name.is_empty() {
            resource_name(pattern)
        } else {
            name.to_string()
        };

        self.group(pattern, |group| {
            for (suffix, action, kind, methods) in RESOURCE_ROUTES {
                let route_name = format!("{name}_{kind}");
                let mut attributes = HashMap::new();
                if use_permission {
                    attributes.insert("permission".to_string(), Value::from(route_name.as_str()));
                }
                if kind == "delete" {
                    attributes.insert("csrf".to_string(), Value::Bool(true));
                }
                group.add_with_attributes(
                    suffix,
                    handler.action(action),
                    methods,
                    &route_name,
                    attributes,
                )?;
            }
            Ok(())
        })
    }
}

/// Derives a resource name from its pattern: `/admin/user-role` -> `admin_user_role`.
fn resource_name(pattern: &str) -> String {
    pattern.trim_matches('/').replace(['/', '-'], "_")
}

/// A registration scope with an accumulated path prefix.
pub struct RouteGroup<'a, H> {
    routes: &'a mut RouteCollection<H>,
    prefix: String,
}

impl<H> RouteGroup<'_, H> {
    /// Returns the accumulated prefix of this group.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl<H> RouteRegistrar<H> for RouteGroup<'_, H> {
    fn route_table(&mut self) -> &mut RouteCollection<H> {
        self.routes
    }

    fn group_prefix(&self) -> &str {
        &self.prefix
    }
}

/// The router: a route table plus the application base path.
#[derive(Debug, Clone)]
pub struct Router<H> {
    routes: RouteCollection<H>,
    base_path: String,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::with_routes(RouteCollection::new())
    }
}

impl<H> Router<H> {
    /// Creates a router with an empty route table and base path `/`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router over an existing route table.
    pub fn with_routes(routes: RouteCollection<H>) -> Self {
        Self {
            routes,
            base_path: "/".to_string(),
        }
    }

    /// Creates an empty router using the base path from `settings`.
    pub fn from_settings(settings: &RouterSettings) -> Self {
        Self::new().with_base_path(settings.normalized_base_path())
    }

    /// Sets the base path, builder style.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.set_base_path(base_path);
        self
    }

    /// Sets the base path.
    pub fn set_base_path(&mut self, base_path: impl Into<String>) -> &mut Self {
        self.base_path = base_path.into();
        self
    }

    /// Returns the base path.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the route table.
    pub const fn routes(&self) -> &RouteCollection<H> {
        &self.routes
    }

    /// Returns the route table mutably.
    pub fn routes_mut(&mut self) -> &mut RouteCollection<H> {
        &mut self.routes
    }

    /// Matches a request against the route table.
    ///
    /// Routes are tried in registration order. The first route whose path
    /// matches and whose methods allow the request method wins. Otherwise the
    /// first path-matching route with other methods is kept as a fallback; it
    /// is returned only when `check_allowed_methods` is `false`, so the caller
    /// can answer "method not allowed".
    pub fn match_request<R>(
        &self,
        request: &R,
        check_allowed_methods: bool,
    ) -> Option<RouteMatch<'_, H>>
    where
        R: RouteRequest + ?Sized,
    {
        let method = request.method();
        let mut fallback = None;

        for route in &self.routes {
            tracing::trace!(pattern = route.pattern(), "trying route");
            let Some(matched) = route.match_request(request, &self.base_path) else {
                continue;
            };

            if route.is_allowed_method(method) {
                tracing::debug!(pattern = route.pattern(), name = route.name(), "route matched");
                return Some(matched);
            }

            if fallback.is_none() {
                tracing::debug!(
                    pattern = route.pattern(),
                    method,
                    "path matched but method is not allowed"
                );
                fallback = Some(matched);
            }
        }

        if check_allowed_methods {
            None
        } else {
            fallback
        }
    }

    /// Builds the URI of the route named `name`, under the base path.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::RouteNotFound`](routekit_core::RouteError::RouteNotFound)
    /// for an unknown name, or the route's URL generation error.
    pub fn uri<P>(&self, name: &str, params: &P) -> RouteResult<http::Uri>
    where
        P: ParameterSource + ?Sized,
    {
        self.routes.get(name)?.uri(params, &self.base_path)
    }

    /// Builds the URL path of the route named `name`, under the base path.
    ///
    /// # Errors
    ///
    /// See [`uri`](Self::uri).
    pub fn path<P>(&self, name: &str, params: &P) -> RouteResult<String>
    where
        P: ParameterSource + ?Sized,
    {
        self.routes.get(name)?.path(params, &self.base_path)
    }
}

impl<H> RouteRegistrar<H> for Router<H> {
    fn route_table(&mut self) -> &mut RouteCollection<H> {
        &mut self.routes
    }

    fn group_prefix(&self) -> &str {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestParts;
    use routekit_core::RouteError;

    type TestRouter = Router<String>;

    fn h(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_constructor() {
        let r = TestRouter::new();
        assert!(r.routes().is_empty());
        assert_eq!(r.base_path(), "/");

        let mut c = RouteCollection::new();
        c.add(Route::new("/foo", h("handler"), Some("foo"), &["GET"]).unwrap())
            .unwrap();
        let r = Router::with_routes(c);
        assert!(r.routes().has("foo"));
    }

    #[test]
    fn test_base_path() {
        let mut r = TestRouter::new();
        assert_eq!(r.base_path(), "/");
        r.set_base_path("/foo");
        assert_eq!(r.base_path(), "/foo");

        let settings = RouterSettings {
            base_path: "/mounted".into(),
            ..RouterSettings::default()
        };
        assert_eq!(TestRouter::from_settings(&settings).base_path(), "/mounted");
    }

    #[test]
    fn test_group() {
        let mut r = TestRouter::new();
        r.group("/foo", |g| {
            assert_eq!(g.prefix(), "/foo");
            g.add("/bar", h("handler"), &["GET"], "name").unwrap();
        });

        assert_eq!(r.routes().len(), 1);
        assert_eq!(r.routes().get("name").unwrap().pattern(), "/foo/bar");
    }

    #[test]
    fn test_nested_groups_compose() {
        let mut r = TestRouter::new();
        r.group("/a", |a| {
            a.group("/b", |b| {
                b.any("/c", h("handler"), "abc").unwrap();
            });
            a.any("/d", h("handler"), "ad").unwrap();
        });
        r.any("/e", h("handler"), "e").unwrap();

        assert_eq!(r.routes().get("abc").unwrap().pattern(), "/a/b/c");
        assert_eq!(r.routes().get("ad").unwrap().pattern(), "/a/d");
        assert_eq!(r.routes().get("e").unwrap().pattern(), "/e");
    }

    #[test]
    fn test_group_propagates_errors() {
        let mut r = TestRouter::new();
        let result = r.group("/x", |g| {
            g.get("/one", h("handler"), "dup")?;
            g.get("/two", h("handler"), "dup")?;
            Ok::<_, RouteError>(())
        });
        assert!(matches!(result, Err(RouteError::DuplicateRouteName(_))));
    }

    #[test]
    fn test_form() {
        let mut r = TestRouter::new();
        r.form("/foo", h("handler"), "name").unwrap();
        let route = r.routes().get("name").unwrap();
        assert_eq!(route.pattern(), "/foo");
        assert_eq!(route.handler(), "handler");
        assert_eq!(route.methods(), ["GET", "POST"]);
    }

    #[test]
    fn test_add() {
        let mut r = TestRouter::new();
        r.add("/foo", h("handler"), &["GET"], "name").unwrap();
        assert_eq!(r.routes().len(), 1);
        let route = r.routes().get("name").unwrap();
        assert_eq!(route.pattern(), "/foo");
        assert_eq!(route.handler(), "handler");

        // Unnamed routes are registered but cannot be looked up.
        r.add("/foo", h("handler"), &["GET"], "").unwrap();
        assert_eq!(r.routes().len(), 2);
        assert!(matches!(
            r.routes().get("/foo"),
            Err(RouteError::RouteNotFound(_))
        ));
    }

    fn register(r: &mut TestRouter, method: &str) -> RouteResult<()> {
        let (p, hd, n) = ("/foo", h("handler"), "name");
        let registered = match method {
            "GET" => r.get(p, hd, n),
            "POST" => r.post(p, hd, n),
            "PUT" => r.put(p, hd, n),
            "DELETE" => r.delete(p, hd, n),
            "PATCH" => r.patch(p, hd, n),
            "HEAD" => r.head(p, hd, n),
            "OPTIONS" => r.options(p, hd, n),
            _ => r.any(p, hd, n),
        };
        registered.map(drop)
    }

    #[test]
    fn test_method_helpers() {
        for method in ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", ""] {
            let mut r = TestRouter::new();
            register(&mut r, method).unwrap();
            assert_eq!(r.routes().len(), 1);

            let route = r.routes().get("name").unwrap();
            assert_eq!(route.pattern(), "/foo");
            assert_eq!(route.handler(), "handler");
            if method.is_empty() {
                assert!(route.methods().is_empty());
            } else {
                assert_eq!(route.methods(), [method]);
            }
        }
    }

    #[test]
    fn test_resource() {
        let mut r = TestRouter::new();
        r.resource("/user", h("handler"), "", true).unwrap();
        assert_eq!(r.routes().len(), 5);

        let expected = [
            ("user_list", "/user", "handler@index"),
            ("user_detail", "/user/detail/{id}", "handler@detail"),
            ("user_create", "/user/create", "handler@create"),
            ("user_update", "/user/update/{id}", "handler@update"),
            ("user_delete", "/user/delete/{id}", "handler@delete"),
        ];
        for (name, pattern, handler) in expected {
            let route = r.routes().get(name).unwrap();
            assert_eq!(route.pattern(), pattern);
            assert_eq!(route.handler(), handler);
            assert_eq!(route.attribute("permission"), Some(&Value::from(name)));
            if name == "user_delete" {
                assert_eq!(route.attribute("csrf"), Some(&Value::Bool(true)));
            } else {
                assert!(route.attribute("csrf").is_none());
            }
        }

        assert_eq!(r.routes().get("user_create").unwrap().methods(), ["GET", "POST"]);
        assert_eq!(r.routes().get("user_list").unwrap().methods(), ["GET"]);
    }

    #[test]
    fn test_resource_without_permission_and_explicit_name() {
        let mut r = TestRouter::new();
        r.resource("/admin/user-role", h("roles"), "", false).unwrap();
        let route = r.routes().get("admin_user_role_list").unwrap();
        assert!(!route.has_attribute("permission"));

        r.resource("/posts", h("posts"), "blog", true).unwrap();
        assert!(r.routes().has("blog_detail"));
        assert!(r.routes().get("blog_delete").unwrap().has_attribute("csrf"));
    }

    #[test]
    fn test_resource_inside_group() {
        let mut r = TestRouter::new();
        r.group("/admin", |g| g.resource("/user", h("handler"), "user", true))
            .unwrap();
        assert_eq!(
            r.routes().get("user_update").unwrap().pattern(),
            "/admin/user/update/{id}"
        );
    }

    #[test]
    fn test_resource_name() {
        assert_eq!(resource_name("/user"), "user");
        assert_eq!(resource_name("/admin/user-role/"), "admin_user_role");
    }

    #[test]
    fn test_match_cases() {
        // (pattern, method, path, allowed methods, check, expect match)
        let cases: [(&str, &str, &str, &[&str], bool, bool); 5] = [
            ("/foo", "GET", "/foo", &["GET", "POST"], true, true),
            ("/foo/{name}/{id:i}", "GET", "/foo/bar/12", &["GET", "POST"], true, true),
            ("/foo", "GET", "/foobar", &["GET", "POST"], true, false),
            ("/foo", "PUT", "/foo", &["GET", "POST"], true, false),
            ("/foo", "PUT", "/foo", &["GET", "POST"], false, true),
        ];

        for (pattern, method, path, methods, check, expected) in cases {
            let mut r = TestRouter::new();
            r.add(pattern, h("handler"), methods, "name").unwrap();
            let result = r.match_request(&RequestParts::new(method, path), check);
            assert_eq!(result.is_some(), expected, "{method} {path} against {pattern}");
            if let Some(m) = result {
                assert_eq!(m.route().name(), "name");
            }
        }
    }

    #[test]
    fn test_first_match_wins() {
        let mut r = TestRouter::new();
        r.get("/items/{id}", h("first"), "first").unwrap();
        r.get("/items/{id:i}", h("second"), "second").unwrap();

        let m = r.match_request(&RequestParts::get("/items/5"), true).unwrap();
        assert_eq!(m.handler(), "first");
    }

    #[test]
    fn test_method_agreeing_route_beats_earlier_fallback() {
        let mut r = TestRouter::new();
        r.post("/items", h("store"), "store").unwrap();
        r.put("/items", h("replace"), "replace").unwrap();
        r.get("/items", h("index"), "index").unwrap();

        let m = r.match_request(&RequestParts::get("/items"), true).unwrap();
        assert_eq!(m.handler(), "index");

        // Only the first mismatched route is kept as the fallback.
        let m = r
            .match_request(&RequestParts::new("DELETE", "/items"), false)
            .unwrap();
        assert_eq!(m.handler(), "store");
        assert!(!m.is_method_allowed("DELETE"));
    }

    #[test]
    fn test_match_with_base_path() {
        let mut r = TestRouter::new().with_base_path("/app");
        r.get("/users/{id}", h("show"), "show").unwrap();

        let m = r.match_request(&RequestParts::get("/app/users/3"), true).unwrap();
        assert_eq!(m.param("id"), Some("3"));
        assert!(r.match_request(&RequestParts::get("/other/users/3"), true).is_none());
    }

    #[test]
    fn test_path_cases() {
        let cases: [(&str, &str, &[(&str, &str)], Option<&str>); 4] = [
            ("/foo", "myname", &[], Some("/foo")),
            ("/foo/{name}", "foobar", &[], None),
            ("/foo/{id}", "name", &[("id", "15")], Some("/foo/15")),
            ("/foo/{id}/{name}", "baz", &[("id", "60"), ("name", "foobar")], Some("/foo/60/foobar")),
        ];

        for (pattern, name, params, expected) in cases {
            let mut r = TestRouter::new();
            r.any(pattern, h("handler"), name).unwrap();

            match expected {
                Some(path) => assert_eq!(r.path(name, params).unwrap(), path),
                None => assert!(matches!(
                    r.path(name, params),
                    Err(RouteError::MissingOrInvalidParameter(_))
                )),
            }
            assert!(matches!(
                r.path("notfound_route_name", params),
                Err(RouteError::RouteNotFound(_))
            ));
        }
    }

    #[test]
    fn test_path_uses_base_path() {
        let mut r = TestRouter::new().with_base_path("/app/");
        r.get("/users/{id:i}", h("show"), "show").unwrap();
        let uri = r.uri("show", &HashMap::from([("id", 9)])).unwrap();
        assert_eq!(uri.path(), "/app/users/9");
    }
}
