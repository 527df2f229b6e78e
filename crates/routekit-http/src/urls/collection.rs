//! The ordered route table with a name index.
//!
//! Routes keep their registration order forever; dispatch scans them in that
//! order. Named routes are additionally indexed by name, and a non-empty name
//! can only be indexed once.

use std::collections::HashMap;

use routekit_core::{RouteError, RouteResult};

use super::route::Route;

/// An ordered list of routes plus a name -> route index.
///
/// Unnamed routes take part in dispatch but can never be looked up, removed,
/// or replaced by name. [`remove`](Self::remove) only drops the name from the
/// index: the route stays in [`all`](Self::all) and keeps matching.
#[derive(Debug, Clone)]
pub struct RouteCollection<H> {
    routes: Vec<Route<H>>,
    named: HashMap<String, usize>,
}

impl<H> Default for RouteCollection<H> {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            named: HashMap::new(),
        }
    }
}

impl<H> RouteCollection<H> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection by adding each route in turn.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::DuplicateRouteName`] on the first repeated name.
    pub fn try_from_routes<I>(routes: I) -> RouteResult<Self>
    where
        I: IntoIterator<Item = Route<H>>,
    {
        let mut collection = Self::new();
        for route in routes {
            collection.add(route)?;
        }
        Ok(collection)
    }

    /// Appends a route.
    ///
    /// The route is always appended to the ordered list. A non-empty name is
    /// then entered into the index.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::DuplicateRouteName`] if the name is already
    /// indexed. The route has still been appended and takes part in dispatch.
    pub fn add(&mut self, route: Route<H>) -> RouteResult<&mut Self> {
        self.insert(route)?;
        Ok(self)
    }

    /// Like [`add`](Self::add), but returns the stored route.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::DuplicateRouteName`] if the name is already indexed.
    pub fn insert(&mut self, route: Route<H>) -> RouteResult<&Route<H>> {
        let index = self.routes.len();
        let name = route.name().to_string();
        self.routes.push(route);

        if !name.is_empty() {
            if self.named.contains_key(&name) {
                tracing::warn!(name = %name, "duplicate route name rejected");
                return Err(RouteError::DuplicateRouteName(name));
            }
            self.named.insert(name, index);
        }

        Ok(&self.routes[index])
    }

    /// Returns the route registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::RouteNotFound`] if no route has that name.
    pub fn get(&self, name: &str) -> RouteResult<&Route<H>> {
        self.named
            .get(name)
            .map(|&index| &self.routes[index])
            .ok_or_else(|| RouteError::RouteNotFound(name.to_string()))
    }

    /// Whether a route is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    /// Drops `name` from the index and returns the route it pointed at.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::RouteNotFound`] if no route has that name.
    pub fn remove(&mut self, name: &str) -> RouteResult<&Route<H>> {
        let index = self
            .named
            .remove(name)
            .ok_or_else(|| RouteError::RouteNotFound(name.to_string()))?;
        Ok(&self.routes[index])
    }

    /// Returns every route, named or not, in registration order.
    pub fn all(&self) -> &[Route<H>] {
        &self.routes
    }

    /// Iterates routes in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Route<H>> {
        self.routes.iter()
    }

    /// Number of routes in the ordered list.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the collection holds no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Removes every route and every name.
    pub fn clear(&mut self) {
        self.routes.clear();
        self.named.clear();
    }
}

impl<'a, H> IntoIterator for &'a RouteCollection<H> {
    type Item = &'a Route<H>;
    type IntoIter = std::slice::Iter<'a, Route<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
