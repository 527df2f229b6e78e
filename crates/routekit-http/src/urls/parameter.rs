//! Route parameters and the collections that hold them.
//!
//! A [`ParameterCollection`] keeps two views over the same parameters: an
//! insertion-ordered list of everything added (duplicates included) and a
//! name-keyed index that points at the last parameter added under each name.
//! [`ParameterCollection::delete`] only drops the name from the index; the
//! ordered list keeps the parameter, so [`ParameterCollection::all`] still
//! reports it. Both the match results and the declared placeholders of a
//! route are carried in this type.

use std::borrow::{Borrow, Cow};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};

/// A named value slot. The name is fixed at construction; the value is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    value: Option<String>,
}

impl Parameter {
    /// Creates a parameter with an initial (possibly absent) value.
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Returns the parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current value, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Replaces the current value.
    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }
}

/// An insertion-ordered sequence of [`Parameter`]s with a name-keyed lookup.
///
/// # Examples
///
/// ```
/// use routekit_http::{Parameter, ParameterCollection};
///
/// let mut params = ParameterCollection::new();
/// params.add(Parameter::new("id", Some("42".into())));
/// assert_eq!(params.value("id"), Some("42"));
///
/// params.delete("id");
/// assert!(!params.has("id"));
/// assert_eq!(params.all().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterCollection {
    all: Vec<Parameter>,
    by_name: HashMap<String, usize>,
}

impl ParameterCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter. A repeated name re-points the lookup at this one.
    pub fn add(&mut self, parameter: Parameter) -> &mut Parameter {
        let index = self.all.len();
        self.by_name.insert(parameter.name.clone(), index);
        self.all.push(parameter);
        &mut self.all[index]
    }

    /// Returns every parameter ever added, in insertion order.
    pub fn all(&self) -> &[Parameter] {
        &self.all
    }

    /// Whether a parameter is addressable under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Returns the last parameter added under `name`.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.by_name.get(name).map(|&index| &self.all[index])
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        let index = *self.by_name.get(name)?;
        self.all.get_mut(index)
    }

    /// Returns the value of the parameter addressable under `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Parameter::value)
    }

    /// Removes `name` from the lookup. The ordered list is left untouched.
    pub fn delete(&mut self, name: &str) -> &mut Self {
        self.by_name.remove(name);
        self
    }

    /// Number of parameters in the ordered list.
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Whether no parameter was ever added.
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Iterates `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.all.iter().map(|p| (p.name(), p.value()))
    }
}

impl FromIterator<Parameter> for ParameterCollection {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut collection = Self::new();
        for parameter in iter {
            collection.add(parameter);
        }
        collection
    }
}

impl<'a> IntoIterator for &'a ParameterCollection {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.all.iter()
    }
}

/// A source of placeholder values for URL generation.
pub trait ParameterSource {
    /// Returns the value to substitute for the placeholder `name`.
    fn parameter_value(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl<K, V, S> ParameterSource for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: Display,
    S: BuildHasher,
{
    fn parameter_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Owned(v.to_string()))
    }
}

impl ParameterSource for ParameterCollection {
    fn parameter_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.value(name).map(Cow::Borrowed)
    }
}

impl<K, V> ParameterSource for [(K, V)]
where
    K: AsRef<str>,
    V: Display,
{
    fn parameter_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.iter()
            .rev()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| Cow::Owned(v.to_string()))
    }
}

impl<K, V, const N: usize> ParameterSource for [(K, V); N]
where
    K: AsRef<str>,
    V: Display,
{
    fn parameter_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.as_slice().parameter_value(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_constructor() {
        let p = Parameter::new("foo", Some("bar".into()));
        assert_eq!(p.name(), "foo");
        assert_eq!(p.value(), Some("bar"));
    }

    #[test]
    fn test_parameter_set_value() {
        let mut p = Parameter::new("foo", Some("bar".into()));
        p.set_value(Some("foo".into()));
        assert_eq!(p.name(), "foo");
        assert_eq!(p.value(), Some("foo"));
        p.set_value(None);
        assert_eq!(p.value(), None);
    }

    #[test]
    fn test_collection_from_iter() {
        let c: ParameterCollection = vec![Parameter::new("foo", Some("bar".into()))]
            .into_iter()
            .collect();
        assert_eq!(c.all().len(), 1);
        assert!(c.has("foo"));
    }

    #[test]
    fn test_collection_get_and_delete() {
        let mut c = ParameterCollection::new();
        c.add(Parameter::new("foo", Some("bar".into())));
        assert_eq!(c.all().len(), 1);
        assert!(c.has("foo"));
        assert_eq!(c.get("foo").unwrap().value(), Some("bar"));

        c.delete("foo");
        assert!(!c.has("foo"));
        assert!(c.get("foo").is_none());
        // Deleting by name only drops the lookup entry.
        assert_eq!(c.all().len(), 1);
        assert_eq!(c.all()[0].name(), "foo");
    }

    #[test]
    fn test_collection_duplicate_names() {
        let mut c = ParameterCollection::new();
        c.add(Parameter::new("id", Some("1".into())));
        c.add(Parameter::new("id", Some("2".into())));
        assert_eq!(c.len(), 2);
        assert_eq!(c.value("id"), Some("2"));
        let values: Vec<_> = c.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![Some("1"), Some("2")]);
    }

    #[test]
    fn test_collection_get_mut() {
        let mut c = ParameterCollection::new();
        c.add(Parameter::new("id", None));
        c.get_mut("id").unwrap().set_value(Some("7".into()));
        assert_eq!(c.value("id"), Some("7"));
        assert!(c.get_mut("missing").is_none());
    }

    #[test]
    fn test_add_returns_inserted_parameter() {
        let mut c = ParameterCollection::new();
        c.add(Parameter::new("slug", None))
            .set_value(Some("hello".into()));
        assert_eq!(c.value("slug"), Some("hello"));
    }

    #[test]
    fn test_parameter_source_hashmap_display_values() {
        let mut map = HashMap::new();
        map.insert("id", 60);
        assert_eq!(map.parameter_value("id").as_deref(), Some("60"));
        assert!(map.parameter_value("name").is_none());

        let owned: HashMap<String, String> =
            HashMap::from([("name".to_string(), "abc".to_string())]);
        assert_eq!(owned.parameter_value("name").as_deref(), Some("abc"));
    }

    #[test]
    fn test_parameter_source_collection_and_pairs() {
        let mut c = ParameterCollection::new();
        c.add(Parameter::new("id", Some("9".into())));
        c.add(Parameter::new("unset", None));
        assert_eq!(c.parameter_value("id").as_deref(), Some("9"));
        assert!(c.parameter_value("unset").is_none());

        let pairs = [("id", "1"), ("id", "2")];
        assert_eq!(pairs.parameter_value("id").as_deref(), Some("2"));
        assert!(pairs.parameter_value("x").is_none());
    }
}
