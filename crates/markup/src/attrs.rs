//! Ordered attribute set keyed by namespace-qualified name.
//!
//! Determinism contract:
//! - Iteration is encounter order; replacing a value keeps the original position.
//! - Keys are unique. Building from an iterator keeps the first occurrence of a
//!   duplicate (HTML tokenizer "first-wins" behavior).
//! - The `with_*` / `take` operations consume the set and hand back the new one,
//!   so rewrites compose as a pipeline of values.

use crate::types::{Namespace, QName};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attrs {
    items: Vec<(QName, String)>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &QName) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Lookup of a namespace-less attribute, ASCII case-insensitive.
    pub fn get_plain(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| k.is_plain(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &QName) -> bool {
        self.items.iter().any(|(k, _)| k == name)
    }

    /// True when at least one attribute lives in `ns`.
    pub fn any_in(&self, ns: &Namespace) -> bool {
        self.items.iter().any(|(k, _)| ns.contains(k))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QName, &str)> + '_ {
        self.items.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &QName> + '_ {
        self.items.iter().map(|(k, _)| k)
    }

    /// Set `name`, replacing an existing value in place or appending.
    pub fn set(&mut self, name: QName, value: impl Into<String>) {
        let value = value.into();
        match self.items.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.items.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &QName) -> Option<String> {
        let index = self.items.iter().position(|(k, _)| k == name)?;
        Some(self.items.remove(index).1)
    }

    pub fn with_set(mut self, name: QName, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_removed(mut self, name: &QName) -> Self {
        self.remove(name);
        self
    }

    /// Remove `name` and return the set together with the removed value.
    pub fn take(mut self, name: &QName) -> (Self, Option<String>) {
        let value = self.remove(name);
        (self, value)
    }

    /// Split off every attribute in `ns`, preserving order on both sides.
    pub fn partition_namespace(self, ns: &Namespace) -> (Self, Self) {
        let (inside, outside): (Vec<_>, Vec<_>) =
            self.items.into_iter().partition(|(k, _)| ns.contains(k));
        (Self { items: outside }, Self { items: inside })
    }
}

impl FromIterator<(QName, String)> for Attrs {
    fn from_iter<T: IntoIterator<Item = (QName, String)>>(iter: T) -> Self {
        let mut attrs = Attrs::new();
        for (name, value) in iter {
            if !attrs.contains(&name) {
                attrs.items.push((name, value));
            }
        }
        attrs
    }
}
