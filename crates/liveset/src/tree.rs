//! Generic tree flattening and safe navigation.
//!
//! `flatten` turns an `Element` into a `serde_json::Value`: an object whose
//! keys are attribute names and child tags. Everything downstream reads the
//! project through this value and the `Lookup` trait, never through the raw
//! element tree.
//!
//! Rules:
//! - attributes are inserted first, as strings;
//! - a child element is stored under its tag; a second child with the same
//!   tag turns the entry into an array, and later ones append to it, so
//!   document order is kept;
//! - a child element whose tag equals an attribute name replaces that
//!   attribute's value (the attribute is dropped, not merged into the list);
//! - non-whitespace text is stored trimmed under `text`, unless an attribute
//!   or child already owns that key.
use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::container::Element;

/// Sentinel used wherever a lookup finds nothing.
pub const UNKNOWN: &str = "Unknown";

/// Key under which element text is stored.
pub const TEXT_KEY: &str = "text";

pub fn flatten(element: &Element) -> Value {
    let mut map = Map::new();
    for (name, value) in &element.attributes {
        map.insert(name.clone(), Value::String(value.clone()));
    }

    // Keys whose current value came from a child element rather than an
    // attribute. Only these may be promoted to a list.
    let mut from_children: HashSet<&str> = HashSet::new();
    for child in &element.children {
        let value = flatten(child);
        let tag = child.tag.as_str();
        if from_children.insert(tag) {
            map.insert(tag.to_string(), value);
            continue;
        }
        match map.get_mut(tag) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(tag.to_string(), value);
            }
        }
    }

    if let Some(text) = element.text.as_deref().map(str::trim) {
        if !text.is_empty() && !map.contains_key(TEXT_KEY) {
            map.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
        }
    }

    Value::Object(map)
}

/// Normalize a value that may hold one entry or many into a list.
///
/// `Null` (absent) yields an empty list, an array yields its elements and
/// any other value yields a single-element list.
pub fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// Safe navigation over a flattened tree. No lookup ever panics; a missing
/// key, or an intermediate value that is not an object, yields `None`.
pub trait Lookup {
    /// Follow `path` through nested objects.
    fn at(&self, path: &[&str]) -> Option<&Value>;

    /// The string at `path`, if the final value is a string.
    fn str_at(&self, path: &[&str]) -> Option<&str> {
        self.at(path).and_then(Value::as_str)
    }

    /// The string at `path`, or [`UNKNOWN`].
    fn str_or_unknown(&self, path: &[&str]) -> String {
        self.str_at(path).unwrap_or(UNKNOWN).to_string()
    }

    /// The 1-or-many entries at `path`, always as a list.
    fn list_at(&self, path: &[&str]) -> Vec<&Value> {
        as_list(self.at(path))
    }
}

impl Lookup for Value {
    fn at(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |node, key| match node {
            Value::Object(map) => map.get(*key),
            _ => None,
        })
    }
}
