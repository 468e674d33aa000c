//! Helpers for shaping values and binding lists.
//!
//! Everything here is a pure function; the builder and the compiler both lean
//! on these to keep the binding lists in step with the rendered SQL.

use crate::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Clause category a binding belongs to.
///
/// The declaration order is the order placeholders appear in a compiled
/// SELECT, so iterating a [`Bindings`] map yields values in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingCategory {
    Select,
    Join,
    Where,
    Having,
    Order,
}

impl BindingCategory {
    pub const ALL: [BindingCategory; 5] = [
        BindingCategory::Select,
        BindingCategory::Join,
        BindingCategory::Where,
        BindingCategory::Having,
        BindingCategory::Order,
    ];
}

/// Bindings grouped by category
pub type Bindings = BTreeMap<BindingCategory, Vec<Value>>;

/// An empty map with every category present
pub fn empty_bindings() -> Bindings {
    BindingCategory::ALL
        .iter()
        .map(|category| (*category, Vec::new()))
        .collect()
}

/// Turn a single value into a list: arrays are unpacked, null becomes empty.
pub fn wrap(value: Value) -> Vec<Value> {
    match value {
        Value::Array(values) => values,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Recursively unpack nested arrays into one flat list.
pub fn flatten<I>(values: I) -> Vec<Value>
where
    I: IntoIterator<Item = Value>,
{
    let mut flat = Vec::new();
    for value in values {
        match value {
            Value::Array(inner) => flat.extend(flatten(inner)),
            other => flat.push(other),
        }
    }
    flat
}

/// First scalar of a possibly nested value; an empty array yields null.
pub fn head(value: Value) -> Value {
    match value {
        Value::Array(inner) => flatten(inner).into_iter().next().unwrap_or(Value::Null),
        other => other,
    }
}

/// Drop raw expressions; they are spliced into SQL and never bound.
pub fn clean<I>(values: I) -> Vec<Value>
where
    I: IntoIterator<Item = Value>,
{
    values.into_iter().filter(|value| !value.is_raw()).collect()
}

/// Whether any element is itself a list
pub fn has_nested_arrays(values: &[Value]) -> bool {
    values.iter().any(Value::is_array)
}

/// Copy of `map` without the given keys.
pub fn except<K, V>(map: &BTreeMap<K, V>, keys: &[K]) -> BTreeMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    map.iter()
        .filter(|(key, _)| !keys.contains(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Append every list of `other` onto the matching list of `into`.
pub fn merge<K, V>(into: &mut BTreeMap<K, Vec<V>>, other: &BTreeMap<K, Vec<V>>)
where
    K: Ord + Clone,
    V: Clone,
{
    for (key, values) in other {
        into.entry(key.clone())
            .or_default()
            .extend(values.iter().cloned());
    }
}

/// Concatenate the lists of a map in key order.
pub fn flatten_map<K, V>(map: &BTreeMap<K, Vec<V>>) -> Vec<V>
where
    V: Clone,
{
    map.values().flat_map(|values| values.iter().cloned()).collect()
}
