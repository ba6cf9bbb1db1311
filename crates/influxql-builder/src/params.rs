//! Named parameter storage and placeholder tokens.

use crate::error::QueryResult;
use crate::value::ParamValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter key for `GROUP BY`.
pub const GROUP_BY: &str = "group_by";
/// Parameter key for `LIMIT`.
pub const LIMIT: &str = "limit";
/// Parameter key for `OFFSET`.
pub const OFFSET: &str = "offset";
/// Parameter key for the lower time bound.
pub const START_DATE: &str = "start_date";
/// Parameter key for the upper time bound.
pub const END_DATE: &str = "end_date";

/// Render the placeholder token for `name`: `%{name}`.
pub fn placeholder(name: &str) -> String {
    format!("%{{{}}}", name)
}

/// Collect the names of every `%{name}` token in `template`, in order of
/// appearance. `%%` is treated as an escaped percent sign.
pub fn placeholders_in(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        let after = &rest[pos + 1..];
        if let Some(stripped) = after.strip_prefix('%') {
            rest = stripped;
            continue;
        }
        match after.strip_prefix('{').and_then(|s| s.find('}').map(|end| (s, end))) {
            Some((inner, end)) => {
                names.push(&inner[..end]);
                rest = &inner[end + 1..];
            }
            None => rest = after,
        }
    }
    names
}

/// Mapping from placeholder name to the value substituted downstream.
///
/// Keys are unique; inserting an existing key overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamMap {
    params: BTreeMap<String, ParamValue>,
}

impl ParamMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` under `name`, returning the previous value if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.params.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over `(name, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy every entry of `other` into this map, overwriting shared keys.
    pub fn extend(&mut self, other: &ParamMap) {
        self.params
            .extend(other.params.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Encode as a JSON object, the shape InfluxDB's HTTP `params` argument takes.
    pub fn to_json(&self) -> QueryResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<K, V> FromIterator<(K, V)> for ParamMap
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParamMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
