//! Query-string parameters and their mapping to filter state
//!
//! The URL is the shareable form of a filtered view. Only parameter names
//! that appear as keys of a [`FilterParamMap`] are owned by the filter
//! synchronizer; every other parameter passes through untouched.
//!
//! # Example
//! ```rust,ignore
//! let map = FilterParamMap::new()
//!     .with("manufacturer", "manufacturer.fullName")
//!     .with("deviceType", "deviceType");
//!
//! let query = QueryParams::parse("manufacturer=Acme&foo=bar");
//! let state = derive_filter_state_from_params(&query, &map);
//! // [{ field: manufacturer.fullName, value: "Acme" }]
//!
//! let owned = derive_params_from_filter_state(&state, &map);
//! assert_eq!(query.with_owned_params(&owned, &map).to_query_string(), "foo=bar&manufacturer=Acme");
//! ```

use super::field::FieldPath;
use super::filter::{FilterState, FilterValue, normalize_filter_value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

/// Ordered list of query-string parameters
///
/// Keeps the order and multiplicity of the original string so that
/// parameters the synchronizer does not own round-trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` string (leading `?` allowed)
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// Set `name` to a single value, keeping the position of its first occurrence
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| *k == name) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = false;
                self.pairs.retain(|(k, _)| {
                    if *k != name {
                        return true;
                    }
                    let keep = !seen;
                    seen = true;
                    keep
                });
            }
            None => self.pairs.push((name, value)),
        }
    }

    /// Builder-style [`QueryParams::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) {
        self.pairs.retain(|(k, _)| k != name);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialize without a leading `?`
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Rewrite the parameters owned by `map`, leaving all others untouched
    ///
    /// Unowned parameters keep their relative order and come first; the
    /// owned parameters from `owned` follow in the order given (already
    /// sorted by [`derive_params_from_filter_state`]).
    pub fn with_owned_params(&self, owned: &QueryParams, map: &FilterParamMap) -> QueryParams {
        let mut pairs: Vec<(String, String)> = self
            .pairs
            .iter()
            .filter(|(k, _)| !map.contains(k))
            .cloned()
            .collect();
        pairs.extend(owned.pairs.iter().filter(|(k, _)| map.contains(k)).cloned());
        QueryParams { pairs }
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Mapping from logical (URL) filter names to record field paths
///
/// Iteration follows insertion order. Field paths are not required to be
/// unique; reverse lookup returns the first logical name in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterParamMap(IndexMap<String, FieldPath>);

impl FilterParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mapping; an existing logical name keeps its position
    pub fn insert(&mut self, name: impl Into<String>, field: impl Into<FieldPath>) {
        self.0.insert(name.into(), field.into());
    }

    pub fn with(mut self, name: impl Into<String>, field: impl Into<FieldPath>) -> Self {
        self.insert(name, field);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldPath> {
        self.0.get(name)
    }

    /// First logical name mapped to `field`
    pub fn logical_name(&self, field: &FieldPath) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, f)| *f == field)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldPath)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FilterParamMap
where
    K: Into<String>,
    V: Into<FieldPath>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Build filter state from the URL
///
/// One entry per mapped parameter that is present and non-empty, in map
/// order. Values are opaque strings: no splitting, no type coercion.
pub fn derive_filter_state_from_params(params: &QueryParams, map: &FilterParamMap) -> FilterState {
    map.iter()
        .filter_map(|(name, field)| {
            params
                .get(name)
                .filter(|value| !value.is_empty())
                .map(|value| (field.clone(), FilterValue::scalar(value)))
        })
        .fold(FilterState::new(), |state, (field, value)| {
            state.with(field, value)
        })
}

/// Build the owned URL parameters for a filter state
///
/// Entries whose field has no logical name, or whose value normalizes to
/// the empty string, are dropped. The result is sorted by logical name.
pub fn derive_params_from_filter_state(state: &FilterState, map: &FilterParamMap) -> QueryParams {
    let mut by_name: Vec<(String, String)> = Vec::new();
    for entry in state.entries() {
        let Some(name) = map.logical_name(&entry.field) else {
            continue;
        };
        let value = normalize_filter_value(&entry.value);
        if value.is_empty() {
            continue;
        }
        by_name.push((name.to_string(), value));
    }
    by_name.sort_by(|(a, _), (b, _)| a.cmp(b));
    QueryParams { pairs: by_name }
}
