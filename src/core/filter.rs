//! Column filter state and canonicalization

use super::field::{FieldPath, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The value of one column filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FilterValue {
    /// Single-value filter (text or select)
    Scalar(String),
    /// Multi-select filter, treated as an unordered set
    Multi(Vec<String>),
    /// No value
    #[default]
    Empty,
}

impl FilterValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        FilterValue::Scalar(value.into())
    }

    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::Multi(values.into_iter().map(Into::into).collect())
    }

    /// True when the canonical form is empty
    pub fn is_empty(&self) -> bool {
        normalize_filter_value(self).is_empty()
    }

    /// Individual values to match against (a scalar is a one-element set)
    pub fn values(&self) -> Vec<&str> {
        match self {
            FilterValue::Scalar(s) => vec![s.as_str()],
            FilterValue::Multi(values) => values.iter().map(String::as_str).collect(),
            FilterValue::Empty => Vec::new(),
        }
    }
}

impl From<&Value> for FilterValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FilterValue::Empty,
            Value::String(s) => FilterValue::Scalar(s.clone()),
            Value::Array(items) => FilterValue::Multi(items.iter().map(value_to_string).collect()),
            other => FilterValue::Scalar(other.to_string()),
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Canonical string form of a filter value
///
/// Multi values are sorted lexicographically and comma-joined, empty values
/// become `""`, scalars are returned unchanged.
pub fn normalize_filter_value(value: &FilterValue) -> String {
    match value {
        FilterValue::Scalar(s) => s.clone(),
        FilterValue::Multi(values) => {
            let mut sorted: Vec<&str> = values.iter().map(String::as_str).collect();
            sorted.sort_unstable();
            sorted.join(",")
        }
        FilterValue::Empty => String::new(),
    }
}

/// One active column filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEntry {
    /// Field path of the filtered column
    pub field: FieldPath,
    pub value: FilterValue,
}

impl FilterEntry {
    pub fn new(field: impl Into<FieldPath>, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

/// How a column filter matches a cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Exact string equality (select filters)
    Equals,
    /// Case-insensitive substring (text filters)
    #[default]
    Contains,
    /// Cell is an array; any element contains the filter case-insensitively
    AnyContains,
}

impl MatchMode {
    /// Check a single filter value against a cell
    pub fn matches(self, cell: &Value, filter: &str) -> bool {
        match self {
            MatchMode::Equals => cell_string(cell).is_some_and(|s| s == filter),
            MatchMode::Contains => cell_string(cell).is_some_and(|s| contains_ci(&s, filter)),
            MatchMode::AnyContains => cell.as_array().is_some_and(|items| {
                items
                    .iter()
                    .any(|item| contains_ci(&value_to_string(item), filter))
            }),
        }
    }

    /// Filter terms to try against a cell
    ///
    /// Select and array columns also try each comma-separated part of a
    /// scalar: that is how a multi value comes back from the URL.
    fn terms(self, value: &FilterValue) -> Vec<&str> {
        let mut terms = value.values();
        if let (MatchMode::Equals | MatchMode::AnyContains, FilterValue::Scalar(s)) = (self, value)
            && s.contains(',')
        {
            terms.extend(s.split(',').filter(|part| !part.is_empty()));
        }
        terms
    }
}

fn cell_string(cell: &Value) -> Option<String> {
    match cell {
        Value::Null | Value::Array(_) | Value::Object(_) => None,
        other => Some(value_to_string(other)),
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Ordered list of active filters, at most one per field path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    entries: Vec<FilterEntry>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, field: &FieldPath) -> Option<&FilterValue> {
        self.entries
            .iter()
            .find(|e| &e.field == field)
            .map(|e| &e.value)
    }

    /// Assign a filter, replacing any existing entry for the same field in place
    pub fn set(&mut self, field: impl Into<FieldPath>, value: FilterValue) {
        let field = field.into();
        match self.entries.iter_mut().find(|e| e.field == field) {
            Some(existing) => existing.value = value,
            None => self.entries.push(FilterEntry { field, value }),
        }
    }

    /// Builder-style [`FilterState::set`]
    pub fn with(mut self, field: impl Into<FieldPath>, value: FilterValue) -> Self {
        self.set(field, value);
        self
    }

    pub fn remove(&mut self, field: &FieldPath) -> Option<FilterValue> {
        let index = self.entries.iter().position(|e| &e.field == field)?;
        Some(self.entries.remove(index).value)
    }

    /// `(field, normalized value)` pairs sorted by field, empty values dropped
    pub fn canonical(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|e| (e.field.to_string(), normalize_filter_value(&e.value)))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        pairs.sort();
        pairs
    }

    /// Order-independent equality on normalized values
    pub fn canonical_eq(&self, other: &FilterState) -> bool {
        self.canonical() == other.canonical()
    }

    /// True when `record` passes every active filter
    ///
    /// Columns without an entry in `modes` use [`MatchMode::Contains`].
    pub fn matches(&self, record: &Record, modes: &HashMap<FieldPath, MatchMode>) -> bool {
        self.entries.iter().all(|entry| {
            let values = entry.value.values();
            if values.iter().all(|v| v.is_empty()) {
                return true;
            }
            let Some(cell) = entry.field.resolve(record) else {
                return false;
            };
            let mode = modes.get(&entry.field).copied().unwrap_or_default();
            mode.terms(&entry.value)
                .iter()
                .any(|term| mode.matches(cell, term))
        })
    }

    /// Records that pass every active filter, in input order
    pub fn apply<'a>(
        &self,
        records: &'a [Record],
        modes: &HashMap<FieldPath, MatchMode>,
    ) -> Vec<&'a Record> {
        records
            .iter()
            .filter(|record| self.matches(record, modes))
            .collect()
    }
}

impl FromIterator<FilterEntry> for FilterState {
    fn from_iter<I: IntoIterator<Item = FilterEntry>>(iter: I) -> Self {
        let mut state = FilterState::new();
        for entry in iter {
            state.set(entry.field, entry.value);
        }
        state
    }
}
