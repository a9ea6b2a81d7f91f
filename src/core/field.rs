//! Field paths and value extraction from records

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A flat data item, as delivered by the data source (normally a JSON object)
pub type Record = Value;

/// An ordered list of keys addressing a value inside a [`Record`]
///
/// Parsed from and rendered as a dotted string: `"manufacturer.fullName"`
/// is the two-segment path `["manufacturer", "fullName"]`, `"deviceType"`
/// is a single key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Build a path from explicit segments
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a dotted path (`"a.b.c"`)
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.'))
    }

    /// Single-key path
    pub fn key(key: impl Into<String>) -> Self {
        Self(vec![key.into()])
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True when there is nothing to walk (empty string or only empty segments)
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|s| s.is_empty())
    }

    /// Walk the path, stopping at the first missing key, null or non-object
    pub fn resolve<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        let mut current = record;
        for segment in &self.0 {
            current = current.as_object()?.get(segment)?;
            if current.is_null() {
                return None;
            }
        }
        Some(current)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

impl From<String> for FieldPath {
    fn from(dotted: String) -> Self {
        Self::parse(&dotted)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dotted = String::deserialize(deserializer)?;
        Ok(Self::parse(&dotted))
    }
}

/// Caller-supplied value extractor (derived or joined fields)
pub type Extractor = Arc<dyn Fn(&Record) -> Option<String> + Send + Sync>;

/// How to pull a bucket key out of a record
#[derive(Clone)]
pub enum Selector {
    /// A single top-level key
    Key(String),
    /// A nested path
    Path(FieldPath),
    /// A custom extractor, takes precedence over path resolution
    Extractor(Extractor),
}

impl Selector {
    /// Wrap a closure as an extractor selector
    pub fn extractor<F>(f: F) -> Self
    where
        F: Fn(&Record) -> Option<String> + Send + Sync + 'static,
    {
        Selector::Extractor(Arc::new(f))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Selector::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Selector::Extractor(_) => f.write_str("Extractor(..)"),
        }
    }
}

impl From<&str> for Selector {
    fn from(key: &str) -> Self {
        Selector::Key(key.to_string())
    }
}

impl From<FieldPath> for Selector {
    fn from(path: FieldPath) -> Self {
        Selector::Path(path)
    }
}

/// Render a scalar leaf as a bucket key
///
/// Strings are returned as-is (no case or whitespace normalisation), numbers
/// and booleans use their display form. Null, arrays and objects have no
/// scalar form.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Extract the value addressed by `selector` from `record`
///
/// Never panics: unresolvable paths yield `None`.
pub fn extract_value(record: &Record, selector: &Selector) -> Option<String> {
    match selector {
        Selector::Extractor(extract) => extract(record),
        Selector::Key(key) => record.get(key.as_str()).and_then(scalar_to_string),
        Selector::Path(path) => path.resolve(record).and_then(scalar_to_string),
    }
}
