//! Column visibility preferences
//!
//! Visibility is persisted as a JSON object (`{"author": false, ...}`) under
//! a single preference key, the same shape browsers keep in local storage.

use super::error::PreferenceError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

/// Key/value store for persisted view preferences
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: String);
}

/// In-memory preference store
#[derive(Clone, Default)]
pub struct InMemoryPreferences {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }
}

/// Per-column visibility; columns without an entry are visible
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnVisibility(BTreeMap<String, bool>);

impl ColumnVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, column: &str) -> bool {
        self.0.get(column).copied().unwrap_or(true)
    }

    pub fn set(&mut self, column: impl Into<String>, visible: bool) {
        self.0.insert(column.into(), visible);
    }

    /// Flip a column and return its new visibility
    pub fn toggle(&mut self, column: &str) -> bool {
        let visible = !self.is_visible(column);
        self.set(column, visible);
        visible
    }

    pub fn hidden(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, visible)| !**visible)
            .map(|(column, _)| column.as_str())
    }

    /// Parse a stored JSON value
    pub fn from_json(key: &str, json: &str) -> Result<Self, PreferenceError> {
        serde_json::from_str(json).map_err(|e| PreferenceError::Malformed {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Restore from `store`, falling back to `defaults` when absent or malformed
    pub fn load(store: &dyn PreferenceStore, key: &str, defaults: &ColumnVisibility) -> Self {
        let Some(raw) = store.get(key) else {
            return defaults.clone();
        };
        match Self::from_json(key, &raw) {
            Ok(visibility) => visibility,
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring stored column visibility");
                defaults.clone()
            }
        }
    }

    pub fn save(&self, store: &dyn PreferenceStore, key: &str) -> Result<(), PreferenceError> {
        let json = serde_json::to_string(self).map_err(|e| PreferenceError::Serialization {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        store.set(key, json);
        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for ColumnVisibility {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
