//! In-memory location and filter state holders for tests and headless hosts

use super::{FilterStateSlot, Location};
use crate::core::filter::FilterState;
use crate::core::query::QueryParams;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory location
///
/// Tracks how many times the query was replaced so hosts and tests can
/// verify that reconciliation does not write redundantly.
#[derive(Clone, Default)]
pub struct MemoryLocation {
    inner: Arc<RwLock<LocationState>>,
}

#[derive(Default)]
struct LocationState {
    query: QueryParams,
    replacements: usize,
}

impl MemoryLocation {
    pub fn new(query: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(LocationState {
                query: QueryParams::parse(query),
                replacements: 0,
            })),
        }
    }

    /// Simulate an external navigation (back/forward, pasted link)
    ///
    /// Not counted as a replacement.
    pub fn navigate(&self, query: &str) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.query = QueryParams::parse(query);
    }

    /// Number of [`Location::replace_query`] calls so far
    pub fn replacements(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .replacements
    }

    pub fn query_string(&self) -> String {
        self.query().to_query_string()
    }
}

impl Location for MemoryLocation {
    fn query(&self) -> QueryParams {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .query
            .clone()
    }

    fn replace_query(&self, query: QueryParams) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.query = query;
        state.replacements += 1;
    }
}

/// In-memory filter state holder
#[derive(Clone, Default)]
pub struct MemoryFilterSlot {
    inner: Arc<RwLock<SlotState>>,
}

#[derive(Default)]
struct SlotState {
    filters: FilterState,
    writes: usize,
}

impl MemoryFilterSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of [`FilterStateSlot::set`] calls so far
    pub fn writes(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .writes
    }
}

impl FilterStateSlot for MemoryFilterSlot {
    fn get(&self) -> FilterState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .filters
            .clone()
    }

    fn set(&self, filters: FilterState) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.filters = filters;
        state.writes += 1;
    }
}
