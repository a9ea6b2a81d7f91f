//! Bidirectional synchronisation between filter state and the URL
//!
//! Two independent triggers drive the synchronizer:
//!
//! ```text
//! navigation (back/forward, deep link) ──▶ on_navigation ──▶ FilterStateSlot::set
//! user filter edit ──────────────────────▶ on_filter_edit ──▶ Location::replace_query
//! ```
//!
//! Each direction only writes when the canonical form actually changed, so a
//! write in one direction never echoes back through the other.

pub mod memory;

pub use memory::{MemoryFilterSlot, MemoryLocation};

use crate::core::filter::FilterState;
use crate::core::query::{
    FilterParamMap, QueryParams, derive_filter_state_from_params, derive_params_from_filter_state,
};

/// The query-string portion of the current location
///
/// Writes replace the current history entry; filter tweaking must not add
/// history entries.
pub trait Location: Send + Sync {
    fn query(&self) -> QueryParams;

    fn replace_query(&self, query: QueryParams);
}

/// Holder of the current filter state (hook, store, actor, ...)
pub trait FilterStateSlot: Send + Sync {
    fn get(&self) -> FilterState;

    fn set(&self, state: FilterState);
}

/// Pure reconciliation logic for one filter parameter map
#[derive(Debug, Clone)]
pub struct FilterSynchronizer {
    map: FilterParamMap,
}

impl FilterSynchronizer {
    pub fn new(map: FilterParamMap) -> Self {
        Self { map }
    }

    pub fn param_map(&self) -> &FilterParamMap {
        &self.map
    }

    /// Initial filter state for a freshly opened view
    pub fn initial_state(&self, query: &QueryParams) -> FilterState {
        derive_filter_state_from_params(query, &self.map)
    }

    /// The URL changed: returns the new filter state, or `None` when the
    /// current state is already canonically equal to what the URL says
    pub fn on_navigation(&self, current: &FilterState, query: &QueryParams) -> Option<FilterState> {
        let next = derive_filter_state_from_params(query, &self.map);
        (!next.canonical_eq(current)).then_some(next)
    }

    /// The filter state was edited: returns the rewritten query, or `None`
    /// when the serialized query would not change
    pub fn on_filter_edit(&self, next: &FilterState, current: &QueryParams) -> Option<QueryParams> {
        let owned = derive_params_from_filter_state(next, &self.map);
        let target = current.with_owned_params(&owned, &self.map);
        (target.to_query_string() != current.to_query_string()).then_some(target)
    }
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The target side was written
    Updated,
    /// Already in sync, nothing written
    Unchanged,
}

/// A filtered view bound to its location and filter state holder
pub struct LibraryView<L, S> {
    synchronizer: FilterSynchronizer,
    location: L,
    slot: S,
}

impl<L: Location, S: FilterStateSlot> LibraryView<L, S> {
    /// Bind a view, seeding the filter state from the current URL
    pub fn open(synchronizer: FilterSynchronizer, location: L, slot: S) -> Self {
        slot.set(synchronizer.initial_state(&location.query()));
        Self {
            synchronizer,
            location,
            slot,
        }
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn filters(&self) -> FilterState {
        self.slot.get()
    }

    /// Reconcile after an external navigation event
    pub fn handle_navigation(&self) -> SyncOutcome {
        let query = self.location.query();
        match self.synchronizer.on_navigation(&self.slot.get(), &query) {
            Some(next) => {
                tracing::debug!(
                    query = %query,
                    filters = next.len(),
                    "Filter state replaced from URL"
                );
                self.slot.set(next);
                SyncOutcome::Updated
            }
            None => {
                tracing::trace!(query = %query, "Filter state already matches URL");
                SyncOutcome::Unchanged
            }
        }
    }

    /// Store a user-edited filter state and reconcile the URL
    pub fn handle_filter_edit(&self, next: FilterState) -> SyncOutcome {
        let current = self.location.query();
        let rewritten = self.synchronizer.on_filter_edit(&next, &current);
        self.slot.set(next);
        match rewritten {
            Some(query) => {
                tracing::debug!(from = %current, to = %query, "URL replaced from filter state");
                self.location.replace_query(query);
                SyncOutcome::Updated
            }
            None => {
                tracing::trace!(query = %current, "URL already matches filter state");
                SyncOutcome::Unchanged
            }
        }
    }
}
