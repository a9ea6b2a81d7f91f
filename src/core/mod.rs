//! Core module containing the filter, query and field primitives

pub mod error;
pub mod field;
pub mod filter;
pub mod query;
pub mod visibility;

pub use error::{ConfigError, DashError, DashResult, LibraryError, PreferenceError};
pub use field::{FieldPath, Record, Selector, extract_value};
pub use filter::{FilterEntry, FilterState, FilterValue, MatchMode, normalize_filter_value};
pub use query::{
    FilterParamMap, QueryParams, derive_filter_state_from_params, derive_params_from_filter_state,
};
pub use visibility::{ColumnVisibility, InMemoryPreferences, PreferenceStore};
