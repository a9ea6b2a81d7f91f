//! # powerdash
//!
//! State and analytics core for browsing a library of device power profiles.
//!
//! ## Features
//!
//! - **URL-Synchronized Filters**: Column filters round-trip through the query string
//! - **Canonical Filter State**: Order-independent comparison of multi-value filters
//! - **Loop-Free Reconciliation**: URL and filter state only write on real changes
//! - **Ranked Aggregations**: Frequency tables with stable tie-breaks and top-N truncation
//! - **Time Series**: Profile counts per day, week, month or year
//! - **Configuration-Based**: Filter params, columns and statistics pages from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use powerdash::prelude::*;
//!
//! let config = DashboardConfig::default_config();
//! let records = LibraryDocument::from_json_str(&json)?.records()?;
//!
//! // Grid view bound to the current URL
//! let view = LibraryView::open(
//!     FilterSynchronizer::new(config.filter_params.clone()),
//!     MemoryLocation::new("?manufacturer=Signify&tab=grid"),
//!     MemoryFilterSlot::new(),
//! );
//! let visible = view.filters().apply(&records, &config.match_modes());
//!
//! // Statistics page
//! let page = config.statistic("top-manufacturers").unwrap();
//! let table = page.view(&records, 20);
//! ```

pub mod config;
pub mod core;
pub mod library;
pub mod stats;
pub mod sync;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ConfigError, DashError, DashResult, LibraryError, PreferenceError},
        field::{FieldPath, Record, Selector, extract_value},
        filter::{FilterEntry, FilterState, FilterValue, MatchMode, normalize_filter_value},
        query::{
            FilterParamMap, QueryParams, derive_filter_state_from_params,
            derive_params_from_filter_state,
        },
        visibility::{ColumnVisibility, InMemoryPreferences, PreferenceStore},
    };

    // === Synchronization ===
    pub use crate::sync::{
        FilterStateSlot, FilterSynchronizer, LibraryView, Location, MemoryFilterSlot,
        MemoryLocation, SyncOutcome,
    };

    // === Statistics ===
    pub use crate::stats::{
        AggregationBucket, AggregationResult, StatisticPage, StatisticRow, StatisticView,
        aggregate, format_percentage, percentage, truncate,
        dimensions::{
            DimensionCount, Metric, SeriesPoint, dimension_title, group_by_dimension,
            ranked_series,
        },
        timeline::{
            ChartPoint, TimePeriod, dates_from_records, profiles_over_time, weekly_contributions,
        },
    };

    // === Library ===
    pub use crate::library::{Author, LibraryDocument, PowerProfile, profiles_to_records};

    // === Config ===
    pub use crate::config::{ColumnConfig, DashboardConfig};

    // === External dependencies ===
    pub use serde::{Deserialize, Serialize};
}
