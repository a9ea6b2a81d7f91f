//! Usage counts per analytics dimension

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the upstream dimension counts endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionCount {
    /// Dimension name, e.g. `by_device_type`
    pub dimension: String,
    pub key_name: String,

    /// Sensor instances
    #[serde(default)]
    pub count: u64,

    /// Unique installations
    #[serde(default)]
    pub installation_count: u64,
}

/// Which counter to rank by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Count,
    #[default]
    InstallationCount,
}

impl Metric {
    pub fn of(self, row: &DimensionCount) -> u64 {
        match self {
            Metric::Count => row.count,
            Metric::InstallationCount => row.installation_count,
        }
    }
}

/// A chart slice for one dimension key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    /// `"{dimension}:{key_name}"`, unique across dimensions
    pub id: String,
    pub label: String,
    pub value: u64,
}

/// Rows grouped by dimension; dimensions sorted, rows keep input order
pub fn group_by_dimension(rows: &[DimensionCount]) -> BTreeMap<String, Vec<DimensionCount>> {
    let mut groups: BTreeMap<String, Vec<DimensionCount>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(row.dimension.clone())
            .or_default()
            .push(row.clone());
    }
    groups
}

/// Rows ranked by `metric` descending, zero values dropped
pub fn ranked_series(rows: &[DimensionCount], metric: Metric) -> Vec<SeriesPoint> {
    let mut sorted: Vec<&DimensionCount> = rows.iter().collect();
    sorted.sort_by(|a, b| metric.of(b).cmp(&metric.of(a)));
    sorted
        .into_iter()
        .filter(|row| metric.of(row) > 0)
        .map(|row| SeriesPoint {
            id: format!("{}:{}", row.dimension, row.key_name),
            label: row.key_name.clone(),
            value: metric.of(row),
        })
        .collect()
}

/// Human title for a dimension: `by_device_type` → `Device Type`
pub fn dimension_title(dimension: &str) -> String {
    let name = dimension.replacen("by_", "", 1).replace('_', " ");
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
