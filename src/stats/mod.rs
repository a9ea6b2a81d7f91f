//! Ranked frequency tables over records
//!
//! Percentages are always a share of *all* records handed to
//! [`aggregate`], including records where the field is missing, so sparse
//! fields show low percentages.

pub mod dimensions;
pub mod timeline;

use crate::core::field::{FieldPath, Record, Selector, extract_value};
use crate::core::query::QueryParams;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One `(value, occurrences)` row of a frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationBucket {
    pub name: String,
    pub count: usize,
}

/// Buckets sorted by count descending, plus the percentage denominator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub buckets: Vec<AggregationBucket>,

    /// Size of the full input, including records that produced no value
    pub total_records: usize,
}

impl AggregationResult {
    /// Sum of all bucket counts
    pub fn counted(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Records that contributed to the total but not to any bucket
    pub fn skipped(&self) -> usize {
        self.total_records.saturating_sub(self.counted())
    }

    /// Share of all records for `bucket`, in percent
    pub fn percentage(&self, bucket: &AggregationBucket) -> f64 {
        percentage(bucket.count, self.total_records)
    }

    pub fn truncate(&self, limit: usize) -> AggregationResult {
        truncate(self, limit)
    }
}

/// Count occurrences of each extracted value
///
/// Records yielding no value or an empty string are skipped. Ties keep
/// first-seen order.
pub fn aggregate(records: &[Record], selector: &Selector) -> AggregationResult {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for record in records {
        match extract_value(record, selector) {
            Some(value) if !value.is_empty() => *counts.entry(value).or_insert(0) += 1,
            _ => {}
        }
    }

    let mut buckets: Vec<AggregationBucket> = counts
        .into_iter()
        .map(|(name, count)| AggregationBucket { name, count })
        .collect();
    // sort_by is stable
    buckets.sort_by(|a, b| b.count.cmp(&a.count));

    tracing::trace!(
        records = records.len(),
        buckets = buckets.len(),
        "Aggregated records"
    );

    AggregationResult {
        buckets,
        total_records: records.len(),
    }
}

/// The first `limit` buckets; ranking and denominator are unchanged
pub fn truncate(result: &AggregationResult, limit: usize) -> AggregationResult {
    AggregationResult {
        buckets: result.buckets.iter().take(limit).cloned().collect(),
        total_records: result.total_records,
    }
}

/// `count / total * 100`, or `0.0` for an empty input
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// One decimal place with a `%` suffix; `"0%"` when there are no records
pub fn format_percentage(count: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", percentage(count, total))
}

/// A "Top N" statistics page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticPage {
    /// URL slug of the page (e.g. "top-manufacturers")
    pub slug: String,

    /// Title template; "Top <n>" is replaced by the selected limit
    pub title: String,

    pub name_column_label: String,

    /// Field the page aggregates on
    pub selector: FieldPath,

    /// Grid filter parameter used when drilling down into a bucket
    ///
    /// Defaults to the dotted selector path.
    #[serde(default)]
    pub filter_query_param: Option<String>,
}

/// One rendered row of a statistics table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticRow {
    pub rank: usize,
    pub name: String,
    pub count: usize,
    pub percentage: f64,
    pub percentage_label: String,
}

/// Everything a statistics table needs to render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticView {
    pub title: String,
    pub name_column_label: String,
    pub rows: Vec<StatisticRow>,

    /// Number of distinct values before truncation
    pub aggregations_count: usize,

    pub total_records: usize,
    pub limit: usize,
}

fn top_n_regex() -> &'static Regex {
    static TOP_N: OnceLock<Regex> = OnceLock::new();
    TOP_N.get_or_init(|| Regex::new(r"Top \d+").expect("Top N pattern is a valid regex"))
}

impl StatisticPage {
    /// Title with "Top <n>" set to `limit`
    pub fn title_for(&self, limit: usize) -> String {
        top_n_regex()
            .replace(&self.title, format!("Top {}", limit).as_str())
            .into_owned()
    }

    /// Logical filter name for drill-down links
    pub fn filter_param(&self) -> String {
        self.filter_query_param
            .clone()
            .unwrap_or_else(|| self.selector.to_string())
    }

    /// Query string that opens the grid filtered to `bucket_name`
    pub fn drilldown_query(&self, bucket_name: &str) -> QueryParams {
        QueryParams::new().with(self.filter_param(), bucket_name)
    }

    pub fn aggregate(&self, records: &[Record]) -> AggregationResult {
        aggregate(records, &Selector::Path(self.selector.clone()))
    }

    /// Aggregate and truncate to `limit` rows
    pub fn view(&self, records: &[Record], limit: usize) -> StatisticView {
        let full = self.aggregate(records);
        let shown = truncate(&full, limit);
        let rows = shown
            .buckets
            .iter()
            .enumerate()
            .map(|(index, bucket)| StatisticRow {
                rank: index + 1,
                name: bucket.name.clone(),
                count: bucket.count,
                percentage: shown.percentage(bucket),
                percentage_label: format_percentage(bucket.count, shown.total_records),
            })
            .collect();

        StatisticView {
            title: self.title_for(limit),
            name_column_label: self.name_column_label.clone(),
            rows,
            aggregations_count: full.buckets.len(),
            total_records: full.total_records,
            limit,
        }
    }
}
