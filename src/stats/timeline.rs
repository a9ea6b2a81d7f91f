//! Profile counts over time

use crate::core::field::{FieldPath, Record};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bucket width of a time series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl TimePeriod {
    /// First day of the period containing `date` (weeks start on Sunday)
    pub fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            TimePeriod::Day => date,
            TimePeriod::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
            }
            TimePeriod::Month => date.with_day(1).unwrap_or(date),
            TimePeriod::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// Bucket key: `YYYY-MM-DD` for day and week, `YYYY-MM` for month, `YYYY` for year
    ///
    /// Keys of one period sort chronologically as plain strings.
    pub fn key(self, date: NaiveDate) -> String {
        let start = self.start_of(date);
        match self {
            TimePeriod::Day | TimePeriod::Week => start.format("%Y-%m-%d").to_string(),
            TimePeriod::Month => start.format("%Y-%m").to_string(),
            TimePeriod::Year => format!("{:04}", start.year()),
        }
    }

    fn next(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimePeriod::Day => date.checked_add_signed(Duration::days(1)),
            TimePeriod::Week => date.checked_add_signed(Duration::days(7)),
            TimePeriod::Month => date.checked_add_months(Months::new(1)),
            TimePeriod::Year => date.checked_add_months(Months::new(12)),
        }
    }
}

/// One point of a time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub count: usize,
}

fn to_points(counts: BTreeMap<String, usize>) -> Vec<ChartPoint> {
    counts
        .into_iter()
        .map(|(date, count)| ChartPoint { date, count })
        .collect()
}

/// Counts per period from the earliest date up to `today`, gaps filled with zero
pub fn profiles_over_time(
    dates: &[NaiveDate],
    period: TimePeriod,
    today: NaiveDate,
) -> Vec<ChartPoint> {
    let Some(earliest) = dates.iter().min() else {
        return Vec::new();
    };

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut cursor = Some(period.start_of(*earliest));
    while let Some(current) = cursor.filter(|c| *c <= today) {
        counts.insert(period.key(current), 0);
        cursor = period.next(current);
    }

    for date in dates {
        *counts.entry(period.key(*date)).or_insert(0) += 1;
    }

    to_points(counts)
}

/// Contributions per Sunday-started week, without gap filling
pub fn weekly_contributions(dates: &[NaiveDate]) -> Vec<ChartPoint> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for date in dates {
        *counts.entry(TimePeriod::Week.key(*date)).or_insert(0) += 1;
    }
    to_points(counts)
}

/// Parse a timestamp as delivered by the library API
///
/// Accepts RFC 3339, naive date-times and plain dates.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Dates found at `field` in each record; unparseable values are skipped
pub fn dates_from_records(records: &[Record], field: &FieldPath) -> Vec<NaiveDate> {
    records
        .iter()
        .filter_map(|record| field.resolve(record)?.as_str())
        .filter_map(parse_date)
        .collect()
}
