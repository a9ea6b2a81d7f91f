//! Frequency table invariants over realistic record sets

use powerdash::prelude::*;
use serde_json::{Value, json};

fn records() -> Vec<Value> {
    vec![
        json!({"manufacturer": {"fullName": "Acme"}, "deviceType": "light", "author": "alice"}),
        json!({"manufacturer": {"fullName": "Zeta"}, "deviceType": "light"}),
        json!({
            "manufacturer": {"fullName": "Acme"},
            "deviceType": "smart_switch",
            "author": "bob"
        }),
        json!({"manufacturer": {"fullName": "Bolt"}, "deviceType": "light", "author": "alice"}),
        json!({"manufacturer": {"fullName": "Zeta"}, "deviceType": "fan", "author": ""}),
        json!({"manufacturer": null, "deviceType": "light"}),
    ]
}

#[test]
fn test_counts_never_exceed_total() {
    let records = records();
    for path in ["manufacturer.fullName", "deviceType", "author", "missing.path"] {
        let result = aggregate(&records, &Selector::from(FieldPath::parse(path)));
        assert_eq!(result.total_records, records.len());
        assert_eq!(result.counted() + result.skipped(), records.len());
        assert!(result.buckets.iter().all(|b| b.count >= 1));
    }
}

#[test]
fn test_nested_path_produces_buckets() {
    let records = records();
    let result = aggregate(&records, &Selector::from(FieldPath::parse("manufacturer.fullName")));
    assert_eq!(result.buckets.len(), 3);
    assert_eq!(result.counted(), 5);
    assert_eq!(result.skipped(), 1);
}

#[test]
fn test_key_selector_does_not_split_dots() {
    let records = vec![
        json!({"a.b": "flat"}),
        json!({"a": {"b": "nested"}}),
    ];
    let by_key = aggregate(&records, &Selector::from("a.b"));
    assert_eq!(by_key.buckets.len(), 1);
    assert_eq!(by_key.buckets[0].name, "flat");

    let by_path = aggregate(&records, &Selector::from(FieldPath::parse("a.b")));
    assert_eq!(by_path.buckets.len(), 1);
    assert_eq!(by_path.buckets[0].name, "nested");
}

#[test]
fn test_buckets_sorted_with_stable_ties() {
    let result = aggregate(&records(), &Selector::from(FieldPath::parse("manufacturer.fullName")));
    let names: Vec<&str> = result.buckets.iter().map(|b| b.name.as_str()).collect();
    // Acme and Zeta tie; Acme was seen first
    assert_eq!(names, vec!["Acme", "Zeta", "Bolt"]);
    assert_eq!(result.skipped(), 1);
}

#[test]
fn test_empty_strings_are_skipped() {
    let result = aggregate(&records(), &Selector::from("author"));
    assert_eq!(result.buckets.len(), 2);
    assert_eq!(result.counted(), 3);
    assert_eq!(result.skipped(), 3);
}

#[test]
fn test_truncation_is_prefix() {
    let full = aggregate(&records(), &Selector::from("deviceType"));
    for limit in 0..=full.buckets.len() + 2 {
        let shown = truncate(&full, limit);
        assert_eq!(shown.buckets.len(), limit.min(full.buckets.len()));
        assert_eq!(shown.buckets[..], full.buckets[..shown.buckets.len()]);
        assert_eq!(shown.total_records, full.total_records);
    }
}

#[test]
fn test_percentages_within_bounds() {
    let result = aggregate(&records(), &Selector::from("deviceType"));
    let sum: f64 = result.buckets.iter().map(|b| result.percentage(b)).sum();
    assert!(result.buckets.iter().all(|b| {
        let p = result.percentage(b);
        (0.0..=100.0).contains(&p)
    }));
    assert!((sum - 100.0).abs() < 1e-9);
    assert_eq!(format_percentage(4, 6), "66.7%");
}

#[test]
fn test_empty_input() {
    let result = aggregate(&[], &Selector::from("deviceType"));
    assert!(result.buckets.is_empty());
    assert_eq!(result.total_records, 0);
    assert_eq!(percentage(0, 0), 0.0);
    assert_eq!(format_percentage(0, 0), "0%");
}

#[test]
fn test_extractor_selector() {
    let selector = Selector::extractor(|record| {
        record
            .get("deviceType")
            .and_then(Value::as_str)
            .map(|t| if t == "light" { "lighting" } else { "other" }.to_string())
    });
    let result = aggregate(&records(), &selector);
    assert_eq!(result.buckets[0].name, "lighting");
    assert_eq!(result.buckets[0].count, 4);
    assert_eq!(result.buckets[1].count, 2);
}

#[test]
fn test_statistic_page_view() {
    let config = DashboardConfig::default_config();
    let page = config.statistic("top-manufacturers").expect("page exists");
    let view = page.view(&records(), 2);

    assert_eq!(view.title, "Top 2 Most Common Manufacturers");
    assert_eq!(view.aggregations_count, 3);
    assert_eq!(view.total_records, 6);
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].rank, 1);
    assert_eq!(view.rows[0].name, "Acme");
    assert_eq!(view.rows[0].percentage_label, "33.3%");
    assert_eq!(
        page.drilldown_query("Acme").to_query_string(),
        "manufacturer=Acme"
    );
}
