//! URL <-> filter state synchronization properties
//!
//! These tests drive the synchronizer through the in-memory location and
//! filter slot, the way a host view would.

use powerdash::prelude::*;
use serde_json::json;
use std::collections::HashMap;

// =============================================================================
// Helpers
// =============================================================================

fn param_map() -> FilterParamMap {
    FilterParamMap::new()
        .with("manufacturer", "manufacturer.fullName")
        .with("colorMode", "colorModes")
        .with("deviceType", "deviceType")
}

fn open(query: &str) -> LibraryView<MemoryLocation, MemoryFilterSlot> {
    LibraryView::open(
        FilterSynchronizer::new(param_map()),
        MemoryLocation::new(query),
        MemoryFilterSlot::new(),
    )
}

// =============================================================================
// Derivation
// =============================================================================

#[test]
fn test_round_trip_through_query_string() {
    let map = param_map();
    let state = FilterState::new()
        .with("manufacturer.fullName", FilterValue::scalar("Acme"))
        .with("colorModes", FilterValue::multi(["hs", "color_temp"]))
        .with("deviceType", FilterValue::scalar("light"));

    let query = derive_params_from_filter_state(&state, &map).to_query_string();
    assert_eq!(
        query,
        "colorMode=color_temp%2Chs&deviceType=light&manufacturer=Acme"
    );

    let back = derive_filter_state_from_params(&QueryParams::parse(&query), &map);
    assert!(back.canonical_eq(&state));
}

#[test]
fn test_unmapped_params_ignored() {
    let state = derive_filter_state_from_params(
        &QueryParams::parse("foo=bar&manufacturer=Acme"),
        &param_map(),
    );
    assert_eq!(state.len(), 1);
    assert_eq!(
        state.get(&FieldPath::parse("manufacturer.fullName")),
        Some(&FilterValue::scalar("Acme"))
    );
}

#[test]
fn test_rewrite_keeps_foreign_param_verbatim() {
    let map = param_map();
    let query = QueryParams::parse("foo=bar&manufacturer=Acme");
    let state = derive_filter_state_from_params(&query, &map);

    let owned = derive_params_from_filter_state(&state, &map);
    assert_eq!(
        query.with_owned_params(&owned, &map).to_query_string(),
        "foo=bar&manufacturer=Acme"
    );
}

#[test]
fn test_serialization_is_deterministic() {
    let map = param_map();
    let state = FilterState::new()
        .with("deviceType", FilterValue::scalar("light"))
        .with("manufacturer.fullName", FilterValue::scalar("Acme Corp"));

    let first = derive_params_from_filter_state(&state, &map).to_query_string();
    let second = derive_params_from_filter_state(&state, &map).to_query_string();
    assert_eq!(first, second);
    assert_eq!(first, "deviceType=light&manufacturer=Acme+Corp");
}

#[test]
fn test_round_trip_keeps_filtered_rows() {
    let map = param_map();
    let records = vec![
        json!({"colorModes": ["hs"], "deviceType": "light"}),
        json!({"colorModes": ["color_temp", "brightness"], "deviceType": "light"}),
        json!({"colorModes": ["brightness"], "deviceType": "light"}),
        json!({"deviceType": "fan"}),
    ];
    let modes = HashMap::from([
        (FieldPath::key("colorModes"), MatchMode::AnyContains),
        (FieldPath::key("deviceType"), MatchMode::Equals),
    ]);
    let state = FilterState::new()
        .with("colorModes", FilterValue::multi(["hs", "color_temp"]))
        .with("deviceType", FilterValue::scalar("light"));

    let query = derive_params_from_filter_state(&state, &map).to_query_string();
    let restored = derive_filter_state_from_params(&QueryParams::parse(&query), &map);

    let before = state.apply(&records, &modes);
    assert_eq!(before.len(), 2);
    assert_eq!(restored.apply(&records, &modes), before);
}

#[test]
fn test_rewrite_keeps_repeated_and_encoded_params() {
    let sync = FilterSynchronizer::new(param_map());
    let current = QueryParams::parse("x=1&manufacturer=A&x=2&q=a%2Bb");
    let next = FilterState::new().with("manufacturer.fullName", FilterValue::scalar("B"));

    let rewritten = sync
        .on_filter_edit(&next, &current)
        .expect("manufacturer changed");
    let pairs: Vec<(&str, &str)> = rewritten.iter().collect();
    assert_eq!(
        pairs,
        vec![("x", "1"), ("x", "2"), ("q", "a+b"), ("manufacturer", "B")]
    );
    assert_eq!(rewritten.to_query_string(), "x=1&x=2&q=a%2Bb&manufacturer=B");
}

#[test]
fn test_empty_params_skipped() {
    let query = QueryParams::parse("manufacturer=&deviceType=fan");
    let state = derive_filter_state_from_params(&query, &param_map());
    assert_eq!(state.len(), 1);
    assert!(state.get(&FieldPath::parse("manufacturer.fullName")).is_none());
}

#[test]
fn test_array_order_does_not_matter() {
    let a = FilterState::new().with("colorModes", FilterValue::multi(["hs", "color_temp"]));
    let b = FilterState::new().with("colorModes", FilterValue::multi(["color_temp", "hs"]));
    assert!(a.canonical_eq(&b));
    assert_eq!(
        derive_params_from_filter_state(&a, &param_map()),
        derive_params_from_filter_state(&b, &param_map())
    );
}

#[test]
fn test_empty_values_omitted_from_query() {
    let state = FilterState::new()
        .with("manufacturer.fullName", FilterValue::scalar(""))
        .with("colorModes", FilterValue::multi(Vec::<String>::new()))
        .with("deviceType", FilterValue::Empty);
    assert!(derive_params_from_filter_state(&state, &param_map()).is_empty());
}

// =============================================================================
// Reconciliation
// =============================================================================

#[test]
fn test_open_seeds_filter_state() {
    let view = open("?manufacturer=Acme&tab=grid");
    let expected = FilterState::new().with("manufacturer.fullName", FilterValue::scalar("Acme"));
    assert!(view.filters().canonical_eq(&expected));
    assert_eq!(view.location().replacements(), 0);
}

#[test]
fn test_edit_preserves_unrelated_params() {
    let view = open("foo=bar&manufacturer=Acme");
    let next = view
        .filters()
        .with("deviceType", FilterValue::scalar("light"));

    assert_eq!(view.handle_filter_edit(next), SyncOutcome::Updated);
    assert_eq!(
        view.location().query_string(),
        "foo=bar&deviceType=light&manufacturer=Acme"
    );
    assert_eq!(view.location().replacements(), 1);
}

#[test]
fn test_edit_equivalent_state_does_not_replace_url() {
    let view = open("colorMode=color_temp%2Chs");
    let reordered = FilterState::new().with("colorModes", FilterValue::multi(["hs", "color_temp"]));

    assert_eq!(view.handle_filter_edit(reordered), SyncOutcome::Unchanged);
    assert_eq!(view.location().replacements(), 0);
}

#[test]
fn test_navigation_to_equivalent_url_does_not_write_slot() {
    let view = open("colorMode=color_temp%2Chs&deviceType=light");
    let writes = view.slot().writes();

    view.location().navigate("deviceType=light&colorMode=color_temp%2Chs&page=2");
    assert_eq!(view.handle_navigation(), SyncOutcome::Unchanged);
    assert_eq!(view.slot().writes(), writes);
}

#[test]
fn test_navigation_back_restores_previous_filters() {
    let view = open("manufacturer=Acme");
    view.location().navigate("manufacturer=Zeta");

    assert_eq!(view.handle_navigation(), SyncOutcome::Updated);
    assert_eq!(
        view.filters().get(&FieldPath::parse("manufacturer.fullName")),
        Some(&FilterValue::scalar("Zeta"))
    );
}

#[test]
fn test_no_ping_pong_between_directions() {
    let view = open("");
    let edited = FilterState::new().with("deviceType", FilterValue::scalar("fan"));

    assert_eq!(view.handle_filter_edit(edited), SyncOutcome::Updated);
    let writes = view.slot().writes();

    // The URL write is observed as a navigation; it must settle immediately
    assert_eq!(view.handle_navigation(), SyncOutcome::Unchanged);
    assert_eq!(view.slot().writes(), writes);
    assert_eq!(view.location().replacements(), 1);
}

#[test]
fn test_clearing_filters_keeps_unrelated_params() {
    let view = open("tab=grid&manufacturer=Acme&deviceType=light");
    assert_eq!(view.handle_filter_edit(FilterState::new()), SyncOutcome::Updated);
    assert_eq!(view.location().query_string(), "tab=grid");
}
