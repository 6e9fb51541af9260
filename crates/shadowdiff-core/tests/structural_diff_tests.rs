//! Structural differ scenarios.
//!
//! All tests operate on in-memory documents (no responses, no I/O).

use serde_json::{json, Value};
use shadowdiff_core::diff::{
    classify, diff_documents, Discrepancy, DiscrepancyType, Severity, Verdict,
};
use shadowdiff_core::document::Document;
use shadowdiff_core::policy::{ArrayOrderHandling, EquivalencePolicy};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn diff(left: Value, right: Value, policy: &EquivalencePolicy) -> Vec<Discrepancy> {
    diff_documents(&Document::from(left), &Document::from(right), policy)
}

fn strict() -> EquivalencePolicy {
    EquivalencePolicy::default()
}

fn superset() -> EquivalencePolicy {
    EquivalencePolicy {
        allow_superset: true,
        ..EquivalencePolicy::default()
    }
}

fn with_order(array_order: ArrayOrderHandling) -> EquivalencePolicy {
    EquivalencePolicy {
        array_order,
        ..EquivalencePolicy::default()
    }
}

fn excluding(fields: &[&str]) -> EquivalencePolicy {
    EquivalencePolicy {
        excluded_fields: fields.iter().map(|f| f.to_string()).collect(),
        ..EquivalencePolicy::default()
    }
}

fn paths(ds: &[Discrepancy]) -> Vec<&str> {
    ds.iter().map(|d| d.field_path.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_identical_objects_are_perfect() {
    let ds = diff(json!({"a": 1, "b": 2}), json!({"a": 1, "b": 2}), &strict());
    assert!(ds.is_empty());
    assert_eq!(classify(&ds), Verdict::Perfect);
}

#[test]
fn test_superset_ignores_candidate_only_keys() {
    let ds = diff(json!({"a": 1}), json!({"a": 1, "b": 2}), &superset());
    assert!(ds.is_empty());
    assert_eq!(classify(&ds), Verdict::Perfect);
}

#[test]
fn test_candidate_only_key_without_superset_is_critical() {
    let ds = diff(json!({"a": 1}), json!({"a": 1, "b": 2}), &strict());
    assert_eq!(ds.len(), 1);
    assert_eq!(ds[0].discrepancy_type, DiscrepancyType::JsonStructure);
    assert_eq!(ds[0].severity, Severity::Critical);
    assert_eq!(ds[0].field_path, "b");
    assert_eq!(ds[0].left_value, "null");
    assert_eq!(ds[0].right_value, "2");
    assert_eq!(classify(&ds), Verdict::CriticalDifferences);
}

#[test]
fn test_numeric_difference_within_tolerance() {
    let ds = diff(json!({"sgv": 100}), json!({"sgv": 100.005}), &strict());
    assert!(ds.is_empty());
}

#[test]
fn test_shorter_candidate_array_is_major() {
    let ds = diff(json!({"items": [1, 2, 3]}), json!({"items": [1, 2]}), &strict());
    assert_eq!(ds.len(), 1);
    assert_eq!(ds[0].discrepancy_type, DiscrepancyType::ArrayLength);
    assert_eq!(ds[0].severity, Severity::Major);
    assert_eq!(ds[0].field_path, "items");
    assert_eq!(ds[0].left_value, "3");
    assert_eq!(ds[0].right_value, "2");
    assert_eq!(classify(&ds), Verdict::MajorDifferences);
}

// ---------------------------------------------------------------------------
// Node-kind pairings
// ---------------------------------------------------------------------------

#[test]
fn test_reference_only_key_is_critical_even_in_superset_mode() {
    let ds = diff(json!({"a": 1, "b": {"c": 2}}), json!({"a": 1}), &superset());
    assert_eq!(ds.len(), 1);
    assert_eq!(ds[0].field_path, "b");
    assert_eq!(ds[0].severity, Severity::Critical);
    assert_eq!(ds[0].left_value, r#"{"c":2}"#);
}

#[test]
fn test_explicit_null_equals_absent_key() {
    assert!(diff(json!({"a": null}), json!({}), &strict()).is_empty());
    assert!(diff(json!({}), json!({"a": null}), &strict()).is_empty());
    assert!(diff(json!(null), json!(null), &strict()).is_empty());
}

#[test]
fn test_kind_mismatch_does_not_descend() {
    let ds = diff(json!({"a": {"b": 1, "c": 2}}), json!({"a": [1, 2]}), &strict());
    assert_eq!(ds.len(), 1);
    assert_eq!(ds[0].discrepancy_type, DiscrepancyType::JsonStructure);
    assert_eq!(ds[0].severity, Severity::Critical);
    assert_eq!(ds[0].field_path, "a");
    assert!(ds[0].description.contains("object"));
    assert!(ds[0].description.contains("array"));
}

#[test]
fn test_scalar_vs_container_is_structure_mismatch() {
    let ds = diff(json!({"a": "x"}), json!({"a": {"x": 1}}), &strict());
    assert_eq!(ds.len(), 1);
    assert_eq!(ds[0].discrepancy_type, DiscrepancyType::JsonStructure);
}

#[test]
fn test_nested_paths_use_dots_and_indices() {
    let ds = diff(
        json!({"data": {"items": [{"id": "x"}, {"id": "y"}]}}),
        json!({"data": {"items": [{"id": "x"}, {"id": "z"}]}}),
        &strict(),
    );
    assert_eq!(paths(&ds), vec!["data.items[1].id"]);
    assert_eq!(ds[0].discrepancy_type, DiscrepancyType::StringValue);
    assert_eq!(ds[0].severity, Severity::Major);
    assert_eq!(ds[0].left_value, "y");
    assert_eq!(ds[0].right_value, "z");
}

#[test]
fn test_root_scalar_has_empty_path() {
    let ds = diff(json!("abc"), json!("abd"), &strict());
    assert_eq!(paths(&ds), vec![""]);
}

#[test]
fn test_discrepancies_follow_sorted_key_order() {
    let ds = diff(
        json!({"z": "1a", "a": "1a", "m": "1a"}),
        json!({"z": "2b", "a": "2b", "m": "2b"}),
        &strict(),
    );
    assert_eq!(paths(&ds), vec!["a", "m", "z"]);
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

#[test]
fn test_numeric_outside_tolerance_is_minor() {
    let ds = diff(json!({"sgv": 100}), json!({"sgv": 100.5}), &strict());
    assert_eq!(ds.len(), 1);
    assert_eq!(ds[0].discrepancy_type, DiscrepancyType::NumericValue);
    assert_eq!(ds[0].severity, Severity::Minor);
    assert_eq!(classify(&ds), Verdict::MinorDifferences);
}

#[test]
fn test_numeric_tolerance_boundary_is_inclusive() {
    let policy = EquivalencePolicy {
        numeric_tolerance: 0.5,
        ..EquivalencePolicy::default()
    };
    assert!(diff(json!({"v": 1.0}), json!({"v": 1.5}), &policy).is_empty());
    assert_eq!(diff(json!({"v": 1.0}), json!({"v": 1.75}), &policy).len(), 1);
}

#[test]
fn test_numeric_string_equals_number() {
    assert!(diff(json!({"v": "42"}), json!({"v": 42}), &strict()).is_empty());
}

#[test]
fn test_bool_mismatch_is_string_value() {
    let ds = diff(json!({"f": true}), json!({"f": false}), &strict());
    assert_eq!(ds.len(), 1);
    assert_eq!(ds[0].discrepancy_type, DiscrepancyType::StringValue);
    assert_eq!(ds[0].left_value, "true");
    assert_eq!(ds[0].right_value, "false");
}

#[test]
fn test_string_comparison_is_case_sensitive() {
    let ds = diff(json!({"dir": "Flat"}), json!({"dir": "flat"}), &strict());
    assert_eq!(ds.len(), 1);
    assert_eq!(ds[0].severity, Severity::Major);
}

#[test]
fn test_timestamp_within_tolerance() {
    let ds = diff(
        json!({"created_at": "2024-01-01T00:00:00.000Z"}),
        json!({"created_at": "2024-01-01T00:00:00.900Z"}),
        &strict(),
    );
    assert!(ds.is_empty());
}

#[test]
fn test_timestamp_tolerance_boundary_is_inclusive() {
    let ds = diff(
        json!({"sysTime": "2024-01-01T00:00:00Z"}),
        json!({"sysTime": "2024-01-01T00:00:01Z"}),
        &strict(),
    );
    assert!(ds.is_empty());
}

#[test]
fn test_timestamp_outside_tolerance_is_minor() {
    let ds = diff(
        json!({"entry": {"dateString": "2024-01-01T00:00:00Z"}}),
        json!({"entry": {"dateString": "2024-01-01T00:00:02+00:00"}}),
        &strict(),
    );
    assert_eq!(ds.len(), 1);
    assert_eq!(ds[0].discrepancy_type, DiscrepancyType::Timestamp);
    assert_eq!(ds[0].severity, Severity::Minor);
    assert_eq!(ds[0].field_path, "entry.dateString");
}

#[test]
fn test_timestamp_with_different_offsets_same_instant() {
    let ds = diff(
        json!({"updatedAt_time": "2024-01-01T02:00:00+02:00"}),
        json!({"updatedAt_time": "2024-01-01T00:00:00Z"}),
        &strict(),
    );
    assert!(ds.is_empty());
}

#[test]
fn test_unparseable_timestamp_falls_back_to_string_rule() {
    let ds = diff(
        json!({"created_at": "yesterday"}),
        json!({"created_at": "today"}),
        &strict(),
    );
    assert_eq!(ds.len(), 1);
    assert_eq!(ds[0].discrepancy_type, DiscrepancyType::StringValue);
}

// ---------------------------------------------------------------------------
// Exclusions
// ---------------------------------------------------------------------------

#[test]
fn test_excluded_field_skipped_at_every_depth() {
    let ds = diff(
        json!({"_id": "1", "nested": {"_id": "2", "v": 1}, "list": [{"_id": "3"}]}),
        json!({"_id": "9", "nested": {"_id": "8", "v": 1}, "list": [{"_id": "7"}]}),
        &excluding(&["_id"]),
    );
    assert!(ds.is_empty());
}

#[test]
fn test_excluded_field_missing_on_one_side_is_ignored() {
    let ds = diff(json!({"a": 1}), json!({"a": 1, "etag": "x"}), &excluding(&["etag"]));
    assert!(ds.is_empty());
}

#[test]
fn test_exclusion_is_exact_name_match() {
    let ds = diff(
        json!({"id": 1, "ID": 1, "_id": 1}),
        json!({"id": 2, "ID": 2, "_id": 2}),
        &excluding(&["id"]),
    );
    assert_eq!(paths(&ds), vec!["ID", "_id"]);
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

#[test]
fn test_array_length_plus_overlapping_prefix() {
    let ds = diff(json!([1, 2, 3]), json!([9]), &strict());
    assert_eq!(ds.len(), 2);
    assert_eq!(ds[0].discrepancy_type, DiscrepancyType::ArrayLength);
    assert_eq!(ds[0].field_path, "");
    assert_eq!(ds[1].discrepancy_type, DiscrepancyType::NumericValue);
    assert_eq!(ds[1].field_path, "[0]");
}

#[test]
fn test_strict_pairs_by_index() {
    let ds = diff(json!({"v": [3, 1, 2]}), json!({"v": [1, 2, 3]}), &strict());
    assert_eq!(paths(&ds), vec!["v[0]", "v[1]", "v[2]"]);
    assert!(ds
        .iter()
        .all(|d| d.discrepancy_type == DiscrepancyType::NumericValue));
}

#[test]
fn test_loose_currently_pairs_by_index() {
    let ds = diff(
        json!({"v": [3, 1, 2]}),
        json!({"v": [1, 2, 3]}),
        &with_order(ArrayOrderHandling::Loose),
    );
    assert_eq!(paths(&ds), vec!["v[0]", "v[1]", "v[2]"]);
}

#[test]
fn test_sorted_ignores_element_order() {
    let ds = diff(
        json!({"v": [3, 1, 2]}),
        json!({"v": [1, 2, 3]}),
        &with_order(ArrayOrderHandling::Sorted),
    );
    assert!(ds.is_empty());
}

#[test]
fn test_sorted_uses_lexicographic_order_of_string_forms() {
    // "10" sorts before "9"; both sides sort the same way so they still pair up.
    let ds = diff(
        json!([10, 9, 100]),
        json!([9, 100, 10]),
        &with_order(ArrayOrderHandling::Sorted),
    );
    assert!(ds.is_empty());

    // After sorting: left [1, 10, 9], right [1, 2, 9]; index 1 pairs 10 with 2.
    let ds = diff(
        json!([9, 10, 1]),
        json!([2, 9, 1]),
        &with_order(ArrayOrderHandling::Sorted),
    );
    assert_eq!(paths(&ds), vec!["[1]"]);
    assert_eq!(ds[0].left_value, "10");
    assert_eq!(ds[0].right_value, "2");
}

#[test]
fn test_sorted_objects_by_serialized_form() {
    let ds = diff(
        json!({"rows": [{"k": "b"}, {"k": "a"}]}),
        json!({"rows": [{"k": "a"}, {"k": "c"}]}),
        &with_order(ArrayOrderHandling::Sorted),
    );
    assert_eq!(paths(&ds), vec!["rows[1].k"]);
    assert_eq!(ds[0].left_value, "b");
    assert_eq!(ds[0].right_value, "c");
}
