//! Structural document differ.
//!
//! The entry point is [`diff_documents`]. Each node pairing returns its own
//! discrepancy list and parents concatenate the lists of their children, so
//! the walk shares no mutable state and subtrees are independent.

use crate::diff::model::{Discrepancy, DiscrepancyType, Severity};
use crate::document::{Document, Scalar};
use crate::policy::{ArrayOrderHandling, EquivalencePolicy};
use std::collections::{BTreeMap, BTreeSet};

const NULL_FORM: &str = "null";

/// Diff a candidate document (right) against the reference (left).
///
/// Discrepancies come back in walk order: object keys ascending, array
/// elements by index, an array's length discrepancy before its elements.
pub fn diff_documents(
    left: &Document,
    right: &Document,
    policy: &EquivalencePolicy,
) -> Vec<Discrepancy> {
    diff_nodes(Some(left), Some(right), "", policy)
}

/// Diff two nodes at `path`. `None` means the key is absent on that side and
/// is treated like an explicit null.
pub fn diff_nodes(
    left: Option<&Document>,
    right: Option<&Document>,
    path: &str,
    policy: &EquivalencePolicy,
) -> Vec<Discrepancy> {
    let left = left.filter(|doc| !doc.is_null());
    let right = right.filter(|doc| !doc.is_null());

    match (left, right) {
        (None, None) => Vec::new(),
        (Some(l), None) => vec![Discrepancy::new(
            DiscrepancyType::JsonStructure,
            Severity::Critical,
            path,
            l.string_form(),
            NULL_FORM,
            format!("{} present in reference but missing or null in candidate", l.kind()),
        )],
        (None, Some(r)) => vec![Discrepancy::new(
            DiscrepancyType::JsonStructure,
            Severity::Critical,
            path,
            NULL_FORM,
            r.string_form(),
            format!("{} present in candidate but missing or null in reference", r.kind()),
        )],
        (Some(Document::Object(l)), Some(Document::Object(r))) => diff_objects(l, r, path, policy),
        (Some(Document::Array(l)), Some(Document::Array(r))) => diff_arrays(l, r, path, policy),
        (Some(Document::Scalar(l)), Some(Document::Scalar(r))) => {
            diff_scalars(l, r, path, policy).into_iter().collect()
        }
        (Some(l), Some(r)) => vec![Discrepancy::new(
            DiscrepancyType::JsonStructure,
            Severity::Critical,
            path,
            l.string_form(),
            r.string_form(),
            format!("node kind differs: {} vs {}", l.kind(), r.kind()),
        )],
    }
}

fn diff_objects(
    left: &BTreeMap<String, Document>,
    right: &BTreeMap<String, Document>,
    path: &str,
    policy: &EquivalencePolicy,
) -> Vec<Discrepancy> {
    let keys: BTreeSet<&str> = if policy.allow_superset {
        left.keys().map(String::as_str).collect()
    } else {
        left.keys().chain(right.keys()).map(String::as_str).collect()
    };

    keys.into_iter()
        .filter(|key| !policy.is_excluded(key))
        .flat_map(|key| {
            diff_nodes(
                left.get(key),
                right.get(key),
                &child_path(path, key),
                policy,
            )
        })
        .collect()
}

fn diff_arrays(
    left: &[Document],
    right: &[Document],
    path: &str,
    policy: &EquivalencePolicy,
) -> Vec<Discrepancy> {
    let mut out = Vec::new();
    if left.len() != right.len() {
        out.push(Discrepancy::new(
            DiscrepancyType::ArrayLength,
            Severity::Major,
            path,
            left.len().to_string(),
            right.len().to_string(),
            format!(
                "array length differs: {} vs {}",
                left.len(),
                right.len()
            ),
        ));
    }

    let (left_items, right_items): (Vec<&Document>, Vec<&Document>) = match policy.array_order {
        ArrayOrderHandling::Strict => (left.iter().collect(), right.iter().collect()),
        ArrayOrderHandling::Loose => {
            // TODO: pair Loose elements by best match so reordered arrays compare equal;
            // until then they are paired by index like Strict.
            tracing::debug!(
                field_path = path,
                "loose array order handling is paired by index"
            );
            (left.iter().collect(), right.iter().collect())
        }
        ArrayOrderHandling::Sorted => (sorted_by_string_form(left), sorted_by_string_form(right)),
    };

    out.extend(
        left_items
            .into_iter()
            .zip(right_items)
            .enumerate()
            .flat_map(|(i, (l, r))| diff_nodes(Some(l), Some(r), &index_path(path, i), policy)),
    );
    out
}

/// Stable sort by string form. Ordering is lexicographic, so `"10" < "9"`.
fn sorted_by_string_form(items: &[Document]) -> Vec<&Document> {
    let mut keyed: Vec<(String, &Document)> =
        items.iter().map(|doc| (doc.string_form(), doc)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, doc)| doc).collect()
}

fn diff_scalars(
    left: &Scalar,
    right: &Scalar,
    path: &str,
    policy: &EquivalencePolicy,
) -> Option<Discrepancy> {
    if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
        let delta = (l - r).abs();
        // A few ulps at the operands' magnitude absorb decimal rounding, so values
        // exactly on the tolerance boundary are accepted regardless of scale.
        let slack = 4.0 * f64::EPSILON * l.abs().max(r.abs());
        if delta <= policy.numeric_tolerance + slack {
            return None;
        }
        return Some(Discrepancy::new(
            DiscrepancyType::NumericValue,
            Severity::Minor,
            path,
            left.string_form(),
            right.string_form(),
            format!(
                "numeric values differ by {} (tolerance {})",
                delta, policy.numeric_tolerance
            ),
        ));
    }

    if is_timestamp_path(path) {
        if let (Some(l), Some(r)) = (left.as_timestamp(), right.as_timestamp()) {
            let delta_ms = (l - r).num_milliseconds().abs();
            if delta_ms <= policy.timestamp_tolerance_ms {
                return None;
            }
            return Some(Discrepancy::new(
                DiscrepancyType::Timestamp,
                Severity::Minor,
                path,
                left.string_form(),
                right.string_form(),
                format!(
                    "timestamps differ by {}ms (tolerance {}ms)",
                    delta_ms, policy.timestamp_tolerance_ms
                ),
            ));
        }
    }

    let (l, r) = (left.string_form(), right.string_form());
    if l == r {
        return None;
    }
    Some(Discrepancy::new(
        DiscrepancyType::StringValue,
        Severity::Major,
        path,
        l,
        r,
        "values differ",
    ))
}

/// Paths naming a time-like field: contains `time` or `date`, or ends in `_at`.
fn is_timestamp_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.contains("time") || lower.contains("date") || lower.ends_with("_at")
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn index_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}
