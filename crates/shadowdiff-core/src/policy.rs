//! Equivalence policy and per-route composition
//!
//! An [`EquivalencePolicy`] decides which differences between a reference and
//! a candidate document count. The base policy comes from
//! [`ComparisonConfig`]; [`build_effective_policy`] folds in the route-prefix
//! exclusions that apply to one request path.

use crate::config::ComparisonConfig;
use crate::errors::{Result, ShadowDiffError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How array elements are paired for comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArrayOrderHandling {
    /// Index-to-index
    #[default]
    #[serde(alias = "strict")]
    Strict,
    /// Order-insensitive matching; currently paired index-to-index like `Strict`
    #[serde(alias = "loose")]
    Loose,
    /// Both sides sorted by element string form, then paired
    #[serde(alias = "sorted")]
    Sorted,
}

/// Route-prefix exclusion table
///
/// Prefixes are stored lowercased in ascending order and matched with an
/// explicit ordered scan, so every matching prefix contributes (no
/// first-match-wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutePrefixTable {
    entries: Vec<(String, Vec<String>)>,
}

impl RoutePrefixTable {
    pub fn new(routes: &BTreeMap<String, Vec<String>>) -> Self {
        let mut entries: Vec<(String, Vec<String>)> = routes
            .iter()
            .map(|(prefix, fields)| (prefix.to_lowercase(), fields.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exclusions of every prefix the path starts with, case-insensitively.
    pub fn matching<'a>(&'a self, request_path: &str) -> impl Iterator<Item = &'a str> + 'a {
        let path = request_path.to_lowercase();
        self.entries
            .iter()
            .filter(move |(prefix, _)| starts_with_bytes(&path, prefix))
            .flat_map(|(_, fields)| fields.iter().map(String::as_str))
    }
}

fn starts_with_bytes(path: &str, prefix: &str) -> bool {
    let (path, prefix) = (path.as_bytes(), prefix.as_bytes());
    if prefix.len() > path.len() {
        return false;
    }
    path.iter().zip(prefix).all(|(p, q)| p == q)
}

/// Immutable comparison policy
///
/// Built once per request via [`build_effective_policy`] and shared read-only
/// by the differ.
#[derive(Debug, Clone, PartialEq)]
pub struct EquivalencePolicy {
    /// Object keys skipped at every depth (exact, case-sensitive match)
    pub excluded_fields: BTreeSet<String>,
    pub route_exclusions: RoutePrefixTable,
    /// Candidate may carry keys the reference lacks
    pub allow_superset: bool,
    /// Absolute tolerance for numeric scalars
    pub numeric_tolerance: f64,
    pub timestamp_tolerance_ms: i64,
    pub array_order: ArrayOrderHandling,
    /// When false, JSON bodies are compared as text instead of structurally
    pub deep_comparison: bool,
    /// Bodies larger than this (bytes) only get a byte-equality check
    pub max_body_size: usize,
}

impl Default for EquivalencePolicy {
    fn default() -> Self {
        Self::from_config(&ComparisonConfig::default())
    }
}

impl EquivalencePolicy {
    pub fn from_config(config: &ComparisonConfig) -> Self {
        Self {
            excluded_fields: config.exclude_fields.iter().cloned().collect(),
            route_exclusions: RoutePrefixTable::new(&config.route_exclude_fields),
            allow_superset: config.allow_superset_responses,
            numeric_tolerance: config.numeric_precision_tolerance,
            timestamp_tolerance_ms: config.timestamp_tolerance_ms,
            array_order: config.array_order_handling,
            deep_comparison: config.enable_deep_comparison,
            max_body_size: config.max_response_size_for_comparison,
        }
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded_fields.contains(key)
    }

    /// Check that the tolerances are usable.
    ///
    /// # Errors
    ///
    /// `InvalidPolicy` for a negative or non-finite numeric tolerance, or a
    /// negative timestamp tolerance.
    pub fn validate(&self) -> Result<()> {
        if !self.numeric_tolerance.is_finite() || self.numeric_tolerance < 0.0 {
            return Err(ShadowDiffError::InvalidPolicy {
                reason: format!(
                    "numeric tolerance must be a finite non-negative number, got {}",
                    self.numeric_tolerance
                ),
            });
        }
        if self.timestamp_tolerance_ms < 0 {
            return Err(ShadowDiffError::InvalidPolicy {
                reason: format!(
                    "timestamp tolerance must be non-negative, got {}ms",
                    self.timestamp_tolerance_ms
                ),
            });
        }
        Ok(())
    }
}

/// Merge the route-prefix exclusions matching `request_path` into the base
/// policy's global exclusions.
pub fn build_effective_policy(base: &EquivalencePolicy, request_path: &str) -> EquivalencePolicy {
    let mut effective = base.clone();
    effective.excluded_fields.extend(
        base.route_exclusions
            .matching(request_path)
            .map(str::to_string),
    );
    effective
}
