//! Comparison configuration
//!
//! Keys follow the camelCase names used by the forwarding service's settings
//! file; every field is optional and falls back to [`ComparisonConfig::default`].
//!
//! ```toml
//! excludeFields = ["_id", "requestId"]
//! allowSupersetResponses = true
//! arrayOrderHandling = "Sorted"
//!
//! [routeExcludeFields]
//! "/api/v1/entries" = ["sysTime"]
//! ```

use crate::errors::{Result, ShadowDiffError};
use crate::policy::ArrayOrderHandling;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_TIMESTAMP_TOLERANCE_MS: i64 = 1000;
pub const DEFAULT_NUMERIC_PRECISION_TOLERANCE: f64 = 0.01;
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Settings from which the base [`EquivalencePolicy`](crate::policy::EquivalencePolicy) is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComparisonConfig {
    pub exclude_fields: Vec<String>,
    /// Route prefix (case-insensitive) to extra excluded field names
    pub route_exclude_fields: BTreeMap<String, Vec<String>>,
    pub allow_superset_responses: bool,
    pub timestamp_tolerance_ms: i64,
    pub numeric_precision_tolerance: f64,
    pub array_order_handling: ArrayOrderHandling,
    pub enable_deep_comparison: bool,
    pub max_response_size_for_comparison: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            exclude_fields: Vec::new(),
            route_exclude_fields: BTreeMap::new(),
            allow_superset_responses: false,
            timestamp_tolerance_ms: DEFAULT_TIMESTAMP_TOLERANCE_MS,
            numeric_precision_tolerance: DEFAULT_NUMERIC_PRECISION_TOLERANCE,
            array_order_handling: ArrayOrderHandling::Strict,
            enable_deep_comparison: true,
            max_response_size_for_comparison: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }
}

impl ComparisonConfig {
    /// # Errors
    ///
    /// `ConfigParse` when the text is not a valid configuration document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// # Errors
    ///
    /// `ConfigParse` when the text is not a valid configuration document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a `.toml` or `.json` configuration file.
    ///
    /// # Errors
    ///
    /// - `UnsupportedConfigFormat` for any other extension
    /// - `ConfigIo` when the file cannot be read
    /// - `ConfigParse` when the contents do not parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(ShadowDiffError::UnsupportedConfigFormat {
                    path: path.display().to_string(),
                })
            }
        };
        let text = std::fs::read_to_string(path).map_err(|e| ShadowDiffError::ConfigIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = parse(&text)?;
        tracing::debug!(
            path = %path.display(),
            excluded = config.exclude_fields.len(),
            routes = config.route_exclude_fields.len(),
            "loaded comparison config"
        );
        Ok(config)
    }
}
