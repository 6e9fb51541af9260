//! Semi-structured document model.
//!
//! A [`Document`] is the parsed form of a JSON-like response body. The differ
//! matches exhaustively on its four node kinds; nothing downstream inspects
//! `serde_json::Value` directly.

use crate::errors::{Result, ShadowDiffError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Naive date-time layouts accepted for timestamp comparison, tried after RFC 3339.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A parsed semi-structured value.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Null,
    Object(BTreeMap<String, Document>),
    Array(Vec<Document>),
    Scalar(Scalar),
}

/// Leaf value of a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    String(String),
}

/// Node kind, used for shape-mismatch reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Object,
    Array,
    Scalar,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            NodeKind::Null => "null",
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::Scalar => "scalar",
        };
        f.write_str(label)
    }
}

impl Document {
    /// Parse body bytes into a document.
    ///
    /// # Errors
    ///
    /// `DocumentParse` when the bytes are not valid UTF-8 JSON.
    pub fn parse(bytes: &[u8]) -> Result<Document> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| ShadowDiffError::DocumentParse {
                message: e.to_string(),
            })?;
        Ok(Document::from(value))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Document::Null => NodeKind::Null,
            Document::Object(_) => NodeKind::Object,
            Document::Array(_) => NodeKind::Array,
            Document::Scalar(_) => NodeKind::Scalar,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    /// String serialization of the node.
    ///
    /// Scalars render as their bare text (strings unquoted), containers as
    /// compact JSON with keys in sorted order. This is the form reported in
    /// discrepancies and the sort key for `Sorted` array handling.
    pub fn string_form(&self) -> String {
        match self {
            Document::Null => "null".to_string(),
            Document::Scalar(scalar) => scalar.string_form(),
            Document::Object(_) | Document::Array(_) => self.to_json().to_string(),
        }
    }

    /// Convert back into a `serde_json::Value`.
    pub fn to_json(&self) -> Value {
        match self {
            Document::Null => Value::Null,
            Document::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Document::Array(items) => Value::Array(items.iter().map(Document::to_json).collect()),
            Document::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            Document::Scalar(Scalar::Number(n)) => Value::Number(n.clone()),
            Document::Scalar(Scalar::String(s)) => Value::String(s.clone()),
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Document::Scalar(Scalar::Number(n)),
            Value::String(s) => Document::Scalar(Scalar::String(s)),
            Value::Array(items) => Document::Array(items.into_iter().map(Document::from).collect()),
            Value::Object(map) => Document::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Document::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Scalar {
    pub fn string_form(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::String(s) => s.clone(),
        }
    }

    /// The scalar's value as a finite float, if its string form parses as one.
    ///
    /// Numeric strings count (`"42"` equals `42`); `NaN` and infinities do not.
    pub fn as_f64(&self) -> Option<f64> {
        let parsed = match self {
            Scalar::Bool(_) => return None,
            Scalar::Number(n) => n.as_f64(),
            Scalar::String(s) => s.trim().parse::<f64>().ok(),
        }?;
        parsed.is_finite().then_some(parsed)
    }

    /// The scalar's value as a UTC instant, if its string form parses as a date-time.
    ///
    /// Accepts RFC 3339, common naive date-time layouts (read as UTC), and
    /// bare `YYYY-MM-DD` dates (midnight UTC).
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        let Scalar::String(raw) = self else {
            return None;
        };
        parse_timestamp(raw.trim())
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
