//! Comparison output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq` so
//! persistence and reporting collaborators can store results as-is.
//! Values are built once per comparison and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shadowdiff_core_types::CorrelationId;

/// What kind of divergence a [`Discrepancy`] records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DiscrepancyType {
    StatusCode,
    Header,
    ContentType,
    Body,
    JsonStructure,
    ArrayLength,
    NumericValue,
    Timestamp,
    StringValue,
    Performance,
}

/// How much a discrepancy matters for the migration.
///
/// Ordered so that `Minor < Major < Critical`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Cosmetic or tolerable
    Minor,
    /// Should block the migration
    Major,
    /// Blocks the migration
    Critical,
}

/// One divergence between reference (left) and candidate (right) at a field path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Discrepancy {
    pub discrepancy_type: DiscrepancyType,
    pub severity: Severity,
    /// Structural location, e.g. `data.items[2].id`; empty for the document root
    pub field_path: String,
    /// Reference value in string form
    pub left_value: String,
    /// Candidate value in string form
    pub right_value: String,
    pub description: String,
}

impl Discrepancy {
    pub fn new(
        discrepancy_type: DiscrepancyType,
        severity: Severity,
        field_path: impl Into<String>,
        left_value: impl Into<String>,
        right_value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            discrepancy_type,
            severity,
            field_path: field_path.into(),
            left_value: left_value.into(),
            right_value: right_value.into(),
            description: description.into(),
        }
    }
}

/// Overall outcome of comparing one request pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Verdict {
    Perfect,
    MinorDifferences,
    MajorDifferences,
    CriticalDifferences,
    LeftMissing,
    RightMissing,
    BothMissing,
    ComparisonError,
}

impl Verdict {
    /// True for the verdicts produced when an input response is absent
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            Verdict::LeftMissing | Verdict::RightMissing | Verdict::BothMissing
        )
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Response-time comparison between the two systems.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceComparison {
    pub left_ms: u64,
    pub right_ms: u64,
    /// `right_ms - left_ms`; positive when the candidate is slower
    pub difference_ms: i64,
    /// Difference relative to the reference time, in percent (0 when `left_ms` is 0)
    pub percent_difference: f64,
    /// Absolute difference exceeds the performance threshold
    pub exceeds_threshold: bool,
}

/// Count of discrepancies per severity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
}

impl SeverityCounts {
    pub fn tally(discrepancies: &[Discrepancy]) -> Self {
        discrepancies
            .iter()
            .fold(SeverityCounts::default(), |mut counts, d| {
                match d.severity {
                    Severity::Critical => counts.critical += 1,
                    Severity::Major => counts.major += 1,
                    Severity::Minor => counts.minor += 1,
                }
                counts
            })
    }
}

/// Result of comparing one captured request pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonResult {
    pub correlation_id: CorrelationId,
    pub timestamp: DateTime<Utc>,
    pub status_code_match: bool,
    pub body_match: bool,
    /// In detection order: status, headers, content type, body, performance
    pub discrepancies: Vec<Discrepancy>,
    /// Absent when either response was missing or the comparison failed
    pub performance: Option<PerformanceComparison>,
    pub verdict: Verdict,
    pub summary: String,
}

impl ComparisonResult {
    /// True when the candidate is acceptable (`Perfect` or only minor differences)
    pub fn is_match(&self) -> bool {
        matches!(self.verdict, Verdict::Perfect | Verdict::MinorDifferences)
    }

    pub fn count_by_severity(&self) -> SeverityCounts {
        SeverityCounts::tally(&self.discrepancies)
    }
}
