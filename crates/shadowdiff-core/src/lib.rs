//! shadowdiff core - response equivalence engine for API migrations
//!
//! Compares the responses a legacy (reference) system and its replacement
//! (candidate) return for the same logical request, including:
//! - A semi-structured document model for JSON bodies
//! - Equivalence policies merged from global and per-route settings
//! - A deterministic structural differ with numeric/timestamp tolerances,
//!   field exclusions, superset mode, and array-order strategies
//! - Verdict classification from discrepancy severities
//! - A never-failing response-level orchestrator
//!
//! The engine performs no I/O; capturing responses and persisting results
//! belong to the caller.

pub mod compare;
pub mod config;
pub mod diff;
pub mod document;
pub mod errors;
pub mod logging_facility;
pub mod policy;

// Re-export commonly used types
pub use compare::{CapturedResponse, Headers, ResponseComparator};
pub use config::ComparisonConfig;
pub use diff::{ComparisonResult, Discrepancy, DiscrepancyType, Severity, Verdict};
pub use document::Document;
pub use errors::{ExError, ExErrorKind, Result, ShadowDiffError};
pub use policy::{build_effective_policy, ArrayOrderHandling, EquivalencePolicy};
pub use shadowdiff_core_types::{schema, CorrelationId};
