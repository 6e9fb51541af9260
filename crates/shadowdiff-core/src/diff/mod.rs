//! Structural diff of response documents.
//!
//! Walks a reference (left) and a candidate (right) document in lock-step
//! under an [`EquivalencePolicy`](crate::policy::EquivalencePolicy) and
//! produces a severity-classified discrepancy list.
//!
//! ## Entry point
//!
//! ```
//! use shadowdiff_core::diff::{classify, diff_documents, Verdict};
//! use shadowdiff_core::document::Document;
//! use shadowdiff_core::policy::EquivalencePolicy;
//!
//! let left = Document::parse(br#"{"sgv":100}"#).unwrap();
//! let right = Document::parse(br#"{"sgv":100.005}"#).unwrap();
//! let discrepancies = diff_documents(&left, &right, &EquivalencePolicy::default());
//! assert_eq!(classify(&discrepancies), Verdict::Perfect);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical discrepancy lists.
//! - **Purity**: no I/O, no shared state; safe to call from any thread.
//! - **Per-location paths**: array elements get per-index paths (`items[2]`).

pub mod engine;
pub mod model;
pub mod verdict;

pub use engine::{diff_documents, diff_nodes};
pub use model::{
    ComparisonResult, Discrepancy, DiscrepancyType, PerformanceComparison, Severity,
    SeverityCounts, Verdict,
};
pub use verdict::{classify, summarize};
