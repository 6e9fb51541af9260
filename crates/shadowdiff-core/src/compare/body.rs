//! Body comparison gate.
//!
//! Picks the cheapest comparison that is still meaningful for a body pair:
//! presence check, size-capped byte equality, structural diff for JSON, or
//! plain byte equality.

use crate::compare::response::CapturedResponse;
use crate::diff::engine::diff_documents;
use crate::diff::model::{Discrepancy, DiscrepancyType, Severity};
use crate::document::Document;
use crate::policy::EquivalencePolicy;

/// Characters of each body quoted in a text mismatch
pub const BODY_PREVIEW_CHARS: usize = 200;

const BODY_PATH: &str = "body";

/// Outcome of comparing the two bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyComparison {
    /// No body-level discrepancies were found
    pub matched: bool,
    pub discrepancies: Vec<Discrepancy>,
}

impl BodyComparison {
    fn from_discrepancies(discrepancies: Vec<Discrepancy>) -> Self {
        Self {
            matched: discrepancies.is_empty(),
            discrepancies,
        }
    }

    fn matched() -> Self {
        Self::from_discrepancies(Vec::new())
    }

    fn mismatch(discrepancy: Discrepancy) -> Self {
        Self::from_discrepancies(vec![discrepancy])
    }
}

/// Compare the bodies of a response pair under `policy`.
pub fn compare_bodies(
    left: &CapturedResponse,
    right: &CapturedResponse,
    policy: &EquivalencePolicy,
) -> BodyComparison {
    let (l, r) = (left.body_bytes(), right.body_bytes());

    match (l.is_empty(), r.is_empty()) {
        (true, true) => return BodyComparison::matched(),
        (false, true) => {
            return BodyComparison::mismatch(body_discrepancy(
                size_form(l),
                size_form(r),
                "body present in reference but empty in candidate",
            ))
        }
        (true, false) => {
            return BodyComparison::mismatch(body_discrepancy(
                size_form(l),
                size_form(r),
                "body empty in reference but present in candidate",
            ))
        }
        (false, false) => {}
    }

    if l.len() > policy.max_body_size || r.len() > policy.max_body_size {
        tracing::debug!(
            left_bytes = l.len(),
            right_bytes = r.len(),
            max_bytes = policy.max_body_size,
            "body exceeds comparison limit; byte equality only"
        );
        if l == r {
            return BodyComparison::matched();
        }
        return BodyComparison::mismatch(body_discrepancy(
            size_form(l),
            size_form(r),
            format!(
                "bodies differ; detailed comparison skipped above {} bytes",
                policy.max_body_size
            ),
        ));
    }

    if policy.deep_comparison && left.is_json() && right.is_json() {
        match (Document::parse(l), Document::parse(r)) {
            (Ok(left_doc), Ok(right_doc)) => {
                return BodyComparison::from_discrepancies(diff_documents(
                    &left_doc, &right_doc, policy,
                ));
            }
            (left_doc, right_doc) => {
                let reason = left_doc
                    .err()
                    .or(right_doc.err())
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                tracing::warn!(error = %reason, "JSON body did not parse; byte comparison used");
                if l == r {
                    return BodyComparison::matched();
                }
                return BodyComparison::mismatch(body_discrepancy(
                    preview(l),
                    preview(r),
                    format!("bodies differ and could not be compared as JSON: {}", reason),
                ));
            }
        }
    }

    // Decoding is lossy, so only the previews are built from text.
    if l == r {
        return BodyComparison::matched();
    }
    BodyComparison::mismatch(body_discrepancy(
        preview(l),
        preview(r),
        "body bytes differ",
    ))
}

fn body_discrepancy(
    left_value: impl Into<String>,
    right_value: impl Into<String>,
    description: impl Into<String>,
) -> Discrepancy {
    Discrepancy::new(
        DiscrepancyType::Body,
        Severity::Critical,
        BODY_PATH,
        left_value,
        right_value,
        description,
    )
}

fn size_form(body: &[u8]) -> String {
    format!("{} bytes", body.len())
}

fn preview(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(BODY_PREVIEW_CHARS)
        .collect()
}
