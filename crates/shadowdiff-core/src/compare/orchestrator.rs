//! Response-level comparison.
//!
//! [`ResponseComparator::compare`] is the boundary the forwarding service
//! calls once per captured request pair. It never fails: absent inputs map to
//! the `*Missing` verdicts, and any error or panic inside the pipeline maps to
//! `ComparisonError` with the error message as summary.

use crate::compare::body::compare_bodies;
use crate::compare::response::CapturedResponse;
use crate::config::ComparisonConfig;
use crate::diff::model::{
    ComparisonResult, Discrepancy, DiscrepancyType, PerformanceComparison, Severity, Verdict,
};
use crate::diff::verdict::{classify, missing_summary, summarize};
use crate::errors::{ExError, ExErrorKind};
use crate::policy::{build_effective_policy, EquivalencePolicy};
use crate::{log_op_end, log_op_error, log_op_start};
use chrono::{DateTime, Utc};
use shadowdiff_core_types::CorrelationId;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Headers whose values must agree between the two systems
pub const COMPARED_HEADERS: [&str; 3] = ["cache-control", "content-encoding", "transfer-encoding"];

/// Response-time gap above which a Performance discrepancy is reported
pub const PERFORMANCE_THRESHOLD_MS: u64 = 1000;

const OP_COMPARE: &str = "compare";

/// Compares captured response pairs under a base policy.
///
/// Holds only the immutable base policy, so one comparator can serve
/// concurrent requests from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct ResponseComparator {
    policy: EquivalencePolicy,
}

/// Everything in a [`ComparisonResult`] except identity and timestamp.
struct Evaluation {
    status_code_match: bool,
    body_match: bool,
    discrepancies: Vec<Discrepancy>,
    performance: Option<PerformanceComparison>,
    verdict: Verdict,
    summary: String,
}

impl Evaluation {
    fn missing(verdict: Verdict) -> Self {
        Self {
            status_code_match: false,
            body_match: false,
            discrepancies: Vec::new(),
            performance: None,
            verdict,
            summary: missing_summary(verdict).to_string(),
        }
    }
}

impl ResponseComparator {
    pub fn new(policy: EquivalencePolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &ComparisonConfig) -> Self {
        Self::new(EquivalencePolicy::from_config(config))
    }

    pub fn policy(&self) -> &EquivalencePolicy {
        &self.policy
    }

    /// Compare a reference (left) and candidate (right) response captured for
    /// the same logical request, stamping the result with the current time.
    pub fn compare(
        &self,
        left: Option<&CapturedResponse>,
        right: Option<&CapturedResponse>,
        correlation_id: CorrelationId,
        request_path: &str,
    ) -> ComparisonResult {
        self.compare_at(left, right, correlation_id, request_path, Utc::now())
    }

    /// [`compare`](Self::compare) with an explicit result timestamp.
    pub fn compare_at(
        &self,
        left: Option<&CapturedResponse>,
        right: Option<&CapturedResponse>,
        correlation_id: CorrelationId,
        request_path: &str,
        timestamp: DateTime<Utc>,
    ) -> ComparisonResult {
        let started = Instant::now();
        log_op_start!(
            OP_COMPARE,
            correlation_id = correlation_id.as_str(),
            request_path = request_path
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.evaluate(left, right, request_path)
        }))
        .unwrap_or_else(|payload| Err(panic_error(payload.as_ref())));
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(evaluation) => {
                let discrepancy_count = evaluation.discrepancies.len() as u64;
                log_op_end!(
                    OP_COMPARE,
                    duration_ms = duration_ms,
                    correlation_id = correlation_id.as_str(),
                    verdict = %evaluation.verdict,
                    discrepancy_count = discrepancy_count
                );
                ComparisonResult {
                    correlation_id,
                    timestamp,
                    status_code_match: evaluation.status_code_match,
                    body_match: evaluation.body_match,
                    discrepancies: evaluation.discrepancies,
                    performance: evaluation.performance,
                    verdict: evaluation.verdict,
                    summary: evaluation.summary,
                }
            }
            Err(err) => {
                let err = err
                    .with_op(OP_COMPARE)
                    .with_correlation_id(correlation_id.clone());
                log_op_error!(
                    OP_COMPARE,
                    err.clone(),
                    duration_ms = duration_ms,
                    correlation_id = correlation_id.as_str()
                );
                ComparisonResult {
                    correlation_id,
                    timestamp,
                    status_code_match: false,
                    body_match: false,
                    discrepancies: Vec::new(),
                    performance: None,
                    verdict: Verdict::ComparisonError,
                    summary: err.message().to_string(),
                }
            }
        }
    }

    fn evaluate(
        &self,
        left: Option<&CapturedResponse>,
        right: Option<&CapturedResponse>,
        request_path: &str,
    ) -> Result<Evaluation, ExError> {
        let (left, right) = match (left, right) {
            (None, None) => return Ok(Evaluation::missing(Verdict::BothMissing)),
            (None, Some(_)) => return Ok(Evaluation::missing(Verdict::LeftMissing)),
            (Some(_), None) => return Ok(Evaluation::missing(Verdict::RightMissing)),
            (Some(l), Some(r)) => (l, r),
        };

        let policy = build_effective_policy(&self.policy, request_path);
        policy.validate()?;

        let status = compare_status(left, right);
        let status_code_match = status.is_none();
        let body = compare_bodies(left, right, &policy);
        let performance = compare_performance(left, right);

        let discrepancies: Vec<Discrepancy> = status
            .into_iter()
            .chain(compare_headers(left, right))
            .chain(compare_content_type(left, right))
            .chain(body.discrepancies)
            .chain(performance_discrepancy(&performance))
            .collect();

        Ok(Evaluation {
            status_code_match,
            body_match: body.matched,
            verdict: classify(&discrepancies),
            summary: summarize(&discrepancies),
            discrepancies,
            performance: Some(performance),
        })
    }
}

fn compare_status(left: &CapturedResponse, right: &CapturedResponse) -> Option<Discrepancy> {
    (left.status_code != right.status_code).then(|| {
        Discrepancy::new(
            DiscrepancyType::StatusCode,
            Severity::Critical,
            "status_code",
            left.status_code.to_string(),
            right.status_code.to_string(),
            format!(
                "status code differs: {} vs {}",
                left.status_code, right.status_code
            ),
        )
    })
}

fn compare_headers(left: &CapturedResponse, right: &CapturedResponse) -> Vec<Discrepancy> {
    COMPARED_HEADERS
        .iter()
        .filter_map(|name| {
            let l = left.headers.get_joined(name);
            let r = right.headers.get_joined(name);
            let same = match (&l, &r) {
                (None, None) => true,
                (Some(l), Some(r)) => l.eq_ignore_ascii_case(r),
                _ => false,
            };
            (!same).then(|| {
                Discrepancy::new(
                    DiscrepancyType::Header,
                    Severity::Minor,
                    format!("headers.{}", name),
                    l.unwrap_or_default(),
                    r.unwrap_or_default(),
                    format!("header '{}' differs", name),
                )
            })
        })
        .collect()
}

fn compare_content_type(left: &CapturedResponse, right: &CapturedResponse) -> Option<Discrepancy> {
    let l = left.effective_content_type().unwrap_or_default();
    let r = right.effective_content_type().unwrap_or_default();
    (!l.eq_ignore_ascii_case(&r)).then(|| {
        Discrepancy::new(
            DiscrepancyType::ContentType,
            Severity::Minor,
            "content_type",
            l,
            r,
            "content type differs",
        )
    })
}

fn compare_performance(left: &CapturedResponse, right: &CapturedResponse) -> PerformanceComparison {
    let (l, r) = (left.response_time_ms, right.response_time_ms);
    let difference_ms = i64::try_from(r)
        .unwrap_or(i64::MAX)
        .saturating_sub(i64::try_from(l).unwrap_or(i64::MAX));
    let percent_difference = if l == 0 {
        0.0
    } else {
        difference_ms as f64 / l as f64 * 100.0
    };
    PerformanceComparison {
        left_ms: l,
        right_ms: r,
        difference_ms,
        percent_difference,
        exceeds_threshold: l.abs_diff(r) > PERFORMANCE_THRESHOLD_MS,
    }
}

fn performance_discrepancy(performance: &PerformanceComparison) -> Option<Discrepancy> {
    performance.exceeds_threshold.then(|| {
        Discrepancy::new(
            DiscrepancyType::Performance,
            Severity::Minor,
            "response_time_ms",
            performance.left_ms.to_string(),
            performance.right_ms.to_string(),
            format!(
                "response time differs by {}ms (threshold {}ms)",
                performance.difference_ms.unsigned_abs(),
                PERFORMANCE_THRESHOLD_MS
            ),
        )
    })
}

fn panic_error(payload: &(dyn std::any::Any + Send)) -> ExError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "comparison panicked".to_string());
    ExError::new(ExErrorKind::ComparisonPanicked).with_message(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_performance_comparison() {
        let left = CapturedResponse::new(200).with_response_time_ms(200);
        let right = CapturedResponse::new(200).with_response_time_ms(1300);
        let perf = compare_performance(&left, &right);
        assert_eq!(perf.difference_ms, 1100);
        assert!((perf.percent_difference - 550.0).abs() < 1e-9);
        assert!(perf.exceeds_threshold);
        assert!(performance_discrepancy(&perf).is_some());
    }

    #[test]
    fn test_performance_threshold_is_exclusive() {
        let left = CapturedResponse::new(200).with_response_time_ms(1000);
        let right = CapturedResponse::new(200).with_response_time_ms(0);
        let perf = compare_performance(&left, &right);
        assert_eq!(perf.difference_ms, -1000);
        assert!(!perf.exceeds_threshold);
    }

    #[test]
    fn test_percent_difference_with_zero_reference_time() {
        let left = CapturedResponse::new(200);
        let right = CapturedResponse::new(200).with_response_time_ms(50);
        assert_eq!(compare_performance(&left, &right).percent_difference, 0.0);
    }

    #[test]
    fn test_panic_payload_message() {
        let err = panic_error(&"boom");
        assert_eq!(err.kind(), ExErrorKind::ComparisonPanicked);
        assert_eq!(err.message(), "boom");

        let err = panic_error(&String::from("owned boom"));
        assert_eq!(err.message(), "owned boom");
    }
}
