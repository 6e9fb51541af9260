//! Verdict classification and one-line summaries.

use crate::diff::model::{Discrepancy, SeverityCounts, Verdict};

pub const PERFECT_SUMMARY: &str = "Responses match perfectly";

/// Derive the verdict from the severities alone: the worst severity present wins.
pub fn classify(discrepancies: &[Discrepancy]) -> Verdict {
    verdict_for(SeverityCounts::tally(discrepancies))
}

fn verdict_for(counts: SeverityCounts) -> Verdict {
    if counts.critical > 0 {
        Verdict::CriticalDifferences
    } else if counts.major > 0 {
        Verdict::MajorDifferences
    } else if counts.minor > 0 {
        Verdict::MinorDifferences
    } else {
        Verdict::Perfect
    }
}

/// One-line summary, e.g. `Critical differences found: 1 critical, 2 major, 0 minor`.
pub fn summarize(discrepancies: &[Discrepancy]) -> String {
    let counts = SeverityCounts::tally(discrepancies);
    let label = match verdict_for(counts) {
        Verdict::CriticalDifferences => "Critical",
        Verdict::MajorDifferences => "Major",
        Verdict::MinorDifferences => "Minor",
        _ => return PERFECT_SUMMARY.to_string(),
    };
    format!(
        "{label} differences found: {} critical, {} major, {} minor",
        counts.critical, counts.major, counts.minor
    )
}

/// Summary for verdicts reached without running the comparison pipeline.
pub fn missing_summary(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::LeftMissing => "Reference response is missing",
        Verdict::RightMissing => "Candidate response is missing",
        Verdict::BothMissing => "Both responses are missing",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::{DiscrepancyType, Severity};

    fn d(severity: Severity) -> Discrepancy {
        Discrepancy::new(DiscrepancyType::StringValue, severity, "x", "a", "b", "")
    }

    #[test]
    fn test_empty_is_perfect() {
        assert_eq!(classify(&[]), Verdict::Perfect);
        assert_eq!(summarize(&[]), PERFECT_SUMMARY);
    }

    #[test]
    fn test_worst_severity_wins() {
        assert_eq!(classify(&[d(Severity::Minor)]), Verdict::MinorDifferences);
        assert_eq!(
            classify(&[d(Severity::Minor), d(Severity::Major)]),
            Verdict::MajorDifferences
        );
        assert_eq!(
            classify(&[d(Severity::Major), d(Severity::Critical), d(Severity::Minor)]),
            Verdict::CriticalDifferences
        );
    }

    #[test]
    fn test_summary_counts() {
        let ds = [
            d(Severity::Critical),
            d(Severity::Major),
            d(Severity::Major),
            d(Severity::Minor),
        ];
        assert_eq!(
            summarize(&ds),
            "Critical differences found: 1 critical, 2 major, 1 minor"
        );
        assert_eq!(
            summarize(&[d(Severity::Minor)]),
            "Minor differences found: 0 critical, 0 major, 1 minor"
        );
    }
}
