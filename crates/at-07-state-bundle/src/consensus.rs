//! # Verifier Consensus
//!
//! Reduces independent verifier reports to one PASS/FAIL verdict by
//! majority, fail-closed at the tie.

use crate::errors::ConsensusError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A verifier's verdict over one bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Every check held.
    Pass,
    /// At least one check failed.
    Fail,
}

/// One subsystem-level check inside a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsystemCheck {
    /// Subsystem the check covered (`ledger`, `registrum`, chain id, ...).
    pub subsystem: String,
    /// Whether the recomputation matched.
    pub passed: bool,
    /// Optional comparison detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// An independent verifier's submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierReport {
    /// Unique report id (pagination cursor on the public surface).
    pub report_id: String,
    /// Reporting verifier.
    pub verifier_id: String,
    /// Overall verdict.
    pub verdict: Verdict,
    /// Per-subsystem checks.
    pub subsystem_checks: Vec<SubsystemCheck>,
    /// Anomalies the verifier found.
    pub discrepancies: Vec<String>,
    /// Bundle the report covers.
    pub bundle_hash: String,
    /// RFC 3339 verification instant.
    pub verified_at: String,
}

/// Aggregation configuration. Passed explicitly; no module-level globals.
#[derive(Clone, Copy, Debug)]
pub struct ConsensusConfig {
    /// Reports required before the quorum flag raises.
    pub minimum_verifiers: usize,
    /// Agreement ratio a tie must reach to resolve PASS. The default of
    /// 0.66 means an exact 0.5 tie resolves FAIL.
    pub tie_break_threshold: f64,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            minimum_verifiers: 3,
            tie_break_threshold: 0.66,
        }
    }
}

/// The aggregated consensus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusOutcome {
    /// Majority verdict, fail-closed at the tie.
    pub verdict: Verdict,
    /// `majority_count / total_verifiers`.
    pub agreement_ratio: f64,
    /// Whether enough verifiers reported.
    pub quorum_reached: bool,
    /// Total reports aggregated.
    pub total_verifiers: usize,
    /// PASS reports.
    pub pass_count: usize,
    /// FAIL reports.
    pub fail_count: usize,
    /// Verifiers disagreeing with the consensus verdict.
    pub dissenters: Vec<String>,
}

/// Aggregate independent reports into one verdict.
///
/// Report ids must be unique; duplicates are a caller bug and reject the
/// whole aggregation.
pub fn aggregate_reports(
    reports: &[VerifierReport],
    config: &ConsensusConfig,
) -> Result<ConsensusOutcome, ConsensusError> {
    if reports.is_empty() {
        return Err(ConsensusError::EmptyReportSet);
    }
    let mut seen = HashSet::new();
    for report in reports {
        if !seen.insert(report.report_id.as_str()) {
            return Err(ConsensusError::DuplicateReportId {
                report_id: report.report_id.clone(),
            });
        }
    }

    let total = reports.len();
    let pass_count = reports
        .iter()
        .filter(|r| r.verdict == Verdict::Pass)
        .count();
    let fail_count = total - pass_count;
    let majority_count = pass_count.max(fail_count);
    let agreement_ratio = majority_count as f64 / total as f64;

    let verdict = if pass_count > fail_count {
        Verdict::Pass
    } else if pass_count == fail_count && agreement_ratio >= config.tie_break_threshold {
        Verdict::Pass
    } else {
        Verdict::Fail
    };

    let dissenters = reports
        .iter()
        .filter(|r| r.verdict != verdict)
        .map(|r| r.verifier_id.clone())
        .collect();

    Ok(ConsensusOutcome {
        verdict,
        agreement_ratio,
        quorum_reached: total >= config.minimum_verifiers,
        total_verifiers: total,
        pass_count,
        fail_count,
        dissenters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, verifier: &str, verdict: Verdict) -> VerifierReport {
        VerifierReport {
            report_id: id.to_string(),
            verifier_id: verifier.to_string(),
            verdict,
            subsystem_checks: vec![SubsystemCheck {
                subsystem: "ledger".to_string(),
                passed: verdict == Verdict::Pass,
                detail: None,
            }],
            discrepancies: Vec::new(),
            bundle_hash: "ab".repeat(32),
            verified_at: "2025-06-15T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_majority_pass() {
        let reports = vec![
            report("r1", "v1", Verdict::Pass),
            report("r2", "v2", Verdict::Pass),
            report("r3", "v3", Verdict::Fail),
        ];
        let outcome = aggregate_reports(&reports, &ConsensusConfig::default()).unwrap();
        assert_eq!(outcome.verdict, Verdict::Pass);
        assert!((outcome.agreement_ratio - 2.0 / 3.0).abs() < 1e-9);
        assert!(outcome.quorum_reached);
        assert_eq!(outcome.dissenters, vec!["v3"]);
    }

    #[test]
    fn test_majority_fail() {
        let reports = vec![
            report("r1", "v1", Verdict::Fail),
            report("r2", "v2", Verdict::Fail),
            report("r3", "v3", Verdict::Pass),
        ];
        let outcome = aggregate_reports(&reports, &ConsensusConfig::default()).unwrap();
        assert_eq!(outcome.verdict, Verdict::Fail);
        assert_eq!(outcome.dissenters, vec!["v3"]);
    }

    #[test]
    fn test_exact_tie_resolves_fail() {
        let reports = vec![
            report("r1", "v1", Verdict::Pass),
            report("r2", "v2", Verdict::Fail),
        ];
        let outcome = aggregate_reports(&reports, &ConsensusConfig::default()).unwrap();
        assert_eq!(outcome.verdict, Verdict::Fail);
        assert!((outcome.agreement_ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tie_can_pass_only_under_lowered_threshold() {
        let reports = vec![
            report("r1", "v1", Verdict::Pass),
            report("r2", "v2", Verdict::Fail),
        ];
        let lenient = ConsensusConfig {
            minimum_verifiers: 2,
            tie_break_threshold: 0.5,
        };
        let outcome = aggregate_reports(&reports, &lenient).unwrap();
        assert_eq!(outcome.verdict, Verdict::Pass);
    }

    #[test]
    fn test_quorum_flag() {
        let reports = vec![report("r1", "v1", Verdict::Pass)];
        let outcome = aggregate_reports(&reports, &ConsensusConfig::default()).unwrap();
        assert!(!outcome.quorum_reached);
        assert_eq!(outcome.verdict, Verdict::Pass);
    }

    #[test]
    fn test_duplicate_report_ids_rejected() {
        let reports = vec![
            report("r1", "v1", Verdict::Pass),
            report("r1", "v2", Verdict::Pass),
        ];
        let err = aggregate_reports(&reports, &ConsensusConfig::default()).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(matches!(
            aggregate_reports(&[], &ConsensusConfig::default()).unwrap_err(),
            ConsensusError::EmptyReportSet
        ));
    }

    #[test]
    fn test_verdict_wire_form_is_uppercase() {
        assert_eq!(serde_json::to_value(Verdict::Pass).unwrap(), "PASS");
        assert_eq!(serde_json::to_value(Verdict::Fail).unwrap(), "FAIL");
    }
}
