//! Run result models.
//!
//! This module contains the [`RunResult`] type and its associated structures
//! that capture everything a run produced: the output table, per-employee
//! audit traces, exclusions, recoverable issues and summary totals.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Competence, ComputedBenefit, IssueCounts, OutputTable, RecordIssue};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number within the employee's trace.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention, such as an ambiguous substring lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The audit trace of one employee's computation.
///
/// # Example
///
/// ```
/// use meal_voucher_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// assert!(trace.warnings.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// The number the next pushed step should carry.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }
}

/// Why an employee is absent from the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Listed in the interns source.
    Intern,
    /// Listed in the apprentices source.
    Apprentice,
    /// Listed in the leaves-of-absence source.
    OnLeave,
    /// Listed in the overseas source.
    Overseas,
    /// Job title names a director.
    Director,
    /// Present in some source but not in the active roster.
    NotOnRoster,
    /// No workday rule matched the union text.
    UnresolvedWorkdays,
}

/// An employee left out of the output, with the reason recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedEmployee {
    /// The employee.
    pub employee_id: String,
    /// The primary exclusion reason.
    pub reason: ExclusionReason,
    /// Free-text observation.
    pub observation: String,
}

/// Aggregate figures for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Distinct employees after merge.
    pub merged_records: usize,
    /// Employees that passed the eligibility filter.
    pub eligible: usize,
    /// Rows in the output table.
    pub output_rows: usize,
    /// Exclusions by reason.
    pub excluded_by_reason: BTreeMap<ExclusionReason, usize>,
    /// Recoverable issue counts.
    pub issues: IssueCounts,
    /// Sum of totals.
    pub total_value: Decimal,
    /// Sum of employer shares.
    pub employer_total: Decimal,
    /// Sum of employee shares.
    pub employee_total: Decimal,
}

/// The complete result of a benefit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the run.
    pub engine_version: String,
    /// The competence month.
    pub competence: Competence,
    /// The output artifact.
    pub output: OutputTable,
    /// Per-employee computations, in output order.
    pub benefits: Vec<ComputedBenefit>,
    /// Employees left out, with reasons.
    pub excluded: Vec<ExcludedEmployee>,
    /// Recoverable issues met during the run.
    pub issues: Vec<RecordIssue>,
    /// Aggregate figures.
    pub summary: RunSummary,
    /// The run duration in microseconds.
    pub duration_us: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_reason_serialization() {
        assert_eq!(
            serde_json::to_string(&ExclusionReason::OnLeave).unwrap(),
            "\"on_leave\""
        );
        assert_eq!(
            serde_json::to_string(&ExclusionReason::UnresolvedWorkdays).unwrap(),
            "\"unresolved_workdays\""
        );
    }

    #[test]
    fn test_exclusion_reason_as_map_key() {
        let mut counts = BTreeMap::new();
        counts.insert(ExclusionReason::Director, 2usize);
        counts.insert(ExclusionReason::Intern, 1usize);

        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"intern":1,"director":2}"#);
    }

    #[test]
    fn test_next_step_number_follows_steps() {
        let mut trace = AuditTrace::default();
        assert_eq!(trace.next_step_number(), 1);

        trace.steps.push(AuditStep {
            step_number: 1,
            rule_id: "workday_lookup".to_string(),
            rule_name: "Workday Lookup".to_string(),
            input: serde_json::json!({}),
            output: serde_json::json!({}),
            reasoning: String::new(),
        });
        assert_eq!(trace.next_step_number(), 2);
    }
}
