//! Recoverable per-record issues.
//!
//! These never abort a run. Each is attached to the run result and
//! counted in the summary.

use serde::{Deserialize, Serialize};

use super::SourceKind;

/// A problem with a single source row or employee that the run recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordIssue {
    /// A source row had no employee id and was dropped.
    MissingIdentity {
        /// Source the row came from.
        source: SourceKind,
        /// 1-based data row number.
        row: usize,
    },
    /// No workday rule matched the employee's union text; the employee is
    /// excluded from the output.
    UnresolvedUnion {
        /// The employee.
        employee_id: String,
        /// The union text that matched nothing.
        union_name: String,
    },
    /// A date cell could not be read; the owning adjustment is skipped.
    MalformedDate {
        /// The employee, when known.
        employee_id: Option<String>,
        /// Source the cell came from.
        source: SourceKind,
        /// Canonical column header.
        column: String,
        /// The raw cell value.
        value: String,
    },
    /// A numeric cell (vacation days, workdays, rate) could not be read.
    MalformedValue {
        /// The employee, when the row belongs to one.
        employee_id: Option<String>,
        /// Source the cell came from.
        source: SourceKind,
        /// Canonical column header.
        column: String,
        /// The raw cell value.
        value: String,
    },
}

/// Aggregate issue counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    /// Rows dropped for lacking an employee id.
    pub missing_identity: usize,
    /// Employees excluded for an unmatched union.
    pub unresolved_union: usize,
    /// Unreadable date cells.
    pub malformed_date: usize,
    /// Unreadable numeric cells.
    pub malformed_value: usize,
}

impl IssueCounts {
    /// Tallies a list of issues.
    pub fn tally(issues: &[RecordIssue]) -> Self {
        issues.iter().fold(Self::default(), |mut counts, issue| {
            match issue {
                RecordIssue::MissingIdentity { .. } => counts.missing_identity += 1,
                RecordIssue::UnresolvedUnion { .. } => counts.unresolved_union += 1,
                RecordIssue::MalformedDate { .. } => counts.malformed_date += 1,
                RecordIssue::MalformedValue { .. } => counts.malformed_value += 1,
            }
            counts
        })
    }
}
