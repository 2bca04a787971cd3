//! Workday resolution.
//!
//! Each eligible employee's standard benefit days per month come from the
//! union workday sheet: a rule applies when its union fragment occurs in
//! the employee's union text. No match means the employee cannot be paid
//! and is excluded from the output; there is no default day count.

use tracing::{debug, warn};

use crate::config::MatchOptions;
use crate::models::{AuditStep, AuditWarning, EmployeeRecord, RawTable, RecordIssue, SourceKind};
use crate::normalize::{CanonicalColumn, ColumnMapping, parse_day_count};

use super::reference_sheet::{is_header_row, reference_rows};
use super::rule_match::RuleTable;

/// The union → workdays rules and the rows that could not be read.
#[derive(Debug, Clone)]
pub struct WorkdayTable {
    /// Rules in sheet order.
    pub rules: RuleTable<u32>,
    /// Rows with an unreadable day count.
    pub issues: Vec<RecordIssue>,
}

/// Builds the workday rules from the union workday sheet.
///
/// A repeated header row is skipped. Rows with a key but an unreadable
/// day count become `MalformedValue` issues.
///
/// # Examples
///
/// ```
/// use meal_voucher_engine::calculation::build_workday_table;
/// use meal_voucher_engine::config::MatchOptions;
/// use meal_voucher_engine::models::RawTable;
/// use meal_voucher_engine::normalize::ColumnMapping;
///
/// let sheet = RawTable::new(["SINDICATO", "DIAS UTEIS"])
///     .with_row(["SINDPD SP", "22"])
///     .with_row(["SINDPD RJ", "21"]);
///
/// let table = build_workday_table(&sheet, &ColumnMapping::default(), MatchOptions::default());
/// assert_eq!(table.rules.len(), 2);
/// assert!(table.issues.is_empty());
/// ```
pub fn build_workday_table(
    table: &RawTable,
    mapping: &ColumnMapping,
    options: MatchOptions,
) -> WorkdayTable {
    let mut rules = RuleTable::new(options);
    let mut issues = Vec::new();

    for row in reference_rows(table, mapping, CanonicalColumn::Union, CanonicalColumn::Workdays) {
        match parse_day_count(&row.value) {
            Some(days) => rules.push(row.key, days),
            None if is_header_row(&row, mapping, CanonicalColumn::Workdays) => {
                debug!(row = row.row, "Skipping repeated header in workday sheet");
            }
            None => {
                warn!(union = %row.key, value = %row.value, "Unreadable workday count");
                issues.push(RecordIssue::MalformedValue {
                    employee_id: None,
                    source: SourceKind::UnionWorkdays,
                    column: CanonicalColumn::Workdays.header().to_string(),
                    value: row.value,
                });
            }
        }
    }

    debug!(rules = rules.len(), "Built workday table");
    WorkdayTable { rules, issues }
}

/// The result of a workday lookup, including the audit step.
#[derive(Debug, Clone)]
pub struct WorkdayResolution {
    /// Standard days, or `None` when no rule matched.
    pub standard_days: Option<u32>,
    /// The matched rule key.
    pub matched_key: Option<String>,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
    /// Set when more than one rule matched.
    pub warning: Option<AuditWarning>,
}

/// Looks up the standard monthly workdays for `record`'s union.
pub fn resolve_workdays(
    record: &EmployeeRecord,
    rules: &RuleTable<u32>,
    step_number: u32,
) -> WorkdayResolution {
    let union = record.union_text();
    let policy = rules.options().policy;

    let Some(found) = rules.find(union) else {
        return WorkdayResolution {
            standard_days: None,
            matched_key: None,
            audit_step: AuditStep {
                step_number,
                rule_id: "workday_lookup".to_string(),
                rule_name: "Workday Lookup".to_string(),
                input: serde_json::json!({
                    "union": union,
                    "rules": rules.len()
                }),
                output: serde_json::json!({
                    "standard_days": null,
                    "matched_key": null
                }),
                reasoning: format!("No workday rule matches union '{}'", union),
            },
            warning: None,
        };
    };

    let warning = found.is_ambiguous().then(|| {
        warn!(
            employee_id = %record.id,
            union,
            candidates = ?found.candidate_keys(),
            chosen = %found.rule.key,
            "Ambiguous workday rule match"
        );
        AuditWarning {
            code: "AMBIGUOUS_WORKDAY_RULE".to_string(),
            message: format!(
                "Union '{}' matches {} workday rules {:?}; '{}' chosen by {:?}",
                union,
                found.candidates.len(),
                found.candidate_keys(),
                found.rule.key,
                policy
            ),
            severity: "medium".to_string(),
        }
    });

    let days = found.rule.value;
    let audit_step = AuditStep {
        step_number,
        rule_id: "workday_lookup".to_string(),
        rule_name: "Workday Lookup".to_string(),
        input: serde_json::json!({
            "union": union,
            "rules": rules.len()
        }),
        output: serde_json::json!({
            "standard_days": days,
            "matched_key": found.rule.key,
            "candidates": found.candidate_keys()
        }),
        reasoning: format!(
            "Union '{}' matched rule '{}' (row {}) → {} days",
            union,
            found.rule.key,
            found.rule.position + 1,
            days
        ),
    };

    WorkdayResolution {
        standard_days: Some(days),
        matched_key: Some(found.rule.key.clone()),
        audit_step,
        warning,
    }
}
