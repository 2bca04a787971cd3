//! Eligibility filter.
//!
//! Removes interns, apprentices, employees on leave, overseas employees,
//! directors, and anyone missing from the active roster. Each removed
//! employee is recorded once, under the first reason that applies in
//! [`ExclusionReason`] order.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::EligibilityConfig;
use crate::models::{EmployeeRecord, ExcludedEmployee, ExclusionReason};
use crate::normalize::fold;

/// The outcome of the eligibility filter.
#[derive(Debug, Clone, Default)]
pub struct EligibilityResult {
    /// Employees that remain, in merge order.
    pub eligible: Vec<EmployeeRecord>,
    /// Employees removed, in merge order.
    pub excluded: Vec<ExcludedEmployee>,
    /// Removals per primary reason.
    pub counts: BTreeMap<ExclusionReason, usize>,
}

/// Returns the first reason `record` is ineligible, if any.
///
/// # Examples
///
/// ```
/// use meal_voucher_engine::calculation::exclusion_reason;
/// use meal_voucher_engine::config::EligibilityConfig;
/// use meal_voucher_engine::models::{EmployeeRecord, ExclusionReason};
///
/// let config = EligibilityConfig::default();
/// let mut record = EmployeeRecord::new("1");
/// record.on_roster = true;
/// record.job_title = Some("Diretor Comercial".to_string());
/// assert_eq!(exclusion_reason(&record, &config), Some(ExclusionReason::Director));
///
/// record.status.intern = true;
/// assert_eq!(exclusion_reason(&record, &config), Some(ExclusionReason::Intern));
/// ```
pub fn exclusion_reason(
    record: &EmployeeRecord,
    config: &EligibilityConfig,
) -> Option<ExclusionReason> {
    let status = &record.status;
    if status.intern {
        Some(ExclusionReason::Intern)
    } else if status.apprentice {
        Some(ExclusionReason::Apprentice)
    } else if status.on_leave {
        Some(ExclusionReason::OnLeave)
    } else if status.overseas {
        Some(ExclusionReason::Overseas)
    } else if is_director(record, config) {
        Some(ExclusionReason::Director)
    } else if !record.on_roster {
        Some(ExclusionReason::NotOnRoster)
    } else {
        None
    }
}

fn is_director(record: &EmployeeRecord, config: &EligibilityConfig) -> bool {
    let fragment = fold(config.director_title_fragment.trim());
    record
        .job_title
        .as_deref()
        .is_some_and(|title| !fragment.is_empty() && fold(title).contains(&fragment))
}

/// Observation text for an exclusion.
pub fn exclusion_observation(reason: ExclusionReason) -> &'static str {
    match reason {
        ExclusionReason::Intern => "Estagiário - excluído",
        ExclusionReason::Apprentice => "Aprendiz - excluído",
        ExclusionReason::OnLeave => "Afastado - excluído",
        ExclusionReason::Overseas => "Exterior - excluído",
        ExclusionReason::Director => "Diretor - excluído",
        ExclusionReason::NotOnRoster => "Fora da base de ativos - excluído",
        ExclusionReason::UnresolvedWorkdays => "Sindicato sem regra de dias úteis",
    }
}

/// Splits `records` into eligible and excluded employees.
pub fn filter_eligible(
    records: Vec<EmployeeRecord>,
    config: &EligibilityConfig,
) -> EligibilityResult {
    let mut result = EligibilityResult::default();

    for record in records {
        match exclusion_reason(&record, config) {
            Some(reason) => {
                debug!(employee_id = %record.id, ?reason, "Employee excluded");
                *result.counts.entry(reason).or_insert(0) += 1;
                result.excluded.push(ExcludedEmployee {
                    employee_id: record.id,
                    reason,
                    observation: exclusion_observation(reason).to_string(),
                });
            }
            None => result.eligible.push(record),
        }
    }

    result
}
