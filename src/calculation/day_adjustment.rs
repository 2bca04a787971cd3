//! Day adjustment calculation.
//!
//! Turns an employee's standard workday count into payable days:
//!
//! 1. **Vacation**: subtract vacation days, floored at zero.
//! 2. **Termination**: when the termination date falls in the competence
//!    month, a confirmed notice on or before the cut-off day pays nothing;
//!    later days pay `standard × day / month_days`. A termination in any
//!    other month changes nothing.
//! 3. **Admission**: an employee admitted in the competence month is paid
//!    at most `standard × (month_days − (day − 1)) / month_days`.
//!
//! Prorations cap the running value, so adjustments never add days.

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::config::{EarlyTerminationPolicy, ProrationConfig, RoundingConfig};
use crate::models::{AuditStep, Competence, EmployeeRecord, Termination};

/// The result of adjusting one employee's days, including audit steps.
#[derive(Debug, Clone)]
pub struct DayAdjustmentResult {
    /// Final payable days, never negative.
    pub payable_days: Decimal,
    /// Observation fragments, in application order.
    pub observations: Vec<String>,
    /// One audit step per adjustment considered.
    pub audit_steps: Vec<AuditStep>,
}

/// `standard × numerator / month_days`, rounded to day precision.
fn prorate(
    standard_days: u32,
    numerator: u32,
    proration: &ProrationConfig,
    rounding: &RoundingConfig,
) -> Decimal {
    rounding.days(
        Decimal::from(standard_days) * Decimal::from(numerator)
            / Decimal::from(proration.month_days),
    )
}

/// Subtracts vacation days from the standard count.
///
/// # Examples
///
/// ```
/// use meal_voucher_engine::calculation::deduct_vacation;
/// use meal_voucher_engine::config::RoundingConfig;
/// use rust_decimal::Decimal;
///
/// let (days, step) = deduct_vacation(22, 30, &RoundingConfig::default(), 2);
/// assert_eq!(days, Decimal::ZERO);
/// assert_eq!(step.rule_id, "vacation_deduction");
/// ```
pub fn deduct_vacation(
    standard_days: u32,
    vacation_days: u32,
    rounding: &RoundingConfig,
    step_number: u32,
) -> (Decimal, AuditStep) {
    let days = rounding.days(Decimal::from(standard_days.saturating_sub(vacation_days)));

    let reasoning = if vacation_days == 0 {
        format!("No vacation recorded; {} days", standard_days)
    } else if vacation_days >= standard_days {
        format!(
            "{} vacation days cover all {} standard days; floored at 0",
            vacation_days, standard_days
        )
    } else {
        format!("{} - {} vacation days = {}", standard_days, vacation_days, days)
    };

    let step = AuditStep {
        step_number,
        rule_id: "vacation_deduction".to_string(),
        rule_name: "Vacation Deduction".to_string(),
        input: serde_json::json!({
            "standard_days": standard_days,
            "vacation_days": vacation_days
        }),
        output: serde_json::json!({
            "days": days.to_string()
        }),
        reasoning,
    };

    (days, step)
}

/// What a termination does to the payable days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationEffect {
    /// The termination falls outside the competence month.
    NoEffect,
    /// Nothing is paid.
    Zero,
    /// Days are capped at the prorated value.
    Cap(Decimal),
}

/// Decides the effect of `termination` for the competence month.
pub fn termination_effect(
    termination: &Termination,
    standard_days: u32,
    competence: Competence,
    proration: &ProrationConfig,
    rounding: &RoundingConfig,
) -> TerminationEffect {
    let date = termination.date;
    if !competence.contains(date) {
        return TerminationEffect::NoEffect;
    }

    let day = date.day();
    let early = day <= proration.notice_cutoff_day;
    let prorated = TerminationEffect::Cap(prorate(standard_days, day, proration, rounding));

    match (early, termination.notice_confirmed) {
        (true, true) => TerminationEffect::Zero,
        (false, _) => prorated,
        (true, false) => match proration.early_termination_without_notice {
            EarlyTerminationPolicy::Prorate => prorated,
            EarlyTerminationPolicy::Zero => TerminationEffect::Zero,
        },
    }
}

fn termination_observation(
    termination: &Termination,
    effect: TerminationEffect,
    competence: Competence,
    proration: &ProrationConfig,
) -> Option<String> {
    let day = termination.date.day();
    match effect {
        TerminationEffect::NoEffect => None,
        TerminationEffect::Zero if termination.notice_confirmed => Some(format!(
            "Desligado até dia {} - sem benefício",
            proration.notice_cutoff_day
        )),
        TerminationEffect::Zero => Some(format!(
            "Desligado dia {} sem comunicado - sem benefício",
            day
        )),
        TerminationEffect::Cap(_) => Some(format!("Desligado dia {} - proporcional", day)),
    }
}

/// Applies the termination rule to the running day count.
///
/// Returns the new day count, the observation (if the termination had an
/// effect) and the audit step.
pub fn prorate_termination(
    days: Decimal,
    termination: &Termination,
    standard_days: u32,
    competence: Competence,
    proration: &ProrationConfig,
    rounding: &RoundingConfig,
    step_number: u32,
) -> (Decimal, Option<String>, AuditStep) {
    let effect = termination_effect(termination, standard_days, competence, proration, rounding);
    let adjusted = match effect {
        TerminationEffect::NoEffect => days,
        TerminationEffect::Zero => rounding.days(Decimal::ZERO),
        TerminationEffect::Cap(cap) => days.min(cap),
    };

    let reasoning = match effect {
        TerminationEffect::NoEffect => format!(
            "Termination on {} is outside competence {}; no effect",
            termination.date, competence
        ),
        TerminationEffect::Zero => format!(
            "Termination on day {} (notice {}) on or before cut-off day {}; 0 days",
            termination.date.day(),
            if termination.notice_confirmed { "OK" } else { "not confirmed" },
            proration.notice_cutoff_day
        ),
        TerminationEffect::Cap(cap) => format!(
            "{} x {}/{} = {}; min({}, {}) = {}",
            standard_days,
            termination.date.day(),
            proration.month_days,
            cap,
            days,
            cap,
            adjusted
        ),
    };

    let step = AuditStep {
        step_number,
        rule_id: "termination_proration".to_string(),
        rule_name: "Termination Proration".to_string(),
        input: serde_json::json!({
            "days": days.to_string(),
            "standard_days": standard_days,
            "termination_date": termination.date.to_string(),
            "notice_confirmed": termination.notice_confirmed,
            "competence": competence.to_string()
        }),
        output: serde_json::json!({
            "days": adjusted.to_string()
        }),
        reasoning,
    };

    let observation = termination_observation(termination, effect, competence, proration);
    (adjusted, observation, step)
}

/// Caps the running day count for an admission inside the competence month.
///
/// Returns `None` when the admission is outside the month.
pub fn prorate_admission(
    days: Decimal,
    standard_days: u32,
    admission_date: chrono::NaiveDate,
    competence: Competence,
    proration: &ProrationConfig,
    rounding: &RoundingConfig,
    step_number: u32,
) -> Option<(Decimal, String, AuditStep)> {
    if !competence.contains(admission_date) {
        return None;
    }

    let day = admission_date.day();
    let remaining = proration.month_days.saturating_sub(day - 1);
    let cap = prorate(standard_days, remaining, proration, rounding);
    let adjusted = days.min(cap);

    let step = AuditStep {
        step_number,
        rule_id: "admission_proration".to_string(),
        rule_name: "Admission Proration".to_string(),
        input: serde_json::json!({
            "days": days.to_string(),
            "standard_days": standard_days,
            "admission_date": admission_date.to_string()
        }),
        output: serde_json::json!({
            "days": adjusted.to_string()
        }),
        reasoning: format!(
            "{} x {}/{} = {}; min({}, {}) = {}",
            standard_days, remaining, proration.month_days, cap, days, cap, adjusted
        ),
    };

    Some((adjusted, format!("Admissão dia {} - proporcional", day), step))
}

/// Computes payable days for one employee from the standard count.
///
/// # Examples
///
/// ```
/// use meal_voucher_engine::calculation::adjust_days;
/// use meal_voucher_engine::config::{ProrationConfig, RoundingConfig};
/// use meal_voucher_engine::models::{Competence, EmployeeRecord, Termination};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let mut record = EmployeeRecord::new("1001");
/// record.termination = Some(Termination {
///     date: NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
///     notice_confirmed: false,
/// });
///
/// let result = adjust_days(
///     &record,
///     22,
///     Competence::new(2025, 5).unwrap(),
///     &ProrationConfig::default(),
///     &RoundingConfig::default(),
///     2,
/// );
/// assert_eq!(result.payable_days, Decimal::new(1467, 2));
/// assert_eq!(result.observations, vec!["Desligado dia 20 - proporcional"]);
/// ```
pub fn adjust_days(
    record: &EmployeeRecord,
    standard_days: u32,
    competence: Competence,
    proration: &ProrationConfig,
    rounding: &RoundingConfig,
    first_step: u32,
) -> DayAdjustmentResult {
    let mut observations = Vec::new();
    let mut audit_steps = Vec::new();
    let next = |steps: &[AuditStep]| first_step + steps.len() as u32;

    let (mut days, step) =
        deduct_vacation(standard_days, record.vacation_days, rounding, first_step);
    if record.vacation_days > 0 {
        observations.push(format!("Férias: -{}", record.vacation_days));
    }
    audit_steps.push(step);

    if let Some(termination) = &record.termination {
        let (adjusted, observation, step) = prorate_termination(
            days,
            termination,
            standard_days,
            competence,
            proration,
            rounding,
            next(&audit_steps),
        );
        days = adjusted;
        observations.extend(observation);
        audit_steps.push(step);
    }

    let admission = record
        .admission_date
        .filter(|_| proration.prorate_admissions);
    if let Some((adjusted, observation, step)) = admission.and_then(|date| {
        prorate_admission(
            days,
            standard_days,
            date,
            competence,
            proration,
            rounding,
            next(&audit_steps),
        )
    }) {
        days = adjusted;
        observations.push(observation);
        audit_steps.push(step);
    }

    DayAdjustmentResult {
        payable_days: rounding.days(days.max(Decimal::ZERO)),
        observations,
        audit_steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoundingMode;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn may() -> Competence {
        Competence::new(2025, 5).unwrap()
    }

    fn terminated(day: u32, notice_confirmed: bool) -> EmployeeRecord {
        terminated_on(NaiveDate::from_ymd_opt(2025, 5, day).unwrap(), notice_confirmed)
    }

    fn terminated_on(date: NaiveDate, notice_confirmed: bool) -> EmployeeRecord {
        let mut record = EmployeeRecord::new("1001");
        record.on_roster = true;
        record.termination = Some(Termination {
            date,
            notice_confirmed,
        });
        record
    }

    fn adjust(record: &EmployeeRecord, standard_days: u32) -> DayAdjustmentResult {
        adjust_days(
            record,
            standard_days,
            may(),
            &ProrationConfig::default(),
            &RoundingConfig::default(),
            2,
        )
    }

    #[test]
    fn test_no_adjustments() {
        let result = adjust(&EmployeeRecord::new("1"), 22);
        assert_eq!(result.payable_days, dec("22"));
        assert_eq!(result.payable_days.to_string(), "22.00");
        assert!(result.observations.is_empty());
        assert_eq!(result.audit_steps.len(), 1);
        assert_eq!(result.audit_steps[0].step_number, 2);
    }

    #[test]
    fn test_vacation_is_subtracted() {
        let mut record = EmployeeRecord::new("1");
        record.vacation_days = 5;
        let result = adjust(&record, 22);
        assert_eq!(result.payable_days, dec("17"));
        assert_eq!(result.observations, vec!["Férias: -5"]);
    }

    #[test]
    fn test_vacation_floors_at_zero() {
        let mut record = EmployeeRecord::new("1");
        record.vacation_days = 30;
        let result = adjust(&record, 22);
        assert_eq!(result.payable_days, Decimal::ZERO);
    }

    /// Termination on day 10 with notice OK pays nothing.
    #[test]
    fn test_confirmed_early_termination_is_zero() {
        let result = adjust(&terminated(10, true), 22);
        assert_eq!(result.payable_days, Decimal::ZERO);
        assert_eq!(result.observations, vec!["Desligado até dia 15 - sem benefício"]);
        assert_eq!(result.audit_steps[1].rule_id, "termination_proration");
    }

    #[test]
    fn test_cutoff_day_is_inclusive() {
        let result = adjust(&terminated(15, true), 22);
        assert_eq!(result.payable_days, Decimal::ZERO);

        let result = adjust(&terminated(16, true), 22);
        assert_eq!(result.payable_days, dec("11.73"));
    }

    /// Termination on day 20 without notice: 22 × 20/30.
    #[test]
    fn test_late_termination_is_prorated() {
        let result = adjust(&terminated(20, false), 22);
        assert_eq!(result.payable_days, dec("14.67"));
    }

    #[test]
    fn test_late_termination_with_notice_is_prorated() {
        let result = adjust(&terminated(20, true), 22);
        assert_eq!(result.payable_days, dec("14.67"));
    }

    #[test]
    fn test_early_termination_without_notice_follows_policy() {
        let record = terminated(10, false);

        let prorated = adjust(&record, 22);
        assert_eq!(prorated.payable_days, dec("7.33"));

        let zero_policy = ProrationConfig {
            early_termination_without_notice: EarlyTerminationPolicy::Zero,
            ..ProrationConfig::default()
        };
        let result = adjust_days(&record, 22, may(), &zero_policy, &RoundingConfig::default(), 1);
        assert_eq!(result.payable_days, Decimal::ZERO);
        assert_eq!(
            result.observations,
            vec!["Desligado dia 10 sem comunicado - sem benefício"]
        );
    }

    #[test]
    fn test_termination_outside_competence_month() {
        let before = terminated_on(NaiveDate::from_ymd_opt(2025, 4, 28).unwrap(), false);
        let result = adjust(&before, 22);
        assert_eq!(result.payable_days, dec("22"));
        assert!(result.observations.is_empty());
        assert_eq!(result.audit_steps.len(), 2);

        let confirmed = terminated_on(NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(), true);
        assert_eq!(
            termination_effect(
                confirmed.termination.as_ref().unwrap(),
                22,
                Competence::new(2025, 5).unwrap(),
                &ProrationConfig::default(),
                &RoundingConfig::default(),
            ),
            TerminationEffect::NoEffect
        );

        let after = terminated_on(NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(), true);
        let result = adjust(&after, 22);
        assert_eq!(result.payable_days, dec("22"));
        assert!(result.observations.is_empty());
        assert_eq!(result.audit_steps.len(), 2);
    }

    #[test]
    fn test_day_31_does_not_add_days() {
        let result = adjust(&terminated(31, false), 22);
        assert_eq!(result.payable_days, dec("22"));
    }

    #[test]
    fn test_vacation_and_termination_compose_by_minimum() {
        let mut record = terminated(20, false);
        record.vacation_days = 10;
        let result = adjust(&record, 22);
        // 22 - 10 = 12 is below the prorated 14.67
        assert_eq!(result.payable_days, dec("12"));
        assert_eq!(
            result.observations,
            vec!["Férias: -10", "Desligado dia 20 - proporcional"]
        );
    }

    #[test]
    fn test_admission_in_month_is_prorated() {
        let mut record = EmployeeRecord::new("1");
        record.admission_date = NaiveDate::from_ymd_opt(2025, 5, 16);
        let result = adjust(&record, 22);
        // 22 × 15/30
        assert_eq!(result.payable_days, dec("11"));
        assert_eq!(result.observations, vec!["Admissão dia 16 - proporcional"]);
        assert_eq!(result.audit_steps[1].rule_id, "admission_proration");
    }

    #[test]
    fn test_admission_outside_month_or_disabled() {
        let mut record = EmployeeRecord::new("1");
        record.admission_date = NaiveDate::from_ymd_opt(2024, 5, 16);
        assert_eq!(adjust(&record, 22).payable_days, dec("22"));

        record.admission_date = NaiveDate::from_ymd_opt(2025, 5, 16);
        let disabled = ProrationConfig {
            prorate_admissions: false,
            ..ProrationConfig::default()
        };
        let result = adjust_days(&record, 22, may(), &disabled, &RoundingConfig::default(), 1);
        assert_eq!(result.payable_days, dec("22"));
    }

    #[test]
    fn test_truncating_whole_days() {
        let rounding = RoundingConfig {
            mode: RoundingMode::Truncate,
            day_places: 0,
        };
        let result = adjust_days(
            &terminated(20, false),
            22,
            may(),
            &ProrationConfig::default(),
            &rounding,
            1,
        );
        assert_eq!(result.payable_days.to_string(), "14");
    }
}
