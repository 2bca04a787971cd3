//! Apportionment calculation.
//!
//! The total is payable days × daily rate rounded to cents. The employer
//! share is rounded from the total and the employee share is the
//! remainder, so the two shares always add up to the total exactly.

use rust_decimal::Decimal;

use crate::config::{ApportionmentConfig, RoundingConfig};
use crate::models::AuditStep;

/// The result of apportioning one benefit, including the audit step.
#[derive(Debug, Clone)]
pub struct ApportionmentResult {
    /// Payable days × daily rate.
    pub total: Decimal,
    /// Employer-paid share.
    pub employer_share: Decimal,
    /// Employee-withheld share.
    pub employee_share: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the total and splits it between employer and employee.
///
/// # Examples
///
/// ```
/// use meal_voucher_engine::calculation::apportion;
/// use meal_voucher_engine::config::{ApportionmentConfig, RoundingConfig};
/// use rust_decimal::Decimal;
///
/// let result = apportion(
///     Decimal::new(22, 0),
///     Decimal::new(3750, 2),
///     &ApportionmentConfig::default(),
///     &RoundingConfig::default(),
///     5,
/// );
/// assert_eq!(result.total, Decimal::new(82500, 2));
/// assert_eq!(result.employer_share, Decimal::new(66000, 2));
/// assert_eq!(result.employee_share, Decimal::new(16500, 2));
/// ```
pub fn apportion(
    payable_days: Decimal,
    daily_rate: Decimal,
    config: &ApportionmentConfig,
    rounding: &RoundingConfig,
    step_number: u32,
) -> ApportionmentResult {
    let total = rounding.currency(payable_days * daily_rate);
    let employer_share = rounding.currency(total * config.employer_share);
    let employee_share = total - employer_share;

    let audit_step = AuditStep {
        step_number,
        rule_id: "apportionment".to_string(),
        rule_name: "Employer/Employee Apportionment".to_string(),
        input: serde_json::json!({
            "payable_days": payable_days.to_string(),
            "daily_rate": daily_rate.to_string(),
            "employer_share_rate": config.employer_share.to_string()
        }),
        output: serde_json::json!({
            "total": total.to_string(),
            "employer_share": employer_share.to_string(),
            "employee_share": employee_share.to_string()
        }),
        reasoning: format!(
            "{} days x R$ {} = R$ {}; employer {} = R$ {}; employee R$ {}",
            payable_days, daily_rate, total, config.employer_share, employer_share, employee_share
        ),
    };

    ApportionmentResult {
        total,
        employer_share,
        employee_share,
        audit_step,
    }
}
