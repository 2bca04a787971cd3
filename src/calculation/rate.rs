//! Daily rate resolution.
//!
//! The daily rate comes from the rate sheet when one of its state keys
//! occurs in the employee's state (or, with no known state, in the union
//! text). Otherwise the configured fallback tiers apply, and finally the
//! general fallback rate. Resolution never fails.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{MatchOptions, RateFallbackConfig, RoundingConfig};
use crate::models::{
    AuditStep, AuditWarning, EmployeeRecord, RateSource, RawTable, RecordIssue, SourceKind,
};
use crate::normalize::{CanonicalColumn, ColumnMapping, parse_amount};

use super::reference_sheet::{is_header_row, reference_rows};
use super::rule_match::RuleTable;

/// Highest daily rate accepted from the rate sheet or the fallback tiers.
pub const MAX_DAILY_RATE: Decimal = Decimal::ONE_THOUSAND;

/// The state → daily rate rules and the rows that could not be read.
#[derive(Debug, Clone)]
pub struct RateTable {
    /// Rules in sheet order.
    pub rules: RuleTable<Decimal>,
    /// Rows with an unreadable, negative or out-of-range amount.
    pub issues: Vec<RecordIssue>,
}

/// Builds the rate rules from the union rates sheet.
///
/// # Examples
///
/// ```
/// use meal_voucher_engine::calculation::build_rate_table;
/// use meal_voucher_engine::config::MatchOptions;
/// use meal_voucher_engine::models::RawTable;
/// use meal_voucher_engine::normalize::ColumnMapping;
/// use rust_decimal::Decimal;
///
/// let sheet = RawTable::new(["ESTADO", "VALOR"])
///     .with_row(["Paraná", "R$ 35,00"]);
///
/// let table = build_rate_table(&sheet, &ColumnMapping::default(), MatchOptions::default());
/// assert_eq!(table.rules.rules()[0].value, Decimal::new(3500, 2));
/// ```
pub fn build_rate_table(
    table: &RawTable,
    mapping: &ColumnMapping,
    options: MatchOptions,
) -> RateTable {
    let mut rules = RuleTable::new(options);
    let mut issues = Vec::new();

    for row in reference_rows(table, mapping, CanonicalColumn::State, CanonicalColumn::DailyRate) {
        match parse_amount(&row.value) {
            Some(rate) if rate >= Decimal::ZERO && rate <= MAX_DAILY_RATE => {
                rules.push(row.key, rate)
            }
            None if is_header_row(&row, mapping, CanonicalColumn::DailyRate) => {
                debug!(row = row.row, "Skipping repeated header in rate sheet");
            }
            _ => {
                warn!(state = %row.key, value = %row.value, "Unreadable daily rate");
                issues.push(RecordIssue::MalformedValue {
                    employee_id: None,
                    source: SourceKind::UnionRates,
                    column: CanonicalColumn::DailyRate.header().to_string(),
                    value: row.value,
                });
            }
        }
    }

    debug!(rules = rules.len(), "Built rate table");
    RateTable { rules, issues }
}

/// The result of a rate lookup, including the audit step.
#[derive(Debug, Clone)]
pub struct RateResolution {
    /// Daily rate, rounded to cents.
    pub daily_rate: Decimal,
    /// Where the rate came from.
    pub source: RateSource,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
    /// Set when more than one sheet rule matched.
    pub warning: Option<AuditWarning>,
}

/// Resolves the daily rate for `record`.
///
/// # Examples
///
/// ```
/// use meal_voucher_engine::calculation::{RuleTable, resolve_daily_rate};
/// use meal_voucher_engine::config::{MatchOptions, RateFallbackConfig, RoundingConfig};
/// use meal_voucher_engine::models::{EmployeeRecord, RateSource};
/// use rust_decimal::Decimal;
///
/// let mut record = EmployeeRecord::new("1");
/// record.state = Some("Minas Gerais".to_string());
///
/// let resolution = resolve_daily_rate(
///     &record,
///     &RuleTable::new(MatchOptions::default()),
///     &RateFallbackConfig::default(),
///     &RoundingConfig::default(),
///     1,
/// );
/// assert_eq!(resolution.daily_rate, Decimal::new(3500, 2));
/// assert_eq!(resolution.source, RateSource::GeneralFallback);
/// ```
pub fn resolve_daily_rate(
    record: &EmployeeRecord,
    rules: &RuleTable<Decimal>,
    fallback: &RateFallbackConfig,
    rounding: &RoundingConfig,
    step_number: u32,
) -> RateResolution {
    let state = record.state.as_deref();
    let lookup_text = state.unwrap_or_else(|| record.union_text());

    let mut warning = None;
    let (rate, source, reasoning) = if let Some(found) = rules.find(lookup_text) {
        if found.is_ambiguous() {
            warn!(
                employee_id = %record.id,
                lookup_text,
                candidates = ?found.candidate_keys(),
                chosen = %found.rule.key,
                "Ambiguous rate rule match"
            );
            warning = Some(AuditWarning {
                code: "AMBIGUOUS_RATE_RULE".to_string(),
                message: format!(
                    "'{}' matches {} rate rules {:?}; '{}' chosen by {:?}",
                    lookup_text,
                    found.candidates.len(),
                    found.candidate_keys(),
                    found.rule.key,
                    rules.options().policy
                ),
                severity: "medium".to_string(),
            });
        }
        (
            found.rule.value,
            RateSource::RateSheet,
            format!(
                "'{}' matched rate sheet rule '{}' → {}",
                lookup_text, found.rule.key, found.rule.value
            ),
        )
    } else if let Some(tier) = state.and_then(|s| fallback.tiers.iter().find(|t| t.covers(s))) {
        (
            tier.daily_rate,
            RateSource::FallbackTier,
            format!(
                "No rate sheet rule for '{}'; fallback tier {:?} → {}",
                lookup_text, tier.states, tier.daily_rate
            ),
        )
    } else {
        (
            fallback.default_daily_rate,
            RateSource::GeneralFallback,
            format!(
                "No rate sheet rule or fallback tier for '{}'; general fallback → {}",
                lookup_text, fallback.default_daily_rate
            ),
        )
    };

    let daily_rate = rounding.currency(rate);
    let audit_step = AuditStep {
        step_number,
        rule_id: "rate_lookup".to_string(),
        rule_name: "Daily Rate Lookup".to_string(),
        input: serde_json::json!({
            "state": state,
            "union": record.union_name,
            "lookup_text": lookup_text
        }),
        output: serde_json::json!({
            "daily_rate": daily_rate.to_string(),
            "source": source
        }),
        reasoning,
    };

    RateResolution {
        daily_rate,
        source,
        audit_step,
        warning,
    }
}
