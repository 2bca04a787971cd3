//! The benefit run: every stage from raw source tables to the output table.
//!
//! The competence month is an explicit argument, so concurrent or
//! repeated runs never share state. Source tables and reference rules are
//! only read. Apart from the run id, timestamp and duration, identical
//! inputs give an identical [`RunResult`].

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::BenefitConfig;
use crate::error::EngineResult;
use crate::models::{
    AuditTrace, Competence, ComputedBenefit, EmployeeRecord, ExcludedEmployee, ExclusionReason,
    IssueCounts, OutputTable, RecordIssue, RunResult, RunSummary, SourceBundle, SourceKind,
};
use crate::normalize::normalize_records;

use super::apportionment::apportion;
use super::day_adjustment::adjust_days;
use super::eligibility::{exclusion_observation, filter_eligible};
use super::rate::{build_rate_table, resolve_daily_rate};
use super::row_builder::{build_row, join_observations};
use super::rule_match::RuleTable;
use super::workdays::{build_workday_table, resolve_workdays};

/// The engine version recorded on every run.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Computes the benefit for one eligible employee.
///
/// Returns `None` when no workday rule matches the employee's union; the
/// caller records the exclusion.
pub fn compute_benefit(
    record: &EmployeeRecord,
    workdays: &RuleTable<u32>,
    rates: &RuleTable<Decimal>,
    competence: Competence,
    config: &BenefitConfig,
) -> Option<ComputedBenefit> {
    let mut trace = AuditTrace::default();

    let lookup = resolve_workdays(record, workdays, trace.next_step_number());
    let standard_days = lookup.standard_days?;
    trace.steps.push(lookup.audit_step);
    trace.warnings.extend(lookup.warning);

    let adjustment = adjust_days(
        record,
        standard_days,
        competence,
        config.proration(),
        config.rounding(),
        trace.next_step_number(),
    );
    trace.steps.extend(adjustment.audit_steps);

    let rate = resolve_daily_rate(
        record,
        rates,
        config.rate_fallback(),
        config.rounding(),
        trace.next_step_number(),
    );
    trace.steps.push(rate.audit_step);
    trace.warnings.extend(rate.warning);

    let split = apportion(
        adjustment.payable_days,
        rate.daily_rate,
        config.apportionment(),
        config.rounding(),
        trace.next_step_number(),
    );
    trace.steps.push(split.audit_step);

    debug!(
        employee_id = %record.id,
        standard_days,
        payable_days = %adjustment.payable_days,
        daily_rate = %rate.daily_rate,
        total = %split.total,
        "Computed benefit"
    );

    Some(ComputedBenefit {
        employee_id: record.id.clone(),
        standard_days,
        payable_days: adjustment.payable_days,
        daily_rate: rate.daily_rate,
        rate_source: rate.source,
        total: split.total,
        employer_share: split.employer_share,
        employee_share: split.employee_share,
        observation: join_observations(&adjustment.observations),
        audit_trace: trace,
    })
}

/// Runs the benefit computation for one competence month.
///
/// # Errors
///
/// Returns `MissingSourceTable` before any computation when one of the
/// ten source tables is absent. Every other problem is recovered per
/// record and reported in [`RunResult::issues`].
///
/// # Example
///
/// ```
/// use meal_voucher_engine::calculation::run_benefit;
/// use meal_voucher_engine::config::BenefitConfig;
/// use meal_voucher_engine::models::{Competence, RawTable, SourceBundle, SourceKind};
///
/// let mut sources = SourceBundle::new();
/// for kind in SourceKind::ALL {
///     sources.insert(kind, RawTable::new(["MATRICULA"]));
/// }
/// sources.insert(
///     SourceKind::ActiveEmployees,
///     RawTable::new(["MATRICULA", "Sindicato", "TITULO DO CARGO"])
///         .with_row(["1001", "SINDPD SP - SIND TRAB PROC DADOS", "ANALISTA"]),
/// );
/// sources.insert(
///     SourceKind::UnionWorkdays,
///     RawTable::new(["SINDICATO", "DIAS UTEIS"]).with_row(["SINDPD SP", "22"]),
/// );
///
/// let result = run_benefit(&sources, Competence::new(2025, 5)?, &BenefitConfig::default())?;
/// assert_eq!(result.output.rows.len(), 1);
/// assert_eq!(result.output.rows[0].total.to_string(), "825.00");
/// # Ok::<(), meal_voucher_engine::error::EngineError>(())
/// ```
pub fn run_benefit(
    sources: &SourceBundle,
    competence: Competence,
    config: &BenefitConfig,
) -> EngineResult<RunResult> {
    let start = Instant::now();
    let run_id = Uuid::new_v4();

    if let Err(error) = sources.ensure_complete() {
        warn!(%run_id, missing = ?sources.missing(), "Aborting run: source tables missing");
        return Err(error);
    }
    info!(%run_id, %competence, "Starting benefit run");

    let normalized = normalize_records(sources, config.columns(), config.state_aliases())?;
    let merged_records = normalized.records.len();
    let mut issues = normalized.issues;

    let workdays = build_workday_table(
        sources.require(SourceKind::UnionWorkdays)?,
        config.columns(),
        config.matching(),
    );
    let rates = build_rate_table(
        sources.require(SourceKind::UnionRates)?,
        config.columns(),
        config.matching(),
    );
    issues.extend(workdays.issues);
    issues.extend(rates.issues);

    let eligibility = filter_eligible(normalized.records, config.eligibility());
    let eligible = eligibility.eligible.len();
    let mut excluded = eligibility.excluded;
    let mut excluded_by_reason = eligibility.counts;

    let mut benefits = Vec::with_capacity(eligible);
    let mut rows = Vec::with_capacity(eligible);

    for record in &eligibility.eligible {
        match compute_benefit(record, &workdays.rules, &rates.rules, competence, config) {
            Some(benefit) => {
                rows.push(build_row(record, &benefit, competence));
                benefits.push(benefit);
            }
            None => {
                let union = record.union_text().to_string();
                warn!(employee_id = %record.id, %union, "No workday rule for union; employee excluded");

                let reason = ExclusionReason::UnresolvedWorkdays;
                *excluded_by_reason.entry(reason).or_insert(0) += 1;
                excluded.push(ExcludedEmployee {
                    employee_id: record.id.clone(),
                    reason,
                    observation: format!("{}: '{}'", exclusion_observation(reason), union),
                });
                issues.push(RecordIssue::UnresolvedUnion {
                    employee_id: record.id.clone(),
                    union_name: union,
                });
            }
        }
    }

    let output = OutputTable::new(rows);
    let summary = RunSummary {
        merged_records,
        eligible,
        output_rows: output.rows.len(),
        excluded_by_reason,
        issues: IssueCounts::tally(&issues),
        total_value: output.grand_total(),
        employer_total: output.rows.iter().map(|row| row.employer_share).sum(),
        employee_total: output.rows.iter().map(|row| row.employee_share).sum(),
    };

    info!(
        %run_id,
        %competence,
        merged = summary.merged_records,
        eligible = summary.eligible,
        rows = summary.output_rows,
        excluded = excluded.len(),
        issues = issues.len(),
        total = %summary.total_value,
        "Benefit run complete"
    );

    Ok(RunResult {
        run_id,
        timestamp: Utc::now(),
        engine_version: ENGINE_VERSION.to_string(),
        competence,
        output,
        benefits,
        excluded,
        issues,
        summary,
        duration_us: start.elapsed().as_micros() as u64,
    })
}
