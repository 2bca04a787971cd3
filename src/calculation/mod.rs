//! Calculation logic for the meal voucher engine.
//!
//! This module contains the engine stages that follow normalization:
//! eligibility filtering, workday lookup against the union sheet, vacation
//! and proration adjustments, daily rate resolution with tiered fallback,
//! the employer/employee split, and output row assembly. [`run_benefit`]
//! chains them for one competence month.

mod apportionment;
mod day_adjustment;
mod eligibility;
mod pipeline;
mod rate;
mod reference_sheet;
mod row_builder;
mod rule_match;
mod workdays;

pub use apportionment::{ApportionmentResult, apportion};
pub use day_adjustment::{
    DayAdjustmentResult, TerminationEffect, adjust_days, deduct_vacation, prorate_admission,
    prorate_termination, termination_effect,
};
pub use eligibility::{EligibilityResult, exclusion_observation, exclusion_reason, filter_eligible};
pub use pipeline::{ENGINE_VERSION, compute_benefit, run_benefit};
pub use rate::{MAX_DAILY_RATE, RateResolution, RateTable, build_rate_table, resolve_daily_rate};
pub use reference_sheet::{ReferenceRow, is_header_row, reference_rows};
pub use row_builder::{OBSERVATION_SEPARATOR, build_row, join_observations};
pub use rule_match::{KeyedRule, RuleMatch, RuleTable};
pub use workdays::{WorkdayResolution, WorkdayTable, build_workday_table, resolve_workdays};
