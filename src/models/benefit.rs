//! Computed benefit and output row models.
//!
//! [`ComputedBenefit`] is the engine's per-employee result, audit trail
//! included. [`BenefitRow`] is its projection onto the fixed output
//! layout, and [`OutputTable`] is the artifact handed to adapters.

use chrono::{DateTime, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditTrace;

/// Output column headers, in their required order.
pub const OUTPUT_HEADERS: [&str; 10] = [
    "Matricula",
    "Admissão",
    "Sindicato do Colaborador",
    "Competência",
    "Dias",
    "VALOR DIÁRIO VR",
    "TOTAL",
    "Custo empresa",
    "Desconto profissional",
    "OBS GERAL",
];

/// Name of the single output sheet.
pub const OUTPUT_SHEET_NAME: &str = "VR Mensal";

/// Where an employee's daily rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// A rule in the union rates sheet matched.
    RateSheet,
    /// No sheet rule matched; a state fallback tier applied.
    FallbackTier,
    /// Neither matched; the general fallback rate applied.
    GeneralFallback,
}

/// The benefit computed for one eligible employee.
///
/// Produced once per employee per run; not mutated after apportionment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedBenefit {
    /// The employee.
    pub employee_id: String,
    /// Standard monthly workdays from the union rule.
    pub standard_days: u32,
    /// Days payable after vacation and proration, never negative.
    pub payable_days: Decimal,
    /// Daily rate in currency units.
    pub daily_rate: Decimal,
    /// How the daily rate was resolved.
    pub rate_source: RateSource,
    /// Payable days × daily rate.
    pub total: Decimal,
    /// Employer-paid share of the total.
    pub employer_share: Decimal,
    /// Employee-withheld share of the total.
    pub employee_share: Decimal,
    /// Notable adjustments, joined with "; ".
    pub observation: String,
    /// Decisions taken while computing this benefit.
    pub audit_trace: AuditTrace,
}

/// One output row, serialized with the fixed output headers.
///
/// # Example
///
/// ```
/// use meal_voucher_engine::models::BenefitRow;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let row = BenefitRow {
///     employee_id: "1001".to_string(),
///     admission_date: None,
///     union_name: "SINDPD SP".to_string(),
///     competence: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
///     payable_days: Decimal::new(2200, 2),
///     daily_rate: Decimal::new(3750, 2),
///     total: Decimal::new(82500, 2),
///     employer_share: Decimal::new(66000, 2),
///     employee_share: Decimal::new(16500, 2),
///     observation: String::new(),
/// };
/// let json = serde_json::to_value(&row).unwrap();
/// assert_eq!(json["VALOR DIÁRIO VR"], "37.50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitRow {
    /// Employee id.
    #[serde(rename = "Matricula")]
    pub employee_id: String,
    /// Admission date, empty when unknown.
    #[serde(rename = "Admissão")]
    pub admission_date: Option<NaiveDate>,
    /// Union name as given in the roster.
    #[serde(rename = "Sindicato do Colaborador")]
    pub union_name: String,
    /// First day of the competence month.
    #[serde(rename = "Competência")]
    pub competence: NaiveDate,
    /// Payable days.
    #[serde(rename = "Dias")]
    pub payable_days: Decimal,
    /// Daily rate.
    #[serde(rename = "VALOR DIÁRIO VR")]
    pub daily_rate: Decimal,
    /// Total value.
    #[serde(rename = "TOTAL")]
    pub total: Decimal,
    /// Employer share.
    #[serde(rename = "Custo empresa")]
    pub employer_share: Decimal,
    /// Employee share.
    #[serde(rename = "Desconto profissional")]
    pub employee_share: Decimal,
    /// Observation.
    #[serde(rename = "OBS GERAL")]
    pub observation: String,
}

/// The output artifact: one sheet of [`BenefitRow`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTable {
    /// Sheet name.
    pub sheet_name: String,
    /// Rows in roster order.
    pub rows: Vec<BenefitRow>,
}

impl OutputTable {
    /// Creates a table on the standard sheet.
    pub fn new(rows: Vec<BenefitRow>) -> Self {
        Self {
            sheet_name: OUTPUT_SHEET_NAME.to_string(),
            rows,
        }
    }

    /// Column headers in output order.
    pub fn headers(&self) -> &'static [&'static str] {
        &OUTPUT_HEADERS
    }

    /// Timestamped artifact name, e.g. `VR_FINAL_20250601_083000.csv`.
    pub fn artifact_name<Tz: TimeZone>(timestamp: &DateTime<Tz>, extension: &str) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!(
            "VR_FINAL_{}.{}",
            timestamp.format("%Y%m%d_%H%M%S"),
            extension
        )
    }

    /// Sum of all row totals.
    pub fn grand_total(&self) -> Decimal {
        self.rows.iter().map(|row| row.total).sum()
    }
}
