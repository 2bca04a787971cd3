//! Output row assembly.

use crate::models::{BenefitRow, Competence, ComputedBenefit, EmployeeRecord};

/// Separator between observation fragments.
pub const OBSERVATION_SEPARATOR: &str = "; ";

/// Joins observation fragments into the output observation text.
pub fn join_observations<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments
        .iter()
        .map(AsRef::as_ref)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(OBSERVATION_SEPARATOR)
}

/// Projects a computed benefit onto the fixed output layout.
///
/// Intermediate values (standard days, rate source, audit trace) are not
/// part of the row.
pub fn build_row(
    record: &EmployeeRecord,
    benefit: &ComputedBenefit,
    competence: Competence,
) -> BenefitRow {
    BenefitRow {
        employee_id: benefit.employee_id.clone(),
        admission_date: record.admission_date,
        union_name: record.union_text().to_string(),
        competence: competence.first_day(),
        payable_days: benefit.payable_days,
        daily_rate: benefit.daily_rate,
        total: benefit.total,
        employer_share: benefit.employer_share,
        employee_share: benefit.employee_share,
        observation: benefit.observation.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuditTrace, RateSource};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_join_skips_empty_fragments() {
        assert_eq!(
            join_observations(&["Férias: -5", "", "Desligado dia 20 - proporcional"]),
            "Férias: -5; Desligado dia 20 - proporcional"
        );
        assert_eq!(join_observations::<&str>(&[]), "");
    }

    #[test]
    fn test_row_carries_record_and_benefit_fields() {
        let mut record = EmployeeRecord::new("1001");
        record.union_name = Some("SINDPD SP".to_string());
        record.admission_date = NaiveDate::from_ymd_opt(2021, 3, 1);

        let benefit = ComputedBenefit {
            employee_id: "1001".to_string(),
            standard_days: 22,
            payable_days: Decimal::new(2200, 2),
            daily_rate: Decimal::new(3750, 2),
            rate_source: RateSource::FallbackTier,
            total: Decimal::new(82500, 2),
            employer_share: Decimal::new(66000, 2),
            employee_share: Decimal::new(16500, 2),
            observation: String::new(),
            audit_trace: AuditTrace::default(),
        };

        let row = build_row(&record, &benefit, Competence::new(2025, 5).unwrap());
        assert_eq!(row.employee_id, "1001");
        assert_eq!(row.union_name, "SINDPD SP");
        assert_eq!(row.admission_date, NaiveDate::from_ymd_opt(2021, 3, 1));
        assert_eq!(row.competence, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(row.total, Decimal::new(82500, 2));
    }
}
