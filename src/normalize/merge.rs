//! Merge of the employee-keyed sources into [`EmployeeRecord`]s.
//!
//! The merge is an outer union on employee id across every employee
//! source. Employees found only in exclusion sources are kept with their
//! status flag set; the eligibility filter removes them later. Records
//! keep the order in which their id first appears, roster first.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::columns::{CanonicalColumn, ColumnMapping};
use super::state::{StateAlias, derive_state};
use super::values::{is_notice_confirmed, parse_date, parse_day_count, parse_employee_id};
use crate::error::EngineResult;
use crate::models::{EmployeeRecord, RawTable, RecordIssue, SourceBundle, SourceKind, Termination};

/// Sources that carry employee rows, in merge order.
pub const EMPLOYEE_SOURCES: [SourceKind; 8] = [
    SourceKind::ActiveEmployees,
    SourceKind::Vacations,
    SourceKind::Terminations,
    SourceKind::Admissions,
    SourceKind::Leaves,
    SourceKind::Interns,
    SourceKind::Apprentices,
    SourceKind::Overseas,
];

/// The merged employee table plus the issues met while building it.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRecords {
    /// One record per distinct employee id.
    pub records: Vec<EmployeeRecord>,
    /// Dropped rows and unreadable cells.
    pub issues: Vec<RecordIssue>,
}

/// Canonicalizes every employee source and merges them by employee id.
///
/// Fails only if an employee source is missing from the bundle.
pub fn normalize_records(
    sources: &SourceBundle,
    mapping: &ColumnMapping,
    aliases: &[StateAlias],
) -> EngineResult<NormalizedRecords> {
    let mut merger = Merger::default();

    for kind in EMPLOYEE_SOURCES {
        let table = mapping.canonicalize(sources.require(kind)?);
        merger.merge_table(kind, &table);
    }

    for record in &mut merger.records {
        if record.state.is_none() {
            record.state = record
                .union_name
                .as_deref()
                .and_then(|union| derive_state(union, aliases));
        }
    }

    Ok(NormalizedRecords {
        records: merger.records,
        issues: merger.issues,
    })
}

/// Column positions of a canonicalized table.
struct Columns<'a> {
    table: &'a RawTable,
}

impl<'a> Columns<'a> {
    fn get<'r>(&self, row: &'r [String], column: CanonicalColumn) -> Option<&'r str> {
        self.table
            .column_index(column.header())
            .and_then(|index| RawTable::cell(row, index))
    }
}

#[derive(Default)]
struct Merger {
    records: Vec<EmployeeRecord>,
    index: HashMap<String, usize>,
    issues: Vec<RecordIssue>,
}

impl Merger {
    fn entry(&mut self, id: String) -> &mut EmployeeRecord {
        let position = match self.index.get(&id) {
            Some(&position) => position,
            None => {
                self.records.push(EmployeeRecord::new(id.clone()));
                self.index.insert(id, self.records.len() - 1);
                self.records.len() - 1
            }
        };
        &mut self.records[position]
    }

    fn merge_table(&mut self, kind: SourceKind, table: &RawTable) {
        let columns = Columns { table };
        if table.column_index(CanonicalColumn::EmployeeId.header()).is_none() && !table.is_empty() {
            warn!(source = %kind, rows = table.rows.len(), "Source has no employee id column");
        }

        let mut merged = 0usize;
        for (position, row) in table.rows.iter().enumerate() {
            let Some(id) = columns
                .get(row, CanonicalColumn::EmployeeId)
                .and_then(parse_employee_id)
            else {
                self.issues.push(RecordIssue::MissingIdentity {
                    source: kind,
                    row: position + 1,
                });
                continue;
            };

            let issue = self.merge_row(kind, &columns, row, id);
            self.issues.extend(issue);
            merged += 1;
        }

        debug!(source = %kind, merged, "Merged source table");
    }

    fn merge_row(
        &mut self,
        kind: SourceKind,
        columns: &Columns<'_>,
        row: &[String],
        id: String,
    ) -> Option<RecordIssue> {
        let admission = columns.get(row, CanonicalColumn::AdmissionDate);
        let mut issue = None;
        let record = self.entry(id);

        match kind {
            SourceKind::ActiveEmployees => {
                record.on_roster = true;
                fill(&mut record.name, columns.get(row, CanonicalColumn::Name));
                fill(&mut record.union_name, columns.get(row, CanonicalColumn::Union));
                fill(&mut record.state, columns.get(row, CanonicalColumn::State));
                fill(&mut record.job_title, columns.get(row, CanonicalColumn::JobTitle));
                issue = fill_date(record, kind, admission);
            }
            SourceKind::Admissions => {
                issue = fill_date(record, kind, admission);
            }
            SourceKind::Vacations => {
                if let Some(value) = columns.get(row, CanonicalColumn::VacationDays) {
                    match parse_day_count(value) {
                        Some(days) => {
                            record.vacation_days = record.vacation_days.saturating_add(days)
                        }
                        None => {
                            issue = Some(RecordIssue::MalformedValue {
                                employee_id: Some(record.id.clone()),
                                source: kind,
                                column: CanonicalColumn::VacationDays.header().to_string(),
                                value: value.to_string(),
                            })
                        }
                    }
                }
            }
            SourceKind::Terminations => {
                if let Some(value) = columns.get(row, CanonicalColumn::TerminationDate) {
                    match parse_date(value) {
                        Some(date) if record.termination.is_none() => {
                            record.termination = Some(Termination {
                                date,
                                notice_confirmed: is_notice_confirmed(
                                    columns.get(row, CanonicalColumn::TerminationNotice),
                                ),
                            });
                        }
                        Some(_) => {}
                        None => {
                            issue = Some(malformed_date(
                                record,
                                kind,
                                CanonicalColumn::TerminationDate,
                                value,
                            ))
                        }
                    }
                }
            }
            SourceKind::Leaves => record.status.on_leave = true,
            SourceKind::Interns => record.status.intern = true,
            SourceKind::Apprentices => record.status.apprentice = true,
            SourceKind::Overseas => record.status.overseas = true,
            SourceKind::UnionRates | SourceKind::UnionWorkdays => {}
        }

        issue
    }
}

fn fill(slot: &mut Option<String>, value: Option<&str>) {
    if slot.is_none() {
        *slot = value.map(str::to_string);
    }
}

fn fill_date(
    record: &mut EmployeeRecord,
    kind: SourceKind,
    value: Option<&str>,
) -> Option<RecordIssue> {
    let value = value?;
    match parse_date(value) {
        Some(date) => {
            set_if_absent(&mut record.admission_date, date);
            None
        }
        None => Some(malformed_date(
            record,
            kind,
            CanonicalColumn::AdmissionDate,
            value,
        )),
    }
}

fn set_if_absent(slot: &mut Option<NaiveDate>, date: NaiveDate) {
    if slot.is_none() {
        *slot = Some(date);
    }
}

fn malformed_date(
    record: &EmployeeRecord,
    kind: SourceKind,
    column: CanonicalColumn,
    value: &str,
) -> RecordIssue {
    warn!(
        employee_id = %record.id,
        source = %kind,
        value,
        "Unreadable date; adjustment skipped"
    );
    RecordIssue::MalformedDate {
        employee_id: Some(record.id.clone()),
        source: kind,
        column: column.header().to_string(),
        value: value.to_string(),
    }
}
