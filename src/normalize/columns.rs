//! Declarative column-name canonicalization.
//!
//! HR sources name the same field many ways ("MATRICULA", "Cadastro",
//! "Matrícula do colaborador"). A [`ColumnMapping`] is an ordered list of
//! fragment → canonical column patterns, evaluated once per table: a
//! header takes the canonical name of the first pattern whose fragment it
//! contains (case- and accent-insensitive), and each canonical name is
//! given to at most one column per table.

use serde::{Deserialize, Serialize};

use super::text::fold;
use crate::models::RawTable;

/// The canonical schema columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalColumn {
    /// Employee id.
    EmployeeId,
    /// Employee name.
    Name,
    /// Union name.
    Union,
    /// State.
    State,
    /// Job title.
    JobTitle,
    /// Admission date.
    AdmissionDate,
    /// Termination date.
    TerminationDate,
    /// Termination notice flag.
    TerminationNotice,
    /// Vacation days taken.
    VacationDays,
    /// Standard monthly workdays (workday sheet).
    Workdays,
    /// Daily benefit rate (rate sheet).
    DailyRate,
}

impl CanonicalColumn {
    /// The header a canonicalized table uses for this column.
    pub fn header(&self) -> &'static str {
        match self {
            CanonicalColumn::EmployeeId => "MATRICULA",
            CanonicalColumn::Name => "NOME",
            CanonicalColumn::Union => "Sindicato",
            CanonicalColumn::State => "ESTADO",
            CanonicalColumn::JobTitle => "TITULO DO CARGO",
            CanonicalColumn::AdmissionDate => "Admissão",
            CanonicalColumn::TerminationDate => "DATA DEMISSÃO",
            CanonicalColumn::TerminationNotice => "COMUNICADO DE DESLIGAMENTO",
            CanonicalColumn::VacationDays => "DIAS DE FÉRIAS",
            CanonicalColumn::Workdays => "DIAS UTEIS",
            CanonicalColumn::DailyRate => "VALOR",
        }
    }
}

/// One mapping rule: any of `fragments` found in a header maps it to `column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPattern {
    /// Header fragments, matched after folding.
    pub fragments: Vec<String>,
    /// Canonical column assigned on match.
    pub column: CanonicalColumn,
}

impl ColumnPattern {
    fn new(fragments: &[&str], column: CanonicalColumn) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            column,
        }
    }

    fn matches(&self, folded_header: &str) -> bool {
        self.fragments
            .iter()
            .map(|fragment| fold(fragment))
            .any(|fragment| !fragment.is_empty() && folded_header.contains(&fragment))
    }
}

/// Ordered pattern table. Earlier patterns win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    patterns: Vec<ColumnPattern>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        // "comunicado de desligamento" must be claimed before any date rule,
        // and "dias de ferias" before the generic workday "dias".
        Self::new(vec![
            ColumnPattern::new(&["matric", "cadastro"], CanonicalColumn::EmployeeId),
            ColumnPattern::new(&["sind"], CanonicalColumn::Union),
            ColumnPattern::new(&["comunicado"], CanonicalColumn::TerminationNotice),
            ColumnPattern::new(&["demiss"], CanonicalColumn::TerminationDate),
            ColumnPattern::new(&["admiss"], CanonicalColumn::AdmissionDate),
            ColumnPattern::new(&["cargo"], CanonicalColumn::JobTitle),
            ColumnPattern::new(&["ferias"], CanonicalColumn::VacationDays),
            ColumnPattern::new(&["dias"], CanonicalColumn::Workdays),
            ColumnPattern::new(&["estado"], CanonicalColumn::State),
            ColumnPattern::new(&["valor"], CanonicalColumn::DailyRate),
            ColumnPattern::new(&["nome"], CanonicalColumn::Name),
        ])
    }
}

impl ColumnMapping {
    /// Creates a mapping from an ordered pattern list.
    pub fn new(patterns: Vec<ColumnPattern>) -> Self {
        Self { patterns }
    }

    /// The patterns, in evaluation order.
    pub fn patterns(&self) -> &[ColumnPattern] {
        &self.patterns
    }

    /// The canonical column for a single header, ignoring claims by other columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use meal_voucher_engine::normalize::{CanonicalColumn, ColumnMapping};
    ///
    /// let mapping = ColumnMapping::default();
    /// assert_eq!(mapping.canonical_for("Cadastro"), Some(CanonicalColumn::EmployeeId));
    /// assert_eq!(mapping.canonical_for("SINDICATO"), Some(CanonicalColumn::Union));
    /// assert_eq!(mapping.canonical_for("EMPRESA"), None);
    /// ```
    pub fn canonical_for(&self, header: &str) -> Option<CanonicalColumn> {
        let folded = fold(header);
        self.patterns
            .iter()
            .find(|pattern| pattern.matches(&folded))
            .map(|pattern| pattern.column)
    }

    /// Returns a copy of `table` with matching headers renamed to their
    /// canonical names. The input table is not modified.
    pub fn canonicalize(&self, table: &RawTable) -> RawTable {
        let mut claimed: Vec<CanonicalColumn> = Vec::new();
        let columns = table
            .columns
            .iter()
            .map(|header| match self.canonical_for(header) {
                Some(column) if !claimed.contains(&column) => {
                    claimed.push(column);
                    column.header().to_string()
                }
                _ => header.clone(),
            })
            .collect();

        RawTable {
            columns,
            rows: table.rows.clone(),
        }
    }
}
