//! Source table models.
//!
//! The engine consumes HR sources as in-memory [`RawTable`]s. Adapters
//! (CSV files, the HTTP API) are responsible for producing them; the
//! engine only ever reads them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{EngineError, EngineResult};

/// The HR sources a run is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// The active employee roster.
    ActiveEmployees,
    /// Vacation days taken in the month.
    Vacations,
    /// Terminations with date and notice flag.
    Terminations,
    /// Admissions (new hires) with admission date.
    Admissions,
    /// State to daily rate mapping.
    UnionRates,
    /// Union to monthly workday count mapping.
    UnionWorkdays,
    /// Employees on leave of absence.
    Leaves,
    /// Interns.
    Interns,
    /// Apprentices.
    Apprentices,
    /// Employees working overseas.
    Overseas,
}

impl SourceKind {
    /// Every source, in merge order.
    pub const ALL: [SourceKind; 10] = [
        SourceKind::ActiveEmployees,
        SourceKind::Vacations,
        SourceKind::Terminations,
        SourceKind::Admissions,
        SourceKind::UnionRates,
        SourceKind::UnionWorkdays,
        SourceKind::Leaves,
        SourceKind::Interns,
        SourceKind::Apprentices,
        SourceKind::Overseas,
    ];

    /// The conventional workbook name (without extension) for this source.
    pub fn file_stem(&self) -> &'static str {
        match self {
            SourceKind::ActiveEmployees => "ATIVOS",
            SourceKind::Vacations => "FERIAS",
            SourceKind::Terminations => "DESLIGADOS",
            SourceKind::Admissions => "ADMISSOABRIL",
            SourceKind::UnionRates => "Basesindicatoxvalor",
            SourceKind::UnionWorkdays => "Basediasuteis",
            SourceKind::Leaves => "AFASTAMENTOS",
            SourceKind::Interns => "ESTAGIO",
            SourceKind::Apprentices => "APRENDIZ",
            SourceKind::Overseas => "EXTERIOR",
        }
    }

    /// Snake-case name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::ActiveEmployees => "active_employees",
            SourceKind::Vacations => "vacations",
            SourceKind::Terminations => "terminations",
            SourceKind::Admissions => "admissions",
            SourceKind::UnionRates => "union_rates",
            SourceKind::UnionWorkdays => "union_workdays",
            SourceKind::Leaves => "leaves",
            SourceKind::Interns => "interns",
            SourceKind::Apprentices => "apprentices",
            SourceKind::Overseas => "overseas",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source table as loaded: a header row and text cells.
///
/// JSON input may carry numbers, booleans or nulls in cells; they are
/// converted to text (null becomes an empty cell).
///
/// # Example
///
/// ```
/// use meal_voucher_engine::models::RawTable;
///
/// let table = RawTable::new(["MATRICULA", "Sindicato"])
///     .with_row(["1001", "SINDPD SP"]);
/// assert_eq!(table.rows.len(), 1);
/// assert_eq!(table.column_index("Sindicato"), Some(1));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    /// Column headers, in source order.
    pub columns: Vec<String>,
    /// Data rows. A row may be shorter than the header; missing cells read as empty.
    #[serde(default, deserialize_with = "deserialize_rows")]
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Creates an empty table with the given headers.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, builder style.
    pub fn with_row<I, S>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the index of the first column with exactly this header.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == header)
    }

    /// Returns the trimmed, non-empty cell at `index` of `row`.
    pub fn cell(row: &[String], index: usize) -> Option<&str> {
        row.get(index)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CellRepr {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    Empty(()),
}

impl From<CellRepr> for String {
    fn from(cell: CellRepr) -> Self {
        match cell {
            CellRepr::Text(text) => text,
            CellRepr::Number(number) => number.to_string(),
            CellRepr::Flag(flag) => flag.to_string(),
            CellRepr::Empty(()) => String::new(),
        }
    }
}

fn deserialize_rows<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Vec<Vec<CellRepr>> = Vec::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(String::from).collect())
        .collect())
}

/// The full set of source tables for one run.
///
/// Tables are read-only for the duration of a run; stages receive shared
/// references only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceBundle {
    tables: BTreeMap<SourceKind, RawTable>,
}

impl SourceBundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a table.
    pub fn insert(&mut self, kind: SourceKind, table: RawTable) {
        self.tables.insert(kind, table);
    }

    /// Adds or replaces a table, builder style.
    pub fn with(mut self, kind: SourceKind, table: RawTable) -> Self {
        self.insert(kind, table);
        self
    }

    /// Returns the table for `kind`, if supplied.
    pub fn get(&self, kind: SourceKind) -> Option<&RawTable> {
        self.tables.get(&kind)
    }

    /// Returns the table for `kind` or a `MissingSourceTable` error.
    pub fn require(&self, kind: SourceKind) -> EngineResult<&RawTable> {
        self.get(kind)
            .ok_or(EngineError::MissingSourceTable { source_kind: kind })
    }

    /// Sources that have not been supplied, in merge order.
    pub fn missing(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|kind| !self.tables.contains_key(kind))
            .collect()
    }

    /// Fails on the first missing source. An empty table counts as present.
    pub fn ensure_complete(&self) -> EngineResult<()> {
        match self.missing().first() {
            Some(&kind) => Err(EngineError::MissingSourceTable { source_kind: kind }),
            None => Ok(()),
        }
    }
}
