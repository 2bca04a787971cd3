//! Key/value extraction from the two reference sheets.
//!
//! Reference sheets are loosely shaped: the key and value columns are
//! found by canonical name when possible and by position otherwise, and a
//! textual header may be repeated as the first data row.

use tracing::warn;

use crate::models::RawTable;
use crate::normalize::{CanonicalColumn, ColumnMapping};

/// A non-empty key with its raw value cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRow {
    /// 1-based data row number.
    pub row: usize,
    /// Trimmed key text.
    pub key: String,
    /// Trimmed value text, empty when the cell is blank.
    pub value: String,
}

/// Extracts `(key, value)` rows from a reference sheet.
///
/// The key column is the canonical `key_column`, else the first column.
/// The value column is the canonical `value_column`, else the first
/// column that is not the key. Rows without a key are skipped.
pub fn reference_rows(
    table: &RawTable,
    mapping: &ColumnMapping,
    key_column: CanonicalColumn,
    value_column: CanonicalColumn,
) -> Vec<ReferenceRow> {
    let canonical = mapping.canonicalize(table);
    let key_index = canonical.column_index(key_column.header()).unwrap_or(0);
    let value_index = canonical
        .column_index(value_column.header())
        .filter(|&index| index != key_index)
        .or_else(|| (0..canonical.columns.len()).find(|&index| index != key_index));

    let Some(value_index) = value_index else {
        if !table.is_empty() {
            warn!(
                columns = table.columns.len(),
                "Reference sheet needs a key and a value column"
            );
        }
        return Vec::new();
    };

    canonical
        .rows
        .iter()
        .enumerate()
        .filter_map(|(position, row)| {
            let key = RawTable::cell(row, key_index)?;
            Some(ReferenceRow {
                row: position + 1,
                key: key.to_string(),
                value: RawTable::cell(row, value_index).unwrap_or("").to_string(),
            })
        })
        .collect()
}

/// True when `row` repeats the sheet's header (its value names the value column).
pub fn is_header_row(
    row: &ReferenceRow,
    mapping: &ColumnMapping,
    value_column: CanonicalColumn,
) -> bool {
    mapping.canonical_for(&row.value) == Some(value_column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_found_by_name() {
        let table = RawTable::new(["VALOR", "ESTADO"]).with_row(["37,5", "São Paulo"]);
        let rows = reference_rows(
            &table,
            &ColumnMapping::default(),
            CanonicalColumn::State,
            CanonicalColumn::DailyRate,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "São Paulo");
        assert_eq!(rows[0].value, "37,5");
    }

    #[test]
    fn test_positional_fallback_when_value_name_is_on_first_column() {
        // The title column mentions "dias" but holds the union names.
        let table = RawTable::new(["BASE DIAS UTEIS DE MAIO", "Unnamed: 1"])
            .with_row(["SINDICATO", "DIAS UTEIS"])
            .with_row(["SINDPD SP", "22"])
            .with_row(["", "21"]);
        let mapping = ColumnMapping::default();
        let rows = reference_rows(
            &table,
            &mapping,
            CanonicalColumn::Union,
            CanonicalColumn::Workdays,
        );

        assert_eq!(rows.len(), 2);
        assert!(is_header_row(&rows[0], &mapping, CanonicalColumn::Workdays));
        assert_eq!(rows[1].key, "SINDPD SP");
        assert_eq!(rows[1].value, "22");
        assert_eq!(rows[1].row, 2);
        assert!(!is_header_row(&rows[1], &mapping, CanonicalColumn::Workdays));
    }

    #[test]
    fn test_single_column_sheet_yields_nothing() {
        let table = RawTable::new(["SINDICATO"]).with_row(["SINDPD SP"]);
        let rows = reference_rows(
            &table,
            &ColumnMapping::default(),
            CanonicalColumn::Union,
            CanonicalColumn::Workdays,
        );
        assert!(rows.is_empty());
    }
}
