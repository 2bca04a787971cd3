//! CSV output writing.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use csv::WriterBuilder;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::OutputTable;

/// `<dir>/VR_FINAL_YYYYMMDD_HHMMSS.csv` for the given timestamp.
pub fn default_output_path<Tz: TimeZone>(dir: &Path, timestamp: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    dir.join(OutputTable::artifact_name(timestamp, "csv"))
}

/// Writes `table` to `path`: the fixed headers, then one line per row.
///
/// The header line is written even when the table has no rows.
pub fn write_output(table: &OutputTable, path: &Path) -> EngineResult<()> {
    let write_error = |message: String| EngineError::OutputWriteError {
        path: path.display().to_string(),
        message,
    };

    let file = File::create(path).map_err(|e| write_error(e.to_string()))?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    writer
        .write_record(table.headers())
        .map_err(|e| write_error(e.to_string()))?;
    for row in &table.rows {
        writer
            .serialize(row)
            .map_err(|e| write_error(e.to_string()))?;
    }
    writer.flush().map_err(|e| write_error(e.to_string()))?;

    info!(
        path = %path.display(),
        sheet = %table.sheet_name,
        rows = table.rows.len(),
        "Wrote output table"
    );
    Ok(())
}
