//! CSV source loading.

use std::fs;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{RawTable, SourceBundle, SourceKind};

/// Subdirectories searched after the data directory itself.
pub const SEARCH_SUBDIRS: [&str; 2] = ["Dados", "Uploads"];

/// Finds `<file stem>.csv` for `kind` in `dir`, then in its
/// [`SEARCH_SUBDIRS`]. File names are compared case-insensitively.
pub fn find_source_file(dir: &Path, kind: SourceKind) -> Option<PathBuf> {
    let wanted = format!("{}.csv", kind.file_stem()).to_lowercase();

    std::iter::once(dir.to_path_buf())
        .chain(SEARCH_SUBDIRS.iter().map(|sub| dir.join(sub)))
        .find_map(|candidate_dir| {
            let mut matches: Vec<PathBuf> = fs::read_dir(&candidate_dir)
                .ok()?
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| {
                    path.is_file()
                        && path
                            .file_name()
                            .and_then(|name| name.to_str())
                            .is_some_and(|name| name.to_lowercase() == wanted)
                })
                .collect();
            matches.sort();
            matches.into_iter().next()
        })
}

fn read_error(path: &Path, message: impl ToString) -> EngineError {
    EngineError::SourceReadError {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// `;` when the header line has more semicolons than commas, else `,`.
fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas { b';' } else { b',' }
}

/// UTF-8, or Latin-1 for spreadsheet exports that are not UTF-8.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => error.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Reads one CSV file into a [`RawTable`].
///
/// The first line is the header. Rows may be ragged; fully blank rows are
/// dropped.
pub fn load_table(path: &Path) -> EngineResult<RawTable> {
    let bytes = fs::read(path).map_err(|e| read_error(path, e))?;
    let content = decode(bytes);
    let content = content.trim_start_matches('\u{feff}');

    let mut reader = ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .flexible(true)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| read_error(path, e))?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| read_error(path, e))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { columns, rows })
}

/// Loads every source table from `dir`.
///
/// # Errors
///
/// `MissingSourceTable` for the first source without a file, or
/// `SourceReadError` when a file cannot be parsed.
pub fn load_sources(dir: &Path) -> EngineResult<SourceBundle> {
    let mut bundle = SourceBundle::new();

    for kind in SourceKind::ALL {
        let path = find_source_file(dir, kind)
            .ok_or(EngineError::MissingSourceTable { source_kind: kind })?;
        let table = load_table(&path)?;
        debug!(source = %kind, path = %path.display(), rows = table.rows.len(), "Loaded source table");
        bundle.insert(kind, table);
    }

    info!(dir = %dir.display(), "Loaded {} source tables", SourceKind::ALL.len());
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_semicolon_delimiter_and_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "ATIVOS.csv",
            "\u{feff}MATRICULA;TITULO DO CARGO;Sindicato\n1001;ANALISTA;SINDPD SP, SIND TRAB\n;;\n",
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.columns, vec!["MATRICULA", "TITULO DO CARGO", "Sindicato"]);
        assert_eq!(table.rows, vec![vec!["1001", "ANALISTA", "SINDPD SP, SIND TRAB"]]);
    }

    #[test]
    fn test_latin1_export_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("FERIAS.csv");
        // "DIAS DE F\xc9RIAS" in Latin-1
        let mut bytes = b"MATRICULA,DIAS DE F".to_vec();
        bytes.push(0xC9);
        bytes.extend_from_slice(b"RIAS\n1001,5\n");
        fs::write(&path, bytes).unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.columns[1], "DIAS DE FÉRIAS");
    }

    #[test]
    fn test_ragged_rows_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "FERIAS.csv", "MATRICULA,DIAS DE FÉRIAS\n1001\n1002,5\n");

        let table = load_table(&path).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["1001"]);
    }

    #[test]
    fn test_find_is_case_insensitive_and_searches_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Dados")).unwrap();
        write(&dir.path().join("Dados"), "ferias.CSV", "MATRICULA\n");

        let found = find_source_file(dir.path(), SourceKind::Vacations).unwrap();
        assert!(found.ends_with("Dados/ferias.CSV"));
        assert!(find_source_file(dir.path(), SourceKind::Interns).is_none());
    }

    #[test]
    fn test_top_level_file_wins_over_subdir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Uploads")).unwrap();
        write(&dir.path().join("Uploads"), "EXTERIOR.csv", "Cadastro\n1\n");
        write(dir.path(), "EXTERIOR.csv", "Cadastro\n2\n");

        let found = find_source_file(dir.path(), SourceKind::Overseas).unwrap();
        assert_eq!(found, dir.path().join("EXTERIOR.csv"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        for kind in SourceKind::ALL {
            if kind != SourceKind::Apprentices {
                write(dir.path(), &format!("{}.csv", kind.file_stem()), "MATRICULA\n");
            }
        }

        match load_sources(dir.path()) {
            Err(EngineError::MissingSourceTable { source_kind }) => {
                assert_eq!(source_kind, SourceKind::Apprentices);
            }
            other => panic!("Expected MissingSourceTable, got {:?}", other),
        }
    }

    #[test]
    fn test_load_complete_directory() {
        let dir = tempfile::tempdir().unwrap();
        for kind in SourceKind::ALL {
            write(dir.path(), &format!("{}.csv", kind.file_stem()), "MATRICULA\n");
        }

        let bundle = load_sources(dir.path()).unwrap();
        assert!(bundle.missing().is_empty());
    }
}
