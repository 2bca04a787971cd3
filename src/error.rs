//! Error types for the meal voucher engine.
//!
//! Only conditions that abort a whole run live here. Per-record problems
//! (a row without an employee id, an unmatched union, an unreadable date)
//! are recoverable and are reported as [`RecordIssue`](crate::models::RecordIssue)
//! values on the run result instead.

use thiserror::Error;

use crate::models::SourceKind;

/// The main error type for the meal voucher engine.
///
/// # Example
///
/// ```
/// use meal_voucher_engine::error::EngineError;
/// use meal_voucher_engine::models::SourceKind;
///
/// let error = EngineError::MissingSourceTable {
///     source_kind: SourceKind::Vacations,
/// };
/// assert_eq!(error.to_string(), "Required source table is missing: vacations");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds values the engine cannot run with.
    #[error("Invalid configuration '{field}': {message}")]
    InvalidConfig {
        /// The offending configuration field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A required source table was not supplied. Fatal: the run aborts
    /// before any computation.
    #[error("Required source table is missing: {source_kind}")]
    MissingSourceTable {
        /// The source that was absent.
        source_kind: SourceKind,
    },

    /// The competence month could not be interpreted.
    #[error("Invalid competence '{value}': expected YYYY-MM")]
    InvalidCompetence {
        /// The rejected input.
        value: String,
    },

    /// A source file exists but could not be read as a table.
    #[error("Failed to read source table '{path}': {message}")]
    SourceReadError {
        /// The file that failed.
        path: String,
        /// A description of the read error.
        message: String,
    },

    /// The output artifact could not be written.
    #[error("Failed to write output '{path}': {message}")]
    OutputWriteError {
        /// The destination path.
        path: String,
        /// A description of the write error.
        message: String,
    },

    /// Underlying I/O failure outside of table reading/writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/policy.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/policy.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_config_displays_field() {
        let error = EngineError::InvalidConfig {
            field: "apportionment.employer_share".to_string(),
            message: "must be between 0 and 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration 'apportionment.employer_share': must be between 0 and 1"
        );
    }

    #[test]
    fn test_missing_source_table_displays_kind() {
        let error = EngineError::MissingSourceTable {
            source_kind: SourceKind::Terminations,
        };
        assert_eq!(
            error.to_string(),
            "Required source table is missing: terminations"
        );
    }

    #[test]
    fn test_invalid_competence_displays_value() {
        let error = EngineError::InvalidCompetence {
            value: "2025-13".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid competence '2025-13': expected YYYY-MM"
        );
    }

    #[test]
    fn test_io_error_converts_with_question_mark() {
        fn fails() -> EngineResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }

        match fails() {
            Err(EngineError::Io(err)) => assert_eq!(err.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }
}
