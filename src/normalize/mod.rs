//! Record Normalizer.
//!
//! Maps heterogeneous source headers onto the canonical schema, parses
//! cells leniently and merges every employee source into one
//! [`EmployeeRecord`](crate::models::EmployeeRecord) per employee id. The
//! normalizer is pure: it reads the source tables and never mutates them.

mod columns;
mod merge;
mod state;
mod text;
mod values;

pub use columns::{CanonicalColumn, ColumnMapping, ColumnPattern};
pub use merge::{EMPLOYEE_SOURCES, NormalizedRecords, normalize_records};
pub use state::{StateAlias, default_state_aliases, derive_state};
pub use text::{contains_words, fold, words};
pub use values::{is_notice_confirmed, parse_amount, parse_date, parse_day_count, parse_employee_id};
