//! Employee record model.
//!
//! An [`EmployeeRecord`] is the normalized, merged view of one employee
//! across every HR source. It is produced once by the normalizer and is
//! read-only for the rest of the run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Membership of an employee in the exclusion-only sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    /// Listed in the interns source.
    pub intern: bool,
    /// Listed in the apprentices source.
    pub apprentice: bool,
    /// Listed in the leaves-of-absence source.
    pub on_leave: bool,
    /// Listed in the overseas source.
    pub overseas: bool,
}

/// A termination record with a readable date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Termination {
    /// The termination date.
    pub date: NaiveDate,
    /// True when the termination notice field reads "OK" (case-insensitive).
    pub notice_confirmed: bool,
}

/// Represents one employee after normalization and merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Employee id (registration number), unique per run.
    pub id: String,
    /// Employee name, when a source carries it.
    pub name: Option<String>,
    /// Free-text union name from the roster.
    pub union_name: Option<String>,
    /// State, explicit or derived from the union text.
    pub state: Option<String>,
    /// Job title from the roster.
    pub job_title: Option<String>,
    /// Admission date, from the roster or the admissions source.
    pub admission_date: Option<NaiveDate>,
    /// Exclusion-source membership.
    #[serde(default)]
    pub status: StatusFlags,
    /// True when the employee appears in the active roster.
    pub on_roster: bool,
    /// Vacation days taken in the month (summed across vacation rows).
    #[serde(default)]
    pub vacation_days: u32,
    /// Termination, when the terminations source has a readable date.
    pub termination: Option<Termination>,
}

impl EmployeeRecord {
    /// Creates a record with only an id; every other field empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use meal_voucher_engine::models::EmployeeRecord;
    ///
    /// let record = EmployeeRecord::new("1001");
    /// assert_eq!(record.id, "1001");
    /// assert!(!record.on_roster);
    /// assert_eq!(record.vacation_days, 0);
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            union_name: None,
            state: None,
            job_title: None,
            admission_date: None,
            status: StatusFlags::default(),
            on_roster: false,
            vacation_days: 0,
            termination: None,
        }
    }

    /// The union text, or an empty string when absent.
    pub fn union_text(&self) -> &str {
        self.union_name.as_deref().unwrap_or("")
    }
}
