//! Competence month model.
//!
//! A run computes the benefit for exactly one calendar month, the
//! *competence*. It is passed explicitly into the engine rather than held
//! as ambient state, so concurrent runs (and tests) never interfere.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The calendar month a benefit run is computed for.
///
/// # Example
///
/// ```
/// use meal_voucher_engine::models::Competence;
/// use chrono::NaiveDate;
///
/// let competence: Competence = "2025-05".parse().unwrap();
/// assert_eq!(competence.first_day(), NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
/// assert!(competence.contains(NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()));
/// assert_eq!(competence.to_string(), "2025-05");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Competence {
    first_day: NaiveDate,
}

impl Competence {
    /// Creates a competence from a year and a 1-based month.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(|| EngineError::InvalidCompetence {
                value: format!("{:04}-{:02}", year, month),
            })
    }

    /// Parses `YYYY-MM`. A full `YYYY-MM-DD` date is also accepted and
    /// reduced to its month.
    pub fn parse(value: &str) -> EngineResult<Self> {
        let trimmed = value.trim();
        let invalid = || EngineError::InvalidCompetence {
            value: value.to_string(),
        };

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Self::new(date.year(), date.month());
        }

        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    /// The first day of the month; used as the output's competence date.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// The competence year.
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// The competence month (1-12).
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// Returns true if `date` falls within this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

impl fmt::Display for Competence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Competence {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Competence {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Competence> for String {
    fn from(value: Competence) -> Self {
        value.to_string()
    }
}
