//! Core data models for the meal voucher engine.
//!
//! This module contains all the domain models used throughout the engine.

mod benefit;
mod competence;
mod employee;
mod issues;
mod run_result;
mod source;

pub use benefit::{
    BenefitRow, ComputedBenefit, OUTPUT_HEADERS, OUTPUT_SHEET_NAME, OutputTable, RateSource,
};
pub use competence::Competence;
pub use employee::{EmployeeRecord, StatusFlags, Termination};
pub use issues::{IssueCounts, RecordIssue};
pub use run_result::{
    AuditStep, AuditTrace, AuditWarning, ExcludedEmployee, ExclusionReason, RunResult, RunSummary,
};
pub use source::{RawTable, SourceBundle, SourceKind};
