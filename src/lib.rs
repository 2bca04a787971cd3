//! Meal Voucher Engine for monthly VR/VA benefits
//!
//! This crate computes the monthly meal/food voucher benefit for a company
//! roster. It merges the ten HR source tables, filters out ineligible
//! employees, resolves workdays and the daily rate from the union
//! reference sheets, applies vacation, admission and termination
//! proration, and splits each total between employer and employee.
//!
//! [`calculation::run_benefit`] is the entry point. The competence month
//! is an explicit argument, and every computed benefit carries an audit
//! trace of the rule steps that produced it.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod normalize;
