//! Configuration loading and management for the meal voucher engine.
//!
//! This module loads the benefit policy from YAML files: program
//! metadata, matching and proration rules, rounding, the employer/employee
//! split, column patterns, state aliases and fallback rate tiers.
//!
//! # Example
//!
//! ```no_run
//! use meal_voucher_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/vr_va").unwrap();
//! println!("Loaded program: {}", config.program().name);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, validate};
pub use types::{
    ApportionmentConfig, BenefitConfig, CURRENCY_PLACES, EarlyTerminationPolicy,
    EligibilityConfig, MatchOptions, MatchPolicy, PolicyConfig, ProgramMetadata, ProrationConfig,
    RateFallbackConfig, RateTier, RatesConfig, RoundingConfig, RoundingMode,
};
