//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading benefit
//! configurations from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::calculation::MAX_DAILY_RATE;
use crate::error::{EngineError, EngineResult};

use super::types::{BenefitConfig, PolicyConfig, ProgramMetadata, RatesConfig};

/// Loads and validates benefit configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/vr_va/
/// ├── program.yaml   # Program metadata
/// ├── policy.yaml    # Matching, proration, rounding, split, eligibility, columns
/// └── rates.yaml     # State aliases and fallback rate tiers
/// ```
///
/// # Example
///
/// ```no_run
/// use meal_voucher_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/vr_va").unwrap();
/// println!("Program: {}", loader.program().name);
/// println!("Employer share: {}", loader.config().apportionment().employer_share);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: BenefitConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A value is outside its accepted range
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<ProgramMetadata>(&path.join("program.yaml"))?;
        let policy = Self::load_yaml::<PolicyConfig>(&path.join("policy.yaml"))?;
        let rates = Self::load_yaml::<RatesConfig>(&path.join("rates.yaml"))?;

        let config = BenefitConfig::new(metadata, policy, rates);
        validate(&config)?;

        debug!(
            program = %config.program().code,
            version = %config.program().version,
            "Loaded benefit configuration"
        );
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying benefit configuration.
    pub fn config(&self) -> &BenefitConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> BenefitConfig {
        self.config
    }

    /// Returns the program metadata.
    pub fn program(&self) -> &ProgramMetadata {
        self.config.program()
    }
}

fn invalid(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig {
        field: field.to_string(),
        message: message.into(),
    }
}

fn daily_rate_in_range(rate: Decimal) -> bool {
    rate >= Decimal::ZERO && rate <= MAX_DAILY_RATE
}

/// Checks the value ranges the calculation relies on.
pub fn validate(config: &BenefitConfig) -> EngineResult<()> {
    let share = config.apportionment().employer_share;
    if share < Decimal::ZERO || share > Decimal::ONE {
        return Err(invalid(
            "apportionment.employer_share",
            format!("must be between 0 and 1, got {}", share),
        ));
    }

    let proration = config.proration();
    if proration.month_days == 0 {
        return Err(invalid("proration.month_days", "must be positive"));
    }
    if !(1..=31).contains(&proration.notice_cutoff_day) {
        return Err(invalid(
            "proration.notice_cutoff_day",
            format!("must be a day of month, got {}", proration.notice_cutoff_day),
        ));
    }

    if config.rounding().day_places > 10 {
        return Err(invalid("rounding.day_places", "must be at most 10"));
    }

    if config.eligibility().director_title_fragment.trim().is_empty() {
        return Err(invalid(
            "eligibility.director_title_fragment",
            "must not be empty",
        ));
    }

    if config.columns().patterns().is_empty() {
        return Err(invalid("columns", "at least one pattern is required"));
    }

    let fallback = config.rate_fallback();
    if !daily_rate_in_range(fallback.default_daily_rate) {
        return Err(invalid(
            "fallback.default_daily_rate",
            format!("must be between 0 and {}", MAX_DAILY_RATE),
        ));
    }
    for (position, tier) in fallback.tiers.iter().enumerate() {
        if !daily_rate_in_range(tier.daily_rate) {
            return Err(invalid(
                &format!("fallback.tiers[{}].daily_rate", position),
                format!("must be between 0 and {}", MAX_DAILY_RATE),
            ));
        }
        if tier.states.is_empty() {
            return Err(invalid(
                &format!("fallback.tiers[{}].states", position),
                "must list at least one state",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EarlyTerminationPolicy, MatchPolicy, RoundingMode};
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/vr_va"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn write_minimal(dir: &Path) {
        write(
            dir,
            "program.yaml",
            "code: VR_VA\nname: Teste\nversion: \"2025-05\"\n",
        );
        write(dir, "policy.yaml", "{}\n");
        write(dir, "rates.yaml", "{}\n");
    }

    #[test]
    fn test_load_shipped_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.program().code, "VR_VA");
    }

    #[test]
    fn test_shipped_configuration_matches_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let defaults = BenefitConfig::new(
            loader.program().clone(),
            PolicyConfig::default(),
            RatesConfig::default(),
        );
        assert_eq!(loader.config(), &defaults);
    }

    #[test]
    fn test_shipped_values() {
        let config = ConfigLoader::load(config_path()).unwrap().into_config();

        assert_eq!(config.matching().policy, MatchPolicy::LongestKey);
        assert_eq!(config.rounding().mode, RoundingMode::HalfUp);
        assert_eq!(config.proration().month_days, 30);
        assert_eq!(config.proration().notice_cutoff_day, 15);
        assert_eq!(
            config.proration().early_termination_without_notice,
            EarlyTerminationPolicy::Prorate
        );
        assert_eq!(config.apportionment().employer_share, dec("0.80"));
        assert_eq!(config.rate_fallback().tiers[0].daily_rate, dec("37.50"));
        assert_eq!(config.rate_fallback().default_daily_rate, dec("35.00"));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("program.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_minimal_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal(dir.path());

        let loader = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(loader.program().name, "Teste");
        assert_eq!(loader.config().state_aliases().len(), 4);
        assert_eq!(loader.config().eligibility().director_title_fragment, "DIRETOR");
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal(dir.path());
        write(dir.path(), "policy.yaml", "rounding: [not, a, map\n");

        match ConfigLoader::load(dir.path()) {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.ends_with("policy.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_employer_share_out_of_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal(dir.path());
        write(
            dir.path(),
            "policy.yaml",
            "apportionment:\n  employer_share: \"1.20\"\n",
        );

        match ConfigLoader::load(dir.path()) {
            Err(EngineError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "apportionment.employer_share");
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_tier_rate_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal(dir.path());
        write(
            dir.path(),
            "rates.yaml",
            "fallback:\n  tiers:\n    - states: [\"Bahia\"]\n      daily_rate: \"-1\"\n  default_daily_rate: \"35.00\"\n",
        );

        match ConfigLoader::load(dir.path()) {
            Err(EngineError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "fallback.tiers[0].daily_rate");
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_default_rate_above_ceiling_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_minimal(dir.path());
        write(
            dir.path(),
            "rates.yaml",
            "fallback:\n  tiers: []\n  default_daily_rate: \"79228162514264337593543950335\"\n",
        );

        match ConfigLoader::load(dir.path()) {
            Err(EngineError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "fallback.default_daily_rate");
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_pass_validation() {
        assert!(validate(&BenefitConfig::default()).is_ok());
    }
}
