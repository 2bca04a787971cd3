//! Configuration types for benefit computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every section has a
//! `Default` matching the shipped `config/vr_va` files, so partial files
//! are accepted.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::normalize::{ColumnMapping, StateAlias, default_state_aliases, fold};

/// Metadata about the benefit program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramMetadata {
    /// Short program code (e.g., "VR_VA").
    pub code: String,
    /// Human-readable program name.
    pub name: String,
    /// Policy version or effective date.
    pub version: String,
}

impl Default for ProgramMetadata {
    fn default() -> Self {
        Self {
            code: "VR_VA".to_string(),
            name: "Vale Refeição / Vale Alimentação".to_string(),
            version: "2025-05".to_string(),
        }
    }
}

/// How a substring lookup picks among several matching rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// The rule with the longest key wins; equal lengths fall back to source order.
    #[default]
    LongestKey,
    /// The first matching rule in source order wins.
    SourceOrder,
}

/// Options for the union → workdays and state → rate lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Tie-break policy.
    pub policy: MatchPolicy,
    /// When false, keys and text are compared after case and accent folding.
    pub case_sensitive: bool,
}

/// What to pay when a termination falls on or before the notice cut-off
/// day but the notice flag is not "OK".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarlyTerminationPolicy {
    /// Prorate by day of month, like a late termination.
    #[default]
    Prorate,
    /// Pay nothing, like a confirmed early termination.
    Zero,
}

/// Proration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProrationConfig {
    /// Nominal month length used for every proration.
    pub month_days: u32,
    /// Last day of month on which a confirmed termination forfeits the benefit.
    pub notice_cutoff_day: u32,
    /// Policy for early terminations without a confirmed notice.
    pub early_termination_without_notice: EarlyTerminationPolicy,
    /// Prorate employees admitted inside the competence month.
    pub prorate_admissions: bool,
}

impl Default for ProrationConfig {
    fn default() -> Self {
        Self {
            month_days: 30,
            notice_cutoff_day: 15,
            early_termination_without_notice: EarlyTerminationPolicy::Prorate,
            prorate_admissions: true,
        }
    }
}

/// Rounding mode applied to both day and currency values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Round half away from zero.
    #[default]
    HalfUp,
    /// Drop extra digits.
    Truncate,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::Truncate => RoundingStrategy::ToZero,
        }
    }
}

/// Rounding parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundingConfig {
    /// Rounding mode.
    pub mode: RoundingMode,
    /// Decimal places kept on payable days (0 gives whole days).
    pub day_places: u32,
}

impl Default for RoundingConfig {
    fn default() -> Self {
        Self {
            mode: RoundingMode::HalfUp,
            day_places: 2,
        }
    }
}

/// Decimal places on every currency value.
pub const CURRENCY_PLACES: u32 = 2;

impl RoundingConfig {
    /// Rounds a day count to `day_places`.
    ///
    /// ```
    /// use meal_voucher_engine::config::RoundingConfig;
    /// use rust_decimal::Decimal;
    ///
    /// let rounding = RoundingConfig::default();
    /// let days = Decimal::from(22) * Decimal::from(20) / Decimal::from(30);
    /// assert_eq!(rounding.days(days).to_string(), "14.67");
    /// ```
    pub fn days(&self, value: Decimal) -> Decimal {
        let mut rounded = value.round_dp_with_strategy(self.day_places, self.mode.strategy());
        rounded.rescale(self.day_places);
        rounded
    }

    /// Rounds a currency value to cents.
    pub fn currency(&self, value: Decimal) -> Decimal {
        let mut rounded = value.round_dp_with_strategy(CURRENCY_PLACES, self.mode.strategy());
        rounded.rescale(CURRENCY_PLACES);
        rounded
    }
}

/// Employer/employee split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApportionmentConfig {
    /// Employer-paid fraction of the total; the employee pays the rest.
    pub employer_share: Decimal,
}

impl Default for ApportionmentConfig {
    fn default() -> Self {
        Self {
            employer_share: Decimal::new(80, 2),
        }
    }
}

/// Eligibility parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityConfig {
    /// Job titles containing this fragment (case-insensitive) are excluded.
    pub director_title_fragment: String,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            director_title_fragment: "DIRETOR".to_string(),
        }
    }
}

/// Policy configuration from policy.yaml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Lookup matching options.
    pub matching: MatchOptions,
    /// Proration parameters.
    pub proration: ProrationConfig,
    /// Rounding parameters.
    pub rounding: RoundingConfig,
    /// Employer/employee split.
    pub apportionment: ApportionmentConfig,
    /// Eligibility parameters.
    pub eligibility: EligibilityConfig,
    /// Header → canonical column patterns.
    pub columns: ColumnMapping,
}

/// A fallback tier: a set of states sharing one daily rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTier {
    /// States in this tier (compared case- and accent-insensitively).
    pub states: Vec<String>,
    /// Daily rate for these states.
    pub daily_rate: Decimal,
}

impl RateTier {
    /// Returns true if `state` belongs to this tier.
    pub fn covers(&self, state: &str) -> bool {
        let state = fold(state.trim());
        self.states.iter().any(|s| fold(s.trim()) == state)
    }
}

/// Fallback rates used when the rate sheet has no match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateFallbackConfig {
    /// Tiers, checked in order.
    pub tiers: Vec<RateTier>,
    /// Rate for any state no tier covers.
    pub default_daily_rate: Decimal,
}

impl Default for RateFallbackConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                RateTier {
                    states: vec!["São Paulo".to_string()],
                    daily_rate: Decimal::new(3750, 2),
                },
                RateTier {
                    states: vec![
                        "Rio de Janeiro".to_string(),
                        "Rio Grande do Sul".to_string(),
                        "Paraná".to_string(),
                    ],
                    daily_rate: Decimal::new(3500, 2),
                },
            ],
            default_daily_rate: Decimal::new(3500, 2),
        }
    }
}

/// Rate configuration from rates.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Union text → state aliases, in priority order.
    #[serde(default = "default_state_aliases")]
    pub state_aliases: Vec<StateAlias>,
    /// Fallback tiers.
    #[serde(default)]
    pub fallback: RateFallbackConfig,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            state_aliases: default_state_aliases(),
            fallback: RateFallbackConfig::default(),
        }
    }
}

/// The complete benefit configuration loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a configuration directory. The competence month is not
/// part of it: it is passed to each run explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenefitConfig {
    metadata: ProgramMetadata,
    policy: PolicyConfig,
    rates: RatesConfig,
}

impl BenefitConfig {
    /// Creates a new BenefitConfig from its component parts.
    pub fn new(metadata: ProgramMetadata, policy: PolicyConfig, rates: RatesConfig) -> Self {
        Self {
            metadata,
            policy,
            rates,
        }
    }

    /// Returns the program metadata.
    pub fn program(&self) -> &ProgramMetadata {
        &self.metadata
    }

    /// Returns the policy section.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Returns a copy of this configuration with `policy` replaced.
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the lookup matching options.
    pub fn matching(&self) -> MatchOptions {
        self.policy.matching
    }

    /// Returns the proration parameters.
    pub fn proration(&self) -> &ProrationConfig {
        &self.policy.proration
    }

    /// Returns the rounding parameters.
    pub fn rounding(&self) -> &RoundingConfig {
        &self.policy.rounding
    }

    /// Returns the employer/employee split.
    pub fn apportionment(&self) -> &ApportionmentConfig {
        &self.policy.apportionment
    }

    /// Returns the eligibility parameters.
    pub fn eligibility(&self) -> &EligibilityConfig {
        &self.policy.eligibility
    }

    /// Returns the column mapping.
    pub fn columns(&self) -> &ColumnMapping {
        &self.policy.columns
    }

    /// Returns the state aliases.
    pub fn state_aliases(&self) -> &[StateAlias] {
        &self.rates.state_aliases
    }

    /// Returns the fallback rates.
    pub fn rate_fallback(&self) -> &RateFallbackConfig {
        &self.rates.fallback
    }
}
