//! # Scoring configuration
//!
//! Knobs the engine reads instead of hard-coded constants, grouped by concern.
//!
//! ```rust
//! use cricket_core::config::ScoringConfig;
//!
//! let t20 = ScoringConfig::t20();
//! let odi = ScoringConfig::odi();
//! assert!(odi.rules.powerplay_overs > t20.rules.powerplay_overs);
//! ```

mod env;

pub use env::{from_env, SCORING_CONFIG_ENV};

use crate::models::rules::{ODI_POWERPLAY_OVERS, T20_POWERPLAY_OVERS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Per-ball run limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LimitsConfig {
    /// Highest run value accepted for a normal delivery.
    pub max_runs_per_ball: u32,
    /// Highest run value accepted for an extra, penalty run included.
    pub max_extra_runs: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_runs_per_ball: 6, max_extra_runs: 5 }
    }
}

/// Man-of-the-match weights. Runs always count one point each.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AwardsConfig {
    pub wicket_weight: u32,
    pub catch_weight: u32,
    pub run_out_weight: u32,
}

impl Default for AwardsConfig {
    fn default() -> Self {
        Self { wicket_weight: 20, catch_weight: 10, run_out_weight: 15 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RulesConfig {
    /// Reject bowler-credited dismissals on a free hit.
    pub strict_free_hit: bool,
    /// Refuse a retirement that would end the innings.
    pub block_retired_hurt_on_last_wicket: bool,
    pub powerplay_overs: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            strict_free_hit: true,
            block_retired_hurt_on_last_wicket: true,
            powerplay_overs: T20_POWERPLAY_OVERS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ScoringConfig {
    pub limits: LimitsConfig,
    pub awards: AwardsConfig,
    pub rules: RulesConfig,
}

impl ScoringConfig {
    pub fn t20() -> Self {
        Self::default()
    }

    pub fn odi() -> Self {
        let mut cfg = Self::default();
        cfg.rules.powerplay_overs = ODI_POWERPLAY_OVERS;
        cfg
    }

    /// Club rules: free-hit dismissals are left to the umpire and retirements
    /// are never blocked.
    pub fn custom() -> Self {
        let mut cfg = Self::default();
        cfg.rules.strict_free_hit = false;
        cfg.rules.block_retired_hurt_on_last_wicket = false;
        cfg.rules.powerplay_overs = 0;
        cfg
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// See [`from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        env::from_env()
    }

    /// Read and validate a JSON config file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        env::from_path(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_runs_per_ball == 0 {
            return Err(ConfigError::Invalid("maxRunsPerBall must be at least 1".to_string()));
        }
        if self.limits.max_extra_runs == 0 {
            return Err(ConfigError::Invalid("maxExtraRuns must be at least 1".to_string()));
        }
        Ok(())
    }
}
