//! Server configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use flux_board::Rules;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Top-level server configuration.
///
/// Every section is optional; missing values fall back to the canonical game
/// (8x8, six colors, 5 points per tile, 30 moves).
///
/// ```toml
/// [rules]
/// rows = 8
/// cols = 8
/// palette = ["red", "blue", "green", "yellow", "purple", "orange"]
/// points_per_tile = 5
/// max_moves = 30
///
/// [referrals]
/// signup_bonus_points = 100
/// direct_bonus_points = 50
/// ```
#[derive(Debug, Clone, Default, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Board engine rules.
    rules: Rules,
    /// Referral rewards.
    referrals: ReferralRewards,
}

/// Rewards credited for referrals.
///
/// Earnings are recorded in FLX; balances are kept in points.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferralRewards {
    /// Points credited to the referrer when a new user signs up with their code.
    signup_bonus_points: i64,
    /// FLX earnings recorded for a signup referral.
    signup_earnings: f64,
    /// Points credited to the referrer for an explicitly created referral.
    direct_bonus_points: i64,
    /// FLX earnings recorded for an explicitly created referral.
    direct_earnings: f64,
    /// Points per FLX when converting referral earnings.
    points_per_flx: f64,
}

impl Default for ReferralRewards {
    fn default() -> Self {
        Self {
            signup_bonus_points: 100,
            signup_earnings: 10.0,
            direct_bonus_points: 50,
            direct_earnings: 0.05,
            points_per_flx: 1000.0,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration from its parts.
    pub fn new(rules: Rules, referrals: ReferralRewards) -> Self {
        Self { rules, referrals }
    }

    /// Loads configuration from a TOML file and validates the rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(
            rows = config.rules.rows(),
            cols = config.rules.cols(),
            colors = config.rules.palette().len(),
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from a TOML string and validates the rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if parsing or validation fails.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config
            .rules
            .validate()
            .map_err(|e| ConfigError::new(format!("Invalid rules: {}", e)))?;
        Ok(config)
    }

    /// Loads from `path` when it exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an existing file is invalid.
    #[instrument(skip(path))]
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::from_file(path),
            Some(path) => {
                info!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
