//! Pricer configuration.
//!
//! Loaded from TOML with environment variable overrides:
//!
//! ```toml
//! forecast_rate_interpolation = true
//! party_context = "all_paths"
//! parallel_batch_threshold = 16
//! default_metrics = ["Npv", "ImpliedQuote"]
//! ```
//!
//! | Variable | Field |
//! |---|---|
//! | `VALUATION_FORECAST_INTERPOLATION` | `forecast_rate_interpolation` |
//! | `VALUATION_PARTY_CONTEXT` | `party_context` |
//! | `VALUATION_PARALLEL_THRESHOLD` | `parallel_batch_threshold` |

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::scenario::Metric;

/// Which classification paths attach party names and the collateral flag
/// to the bound product after construction.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PartyContextPolicy {
    /// Only trades classified from their payload discriminant.
    #[default]
    LegacyPathOnly,
    /// Every trade.
    AllPaths,
}

impl std::str::FromStr for PartyContextPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "legacy_path_only" | "legacy" => Ok(PartyContextPolicy::LegacyPathOnly),
            "all_paths" | "all" => Ok(PartyContextPolicy::AllPaths),
            _ => Err(format!("Unknown party context policy: {}", s)),
        }
    }
}

/// Trade pricer configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PricerConfig {
    /// Project floating rates off index forecast curves instead of the
    /// discount curve, when the caller does not say.
    #[serde(default)]
    pub forecast_rate_interpolation: bool,

    /// Party context postprocessing policy.
    #[serde(default)]
    pub party_context: PartyContextPolicy,

    /// Batches at least this large are priced in parallel (with the `parallel` feature).
    #[serde(default = "default_parallel_batch_threshold")]
    pub parallel_batch_threshold: usize,

    /// Metrics computed when a scenario requests none.
    #[serde(default = "default_metrics")]
    pub default_metrics: Vec<Metric>,
}

fn default_parallel_batch_threshold() -> usize {
    8
}

fn default_metrics() -> Vec<Metric> {
    vec![Metric::Npv]
}

impl Default for PricerConfig {
    fn default() -> Self {
        Self {
            forecast_rate_interpolation: false,
            party_context: PartyContextPolicy::default(),
            parallel_batch_threshold: default_parallel_batch_threshold(),
            default_metrics: default_metrics(),
        }
    }
}

impl PricerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from the default path or return the default config
    pub fn load_or_default() -> Self {
        let config_path = PathBuf::from("config/valuation.toml");
        Self::load(&config_path).unwrap_or_default()
    }

    /// Apply environment variable overrides
    pub fn with_env_override(mut self) -> Self {
        if let Ok(flag) = std::env::var("VALUATION_FORECAST_INTERPOLATION") {
            self.forecast_rate_interpolation = match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => self.forecast_rate_interpolation,
            };
        }

        if let Ok(policy) = std::env::var("VALUATION_PARTY_CONTEXT") {
            self.party_context = policy.parse().unwrap_or(self.party_context);
        }

        if let Ok(threshold) = std::env::var("VALUATION_PARALLEL_THRESHOLD") {
            self.parallel_batch_threshold = threshold.parse().unwrap_or(self.parallel_batch_threshold);
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.parallel_batch_threshold == 0 {
            errors.push("parallel_batch_threshold must be greater than 0".to_string());
        }

        if self.default_metrics.is_empty() {
            errors.push("default_metrics must name at least one metric".to_string());
        }

        for (i, metric) in self.default_metrics.iter().enumerate() {
            if self.default_metrics[..i].contains(metric) {
                errors.push(format!("default_metrics lists {} more than once", metric));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
