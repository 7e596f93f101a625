//! Run configuration.
//!
//! A [`PipelineConfig`] is built once per run, validated, and passed down to
//! every stage. It can be loaded from a TOML file; omitted keys take their
//! defaults.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bks_normalize::NormalizeOptions;
use bks_transform::{CoercionRules, DEFAULT_CURRENCY_SCALE, DEFAULT_IDENTIFIER_PATTERN};
use bks_validate::ValidationRules;

/// Largest scale a `Decimal` can carry.
pub const MAX_CURRENCY_SCALE: u32 = 28;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("currency_scale {0} exceeds {MAX_CURRENCY_SCALE}")]
    CurrencyScale(u32),

    #[error("eur_to_usd must be positive, got {0}")]
    ExchangeRate(Decimal),

    #[error("min_order_date {min} is after max_order_date {max}")]
    DateWindow { min: NaiveDate, max: NaiveDate },

    #[error("invalid identifier_pattern {pattern:?}: {source}")]
    IdentifierPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Orders dated earlier are rejected as inconsistent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_date: Option<NaiveDate>,
    /// Orders dated later are rejected as inconsistent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_order_date: Option<NaiveDate>,
    /// Read ambiguous numeric dates day-first.
    pub day_first: bool,
    /// USD per EUR.
    pub eur_to_usd: Decimal,
    /// Decimal places for prices and revenue.
    pub currency_scale: u32,
    /// Regex every identifier must match.
    pub identifier_pattern: String,
    /// Directory receiving the output artifacts.
    pub output_dir: PathBuf,
    /// Write artifacts after a completed run.
    pub write_artifacts: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_order_date: NaiveDate::from_ymd_opt(1900, 1, 1),
            max_order_date: None,
            day_first: false,
            eur_to_usd: Decimal::new(12, 1),
            currency_scale: DEFAULT_CURRENCY_SCALE,
            identifier_pattern: DEFAULT_IDENTIFIER_PATTERN.to_string(),
            output_dir: PathBuf::from("output"),
            write_artifacts: false,
        }
    }
}

impl PipelineConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded pipeline config");
        Ok(config)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self.write_artifacts = true;
        self
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency_scale > MAX_CURRENCY_SCALE {
            return Err(ConfigError::CurrencyScale(self.currency_scale));
        }
        if self.eur_to_usd <= Decimal::ZERO {
            return Err(ConfigError::ExchangeRate(self.eur_to_usd));
        }
        if let (Some(min), Some(max)) = (self.min_order_date, self.max_order_date)
            && min > max
        {
            return Err(ConfigError::DateWindow { min, max });
        }
        self.coercion_rules().map(|_| ())
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            day_first: self.day_first,
            eur_to_usd: self.eur_to_usd,
        }
    }

    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            min_order_date: self.min_order_date,
            max_order_date: self.max_order_date,
        }
    }

    pub fn coercion_rules(&self) -> Result<CoercionRules, ConfigError> {
        CoercionRules::new(self.currency_scale, &self.identifier_pattern).map_err(|source| {
            ConfigError::IdentifierPattern {
                pattern: self.identifier_pattern.clone(),
                source,
            }
        })
    }
}
