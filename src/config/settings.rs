//! User settings for Finsight
//!
//! Display preferences and the thresholds the analytics core runs with.
//! Every field falls back to its default when missing from the file, so
//! older settings files keep loading as new knobs are added.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::paths::FinsightPaths;
use crate::analytics::comparative::ComparisonConfig;
use crate::analytics::forecast::ForecastConfig;
use crate::analytics::health::COMMITMENT_LOOKAHEAD_DAYS;
use crate::analytics::progress::ProgressConfig;
use crate::analytics::trend::TrendConfig;
use crate::error::FinsightError;

/// How reports are rendered
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Terminal,
    /// Pretty-printed JSON
    Json,
    /// Flat CSV rows
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal => write!(f, "terminal"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Thresholds for every calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    #[serde(default)]
    pub trend: TrendConfig,

    #[serde(default)]
    pub comparison: ComparisonConfig,

    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub progress: ProgressConfig,

    /// How far ahead scheduled commitments are considered upcoming
    #[serde(default = "default_lookahead_days")]
    pub commitment_lookahead_days: i64,
}

fn default_lookahead_days() -> i64 {
    COMMITMENT_LOOKAHEAD_DAYS
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            trend: TrendConfig::default(),
            comparison: ComparisonConfig::default(),
            forecast: ForecastConfig::default(),
            progress: ProgressConfig::default(),
            commitment_lookahead_days: default_lookahead_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub default_output: OutputFormat,

    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_output: OutputFormat::default(),
            analytics: AnalyticsSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, falling back to defaults when absent
    ///
    /// Defaults are not written back; `save` does that explicitly.
    pub fn load_or_create(paths: &FinsightPaths) -> Result<Self, FinsightError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            tracing::debug!(path = %settings_path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FinsightError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| FinsightError::Config(format!("Failed to parse settings file: {}", e)))
    }

    pub fn save(&self, paths: &FinsightPaths) -> Result<(), FinsightError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FinsightError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FinsightError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
