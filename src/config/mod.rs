//! Configuration for Finsight
//!
//! Path resolution for the settings file and report output, plus the
//! persisted user settings (display preferences and analytics thresholds).

pub mod paths;
pub mod settings;

pub use paths::FinsightPaths;
pub use settings::{AnalyticsSettings, OutputFormat, Settings};
