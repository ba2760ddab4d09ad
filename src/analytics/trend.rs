//! Trend Analyzer
//!
//! Estimates direction and strength of a numeric series with an ordinary
//! least-squares fit of value against position.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::numeric::{safe_division, safe_mean, safe_number};

/// Minimum number of points before a regression is attempted
pub const MIN_TREND_POINTS: usize = 3;

/// Strength at or below which a series counts as stable
pub const STABLE_STRENGTH_THRESHOLD: f64 = 5.0;

/// Upper bound of the strength scale
pub const MAX_STRENGTH: f64 = 100.0;

/// Direction of a trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    #[default]
    Stable,
}

impl TrendDirection {
    /// Short arrow used by terminal output
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Up => "↑",
            Self::Down => "↓",
            Self::Stable => "→",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

/// Direction plus strength (0-100) of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TrendResult {
    pub direction: TrendDirection,
    pub strength: f64,
}

impl TrendResult {
    /// The result for series that carry no usable signal
    pub const fn stable() -> Self {
        Self {
            direction: TrendDirection::Stable,
            strength: 0.0,
        }
    }

    pub fn is_stable(&self) -> bool {
        self.direction == TrendDirection::Stable
    }
}

impl fmt::Display for TrendResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1}%)", self.direction, self.strength)
    }
}

/// Tunable thresholds for the trend analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    #[serde(default = "default_min_points")]
    pub min_points: usize,
    #[serde(default = "default_stable_threshold")]
    pub stable_threshold: f64,
}

fn default_min_points() -> usize {
    MIN_TREND_POINTS
}

fn default_stable_threshold() -> f64 {
    STABLE_STRENGTH_THRESHOLD
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            min_points: default_min_points(),
            stable_threshold: default_stable_threshold(),
        }
    }
}

/// Analyze a series with the default thresholds
pub fn analyze_trend(values: &[f64]) -> TrendResult {
    analyze_trend_with(values, &TrendConfig::default())
}

/// Analyze a series with explicit thresholds
///
/// Strength is the fitted slope expressed as a percentage of the series
/// mean, capped at 100.
pub fn analyze_trend_with(values: &[f64], config: &TrendConfig) -> TrendResult {
    if values.len() < config.min_points.max(2) {
        tracing::debug!(points = values.len(), "series too short for regression");
        return TrendResult::stable();
    }

    let ys: Vec<f64> = values.iter().map(|v| safe_number(*v, 0.0)).collect();
    let slope = regression_slope(&ys);

    let mean = safe_mean(&ys).abs();
    let mean = if mean == 0.0 { 1.0 } else { mean };
    let strength = safe_division(slope.abs() * 100.0, mean, 0.0).min(MAX_STRENGTH);

    let direction = if strength <= config.stable_threshold {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };

    TrendResult {
        direction,
        strength,
    }
}

/// OLS slope of `ys` against `0..n`
pub fn regression_slope(ys: &[f64]) -> f64 {
    let n = ys.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n as f64 - 1.0) / 2.0;
    let y_mean = safe_mean(ys);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    safe_division(numerator, denominator, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increasing_series_is_up() {
        let result = analyze_trend(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(result.direction, TrendDirection::Up);
        // slope 1, mean 3
        assert!((result.strength - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_decreasing_series_is_down() {
        let result = analyze_trend(&[500.0, 400.0, 300.0, 200.0, 100.0]);
        assert_eq!(result.direction, TrendDirection::Down);
        assert!(result.strength > STABLE_STRENGTH_THRESHOLD);
    }

    #[test]
    fn test_constant_series_is_stable() {
        let result = analyze_trend(&[250.0; 10]);
        assert_eq!(result, TrendResult::stable());
    }

    #[test]
    fn test_all_zeros_is_stable() {
        let result = analyze_trend(&[0.0; 7]);
        assert_eq!(result, TrendResult::stable());
    }

    #[test]
    fn test_short_series_is_stable() {
        assert_eq!(analyze_trend(&[]), TrendResult::stable());
        assert_eq!(analyze_trend(&[1.0, 100.0]), TrendResult::stable());
    }

    #[test]
    fn test_strength_is_capped() {
        let result = analyze_trend(&[0.0, 0.0, 0.0, 0.0, 1000.0]);
        assert_eq!(result.direction, TrendDirection::Up);
        assert_eq!(result.strength, MAX_STRENGTH);
    }

    #[test]
    fn test_noise_around_flat_mean_is_stable() {
        let result = analyze_trend(&[100.0, 102.0, 99.0, 101.0, 100.0, 98.0, 101.0]);
        assert!(result.is_stable());
    }

    #[test]
    fn test_non_finite_points_are_zeroed() {
        let result = analyze_trend(&[f64::NAN, 1.0, 2.0, f64::INFINITY, 4.0]);
        assert!(result.strength.is_finite());
    }

    #[test]
    fn test_custom_threshold() {
        let config = TrendConfig {
            min_points: 5,
            stable_threshold: 50.0,
        };
        assert!(analyze_trend_with(&[1.0, 2.0, 3.0, 4.0, 5.0], &config).is_stable());
        assert!(analyze_trend_with(&[1.0, 2.0, 3.0, 4.0], &config).is_stable());
    }

    #[test]
    fn test_regression_slope() {
        assert_eq!(regression_slope(&[2.0, 4.0, 6.0]), 2.0);
        assert_eq!(regression_slope(&[5.0]), 0.0);
    }
}
