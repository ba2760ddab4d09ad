//! Comparative Period Analyzer
//!
//! Deltas and percentage changes between two snapshots. Two points make a
//! regression meaningless, so trends here use a relative stability band
//! instead of the trend analyzer.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::numeric::{safe_number, safe_percentage};
use super::trend::TrendDirection;
use crate::models::PeriodSnapshot;

/// Relative difference below which two values count as unchanged
pub const STABILITY_BAND: f64 = 0.05;

/// Category change (in percent) needed before a category is flagged
pub const CATEGORY_CHANGE_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    #[serde(default = "default_stability_band")]
    pub stability_band: f64,
    #[serde(default = "default_category_threshold")]
    pub category_change_threshold: f64,
}

fn default_stability_band() -> f64 {
    STABILITY_BAND
}

fn default_category_threshold() -> f64 {
    CATEGORY_CHANGE_THRESHOLD
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            stability_band: default_stability_band(),
            category_change_threshold: default_category_threshold(),
        }
    }
}

/// Metrics compared between periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Income,
    Expenses,
    Balance,
    TransactionCount,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Income,
        Metric::Expenses,
        Metric::Balance,
        Metric::TransactionCount,
    ];

    /// Conventional polarity; callers may override it
    pub fn default_polarity(&self) -> MetricPolarity {
        match self {
            Self::Expenses => MetricPolarity::LowerIsBetter,
            Self::Income | Self::Balance => MetricPolarity::HigherIsBetter,
            Self::TransactionCount => MetricPolarity::Neutral,
        }
    }

    pub fn value_of(&self, snapshot: &PeriodSnapshot) -> f64 {
        match self {
            Self::Income => snapshot.total_income(),
            Self::Expenses => snapshot.total_expenses(),
            Self::Balance => snapshot.balance(),
            Self::TransactionCount => snapshot.transaction_count() as f64,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expenses => "Expenses",
            Self::Balance => "Balance",
            Self::TransactionCount => "Transactions",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which direction of change is desirable for a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricPolarity {
    HigherIsBetter,
    LowerIsBetter,
    Neutral,
}

/// Whether a change is good news
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Favorable,
    Unfavorable,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Favorable => write!(f, "favorable"),
            Self::Unfavorable => write!(f, "unfavorable"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Interpret a trend given the metric's polarity
pub fn assess(trend: TrendDirection, polarity: MetricPolarity) -> Sentiment {
    match (trend, polarity) {
        (TrendDirection::Stable, _) | (_, MetricPolarity::Neutral) => Sentiment::Neutral,
        (TrendDirection::Up, MetricPolarity::HigherIsBetter)
        | (TrendDirection::Down, MetricPolarity::LowerIsBetter) => Sentiment::Favorable,
        _ => Sentiment::Unfavorable,
    }
}

/// Change in one metric between two periods
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub current: f64,
    pub previous: f64,
    pub delta: f64,
    pub percent_change: f64,
    pub trend: TrendDirection,
}

/// Compare two values with the default stability band
pub fn compare_values(current: f64, previous: f64) -> MetricComparison {
    compare_values_with(current, previous, &ComparisonConfig::default())
}

pub fn compare_values_with(
    current: f64,
    previous: f64,
    config: &ComparisonConfig,
) -> MetricComparison {
    let current = safe_number(current, 0.0);
    let previous = safe_number(previous, 0.0);
    let delta = current - previous;

    MetricComparison {
        current,
        previous,
        delta,
        percent_change: safe_percentage(current, previous, 0.0),
        trend: band_trend(current, previous, config.stability_band),
    }
}

/// Stable when the gap is inside the band around the larger magnitude
fn band_trend(current: f64, previous: f64, band: f64) -> TrendDirection {
    let diff = (current - previous).abs();
    let threshold = current.abs().max(previous.abs()) * band;

    if diff < threshold || diff == 0.0 {
        TrendDirection::Stable
    } else if current > previous {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    }
}

/// Side-by-side comparison of two snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodComparison {
    pub income: MetricComparison,
    pub expenses: MetricComparison,
    pub balance: MetricComparison,
    pub transactions: MetricComparison,
    pub top_category_current: Option<String>,
    pub top_category_previous: Option<String>,
}

impl PeriodComparison {
    pub fn metric(&self, metric: Metric) -> &MetricComparison {
        match metric {
            Metric::Income => &self.income,
            Metric::Expenses => &self.expenses,
            Metric::Balance => &self.balance,
            Metric::TransactionCount => &self.transactions,
        }
    }

    /// Sentiment of each metric under its default polarity
    pub fn sentiments(&self) -> Vec<(Metric, Sentiment)> {
        Metric::ALL
            .iter()
            .map(|m| (*m, assess(self.metric(*m).trend, m.default_polarity())))
            .collect()
    }
}

pub fn compare_periods(current: &PeriodSnapshot, previous: &PeriodSnapshot) -> PeriodComparison {
    compare_periods_with(current, previous, &ComparisonConfig::default())
}

pub fn compare_periods_with(
    current: &PeriodSnapshot,
    previous: &PeriodSnapshot,
    config: &ComparisonConfig,
) -> PeriodComparison {
    let cmp = |metric: Metric| {
        compare_values_with(metric.value_of(current), metric.value_of(previous), config)
    };

    PeriodComparison {
        income: cmp(Metric::Income),
        expenses: cmp(Metric::Expenses),
        balance: cmp(Metric::Balance),
        transactions: cmp(Metric::TransactionCount),
        top_category_current: current.top_category().map(|c| c.category.clone()),
        top_category_previous: previous.top_category().map(|c| c.category.clone()),
    }
}

/// Period-over-period change of one spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTrend {
    pub category: String,
    pub current_amount: f64,
    pub previous_amount: f64,
    pub trend: TrendDirection,
    /// Rounded to a whole percent
    pub percent_change: f64,
}

/// Per-category changes, largest moves first
///
/// Categories absent from the previous period count as brand new growth.
pub fn category_trends(
    current: &PeriodSnapshot,
    previous: &PeriodSnapshot,
    config: &ComparisonConfig,
) -> Vec<CategoryTrend> {
    let mut trends: Vec<CategoryTrend> = current
        .category_breakdown()
        .iter()
        .map(|category| {
            let current_amount = category.amount;
            let previous_amount = previous
                .category(&category.category)
                .map(|c| c.amount)
                .unwrap_or(0.0);

            let (trend, percent) = if previous_amount > 0.0 {
                let pct = safe_percentage(current_amount, previous_amount, 0.0);
                let trend = if pct.abs() > config.category_change_threshold {
                    if pct > 0.0 {
                        TrendDirection::Up
                    } else {
                        TrendDirection::Down
                    }
                } else {
                    TrendDirection::Stable
                };
                (trend, pct)
            } else if current_amount > 0.0 {
                (TrendDirection::Up, 100.0)
            } else {
                (TrendDirection::Stable, 0.0)
            };

            CategoryTrend {
                category: category.category.clone(),
                current_amount,
                previous_amount,
                trend,
                percent_change: safe_number(percent.round(), 0.0),
            }
        })
        .collect();

    trends.sort_by(|a, b| {
        b.percent_change
            .abs()
            .total_cmp(&a.percent_change.abs())
            .then_with(|| a.category.cmp(&b.category))
    });
    trends
}
