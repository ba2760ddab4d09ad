//! Spending pattern analysis
//!
//! Where in the week and month money goes, what moved the most between
//! periods, and an efficiency score summarizing how controlled spending is.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::comparative::{category_trends, CategoryTrend, ComparisonConfig};
use super::numeric::{safe_division, safe_mean, safe_sum};
use super::trend::{analyze_trend_with, TrendConfig, TrendDirection, TrendResult};
use crate::models::PeriodSnapshot;

/// Weekday share (in percent) above which spending counts as concentrated
pub const WEEKDAY_CONCENTRATION_THRESHOLD: f64 = 20.0;

pub const DAYS_PER_WEEK: usize = 7;

const WEEK_ORDER: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekdaySpending {
    pub weekday: Weekday,
    pub amount: f64,
    /// Percent of all expenses in the series
    pub share: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklySpending {
    /// 1-based
    pub week: usize,
    pub start_date: NaiveDate,
    pub amount: f64,
    /// Rounded percent of all expenses in the series
    pub share: f64,
}

/// Expenses per calendar weekday, Sunday first
pub fn weekday_distribution(snapshot: &PeriodSnapshot) -> Vec<WeekdaySpending> {
    let mut amounts = [0.0_f64; 7];
    for entry in snapshot.daily_series() {
        amounts[entry.date.weekday().num_days_from_sunday() as usize] += entry.expenses;
    }
    let total = safe_sum(&amounts);

    WEEK_ORDER
        .iter()
        .zip(amounts)
        .map(|(&weekday, amount)| WeekdaySpending {
            weekday,
            amount,
            share: safe_division(amount * 100.0, total, 0.0),
        })
        .collect()
}

/// Expenses per consecutive seven-day bucket from the start of the series
pub fn weekly_distribution(snapshot: &PeriodSnapshot) -> Vec<WeeklySpending> {
    let series = snapshot.daily_series();
    let total = safe_sum(&snapshot.expense_series());

    series
        .chunks(DAYS_PER_WEEK)
        .enumerate()
        .map(|(index, week)| {
            let amount: f64 = week.iter().map(|d| d.expenses).sum();
            WeeklySpending {
                week: index + 1,
                start_date: week[0].date,
                amount,
                share: safe_division(amount * 100.0, total, 0.0).round(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternInsight {
    IncomeTrend { direction: TrendDirection, strength: f64 },
    ExpenseTrend { direction: TrendDirection, strength: f64 },
    FastestGrowingCategory { category: String, percent_change: f64 },
    WeekdayConcentration { weekday: Weekday, share: f64 },
    StablePatterns,
}

impl fmt::Display for PatternInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncomeTrend { direction, strength } => match direction {
                TrendDirection::Down => write!(f, "Income falling ({:.1}%)", strength),
                _ => write!(f, "Income growing ({:.1}%)", strength),
            },
            Self::ExpenseTrend { direction, strength } => match direction {
                TrendDirection::Down => write!(f, "Expenses shrinking ({:.1}%)", strength),
                _ => write!(f, "Expenses rising ({:.1}%)", strength),
            },
            Self::FastestGrowingCategory {
                category,
                percent_change,
            } => write!(f, "{} grew {:.0}%", category, percent_change),
            Self::WeekdayConcentration { weekday, share } => {
                write!(f, "{} accounts for {:.1}% of weekly spending", weekday, share)
            }
            Self::StablePatterns => write!(f, "Spending patterns are stable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyFactor {
    pub score: f64,
    pub impact: Impact,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyScore {
    pub expense_control: EfficiencyFactor,
    pub income_growth: EfficiencyFactor,
    pub category_diversity: EfficiencyFactor,
    pub predictability: EfficiencyFactor,
    /// Mean of the factor scores
    pub overall: f64,
}

impl EfficiencyScore {
    pub fn labeled(&self) -> [(&'static str, EfficiencyFactor); 4] {
        [
            ("Expense control", self.expense_control),
            ("Income growth", self.income_growth),
            ("Category diversity", self.category_diversity),
            ("Predictability", self.predictability),
        ]
    }
}

pub fn efficiency_score(
    income: &TrendResult,
    expenses: &TrendResult,
    category_count: usize,
) -> EfficiencyScore {
    let expense_control = match expenses.direction {
        TrendDirection::Down => EfficiencyFactor {
            score: 90.0,
            impact: Impact::Positive,
        },
        TrendDirection::Stable => EfficiencyFactor {
            score: 70.0,
            impact: Impact::Neutral,
        },
        TrendDirection::Up => EfficiencyFactor {
            score: 40.0,
            impact: Impact::Negative,
        },
    };

    let income_growth = match income.direction {
        TrendDirection::Up => EfficiencyFactor {
            score: 85.0,
            impact: Impact::Positive,
        },
        TrendDirection::Stable => EfficiencyFactor {
            score: 60.0,
            impact: Impact::Neutral,
        },
        TrendDirection::Down => EfficiencyFactor {
            score: 30.0,
            impact: Impact::Negative,
        },
    };

    let category_diversity = match category_count {
        n if n > 3 => EfficiencyFactor {
            score: 80.0,
            impact: Impact::Positive,
        },
        n if n > 1 => EfficiencyFactor {
            score: 60.0,
            impact: Impact::Neutral,
        },
        _ => EfficiencyFactor {
            score: 40.0,
            impact: Impact::Neutral,
        },
    };

    let volatility = safe_mean(&[income.strength, expenses.strength]);
    let predictability = EfficiencyFactor {
        score: (100.0 - volatility).max(0.0),
        impact: if volatility < 20.0 {
            Impact::Positive
        } else {
            Impact::Neutral
        },
    };

    let overall = safe_mean(&[
        expense_control.score,
        income_growth.score,
        category_diversity.score,
        predictability.score,
    ]);

    EfficiencyScore {
        expense_control,
        income_growth,
        category_diversity,
        predictability,
        overall,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingPatterns {
    pub income_trend: TrendResult,
    pub expense_trend: TrendResult,
    /// Empty without a previous period
    pub category_trends: Vec<CategoryTrend>,
    pub weekday_distribution: Vec<WeekdaySpending>,
    pub weekly_distribution: Vec<WeeklySpending>,
    pub insights: Vec<PatternInsight>,
    pub efficiency: EfficiencyScore,
}

pub fn analyze_patterns(
    current: &PeriodSnapshot,
    previous: Option<&PeriodSnapshot>,
    trend_config: &TrendConfig,
    comparison_config: &ComparisonConfig,
) -> SpendingPatterns {
    let income_trend = analyze_trend_with(&current.income_series(), trend_config);
    let expense_trend = analyze_trend_with(&current.expense_series(), trend_config);

    let category_trends = previous
        .map(|prev| category_trends(current, prev, comparison_config))
        .unwrap_or_default();

    let weekday_distribution = weekday_distribution(current);
    let weekly_distribution = weekly_distribution(current);

    let mut insights = Vec::new();
    if !income_trend.is_stable() {
        insights.push(PatternInsight::IncomeTrend {
            direction: income_trend.direction,
            strength: income_trend.strength,
        });
    }
    if !expense_trend.is_stable() {
        insights.push(PatternInsight::ExpenseTrend {
            direction: expense_trend.direction,
            strength: expense_trend.strength,
        });
    }
    if let Some(growing) = category_trends
        .iter()
        .find(|t| t.trend == TrendDirection::Up)
    {
        insights.push(PatternInsight::FastestGrowingCategory {
            category: growing.category.clone(),
            percent_change: growing.percent_change,
        });
    }
    if let Some(busiest) = weekday_distribution
        .iter()
        .max_by(|a, b| a.share.total_cmp(&b.share))
        .filter(|d| d.share > WEEKDAY_CONCENTRATION_THRESHOLD)
    {
        insights.push(PatternInsight::WeekdayConcentration {
            weekday: busiest.weekday,
            share: busiest.share,
        });
    }
    if insights.is_empty() {
        insights.push(PatternInsight::StablePatterns);
    }

    let efficiency = efficiency_score(
        &income_trend,
        &expense_trend,
        current.category_breakdown().len(),
    );

    SpendingPatterns {
        income_trend,
        expense_trend,
        category_trends,
        weekday_distribution,
        weekly_distribution,
        insights,
        efficiency,
    }
}
