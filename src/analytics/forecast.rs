//! Forecast Engine
//!
//! Projects income and expenses for the next period, the next quarter and
//! the end of the year from historical daily averages. Adjustments are a
//! fixed seasonal table and a trend nudge; confidence comes from how stable
//! the history has been.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::numeric::{safe_clamp, safe_division, safe_mean, safe_number};
use super::trend::{analyze_trend_with, TrendConfig, TrendDirection, TrendResult};
use crate::models::{DailyEntry, PeriodSnapshot};

/// Length of one projected period, in days
pub const DAYS_PER_PERIOD: f64 = 30.0;

/// Periods per quarter; the quarter is a flat multiple of the next period
pub const PERIODS_PER_QUARTER: f64 = 3.0;

pub const INCREASING_TREND_MULTIPLIER: f64 = 1.05;
pub const DECREASING_TREND_MULTIPLIER: f64 = 0.95;

pub const CONFIDENCE_FLOOR: f64 = 40.0;
pub const CONFIDENCE_CEILING: f64 = 95.0;
pub const NEXT_PERIOD_MIN_CONFIDENCE: f64 = 60.0;
pub const QUARTER_CONFIDENCE_PENALTY: f64 = 10.0;
pub const QUARTER_MIN_CONFIDENCE: f64 = 50.0;
pub const YEAR_END_CONFIDENCE_PENALTY: f64 = 20.0;

/// Stability assumed for a series with no usable average
pub const DEFAULT_STABILITY: f64 = 50.0;

/// Savings rate below which the budget risk is at least medium
pub const LOW_SAVINGS_RATE: f64 = 0.10;

/// Savings rate below which saving more is recommended
pub const TARGET_SAVINGS_RATE: f64 = 0.20;

/// Income and expense multipliers for one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalFactor {
    pub income: f64,
    pub expenses: f64,
}

impl SeasonalFactor {
    pub const NEUTRAL: SeasonalFactor = SeasonalFactor {
        income: 1.0,
        expenses: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthAdjustment {
    /// Calendar month, 1-12
    pub month: u32,
    pub income: f64,
    pub expenses: f64,
}

/// Month-keyed seasonal multipliers; months not listed are neutral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonalTable {
    adjustments: Vec<MonthAdjustment>,
}

impl SeasonalTable {
    pub fn new(adjustments: Vec<MonthAdjustment>) -> Self {
        Self { adjustments }
    }

    /// A table that never adjusts
    pub fn neutral() -> Self {
        Self::new(Vec::new())
    }

    pub fn factor(&self, month: u32) -> SeasonalFactor {
        self.adjustments
            .iter()
            .find(|a| a.month == month)
            .map(|a| SeasonalFactor {
                income: safe_number(a.income, 1.0),
                expenses: safe_number(a.expenses, 1.0),
            })
            .unwrap_or(SeasonalFactor::NEUTRAL)
    }
}

impl Default for SeasonalTable {
    /// Holiday bonus and spending in December, post-holiday dip in January
    fn default() -> Self {
        Self::new(vec![
            MonthAdjustment {
                month: 12,
                income: 1.2,
                expenses: 1.3,
            },
            MonthAdjustment {
                month: 1,
                income: 0.9,
                expenses: 0.8,
            },
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default = "default_days_per_period")]
    pub days_per_period: f64,
    #[serde(default)]
    pub seasonal: SeasonalTable,
    #[serde(default)]
    pub trend: TrendConfig,
    #[serde(default = "default_increasing")]
    pub increasing_multiplier: f64,
    #[serde(default = "default_decreasing")]
    pub decreasing_multiplier: f64,
}

fn default_days_per_period() -> f64 {
    DAYS_PER_PERIOD
}

fn default_increasing() -> f64 {
    INCREASING_TREND_MULTIPLIER
}

fn default_decreasing() -> f64 {
    DECREASING_TREND_MULTIPLIER
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            days_per_period: default_days_per_period(),
            seasonal: SeasonalTable::default(),
            trend: TrendConfig::default(),
            increasing_multiplier: default_increasing(),
            decreasing_multiplier: default_decreasing(),
        }
    }
}

impl ForecastConfig {
    fn trend_multiplier(&self, direction: TrendDirection) -> f64 {
        match direction {
            TrendDirection::Up => self.increasing_multiplier,
            TrendDirection::Down => self.decreasing_multiplier,
            TrendDirection::Stable => 1.0,
        }
    }
}

/// Forecast window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    NextPeriod,
    NextQuarter,
    YearEnd,
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NextPeriod => write!(f, "Next period"),
            Self::NextQuarter => write!(f, "Next quarter"),
            Self::YearEnd => write!(f, "Year end"),
        }
    }
}

/// Projection for a single horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ForecastHorizon {
    pub expected_income: f64,
    pub expected_expenses: f64,
    pub projected_balance: f64,
    pub confidence: f64,
}

impl ForecastHorizon {
    fn new(income: f64, expenses: f64, confidence: f64) -> Self {
        let expected_income = safe_number(income, 0.0);
        let expected_expenses = safe_number(expenses, 0.0);
        Self {
            expected_income,
            expected_expenses,
            projected_balance: expected_income - expected_expenses,
            confidence: safe_clamp(confidence, 0.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetRisk {
    Low,
    Medium,
    High,
}

impl fmt::Display for BudgetRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Suggested action attached to a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    ReduceSpending,
    SeekAdditionalIncome,
    MonitorExpenseGrowth,
    IncreaseSavingsRate,
    KeepCurrentCourse,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ReduceSpending => "Cut back on non-essential spending",
            Self::SeekAdditionalIncome => "Look for additional sources of income",
            Self::MonitorExpenseGrowth => "Keep an eye on growing expenses",
            Self::IncreaseSavingsRate => "Raise your savings rate",
            Self::KeepCurrentCourse => "Keep up your current financial discipline",
        };
        write!(f, "{}", text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastInsights {
    pub budget_risk: BudgetRisk,
    /// Next-period balance annualized
    pub savings_projection: f64,
    pub income_trend: TrendResult,
    pub expense_trend: TrendResult,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub avg_daily_income: f64,
    pub avg_daily_expenses: f64,
    pub next_period: ForecastHorizon,
    pub next_quarter: ForecastHorizon,
    pub year_end: ForecastHorizon,
    pub insights: ForecastInsights,
}

impl Forecast {
    pub fn horizons(&self) -> [(Horizon, &ForecastHorizon); 3] {
        [
            (Horizon::NextPeriod, &self.next_period),
            (Horizon::NextQuarter, &self.next_quarter),
            (Horizon::YearEnd, &self.year_end),
        ]
    }
}

/// Forecast with the default configuration
///
/// `month` is the current calendar month (1-12); out-of-range values are
/// clamped.
pub fn forecast(history: &[DailyEntry], current: &PeriodSnapshot, month: u32) -> Forecast {
    forecast_with(history, current, month, &ForecastConfig::default())
}

pub fn forecast_with(
    history: &[DailyEntry],
    current: &PeriodSnapshot,
    month: u32,
    config: &ForecastConfig,
) -> Forecast {
    let month = month.clamp(1, 12);
    let incomes: Vec<f64> = history.iter().map(|d| d.income).collect();
    let expenses: Vec<f64> = history.iter().map(|d| d.expenses).collect();

    let avg_daily_income = safe_mean(&incomes);
    let avg_daily_expenses = safe_mean(&expenses);

    let income_trend = analyze_trend_with(&incomes, &config.trend);
    let expense_trend = analyze_trend_with(&expenses, &config.trend);

    let season = config.seasonal.factor(month);

    let period_income = avg_daily_income
        * config.days_per_period
        * season.income
        * config.trend_multiplier(income_trend.direction);
    let period_expenses = avg_daily_expenses
        * config.days_per_period
        * season.expenses
        * config.trend_multiplier(expense_trend.direction);

    let confidence = HorizonConfidence::from_history(&incomes, &expenses);

    let next_period = ForecastHorizon::new(period_income, period_expenses, confidence.next_period);
    let next_quarter = ForecastHorizon::new(
        period_income * PERIODS_PER_QUARTER,
        period_expenses * PERIODS_PER_QUARTER,
        confidence.next_quarter,
    );

    let remaining_months = f64::from(12 - month);
    let year_end = ForecastHorizon::new(
        current.total_income() + period_income * remaining_months,
        current.total_expenses() + period_expenses * remaining_months,
        confidence.year_end,
    );

    let savings_rate = current.savings_rate();
    let budget_risk = if next_period.projected_balance < 0.0 {
        BudgetRisk::High
    } else if savings_rate < LOW_SAVINGS_RATE {
        BudgetRisk::Medium
    } else {
        BudgetRisk::Low
    };

    let recommendations = recommend(budget_risk, expense_trend.direction, savings_rate);

    tracing::debug!(
        month,
        history_days = history.len(),
        %budget_risk,
        next_balance = next_period.projected_balance,
        "forecast computed"
    );

    Forecast {
        avg_daily_income,
        avg_daily_expenses,
        next_period,
        next_quarter,
        year_end,
        insights: ForecastInsights {
            budget_risk,
            savings_projection: next_period.projected_balance * 12.0,
            income_trend,
            expense_trend,
            recommendations,
        },
    }
}

struct HorizonConfidence {
    next_period: f64,
    next_quarter: f64,
    year_end: f64,
}

impl HorizonConfidence {
    fn from_history(incomes: &[f64], expenses: &[f64]) -> Self {
        if incomes.is_empty() && expenses.is_empty() {
            tracing::debug!("no history available, forecast confidence is zero");
            return Self {
                next_period: 0.0,
                next_quarter: 0.0,
                year_end: 0.0,
            };
        }

        let base = safe_clamp(
            safe_division(stability(incomes) + stability(expenses), 2.0, DEFAULT_STABILITY),
            CONFIDENCE_FLOOR,
            CONFIDENCE_CEILING,
        );

        Self {
            next_period: base.max(NEXT_PERIOD_MIN_CONFIDENCE),
            next_quarter: (base - QUARTER_CONFIDENCE_PENALTY).max(QUARTER_MIN_CONFIDENCE),
            year_end: (base - YEAR_END_CONFIDENCE_PENALTY).max(CONFIDENCE_FLOOR),
        }
    }
}

/// 100 minus the range-to-mean ratio of a series
pub fn stability(values: &[f64]) -> f64 {
    let mean = safe_mean(values);
    if values.is_empty() || mean <= 0.0 {
        return DEFAULT_STABILITY;
    }

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);

    safe_number(100.0 - safe_division((max - min).abs(), mean, 0.0), DEFAULT_STABILITY)
}

fn recommend(
    risk: BudgetRisk,
    expense_direction: TrendDirection,
    savings_rate: f64,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if risk == BudgetRisk::High {
        recommendations.push(Recommendation::ReduceSpending);
        recommendations.push(Recommendation::SeekAdditionalIncome);
    }
    if expense_direction == TrendDirection::Up {
        recommendations.push(Recommendation::MonitorExpenseGrowth);
    }
    if savings_rate < TARGET_SAVINGS_RATE {
        recommendations.push(Recommendation::IncreaseSavingsRate);
    }
    if recommendations.is_empty() {
        recommendations.push(Recommendation::KeepCurrentCourse);
    }

    recommendations
}
