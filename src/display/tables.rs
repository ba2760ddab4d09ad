//! Terminal tables for analytics results

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::{
    format_amount, format_bar, format_change, format_date, format_percentage,
    format_signed_amount, format_trend, truncate,
};
use crate::analytics::comparative::{assess, CategoryTrend, Metric, PeriodComparison};
use crate::analytics::forecast::Forecast;
use crate::analytics::health::HealthScore;
use crate::analytics::patterns::{EfficiencyScore, WeekdaySpending, WeeklySpending};
use crate::analytics::progress::{BudgetUsage, ProgressReport};
use crate::analytics::TrendResult;
use crate::models::{Budget, Goal};

const NAME_WIDTH: usize = 24;
const BAR_WIDTH: usize = 20;

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Series")]
    series: String,
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Strength")]
    strength: String,
}

pub fn trend_table(trends: &[(&str, TrendResult)]) -> String {
    render(
        trends
            .iter()
            .map(|(series, trend)| TrendRow {
                series: series.to_string(),
                direction: trend.direction.to_string(),
                strength: format_trend(trend.direction, trend.strength),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Previous")]
    previous: String,
    #[tabled(rename = "Change")]
    delta: String,
    #[tabled(rename = "%")]
    percent: String,
    #[tabled(rename = "Trend")]
    trend: String,
    #[tabled(rename = "Outlook")]
    sentiment: String,
}

pub fn comparison_table(comparison: &PeriodComparison, symbol: &str) -> String {
    let rows = Metric::ALL
        .iter()
        .map(|metric| {
            let m = comparison.metric(*metric);
            let money = |v: f64| match metric {
                Metric::TransactionCount => format!("{:.0}", v),
                _ => format_amount(v, symbol),
            };
            let delta = match metric {
                Metric::TransactionCount => format!("{:+.0}", m.delta),
                _ => format_signed_amount(m.delta, symbol),
            };

            ComparisonRow {
                metric: metric.label().to_string(),
                current: money(m.current),
                previous: money(m.previous),
                delta,
                percent: format_change(m.percent_change),
                trend: m.trend.symbol().to_string(),
                sentiment: assess(m.trend, metric.default_polarity()).to_string(),
            }
        })
        .collect();

    render(rows)
}

#[derive(Tabled)]
struct CategoryTrendRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Previous")]
    previous: String,
    #[tabled(rename = "Change")]
    change: String,
}

pub fn category_trend_table(trends: &[CategoryTrend], symbol: &str) -> String {
    if trends.is_empty() {
        return "No categories to compare.".to_string();
    }

    render(
        trends
            .iter()
            .map(|t| CategoryTrendRow {
                category: truncate(&t.category, NAME_WIDTH),
                current: format_amount(t.current_amount, symbol),
                previous: format_amount(t.previous_amount, symbol),
                change: format!("{} {}", t.trend.symbol(), format_change(t.percent_change)),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct ForecastRow {
    #[tabled(rename = "Horizon")]
    horizon: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
}

pub fn forecast_table(forecast: &Forecast, symbol: &str) -> String {
    render(
        forecast
            .horizons()
            .iter()
            .map(|(horizon, h)| ForecastRow {
                horizon: horizon.to_string(),
                income: format_amount(h.expected_income, symbol),
                expenses: format_amount(h.expected_expenses, symbol),
                balance: format_signed_amount(h.projected_balance, symbol),
                confidence: format!("{:.0}%", h.confidence),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Days left")]
    days: i64,
    #[tabled(rename = "Per month")]
    monthly: String,
    #[tabled(rename = "Status")]
    status: String,
}

pub fn goal_table(goals: &[(&Goal, ProgressReport)], symbol: &str) -> String {
    if goals.is_empty() {
        return "No goals found.".to_string();
    }

    render(
        goals
            .iter()
            .map(|(goal, report)| GoalRow {
                name: truncate(&goal.name, NAME_WIDTH),
                saved: format_amount(goal.current_amount, symbol),
                target: format_amount(goal.target_amount, symbol),
                progress: format_percentage(report.progress_percentage),
                days: report.days_remaining,
                monthly: format_amount(report.monthly_target, symbol),
                status: report.status.to_string(),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Budget")]
    name: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "State")]
    state: String,
}

pub fn budget_table(budgets: &[(&Budget, BudgetUsage)], symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }

    render(
        budgets
            .iter()
            .map(|(budget, usage)| BudgetRow {
                name: truncate(&budget.name, NAME_WIDTH),
                spent: format_amount(budget.spent, symbol),
                limit: format_amount(budget.limit, symbol),
                used: format_percentage(usage.percent_used),
                remaining: format_signed_amount(usage.remaining, symbol),
                state: usage.state.to_string(),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct FactorRow {
    #[tabled(rename = "Factor")]
    factor: String,
    #[tabled(rename = "Points")]
    points: String,
}

pub fn health_factor_table(health: &HealthScore) -> String {
    let mut rows: Vec<FactorRow> = health
        .factors
        .labeled()
        .iter()
        .map(|(factor, points)| FactorRow {
            factor: factor.to_string(),
            points: format!("{:.0}", points),
        })
        .collect();
    rows.push(FactorRow {
        factor: "Total".to_string(),
        points: format!("{:.0} ({})", health.score, health.tier),
    });
    render(rows)
}

#[derive(Tabled)]
struct DistributionRow {
    #[tabled(rename = "Period")]
    label: String,
    #[tabled(rename = "Spent")]
    amount: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "")]
    bar: String,
}

pub fn weekday_table(days: &[WeekdaySpending], symbol: &str) -> String {
    render(
        days.iter()
            .map(|d| DistributionRow {
                label: d.weekday.to_string(),
                amount: format_amount(d.amount, symbol),
                share: format_percentage(d.share),
                bar: format_bar(d.share, 100.0, BAR_WIDTH),
            })
            .collect(),
    )
}

pub fn weekly_table(weeks: &[WeeklySpending], symbol: &str, date_format: &str) -> String {
    if weeks.is_empty() {
        return "Not enough daily data.".to_string();
    }

    render(
        weeks
            .iter()
            .map(|w| DistributionRow {
                label: format!("Week {} ({})", w.week, format_date(w.start_date, date_format)),
                amount: format_amount(w.amount, symbol),
                share: format!("{:.0}%", w.share),
                bar: format_bar(w.share, 100.0, BAR_WIDTH),
            })
            .collect(),
    )
}

#[derive(Tabled)]
struct EfficiencyRow {
    #[tabled(rename = "Factor")]
    factor: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Impact")]
    impact: String,
}

pub fn efficiency_table(efficiency: &EfficiencyScore) -> String {
    let mut rows: Vec<EfficiencyRow> = efficiency
        .labeled()
        .iter()
        .map(|(factor, f)| EfficiencyRow {
            factor: factor.to_string(),
            score: format!("{:.0}", f.score),
            impact: f.impact.to_string(),
        })
        .collect();
    rows.push(EfficiencyRow {
        factor: "Overall".to_string(),
        score: format!("{:.0}", efficiency.overall),
        impact: String::new(),
    });
    render(rows)
}
