//! Dashboard Report
//!
//! Runs every calculator over one analysis input and renders the results
//! as terminal text, JSON or CSV. Each CLI subcommand shows one section of
//! the same report.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::io::Write;

use crate::analytics::comparative::{
    category_trends, compare_periods_with, CategoryTrend, Metric, PeriodComparison,
};
use crate::analytics::forecast::{forecast_with, Forecast};
use crate::analytics::health::HealthReport;
use crate::analytics::patterns::{analyze_patterns, SpendingPatterns};
use crate::analytics::progress::{
    budget_usage, summarize_goals, track_progress_with, BudgetUsage, GoalSummary, ProgressReport,
};
use crate::analytics::trend::{analyze_trend_with, TrendResult};
use crate::config::Settings;
use crate::display::report::{format_amount, format_date, format_percentage, section_header};
use crate::display::tables;
use crate::error::{FinsightError, FinsightResult};
use crate::models::{AnalysisInput, Budget, Goal};

/// Part of the report to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSection {
    /// Everything
    Dashboard,
    Trend,
    Compare,
    Forecast,
    Goals,
    Health,
    Patterns,
}

impl ReportSection {
    const PARTS: [ReportSection; 6] = [
        ReportSection::Trend,
        ReportSection::Compare,
        ReportSection::Forecast,
        ReportSection::Goals,
        ReportSection::Health,
        ReportSection::Patterns,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Trend => "trend",
            Self::Compare => "compare",
            Self::Forecast => "forecast",
            Self::Goals => "goals",
            Self::Health => "health",
            Self::Patterns => "patterns",
        }
    }

    fn parts(&self) -> Vec<ReportSection> {
        match self {
            Self::Dashboard => Self::PARTS.to_vec(),
            other => vec![*other],
        }
    }
}

/// Trends of the current period's daily series
#[derive(Debug, Clone, Serialize)]
pub struct TrendSummary {
    pub income: TrendResult,
    pub expenses: TrendResult,
    pub net: TrendResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    pub goal: Goal,
    pub progress: ProgressReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    pub usage: BudgetUsage,
}

/// Every analytics result for one input
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub trends: TrendSummary,
    /// Absent without a previous period
    pub comparison: Option<PeriodComparison>,
    pub category_trends: Vec<CategoryTrend>,
    pub forecast: Forecast,
    pub goals: Vec<GoalProgress>,
    pub goal_summary: GoalSummary,
    pub budgets: Vec<BudgetStatus>,
    pub health: HealthReport,
    pub patterns: SpendingPatterns,
    #[serde(skip)]
    currency_symbol: String,
    #[serde(skip)]
    date_format: String,
}

impl DashboardReport {
    /// Run every calculator over the input at the given instant
    pub fn generate(input: &AnalysisInput, now: DateTime<Utc>, settings: &Settings) -> Self {
        let analytics = &settings.analytics;
        let current = &input.current;

        let net_series: Vec<f64> = current.daily_series().iter().map(|d| d.net()).collect();
        let trends = TrendSummary {
            income: analyze_trend_with(&current.income_series(), &analytics.trend),
            expenses: analyze_trend_with(&current.expense_series(), &analytics.trend),
            net: analyze_trend_with(&net_series, &analytics.trend),
        };

        let comparison = input
            .previous
            .as_ref()
            .map(|previous| compare_periods_with(current, previous, &analytics.comparison));
        let category_trends = input
            .previous
            .as_ref()
            .map(|previous| category_trends(current, previous, &analytics.comparison))
            .unwrap_or_default();

        let forecast = forecast_with(
            &input.forecast_window(),
            current,
            now.month(),
            &analytics.forecast,
        );

        let goals: Vec<GoalProgress> = input
            .goals
            .iter()
            .map(|goal| GoalProgress {
                goal: goal.clone(),
                progress: track_progress_with(goal, now, &analytics.progress),
            })
            .collect();
        let progress: Vec<ProgressReport> = goals.iter().map(|g| g.progress).collect();
        let goal_summary = summarize_goals(&progress);

        let budgets = input
            .budgets
            .iter()
            .map(|budget| BudgetStatus {
                budget: budget.clone(),
                usage: budget_usage(budget),
            })
            .collect();

        let health = HealthReport::build(
            current,
            &input.budgets,
            &input.commitments,
            now,
            analytics.commitment_lookahead_days,
        );

        let patterns = analyze_patterns(
            current,
            input.previous.as_ref(),
            &analytics.trend,
            &analytics.comparison,
        );

        tracing::debug!(
            goals = goals.len(),
            score = health.score.score,
            "dashboard report generated"
        );

        Self {
            generated_at: now,
            period_start: current.start_date(),
            period_end: current.end_date(),
            trends,
            comparison,
            category_trends,
            forecast,
            goals,
            goal_summary,
            budgets,
            health,
            patterns,
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
        }
    }

    /// Format the whole report for terminal display
    pub fn format_terminal(&self) -> String {
        self.format_section(ReportSection::Dashboard)
    }

    pub fn format_section(&self, section: ReportSection) -> String {
        let mut output = format!(
            "Financial Dashboard: {} to {}\nGenerated: {}\n\n",
            self.date(self.period_start),
            self.date(self.period_end),
            self.timestamp(self.generated_at)
        );

        for part in section.parts() {
            let body = match part {
                ReportSection::Trend => self.format_trends(),
                ReportSection::Compare => self.format_comparison(),
                ReportSection::Forecast => self.format_forecast(),
                ReportSection::Goals => self.format_goals(),
                ReportSection::Health => self.format_health(),
                ReportSection::Patterns => self.format_patterns(),
                ReportSection::Dashboard => String::new(),
            };
            output.push_str(&body);
            output.push('\n');
        }

        output
    }

    fn money(&self, amount: f64) -> String {
        format_amount(amount, &self.currency_symbol)
    }

    fn date(&self, date: NaiveDate) -> String {
        format_date(date, &self.date_format)
    }

    fn timestamp(&self, at: DateTime<Utc>) -> String {
        format!("{} {} UTC", self.date(at.date_naive()), at.format("%H:%M"))
    }

    fn format_trends(&self) -> String {
        let mut output = section_header("Trends");
        output.push_str(&tables::trend_table(&[
            ("Income", self.trends.income),
            ("Expenses", self.trends.expenses),
            ("Net", self.trends.net),
        ]));
        output.push('\n');
        output
    }

    fn format_comparison(&self) -> String {
        let mut output = section_header("Period Comparison");
        match &self.comparison {
            Some(comparison) => {
                output.push_str(&tables::comparison_table(comparison, &self.currency_symbol));
                output.push('\n');
                if let (Some(now), Some(before)) = (
                    &comparison.top_category_current,
                    &comparison.top_category_previous,
                ) {
                    output.push_str(&format!("Top category: {} (previously {})\n", now, before));
                }
                output.push_str(&tables::category_trend_table(
                    &self.category_trends,
                    &self.currency_symbol,
                ));
                output.push('\n');
            }
            None => output.push_str("No previous period supplied.\n"),
        }
        output
    }

    fn format_forecast(&self) -> String {
        let forecast = &self.forecast;
        let insights = &forecast.insights;

        let mut output = section_header("Forecast");
        output.push_str(&tables::forecast_table(forecast, &self.currency_symbol));
        output.push('\n');
        output.push_str(&format!(
            "Daily averages: income {} / expenses {}\n",
            self.money(forecast.avg_daily_income),
            self.money(forecast.avg_daily_expenses)
        ));
        output.push_str(&format!("Budget risk: {}\n", insights.budget_risk));
        output.push_str(&format!(
            "Annual savings projection: {}\n",
            self.money(insights.savings_projection)
        ));
        output.push_str("Recommendations:\n");
        for recommendation in &insights.recommendations {
            output.push_str(&format!("  - {}\n", recommendation));
        }
        output
    }

    fn format_goals(&self) -> String {
        let mut output = section_header("Goals");
        let goals: Vec<(&Goal, ProgressReport)> =
            self.goals.iter().map(|g| (&g.goal, g.progress)).collect();
        output.push_str(&tables::goal_table(&goals, &self.currency_symbol));
        output.push('\n');

        let summary = &self.goal_summary;
        if summary.total > 0 {
            output.push_str(&format!(
                "{} completed, {} on track, {} need attention (average progress {})\n",
                summary.completed,
                summary.on_track,
                summary.needs_attention,
                format_percentage(summary.average_progress)
            ));
        }

        output.push('\n');
        output.push_str(&section_header("Budgets"));
        let budgets: Vec<(&Budget, BudgetUsage)> =
            self.budgets.iter().map(|b| (&b.budget, b.usage)).collect();
        output.push_str(&tables::budget_table(&budgets, &self.currency_symbol));
        output.push('\n');
        output
    }

    fn format_health(&self) -> String {
        let health = &self.health;
        let mut output = section_header("Financial Health");
        output.push_str(&format!(
            "Score: {:.0}/100 ({})\n",
            health.score.score, health.score.tier
        ));
        output.push_str(&tables::health_factor_table(&health.score));
        output.push('\n');

        output.push_str(&format!(
            "Savings rate: {}  Budget efficiency: {}  Diversification: {}\n",
            format_percentage(health.inputs.savings_rate_percent),
            format_percentage(health.inputs.budget_efficiency),
            format_percentage(health.inputs.diversification)
        ));
        output.push_str(&format!(
            "Budgets: {} within limit, {} warning, {} exceeded\n",
            health.budget_counts.within_limit,
            health.budget_counts.warning,
            health.budget_counts.exceeded
        ));
        output.push_str(&format!(
            "Spending velocity: {} per day\n",
            self.money(health.spending_velocity)
        ));
        if let Some(top) = &health.top_category {
            output.push_str(&format!(
                "Top category: {} ({})\n",
                top.category,
                self.money(top.amount)
            ));
        }
        if let Some(concern) = &health.biggest_concern {
            output.push_str(&format!(
                "Biggest concern: {} at {}\n",
                concern.name,
                format_percentage(concern.percent_used)
            ));
        }

        let outlook = &health.commitments;
        output.push_str(&format!(
            "Upcoming commitments: {} ({} urgent)\n",
            outlook.upcoming_count(),
            outlook.urgent
        ));
        for commitment in &outlook.upcoming {
            output.push_str(&format!(
                "  - {} on {} (in {} day{})\n",
                commitment.title,
                self.timestamp(commitment.start_time),
                commitment.days_until,
                if commitment.days_until == 1 { "" } else { "s" }
            ));
        }
        output
    }

    fn format_patterns(&self) -> String {
        let patterns = &self.patterns;
        let mut output = section_header("Spending Patterns");
        for insight in &patterns.insights {
            output.push_str(&format!("  * {}\n", insight));
        }
        output.push('\n');
        output.push_str(&tables::weekday_table(
            &patterns.weekday_distribution,
            &self.currency_symbol,
        ));
        output.push('\n');
        output.push_str(&tables::weekly_table(
            &patterns.weekly_distribution,
            &self.currency_symbol,
            &self.date_format,
        ));
        output.push('\n');
        output.push_str(&tables::efficiency_table(&patterns.efficiency));
        output.push('\n');
        output
    }

    /// Serialize one section (or the whole report) as pretty JSON
    pub fn to_json(&self, section: ReportSection) -> FinsightResult<String> {
        let value = match section {
            ReportSection::Dashboard => serde_json::to_value(self)?,
            ReportSection::Trend => serde_json::to_value(&self.trends)?,
            ReportSection::Compare => serde_json::json!({
                "comparison": self.comparison,
                "category_trends": self.category_trends,
            }),
            ReportSection::Forecast => serde_json::to_value(&self.forecast)?,
            ReportSection::Goals => serde_json::json!({
                "goals": self.goals,
                "summary": self.goal_summary,
                "budgets": self.budgets,
            }),
            ReportSection::Health => serde_json::to_value(&self.health)?,
            ReportSection::Patterns => serde_json::to_value(&self.patterns)?,
        };
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Export the whole report as flat CSV rows
    pub fn export_csv<W: Write>(&self, writer: W) -> FinsightResult<()> {
        self.export_section_csv(ReportSection::Dashboard, writer)
    }

    /// Export one section as `section,item,metric,value` rows
    pub fn export_section_csv<W: Write>(
        &self,
        section: ReportSection,
        writer: W,
    ) -> FinsightResult<()> {
        let mut rows = Vec::new();
        for part in section.parts() {
            self.collect_csv_rows(part, &mut rows);
        }

        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv.write_record(CSV_HEADER)?;
        for row in &rows {
            csv.serialize(row)?;
        }
        csv.flush()
            .map_err(|e| FinsightError::Export(format!("Failed to flush CSV: {}", e)))?;

        Ok(())
    }

    fn collect_csv_rows(&self, section: ReportSection, rows: &mut Vec<CsvRow>) {
        let name = section.name();
        let mut push = |item: &str, metric: &str, value: String| {
            rows.push(CsvRow {
                section: name,
                item: item.to_string(),
                metric: metric.to_string(),
                value,
            });
        };

        match section {
            ReportSection::Trend => {
                for (item, trend) in [
                    ("income", &self.trends.income),
                    ("expenses", &self.trends.expenses),
                    ("net", &self.trends.net),
                ] {
                    push(item, "direction", trend.direction.to_string());
                    push(item, "strength", fixed(trend.strength));
                }
            }
            ReportSection::Compare => {
                if let Some(comparison) = &self.comparison {
                    for metric in Metric::ALL {
                        let m = comparison.metric(metric);
                        let item = metric.label();
                        push(item, "current", fixed(m.current));
                        push(item, "previous", fixed(m.previous));
                        push(item, "delta", fixed(m.delta));
                        push(item, "percent_change", fixed(m.percent_change));
                        push(item, "trend", m.trend.to_string());
                    }
                }
                for category in &self.category_trends {
                    push(&category.category, "category_change", fixed(category.percent_change));
                }
            }
            ReportSection::Forecast => {
                for (horizon, h) in self.forecast.horizons() {
                    let item = horizon.to_string();
                    push(&item, "expected_income", fixed(h.expected_income));
                    push(&item, "expected_expenses", fixed(h.expected_expenses));
                    push(&item, "projected_balance", fixed(h.projected_balance));
                    push(&item, "confidence", fixed(h.confidence));
                }
                let insights = &self.forecast.insights;
                push("insights", "budget_risk", insights.budget_risk.to_string());
                push("insights", "savings_projection", fixed(insights.savings_projection));
            }
            ReportSection::Goals => {
                for g in &self.goals {
                    push(&g.goal.name, "progress", fixed(g.progress.progress_percentage));
                    push(&g.goal.name, "monthly_target", fixed(g.progress.monthly_target));
                    push(&g.goal.name, "days_remaining", g.progress.days_remaining.to_string());
                    push(&g.goal.name, "status", g.progress.status.to_string());
                }
                for b in &self.budgets {
                    push(&b.budget.name, "percent_used", fixed(b.usage.percent_used));
                    push(&b.budget.name, "state", b.usage.state.to_string());
                }
            }
            ReportSection::Health => {
                let score = &self.health.score;
                push("health", "score", fixed(score.score));
                push("health", "tier", score.tier.to_string());
                for (factor, points) in score.factors.labeled() {
                    push(factor, "points", fixed(points));
                }
                push(
                    "commitments",
                    "upcoming",
                    self.health.commitments.upcoming_count().to_string(),
                );
                push("commitments", "urgent", self.health.commitments.urgent.to_string());
            }
            ReportSection::Patterns => {
                for day in &self.patterns.weekday_distribution {
                    push(&day.weekday.to_string(), "share", fixed(day.share));
                }
                for week in &self.patterns.weekly_distribution {
                    push(&format!("week {}", week.week), "amount", fixed(week.amount));
                }
                push("efficiency", "overall", fixed(self.patterns.efficiency.overall));
            }
            ReportSection::Dashboard => {}
        }
    }
}

const CSV_HEADER: [&str; 4] = ["section", "item", "metric", "value"];

#[derive(Debug, Serialize)]
struct CsvRow {
    section: &'static str,
    item: String,
    metric: String,
    value: String,
}

fn fixed(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryAmount, DailyEntry, PeriodSnapshot};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 31, 0, 0, 0).unwrap()
    }

    fn input() -> AnalysisInput {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let series: Vec<DailyEntry> = (0..31)
            .map(|i| DailyEntry::new(start + Duration::days(i), 150.0, 90.0))
            .collect();

        let current = PeriodSnapshot::new(start, start + Duration::days(30))
            .with_daily_series(series)
            .with_totals_from_series()
            .with_transaction_count(60)
            .with_categories(vec![
                CategoryAmount::new("Housing", 1200.0),
                CategoryAmount::new("Food", 900.0),
                CategoryAmount::new("Transport", 690.0),
            ]);
        let previous = PeriodSnapshot::new(
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
        )
        .with_totals(4000.0, 3000.0)
        .with_categories(vec![
            CategoryAmount::new("Housing", 1200.0),
            CategoryAmount::new("Food", 600.0),
        ]);

        AnalysisInput::new(current)
            .with_previous(previous)
            .with_goals(vec![Goal::new(
                "Vacation",
                3000.0,
                900.0,
                NaiveDate::from_ymd_opt(2025, 9, 27).unwrap(),
            )])
            .with_budgets(vec![Budget::new(
                "Food",
                1000.0,
                900.0,
                NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            )])
    }

    #[test]
    fn test_generate_runs_every_calculator() {
        let report = DashboardReport::generate(&input(), now(), &Settings::default());

        assert!(report.comparison.is_some());
        assert_eq!(report.category_trends[0].category, "Transport");
        assert_eq!(report.goals.len(), 1);
        assert_eq!(report.goal_summary.total, 1);
        assert_eq!(report.budgets.len(), 1);
        assert!(report.trends.income.is_stable());
        assert!(report.forecast.next_period.expected_income > 0.0);
        assert!(report.health.score.score <= 100.0);
    }

    #[test]
    fn test_terminal_output_has_every_section() {
        let report = DashboardReport::generate(&input(), now(), &Settings::default());
        let text = report.format_terminal();

        for title in [
            "Trends",
            "Period Comparison",
            "Forecast",
            "Goals",
            "Budgets",
            "Financial Health",
            "Spending Patterns",
        ] {
            assert!(text.contains(title), "missing section {}", title);
        }
        assert!(text.contains("Vacation"));

        let only_goals = report.format_section(ReportSection::Goals);
        assert!(only_goals.contains("Vacation"));
        assert!(!only_goals.contains("Spending Patterns"));
    }

    #[test]
    fn test_missing_previous_period() {
        let mut input = input();
        input.previous = None;
        let report = DashboardReport::generate(&input, now(), &Settings::default());

        assert!(report.comparison.is_none());
        assert!(report.category_trends.is_empty());
        assert!(report
            .format_section(ReportSection::Compare)
            .contains("No previous period supplied."));
    }

    #[test]
    fn test_currency_symbol_from_settings() {
        let settings = Settings {
            currency_symbol: "€".to_string(),
            ..Settings::default()
        };
        let report = DashboardReport::generate(&input(), now(), &settings);
        assert!(report.format_section(ReportSection::Forecast).contains('€'));
    }

    #[test]
    fn test_date_format_from_settings() {
        let settings = Settings {
            date_format: "%d/%m/%Y".to_string(),
            ..Settings::default()
        };
        let report = DashboardReport::generate(&input(), now(), &settings);
        let text = report.format_section(ReportSection::Patterns);

        assert!(text.starts_with("Financial Dashboard: 01/03/2025 to 31/03/2025\n"));
        assert!(text.contains("Generated: 31/03/2025 00:00 UTC"));
        assert!(text.contains("(01/03/2025)"));
    }

    #[test]
    fn test_json_sections() {
        let report = DashboardReport::generate(&input(), now(), &Settings::default());

        let full: serde_json::Value =
            serde_json::from_str(&report.to_json(ReportSection::Dashboard).unwrap()).unwrap();
        assert!(full.get("forecast").is_some());
        assert!(full.get("currency_symbol").is_none());

        let health: serde_json::Value =
            serde_json::from_str(&report.to_json(ReportSection::Health).unwrap()).unwrap();
        assert!(health["score"]["tier"].is_string());
    }

    #[test]
    fn test_csv_export() {
        let report = DashboardReport::generate(&input(), now(), &Settings::default());

        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("section,item,metric,value"));
        assert!(text.contains("forecast,Next period,expected_income,"));
        assert!(text.contains("goals,Vacation,status,"));
        assert!(text.contains("health,health,tier,"));

        let mut buffer = Vec::new();
        report
            .export_section_csv(ReportSection::Trend, &mut buffer)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 7);
        assert_eq!(text.lines().next(), Some("section,item,metric,value"));
    }

    #[test]
    fn test_empty_csv_section_keeps_header() {
        let mut input = input();
        input.previous = None;
        let report = DashboardReport::generate(&input, now(), &Settings::default());

        let mut buffer = Vec::new();
        report
            .export_section_csv(ReportSection::Compare, &mut buffer)
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "section,item,metric,value\n");
    }
}
