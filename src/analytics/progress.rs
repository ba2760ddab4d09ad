//! Goal and budget progress tracking
//!
//! Classifies how far along a goal (or a budget, read as a spending target)
//! is relative to the time left before its deadline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::numeric::{safe_division, safe_mean, safe_number};
use crate::models::{Budget, Goal};

pub const DAYS_PER_MONTH: f64 = 30.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;
pub const AT_RISK_WINDOW_DAYS: i64 = 30;
pub const AT_RISK_PROGRESS: f64 = 80.0;
pub const AHEAD_FACTOR: f64 = 1.2;
pub const BEHIND_FACTOR: f64 = 0.8;

/// Budget usage at which a budget is flagged
pub const BUDGET_WARNING_PERCENT: f64 = 80.0;
pub const BUDGET_EXCEEDED_PERCENT: f64 = 100.0;

/// Anything with an amount to reach by a date
pub trait Trackable {
    fn target_amount(&self) -> f64;
    fn current_amount(&self) -> f64;
    fn target_date(&self) -> NaiveDate;
}

impl Trackable for Goal {
    fn target_amount(&self) -> f64 {
        self.target_amount
    }

    fn current_amount(&self) -> f64 {
        self.current_amount
    }

    fn target_date(&self) -> NaiveDate {
        self.target_date
    }
}

impl Trackable for Budget {
    fn target_amount(&self) -> f64 {
        self.limit
    }

    fn current_amount(&self) -> f64 {
        self.spent
    }

    fn target_date(&self) -> NaiveDate {
        self.period_end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Completed,
    AtRisk,
    Ahead,
    Behind,
    OnTrack,
}

impl ProgressStatus {
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::AtRisk | Self::Behind)
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::AtRisk => write!(f, "at risk"),
            Self::Ahead => write!(f, "ahead"),
            Self::Behind => write!(f, "behind"),
            Self::OnTrack => write!(f, "on track"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_at_risk_window_days")]
    pub at_risk_window_days: i64,
    #[serde(default = "default_at_risk_progress")]
    pub at_risk_progress: f64,
}

fn default_at_risk_window_days() -> i64 {
    AT_RISK_WINDOW_DAYS
}

fn default_at_risk_progress() -> f64 {
    AT_RISK_PROGRESS
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            at_risk_window_days: default_at_risk_window_days(),
            at_risk_progress: default_at_risk_progress(),
        }
    }
}

/// Derived progress for one goal or budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// 0-100
    pub progress_percentage: f64,
    pub days_remaining: i64,
    /// Fractional months, at least 1
    pub months_remaining: f64,
    /// Contribution needed per month to hit the target on time
    pub monthly_target: f64,
    /// Share of a twelve-month horizon already elapsed relative to what remains
    pub expected_percentage: f64,
    pub status: ProgressStatus,
}

pub fn track_progress(item: &impl Trackable, now: DateTime<Utc>) -> ProgressReport {
    track_progress_with(item, now, &ProgressConfig::default())
}

pub fn track_progress_with(
    item: &impl Trackable,
    now: DateTime<Utc>,
    config: &ProgressConfig,
) -> ProgressReport {
    let target = safe_number(item.target_amount(), 0.0);
    let current = safe_number(item.current_amount(), 0.0);

    let progress_percentage = if current >= target {
        100.0
    } else {
        safe_division(current * 100.0, target, 0.0).clamp(0.0, 100.0)
    };

    let days_remaining = days_until(item.target_date(), now);
    let months_remaining = (days_remaining as f64 / DAYS_PER_MONTH).max(1.0);

    let monthly_target = safe_division(target - current, months_remaining, 0.0).max(0.0);
    let expected_percentage = safe_division(
        (MONTHS_PER_YEAR - months_remaining) * 100.0,
        months_remaining,
        0.0,
    )
    .max(0.0);

    let status = if progress_percentage >= 100.0 {
        ProgressStatus::Completed
    } else if days_remaining <= config.at_risk_window_days
        && progress_percentage < config.at_risk_progress
    {
        ProgressStatus::AtRisk
    } else if progress_percentage > expected_percentage * AHEAD_FACTOR {
        ProgressStatus::Ahead
    } else if progress_percentage < expected_percentage * BEHIND_FACTOR {
        ProgressStatus::Behind
    } else {
        ProgressStatus::OnTrack
    };

    ProgressReport {
        progress_percentage,
        days_remaining,
        months_remaining,
        monthly_target,
        expected_percentage,
        status,
    }
}

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days from `now` until midnight UTC of `date`, rounded up, never negative
fn days_until(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    whole_days_until(date.and_time(chrono::NaiveTime::MIN).and_utc(), now)
}

/// Days from `now` until `instant`, any partial day counting as a full one
pub(crate) fn whole_days_until(instant: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (instant - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis - 1) / MILLIS_PER_DAY + 1
}

/// Aggregate view over a set of progress reports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct GoalSummary {
    pub total: usize,
    pub completed: usize,
    /// On track or ahead
    pub on_track: usize,
    /// At risk or behind
    pub needs_attention: usize,
    pub average_progress: f64,
}

pub fn summarize_goals(reports: &[ProgressReport]) -> GoalSummary {
    let count = |pred: fn(&ProgressStatus) -> bool| reports.iter().filter(|r| pred(&r.status)).count();

    let progress: Vec<f64> = reports.iter().map(|r| r.progress_percentage).collect();

    GoalSummary {
        total: reports.len(),
        completed: count(|s| *s == ProgressStatus::Completed),
        on_track: count(|s| matches!(s, ProgressStatus::OnTrack | ProgressStatus::Ahead)),
        needs_attention: count(ProgressStatus::needs_attention),
        average_progress: safe_mean(&progress),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetState {
    WithinLimit,
    Warning,
    Exceeded,
}

impl fmt::Display for BudgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithinLimit => write!(f, "within limit"),
            Self::Warning => write!(f, "warning"),
            Self::Exceeded => write!(f, "exceeded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetUsage {
    /// Not clamped; an overspent budget reports more than 100
    pub percent_used: f64,
    pub remaining: f64,
    pub state: BudgetState,
}

pub fn budget_usage(budget: &Budget) -> BudgetUsage {
    let percent_used = budget.percent_used();
    let state = if percent_used >= BUDGET_EXCEEDED_PERCENT {
        BudgetState::Exceeded
    } else if percent_used >= BUDGET_WARNING_PERCENT {
        BudgetState::Warning
    } else {
        BudgetState::WithinLimit
    };

    BudgetUsage {
        percent_used,
        remaining: safe_number(budget.remaining(), 0.0),
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    }

    fn goal(target: f64, current: f64, days_ahead: i64) -> Goal {
        Goal::new("Goal", target, current, now().date_naive() + Duration::days(days_ahead))
    }

    #[test]
    fn test_half_year_goal_behind() {
        let report = track_progress(&goal(5000.0, 1200.0, 180), now());

        assert_eq!(report.progress_percentage, 24.0);
        assert_eq!(report.days_remaining, 180);
        assert_eq!(report.months_remaining, 6.0);
        assert!((report.monthly_target - 633.333_333).abs() < 1e-3);
        assert_eq!(report.expected_percentage, 100.0);
        assert_eq!(report.status, ProgressStatus::Behind);
    }

    #[test]
    fn test_reached_goal_is_completed() {
        for current in [5000.0, 7500.0] {
            let report = track_progress(&goal(5000.0, current, 10), now());
            assert_eq!(report.progress_percentage, 100.0);
            assert_eq!(report.status, ProgressStatus::Completed);
            assert_eq!(report.monthly_target, 0.0);
        }
    }

    #[test]
    fn test_imminent_deadline_is_at_risk() {
        let report = track_progress(&goal(1000.0, 500.0, 20), now());
        assert_eq!(report.months_remaining, 1.0);
        assert_eq!(report.status, ProgressStatus::AtRisk);
    }

    #[test]
    fn test_at_risk_takes_priority() {
        let report = track_progress(&goal(1000.0, 790.0, 30), now());
        assert_eq!(report.status, ProgressStatus::AtRisk);

        let report = track_progress(&goal(1000.0, 800.0, 30), now());
        assert_eq!(report.status, ProgressStatus::Behind);
    }

    #[test]
    fn test_long_horizon_goal_ahead() {
        // 360 days: 12 months, expected 0
        let report = track_progress(&goal(1000.0, 10.0, 360), now());
        assert_eq!(report.expected_percentage, 0.0);
        assert_eq!(report.status, ProgressStatus::Ahead);
    }

    #[test]
    fn test_very_long_horizon_expected_is_floored() {
        let report = track_progress(&goal(1000.0, 0.0, 720), now());
        assert_eq!(report.months_remaining, 24.0);
        assert_eq!(report.expected_percentage, 0.0);
        assert_eq!(report.status, ProgressStatus::OnTrack);
    }

    #[test]
    fn test_past_deadline() {
        let report = track_progress(&goal(1000.0, 100.0, -5), now());
        assert_eq!(report.days_remaining, 0);
        assert_eq!(report.months_remaining, 1.0);
        assert_eq!(report.monthly_target, 900.0);
        assert_eq!(report.status, ProgressStatus::AtRisk);
    }

    #[test]
    fn test_partial_day_rounds_up() {
        let later = now() + Duration::hours(6);
        let report = track_progress(&goal(1000.0, 0.0, 10), later);
        assert_eq!(report.days_remaining, 10);
    }

    #[test]
    fn test_months_are_fractional() {
        let report = track_progress(&goal(1000.0, 0.0, 59), now());
        assert_eq!(report.days_remaining, 59);
        assert!((report.months_remaining - 59.0 / 30.0).abs() < 1e-12);
        assert!((report.monthly_target - 508.474_576).abs() < 1e-3);
        assert!((report.expected_percentage - 510.169_491).abs() < 1e-3);
        assert_eq!(report.status, ProgressStatus::Behind);
    }

    #[test]
    fn test_sub_second_remainder_counts_as_a_day() {
        let deadline = now() + Duration::days(1);
        let almost = deadline - Duration::milliseconds(500);
        assert_eq!(whole_days_until(deadline, almost), 1);
        assert_eq!(whole_days_until(deadline, deadline), 0);
        assert_eq!(whole_days_until(deadline, now()), 1);
        assert_eq!(whole_days_until(deadline, now() - Duration::milliseconds(1)), 2);

        let report = track_progress(&goal(1000.0, 0.0, 0), now() - Duration::milliseconds(500));
        assert_eq!(report.days_remaining, 1);
    }

    #[test]
    fn test_budget_is_trackable() {
        let budget = Budget::new(
            "Groceries",
            400.0,
            100.0,
            now().date_naive() + Duration::days(90),
        );
        let report = track_progress(&budget, now());
        assert_eq!(report.progress_percentage, 25.0);
        assert_eq!(report.months_remaining, 3.0);
        assert_eq!(report.monthly_target, 100.0);
    }

    #[test]
    fn test_budget_usage_states() {
        let end = now().date_naive();
        assert_eq!(
            budget_usage(&Budget::new("A", 100.0, 50.0, end)).state,
            BudgetState::WithinLimit
        );
        assert_eq!(
            budget_usage(&Budget::new("B", 100.0, 80.0, end)).state,
            BudgetState::Warning
        );
        let usage = budget_usage(&Budget::new("C", 100.0, 150.0, end));
        assert_eq!(usage.state, BudgetState::Exceeded);
        assert_eq!(usage.percent_used, 150.0);
        assert_eq!(usage.remaining, -50.0);
    }

    #[test]
    fn test_summarize_goals() {
        let reports = vec![
            track_progress(&goal(100.0, 100.0, 60), now()),
            track_progress(&goal(5000.0, 1200.0, 180), now()),
            track_progress(&goal(1000.0, 10.0, 360), now()),
        ];
        let summary = summarize_goals(&reports);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.on_track, 1);
        assert_eq!(summary.needs_attention, 1);
        assert!((summary.average_progress - 125.0 / 3.0).abs() < 1e-9);

        assert_eq!(summarize_goals(&[]), GoalSummary::default());
    }

    #[test]
    fn test_custom_risk_window() {
        let config = ProgressConfig {
            at_risk_window_days: 7,
            at_risk_progress: 80.0,
        };
        let report = track_progress_with(&goal(1000.0, 500.0, 20), now(), &config);
        assert_eq!(report.status, ProgressStatus::Behind);
    }
}
