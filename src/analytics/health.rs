//! Financial Health Scorer
//!
//! Folds savings, budget discipline and spending diversification into a
//! single 0-100 score with a tier. Commitment urgency is reported next to
//! the score but does not contribute points.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::numeric::{safe_clamp, safe_division, safe_mean, safe_number};
use super::progress::{budget_usage, whole_days_until, BudgetState};
use crate::models::{Budget, CategoryAmount, Commitment, PeriodSnapshot};

pub const MAX_SCORE: f64 = 100.0;

/// Default commitment lookahead
pub const COMMITMENT_LOOKAHEAD_DAYS: i64 = 7;

/// Commitments starting within this many days are urgent
pub const URGENT_WITHIN_DAYS: i64 = 1;

/// Raw measurements the score is computed from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct HealthInputs {
    pub total_income: f64,
    pub total_expenses: f64,
    /// Mean headroom across budgets, 0-100
    pub budget_efficiency: f64,
    pub savings_rate_percent: f64,
    /// 100 minus the top category's share of expenses, 0-100
    pub diversification: f64,
    pub budgets_over_limit: usize,
}

impl HealthInputs {
    pub fn from_parts(snapshot: &PeriodSnapshot, budgets: &[Budget]) -> Self {
        let headroom: Vec<f64> = budgets
            .iter()
            .map(|b| (100.0 - b.percent_used()).max(0.0))
            .collect();
        let budget_efficiency = safe_mean(&headroom);

        let total_income = snapshot.total_income();
        let total_expenses = snapshot.total_expenses();

        if total_income <= 0.0 {
            tracing::debug!("no income in snapshot, savings rate defaults to zero");
        }
        let savings_rate_percent =
            safe_division((total_income - total_expenses) * 100.0, total_income, 0.0);

        let diversification = match snapshot.top_category() {
            Some(top) => {
                let share = safe_division(top.amount * 100.0, total_expenses, 100.0);
                safe_clamp(100.0 - share, 0.0, 100.0)
            }
            None => 0.0,
        };

        Self {
            total_income,
            total_expenses,
            budget_efficiency,
            savings_rate_percent,
            diversification,
            budgets_over_limit: budgets.iter().filter(|b| b.is_over_limit()).count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for HealthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "excellent"),
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

/// Points earned per factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct HealthFactors {
    pub savings: f64,
    pub budget_efficiency: f64,
    pub budget_discipline: f64,
    pub diversification: f64,
    pub surplus_bonus: f64,
}

impl HealthFactors {
    pub fn total(&self) -> f64 {
        self.savings
            + self.budget_efficiency
            + self.budget_discipline
            + self.diversification
            + self.surplus_bonus
    }

    pub fn labeled(&self) -> [(&'static str, f64); 5] {
        [
            ("Savings rate", self.savings),
            ("Budget efficiency", self.budget_efficiency),
            ("Budgets within limit", self.budget_discipline),
            ("Diversification", self.diversification),
            ("Income above expenses", self.surplus_bonus),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: f64,
    pub tier: HealthTier,
    pub factors: HealthFactors,
}

pub fn score_health(inputs: &HealthInputs) -> HealthScore {
    let savings_rate = safe_number(inputs.savings_rate_percent, 0.0);
    let savings = if savings_rate > 20.0 {
        30.0
    } else if savings_rate > 10.0 {
        20.0
    } else if savings_rate > 0.0 {
        10.0
    } else {
        0.0
    };

    let efficiency = safe_number(inputs.budget_efficiency, 0.0);
    let budget_efficiency = if efficiency > 80.0 {
        25.0
    } else if efficiency > 60.0 {
        15.0
    } else if efficiency > 40.0 {
        10.0
    } else {
        0.0
    };

    let budget_discipline = match inputs.budgets_over_limit {
        0 => 20.0,
        1 => 10.0,
        _ => 0.0,
    };

    let diversity = safe_number(inputs.diversification, 0.0);
    let diversification = if diversity > 60.0 {
        15.0
    } else if diversity > 40.0 {
        10.0
    } else {
        0.0
    };

    let surplus_bonus = if inputs.total_income > inputs.total_expenses {
        10.0
    } else {
        0.0
    };

    let factors = HealthFactors {
        savings,
        budget_efficiency,
        budget_discipline,
        diversification,
        surplus_bonus,
    };
    let score = safe_clamp(factors.total(), 0.0, MAX_SCORE);

    HealthScore {
        score,
        tier: HealthTier::from_score(score),
        factors,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingCommitment {
    pub title: String,
    pub start_time: DateTime<Utc>,
    /// Whole days until start, rounded up
    pub days_until: i64,
}

/// Scheduled commitments coming up soon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CommitmentOutlook {
    /// Soonest first
    pub upcoming: Vec<UpcomingCommitment>,
    pub urgent: usize,
}

impl CommitmentOutlook {
    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }

    pub fn next(&self) -> Option<&UpcomingCommitment> {
        self.upcoming.first()
    }
}

pub fn commitment_outlook(
    commitments: &[Commitment],
    now: DateTime<Utc>,
    lookahead_days: i64,
) -> CommitmentOutlook {
    // Saturates for lookaheads past the representable range
    let horizon = Duration::try_days(lookahead_days.max(0))
        .and_then(|lookahead| now.checked_add_signed(lookahead))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    let mut upcoming: Vec<UpcomingCommitment> = commitments
        .iter()
        .filter(|c| c.is_scheduled() && c.start_time >= now && c.start_time <= horizon)
        .map(|c| UpcomingCommitment {
            title: c.title.clone(),
            start_time: c.start_time,
            days_until: whole_days_until(c.start_time, now),
        })
        .collect();
    upcoming.sort_by_key(|c| c.start_time);

    let urgent = upcoming
        .iter()
        .filter(|c| c.days_until <= URGENT_WITHIN_DAYS)
        .count();

    CommitmentOutlook { upcoming, urgent }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BudgetCounts {
    pub within_limit: usize,
    pub warning: usize,
    pub exceeded: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetConcern {
    pub name: String,
    pub percent_used: f64,
}

/// Score plus the context a dashboard shows around it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub inputs: HealthInputs,
    pub score: HealthScore,
    pub budget_counts: BudgetCounts,
    /// Average expenses per day of the daily series
    pub spending_velocity: f64,
    pub top_category: Option<CategoryAmount>,
    pub biggest_concern: Option<BudgetConcern>,
    pub commitments: CommitmentOutlook,
}

impl HealthReport {
    pub fn build(
        snapshot: &PeriodSnapshot,
        budgets: &[Budget],
        commitments: &[Commitment],
        now: DateTime<Utc>,
        lookahead_days: i64,
    ) -> Self {
        let inputs = HealthInputs::from_parts(snapshot, budgets);
        let score = score_health(&inputs);

        let mut budget_counts = BudgetCounts::default();
        for budget in budgets {
            match budget_usage(budget).state {
                BudgetState::WithinLimit => budget_counts.within_limit += 1,
                BudgetState::Warning => budget_counts.warning += 1,
                BudgetState::Exceeded => budget_counts.exceeded += 1,
            }
        }

        let biggest_concern = budgets
            .iter()
            .max_by(|a, b| a.percent_used().total_cmp(&b.percent_used()))
            .map(|b| BudgetConcern {
                name: b.name.clone(),
                percent_used: b.percent_used(),
            });

        let spending_velocity = safe_division(
            snapshot.total_expenses(),
            snapshot.daily_series().len() as f64,
            0.0,
        );

        tracing::debug!(score = score.score, tier = %score.tier, "health scored");

        Self {
            inputs,
            score,
            budget_counts,
            spending_velocity,
            top_category: snapshot.top_category().cloned(),
            biggest_concern,
            commitments: commitment_outlook(commitments, now, lookahead_days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommitmentStatus, DailyEntry};
    use chrono::{NaiveDate, TimeZone};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    fn snapshot(income: f64, expenses: f64, categories: Vec<CategoryAmount>) -> PeriodSnapshot {
        PeriodSnapshot::new(date(1), date(30))
            .with_totals(income, expenses)
            .with_categories(categories)
    }

    #[test]
    fn test_reference_household() {
        let snap = snapshot(
            10_000.0,
            6_000.0,
            vec![
                CategoryAmount::new("Housing", 1_800.0),
                CategoryAmount::new("Food", 1_500.0),
                CategoryAmount::new("Transport", 1_500.0),
                CategoryAmount::new("Other", 1_200.0),
            ],
        );
        let budgets = vec![Budget::new("Food", 1000.0, 400.0, date(30))];

        let inputs = HealthInputs::from_parts(&snap, &budgets);
        assert_eq!(inputs.savings_rate_percent, 40.0);
        assert_eq!(inputs.budget_efficiency, 60.0);
        assert_eq!(inputs.diversification, 70.0);
        assert_eq!(inputs.budgets_over_limit, 0);

        let health = score_health(&inputs);
        assert_eq!(health.factors.savings, 30.0);
        assert_eq!(health.factors.budget_efficiency, 10.0);
        assert_eq!(health.factors.budget_discipline, 20.0);
        assert_eq!(health.factors.diversification, 15.0);
        assert_eq!(health.factors.surplus_bonus, 10.0);
        assert_eq!(health.score, 85.0);
        assert_eq!(health.tier, HealthTier::Excellent);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(HealthTier::from_score(80.0), HealthTier::Excellent);
        assert_eq!(HealthTier::from_score(79.9), HealthTier::Good);
        assert_eq!(HealthTier::from_score(60.0), HealthTier::Good);
        assert_eq!(HealthTier::from_score(40.0), HealthTier::Fair);
        assert_eq!(HealthTier::from_score(39.99), HealthTier::Poor);
    }

    #[test]
    fn test_score_bounds() {
        let best = HealthInputs {
            total_income: 1.0,
            total_expenses: 0.0,
            budget_efficiency: 100.0,
            savings_rate_percent: 100.0,
            diversification: 100.0,
            budgets_over_limit: 0,
        };
        assert_eq!(score_health(&best).score, MAX_SCORE);

        let worst = HealthInputs {
            savings_rate_percent: f64::NEG_INFINITY,
            budget_efficiency: f64::NAN,
            budgets_over_limit: 5,
            ..HealthInputs::default()
        };
        let health = score_health(&worst);
        assert_eq!(health.score, 0.0);
        assert_eq!(health.tier, HealthTier::Poor);
    }

    #[test]
    fn test_empty_snapshot() {
        let inputs = HealthInputs::from_parts(&snapshot(0.0, 0.0, Vec::new()), &[]);
        assert_eq!(inputs.savings_rate_percent, 0.0);
        assert_eq!(inputs.budget_efficiency, 0.0);
        assert_eq!(inputs.diversification, 0.0);
        // Only the clean budget record scores
        assert_eq!(score_health(&inputs).score, 20.0);
    }

    #[test]
    fn test_over_limit_budgets_reduce_score() {
        let snap = snapshot(5000.0, 4000.0, Vec::new());
        let budgets = vec![
            Budget::new("Dining", 100.0, 150.0, date(30)),
            Budget::new("Fun", 100.0, 100.0, date(30)),
            Budget::new("Food", 100.0, 85.0, date(30)),
        ];
        let inputs = HealthInputs::from_parts(&snap, &budgets);
        assert_eq!(inputs.budgets_over_limit, 2);
        assert_eq!(inputs.budget_efficiency, 5.0);
        assert_eq!(score_health(&inputs).factors.budget_discipline, 0.0);
    }

    #[test]
    fn test_diversification_without_expenses() {
        let snap = snapshot(100.0, 0.0, vec![CategoryAmount::new("Misc", 0.0)]);
        let inputs = HealthInputs::from_parts(&snap, &[]);
        assert_eq!(inputs.diversification, 0.0);
    }

    #[test]
    fn test_commitment_outlook() {
        let at = |hours: i64| now() + Duration::hours(hours);
        let commitments = vec![
            Commitment::new("Dentist", at(5), at(6), CommitmentStatus::Scheduled),
            Commitment::new("Rent due", at(72), at(73), CommitmentStatus::Scheduled),
            Commitment::new("Cancelled", at(2), at(3), CommitmentStatus::Cancelled),
            Commitment::new("Far away", at(24 * 10), at(24 * 10 + 1), CommitmentStatus::Scheduled),
            Commitment::new("Past", at(-3), at(-2), CommitmentStatus::Scheduled),
        ];

        let outlook = commitment_outlook(&commitments, now(), COMMITMENT_LOOKAHEAD_DAYS);
        assert_eq!(outlook.upcoming_count(), 2);
        assert_eq!(outlook.urgent, 1);
        assert_eq!(outlook.next().map(|c| c.title.as_str()), Some("Dentist"));
        assert_eq!(outlook.upcoming[1].days_until, 3);
    }

    #[test]
    fn test_huge_lookahead_saturates() {
        let far = now() + Duration::days(365 * 100);
        let commitments = vec![Commitment::new(
            "Century",
            far,
            far + Duration::hours(1),
            CommitmentStatus::Scheduled,
        )];

        for lookahead in [100_000_000, i64::MAX] {
            let outlook = commitment_outlook(&commitments, now(), lookahead);
            assert_eq!(outlook.upcoming_count(), 1);
            assert_eq!(outlook.urgent, 0);
        }
        assert!(commitment_outlook(&[], now(), i64::MAX).upcoming.is_empty());
    }

    #[test]
    fn test_commitment_half_a_second_away_is_urgent() {
        let soon = now() + Duration::milliseconds(500);
        let commitments = vec![Commitment::new(
            "Call",
            soon,
            soon + Duration::hours(1),
            CommitmentStatus::Scheduled,
        )];

        let outlook = commitment_outlook(&commitments, now(), COMMITMENT_LOOKAHEAD_DAYS);
        assert_eq!(outlook.upcoming[0].days_until, 1);
        assert_eq!(outlook.urgent, 1);
    }

    #[test]
    fn test_health_report_extras() {
        let snap = snapshot(
            3000.0,
            1500.0,
            vec![
                CategoryAmount::new("Rent", 1000.0),
                CategoryAmount::new("Food", 500.0),
            ],
        )
        .with_daily_series((1..=30).map(|d| DailyEntry::new(date(d), 100.0, 50.0)).collect());
        let budgets = vec![
            Budget::new("Food", 600.0, 500.0, date(30)),
            Budget::new("Rent", 1000.0, 1000.0, date(30)),
            Budget::new("Fun", 200.0, 20.0, date(30)),
        ];

        let report = HealthReport::build(&snap, &budgets, &[], now(), COMMITMENT_LOOKAHEAD_DAYS);
        assert_eq!(
            report.budget_counts,
            BudgetCounts {
                within_limit: 1,
                warning: 1,
                exceeded: 1
            }
        );
        assert_eq!(report.spending_velocity, 50.0);
        assert_eq!(report.top_category.map(|c| c.category), Some("Rent".to_string()));
        assert_eq!(
            report.biggest_concern.map(|c| c.name),
            Some("Rent".to_string())
        );
        assert!(report.commitments.upcoming.is_empty());
    }
}
