//! Analysis input bundle
//!
//! Everything a caller assembles before running the calculators: the
//! current snapshot, an optional previous one, a historical daily window
//! and the budgets, goals and commitments to evaluate.

use serde::{Deserialize, Serialize};

use super::budget::Budget;
use super::commitment::Commitment;
use super::goal::Goal;
use super::snapshot::{normalize_series, DailyEntry, PeriodSnapshot};
use crate::error::{FinsightError, FinsightResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub current: PeriodSnapshot,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<PeriodSnapshot>,

    /// Historical daily window for forecasting (30+ days recommended)
    #[serde(default)]
    pub history: Vec<DailyEntry>,

    #[serde(default)]
    pub budgets: Vec<Budget>,

    #[serde(default)]
    pub goals: Vec<Goal>,

    #[serde(default)]
    pub commitments: Vec<Commitment>,
}

impl AnalysisInput {
    pub fn new(current: PeriodSnapshot) -> Self {
        Self {
            current,
            previous: None,
            history: Vec::new(),
            budgets: Vec::new(),
            goals: Vec::new(),
            commitments: Vec::new(),
        }
    }

    pub fn with_previous(mut self, previous: PeriodSnapshot) -> Self {
        self.previous = Some(previous);
        self
    }

    pub fn with_history(mut self, history: Vec<DailyEntry>) -> Self {
        self.history = history;
        self
    }

    pub fn with_budgets(mut self, budgets: Vec<Budget>) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn with_goals(mut self, goals: Vec<Goal>) -> Self {
        self.goals = goals;
        self
    }

    pub fn with_commitments(mut self, commitments: Vec<Commitment>) -> Self {
        self.commitments = commitments;
        self
    }

    /// The daily window used for forecasting
    ///
    /// Falls back to the current snapshot's own series when no separate
    /// history was supplied.
    pub fn forecast_window(&self) -> Vec<DailyEntry> {
        if self.history.is_empty() {
            self.current.daily_series().to_vec()
        } else {
            normalize_series(self.history.clone())
        }
    }

    /// Reject entities the calculators cannot meaningfully evaluate
    pub fn validate(&self) -> FinsightResult<()> {
        for goal in &self.goals {
            goal.validate()
                .map_err(|e| FinsightError::Validation(format!("goal '{}': {}", goal.name, e)))?;
        }

        for budget in &self.budgets {
            budget.validate().map_err(|e| {
                FinsightError::Validation(format!("budget '{}': {}", budget.name, e))
            })?;
        }

        for commitment in &self.commitments {
            commitment.validate().map_err(|e| {
                FinsightError::Validation(format!("commitment '{}': {}", commitment.title, e))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_forecast_window_falls_back_to_current_series() {
        let current = PeriodSnapshot::new(date(1), date(31))
            .with_daily_series(vec![DailyEntry::new(date(1), 10.0, 5.0)]);
        let input = AnalysisInput::new(current);
        assert_eq!(input.forecast_window().len(), 1);

        let input = input.with_history(vec![
            DailyEntry::new(date(3), 1.0, 1.0),
            DailyEntry::new(date(1), 1.0, 1.0),
        ]);
        let window = input.forecast_window();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].date, date(1));
    }

    #[test]
    fn test_validate_reports_offending_goal() {
        let input = AnalysisInput::new(PeriodSnapshot::new(date(1), date(31)))
            .with_goals(vec![Goal::new("Car", -5.0, 0.0, date(31))]);
        let err = input.validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Car"));
    }

    #[test]
    fn test_minimal_yaml_document() {
        let yaml = "current:\n  start_date: 2025-01-01\n  end_date: 2025-01-31\n  total_income: 100\n";
        let input: AnalysisInput = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(input.current.total_income(), 100.0);
        assert!(input.previous.is_none());
        assert!(input.validate().is_ok());
    }
}
