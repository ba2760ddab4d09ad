//! Financial goal model
//!
//! A goal is a savings target with a deadline. Progress and status are
//! derived by the progress tracker and never stored on the goal itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(default)]
    pub id: GoalId,

    pub name: String,

    /// Free-form grouping such as "savings" or "travel"
    #[serde(default)]
    pub category: String,

    pub target_amount: f64,

    /// May exceed `target_amount` (over-achievement)
    #[serde(default)]
    pub current_amount: f64,

    pub target_date: NaiveDate,
}

impl Goal {
    pub fn new(
        name: impl Into<String>,
        target_amount: f64,
        current_amount: f64,
        target_date: NaiveDate,
    ) -> Self {
        Self {
            id: GoalId::new(),
            name: name.into(),
            category: String::new(),
            target_amount,
            current_amount,
            target_date,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Amount still missing, zero once the goal is reached
    pub fn shortfall(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.name.trim().is_empty() {
            return Err(GoalValidationError::EmptyName);
        }

        if !self.target_amount.is_finite() || self.target_amount <= 0.0 {
            return Err(GoalValidationError::NonPositiveTarget);
        }

        if !self.current_amount.is_finite() || self.current_amount < 0.0 {
            return Err(GoalValidationError::NegativeCurrent);
        }

        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2} of {:.2} by {})",
            self.name, self.current_amount, self.target_amount, self.target_date
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NonPositiveTarget,
    NegativeCurrent,
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
            Self::NonPositiveTarget => write!(f, "Goal target must be greater than zero"),
            Self::NegativeCurrent => write!(f, "Goal current amount cannot be negative"),
        }
    }
}

impl std::error::Error for GoalValidationError {}
