//! Budget model
//!
//! A spending limit for a category over a period ending on `period_end`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetId;
use crate::analytics::numeric::safe_division;

/// A spending limit for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub id: BudgetId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub limit: f64,
    #[serde(default)]
    pub spent: f64,
    pub period_end: NaiveDate,
}

impl Budget {
    pub fn new(name: impl Into<String>, limit: f64, spent: f64, period_end: NaiveDate) -> Self {
        let name = name.into();
        Self {
            id: BudgetId::new(),
            category: name.clone(),
            name,
            limit,
            spent,
            period_end,
        }
    }

    /// Spent as a percentage of the limit; zero for a zero limit
    ///
    /// Not clamped: an overspent budget reports more than 100.
    pub fn percent_used(&self) -> f64 {
        if self.limit <= 0.0 {
            return 0.0;
        }
        safe_division(self.spent * 100.0, self.limit, 0.0)
    }

    /// Headroom left under the limit (negative when overspent)
    pub fn remaining(&self) -> f64 {
        self.limit - self.spent
    }

    pub fn is_over_limit(&self) -> bool {
        self.percent_used() >= 100.0
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.name.trim().is_empty() {
            return Err(BudgetValidationError::EmptyName);
        }
        if !self.limit.is_finite() || self.limit <= 0.0 {
            return Err(BudgetValidationError::NonPositiveLimit);
        }
        if !self.spent.is_finite() || self.spent < 0.0 {
            return Err(BudgetValidationError::NegativeSpent);
        }
        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}/{:.2})", self.name, self.spent, self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyName,
    NonPositiveLimit,
    NegativeSpent,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Budget name cannot be empty"),
            Self::NonPositiveLimit => write!(f, "Budget limit must be greater than zero"),
            Self::NegativeSpent => write!(f, "Budget spent amount cannot be negative"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
