//! Reports module for Finsight
//!
//! Bundles the analytics results for one input into a renderable report.

pub mod dashboard;

pub use dashboard::{BudgetStatus, DashboardReport, GoalProgress, ReportSection, TrendSummary};
