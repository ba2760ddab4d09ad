//! Finsight - financial analytics core
//!
//! Turns aggregated period data (income and expense totals, daily series,
//! category breakdowns) plus budgets, goals and commitments into derived
//! signals: trend direction and strength, period-over-period deltas,
//! multi-horizon forecasts with confidence, goal and budget progress, and a
//! composite financial health score.
//!
//! # Architecture
//!
//! - `analytics`: Pure calculators; they never fail and never perform I/O
//! - `models`: Snapshots, goals, budgets, commitments and the input bundle
//! - `config`: Path resolution and persisted settings
//! - `storage`: Input loading and atomic report writes
//! - `reports`: The dashboard report combining every calculator
//! - `display`: Terminal formatting and tables
//! - `cli`: Command handlers for the `finsight` binary
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use finsight::analytics::{analyze_trend, TrendDirection};
//! use finsight::models::PeriodSnapshot;
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
//! let snapshot = PeriodSnapshot::new(start, end).with_totals(5000.0, 3500.0);
//! assert_eq!(snapshot.balance(), 1500.0);
//!
//! let trend = analyze_trend(&[10.0, 20.0, 30.0, 40.0, 50.0]);
//! assert_eq!(trend.direction, TrendDirection::Up);
//! ```

pub mod analytics;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod storage;

pub use error::{FinsightError, FinsightResult};
