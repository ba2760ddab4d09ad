//! Core data models for Finsight
//!
//! Value objects the analytics core consumes: period snapshots, goals,
//! budgets and commitments, plus the input bundle that groups them.

pub mod budget;
pub mod commitment;
pub mod goal;
pub mod ids;
pub mod input;
pub mod snapshot;

pub use budget::{Budget, BudgetValidationError};
pub use commitment::{Commitment, CommitmentStatus, CommitmentValidationError};
pub use goal::{Goal, GoalValidationError};
pub use ids::{BudgetId, CommitmentId, GoalId};
pub use input::AnalysisInput;
pub use snapshot::{CategoryAmount, DailyEntry, PeriodSnapshot, SnapshotData};
