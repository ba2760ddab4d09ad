//! Scheduled commitment model
//!
//! Only the time window and status matter here; they feed the urgency
//! outlook reported next to the financial health score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CommitmentId;

/// Lifecycle state of a commitment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    Postponed,
}

impl fmt::Display for CommitmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Postponed => write!(f, "postponed"),
        }
    }
}

/// A scheduled commitment (appointment, bill due, meeting)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commitment {
    #[serde(default)]
    pub id: CommitmentId,
    #[serde(default)]
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub status: CommitmentStatus,
}

impl Commitment {
    pub fn new(
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        status: CommitmentStatus,
    ) -> Self {
        Self {
            id: CommitmentId::new(),
            title: title.into(),
            start_time,
            end_time,
            status,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == CommitmentStatus::Scheduled
    }

    pub fn validate(&self) -> Result<(), CommitmentValidationError> {
        if self.end_time <= self.start_time {
            return Err(CommitmentValidationError::EndBeforeStart);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitmentValidationError {
    EndBeforeStart,
}

impl fmt::Display for CommitmentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndBeforeStart => write!(f, "Commitment must end after it starts"),
        }
    }
}

impl std::error::Error for CommitmentValidationError {}
