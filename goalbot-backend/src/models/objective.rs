//! Data model for the persisted goals collection.
//!
//! Objectives are append-only records. Progress notes accumulate in a
//! separate updates list, so an objective is never rewritten after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an objective.
///
/// The bot only ever writes `Active`; the other variants exist so data
/// files produced by older deployments still deserialize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

/// A persisted team goal record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub id: u64,
    pub author: String,
    /// Original user-submitted wording.
    pub raw_text: String,
    /// SMART-reformatted wording. Equals `raw_text` when AI formatting
    /// failed or was skipped.
    pub formatted_text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ObjectiveStatus,
}

/// A progress note attached to an existing objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub objective_id: u64,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// The full persisted collection. Insertion order is preserved on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalsCollection {
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub updates: Vec<ProgressUpdate>,
}

impl GoalsCollection {
    /// Next objective id: one past the current maximum, starting at 1.
    pub fn next_id(&self) -> u64 {
        self.objectives.iter().map(|o| o.id).max().unwrap_or(0) + 1
    }

    /// Look up an objective by id.
    pub fn find(&self, id: u64) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == id)
    }
}
