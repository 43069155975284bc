//! Story records consumed by the planning engine.
//!
//! Stories are owned by the backlog collaborator; the engine only reads
//! their point estimate, status column, and recorded iteration number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status column a story lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Done,
    InProgress,
    Backlog,
}

impl Column {
    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Done => "done",
            Column::InProgress => "in_progress",
            Column::Backlog => "backlog",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of backlog work with a point estimate and status column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Point estimate; absent means unestimated and counts as zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<u32>,
    pub column: Column,
    /// Iteration the story was completed in; only meaningful for done stories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Story {
    pub fn new(id: u64, column: Column) -> Self {
        Self {
            id,
            title: None,
            estimate: None,
            column,
            iteration_number: None,
            updated_at: None,
        }
    }

    /// Points this story contributes to an iteration
    pub fn points(&self) -> u32 {
        self.estimate.unwrap_or(0)
    }
}
