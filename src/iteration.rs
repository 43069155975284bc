//! Capacity-bounded containers of stories, tagged with an iteration number.

use std::sync::Arc;

use serde::Serialize;

use crate::story::{Column, Story};

/// A fixed-length time box holding an ordered set of stories.
///
/// Completed iterations carry no capacity (`maximum_points: None`) and are
/// closed to new assignment; in-progress and backlog iterations are capped
/// at the project velocity.
#[derive(Debug, Clone, Serialize)]
pub struct Iteration {
    pub number: u32,
    pub column: Column,
    pub stories: Vec<Arc<Story>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_points: Option<u32>,
    /// Name of the owning project; a non-owning association assigned
    /// during rebuild, never a reverse ownership edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl Iteration {
    /// An empty, uncapped iteration.
    pub fn new(number: u32, column: Column) -> Self {
        Self {
            number,
            column,
            stories: Vec::new(),
            maximum_points: None,
            project: None,
        }
    }

    /// An empty iteration capped at `maximum_points`.
    pub fn with_capacity(number: u32, column: Column, maximum_points: u32) -> Self {
        Self {
            maximum_points: Some(maximum_points),
            ..Self::new(number, column)
        }
    }

    /// Sum of the assigned stories' point estimates.
    pub fn points(&self) -> u32 {
        self.stories.iter().map(|story| story.points()).sum()
    }

    /// Whether adding `story` would stay within capacity. Uncapped
    /// iterations are closed history and never take new stories.
    pub fn can_take_story(&self, story: &Story) -> bool {
        match self.maximum_points {
            Some(maximum) => self.points() + story.points() <= maximum,
            None => false,
        }
    }

    /// Points assigned beyond capacity, zero when within it.
    pub fn overflows_by(&self) -> u32 {
        match self.maximum_points {
            Some(maximum) => self.points().saturating_sub(maximum),
            None => 0,
        }
    }
}

/// Empty placeholder iterations for every number strictly between
/// `previous` (or 0 when there is none) and `next`, tagged with
/// `fill_column`. Returns nothing when the gap is zero or negative.
pub fn create_missing_iterations(
    fill_column: Column,
    previous: Option<&Iteration>,
    next: &Iteration,
) -> Vec<Iteration> {
    let after = previous.map(|iteration| iteration.number).unwrap_or(0);
    (after.saturating_add(1)..next.number)
        .map(|number| Iteration::new(number, fill_column))
        .collect()
}
