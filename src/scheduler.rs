//! Full iteration plan rebuild.
//!
//! `rebuild` is a pure function of the project configuration, a read-only
//! backlog snapshot, and today's date. It produces a fresh ordered
//! iteration list every time; the host swaps the previous plan for the new
//! one wholesale, so readers never observe a partially built list.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::backlog::BacklogView;
use crate::calendar;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::iteration::{create_missing_iterations, Iteration};
use crate::story::{Column, Story};
use crate::velocity;

/// An immutable snapshot of the full iteration schedule.
#[derive(Debug, Clone, Serialize)]
pub struct IterationPlan {
    /// Owning project's name (non-owning back-reference)
    pub project: String,
    pub velocity: u32,
    pub current_iteration_number: u32,
    pub iterations: Vec<Iteration>,
}

impl IterationPlan {
    /// Completed iterations, in ascending number order. Includes the empty
    /// done-column placeholders synthesized for gaps in the history.
    pub fn done_iterations(&self) -> Vec<&Iteration> {
        self.iterations
            .iter()
            .filter(|iteration| iteration.column == Column::Done)
            .collect()
    }

    pub fn iteration(&self, number: u32) -> Option<&Iteration> {
        self.iterations
            .iter()
            .find(|iteration| iteration.number == number)
    }
}

/// Rebuild the complete iteration list from the current backlog snapshot.
///
/// `today` decides the in-progress iteration's number; tests inject fixed
/// dates, the CLI passes [`calendar::today`].
pub fn rebuild(
    config: &ProjectConfig,
    backlog: &dyn BacklogView,
    today: NaiveDate,
) -> Result<IterationPlan> {
    let mut iterations: Vec<Iteration> = Vec::new();

    // Closed iterations: done stories grouped by their recorded iteration
    // number, ascending. Gaps in the history become empty done iterations.
    for (number, stories) in group_done_stories(backlog) {
        let mut iteration = Iteration::new(number, Column::Done);
        iteration.stories = stories;
        append_iteration(&mut iterations, iteration, Column::Done);
    }

    // Everything appended so far carries the done column, gap fillers
    // included, which is exactly the history velocity averages over.
    let velocity = velocity::estimate(&iterations, config.default_velocity);

    let current_iteration_number = calendar::iteration_number_for_date(config, today, today)?;
    let mut current =
        Iteration::with_capacity(current_iteration_number, Column::InProgress, velocity);
    current.stories = backlog.stories_by_column(Column::InProgress);
    // Gaps between the last closed iteration and the current one are
    // historical, so they are seeded as done.
    append_iteration(&mut iterations, current, Column::Done);
    let current_index = iterations.len() - 1;

    let backlog_iteration =
        Iteration::with_capacity(current_iteration_number + 1, Column::Backlog, velocity);
    append_iteration(&mut iterations, backlog_iteration, Column::Backlog);
    let mut backlog_index = iterations.len() - 1;

    for story in backlog.stories_by_column(Column::Backlog) {
        // The in-progress iteration absorbs leading backlog stories until
        // its points reach the project velocity.
        if iterations[current_index].can_take_story(&story) {
            iterations[current_index].stories.push(story);
            continue;
        }

        if !iterations[backlog_index].can_take_story(&story) {
            // An iteration may overflow when a single story alone exceeds
            // the velocity. The next iteration with room then starts
            // further out: a 5-point story against a velocity of 1 uses up
            // four extra iterations' worth of capacity.
            let skipped = iterations[backlog_index].overflows_by().div_ceil(velocity);
            let next_number = iterations[backlog_index].number + 1 + skipped;

            let next = Iteration::with_capacity(next_number, Column::Backlog, velocity);
            append_iteration(&mut iterations, next, Column::Backlog);
            backlog_index = iterations.len() - 1;
        }

        iterations[backlog_index].stories.push(story);
    }

    for iteration in &mut iterations {
        iteration.project = Some(config.name.clone());
    }

    Ok(IterationPlan {
        project: config.name.clone(),
        velocity,
        current_iteration_number,
        iterations,
    })
}

/// Done stories keyed by recorded iteration number, ascending. Stories
/// lacking a recorded number are malformed input from the backlog
/// collaborator and are excluded.
fn group_done_stories(backlog: &dyn BacklogView) -> BTreeMap<u32, Vec<Arc<Story>>> {
    let mut groups: BTreeMap<u32, Vec<Arc<Story>>> = BTreeMap::new();
    for story in backlog.stories_by_column(Column::Done) {
        match story.iteration_number {
            Some(number) => groups.entry(number).or_default().push(story),
            None => {
                warn!(
                    story_id = story.id,
                    "done story has no recorded iteration number, excluding from history"
                );
            }
        }
    }
    groups
}

/// Append an iteration, first synthesizing empty placeholders for any gap
/// between it and the last iteration in the list.
fn append_iteration(iterations: &mut Vec<Iteration>, iteration: Iteration, fill_column: Column) {
    let missing = create_missing_iterations(fill_column, iterations.last(), &iteration);
    iterations.extend(missing);
    iterations.push(iteration);
}
