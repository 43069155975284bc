//! Project host aggregate.
//!
//! Owns the configuration, the backlog store, and the current iteration
//! plan. The plan is held behind an `Arc` and replaced wholesale on every
//! rebuild, so a reader holding the previous snapshot keeps a consistent
//! view while a new one is produced.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::backlog::Backlog;
use crate::calendar;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::scheduler::{self, IterationPlan};
use crate::sync::ChangesetRange;

#[derive(Debug, Clone)]
pub struct Project {
    config: ProjectConfig,
    backlog: Backlog,
    plan: Option<Arc<IterationPlan>>,
    last_changeset_id: Option<u64>,
}

impl Project {
    pub fn new(config: ProjectConfig, backlog: Backlog) -> Self {
        Self {
            config,
            backlog,
            plan: None,
            last_changeset_id: None,
        }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    /// Mutable backlog access for the changeset synchronizer. Callers must
    /// rebuild afterwards; the existing plan keeps showing the old data
    /// until they do.
    pub fn backlog_mut(&mut self) -> &mut Backlog {
        &mut self.backlog
    }

    /// The current plan snapshot, if one has been built.
    pub fn plan(&self) -> Option<Arc<IterationPlan>> {
        self.plan.clone()
    }

    /// Rebuild the iteration plan from the current backlog and swap it in.
    pub fn rebuild(&mut self) -> Result<Arc<IterationPlan>> {
        self.rebuild_at(calendar::today())
    }

    /// Rebuild with an explicit "today", for deterministic scheduling.
    pub fn rebuild_at(&mut self, today: NaiveDate) -> Result<Arc<IterationPlan>> {
        let plan = Arc::new(scheduler::rebuild(&self.config, &self.backlog, today)?);
        self.plan = Some(Arc::clone(&plan));
        Ok(plan)
    }

    /// Record a new server-side changeset id and return the range of
    /// changesets to fetch. With no prior id the range starts from 0.
    pub fn note_changeset_id(&mut self, to: u64) -> ChangesetRange {
        let from = self.last_changeset_id.unwrap_or(0);
        self.last_changeset_id = Some(to);
        ChangesetRange { from, to }
    }

    /// Velocity from the current plan, or the configured default before
    /// the first rebuild.
    pub fn velocity(&self) -> u32 {
        self.plan
            .as_ref()
            .map(|plan| plan.velocity)
            .unwrap_or(self.config.default_velocity)
    }

    pub fn current_iteration_number(&self) -> Result<u32> {
        calendar::current_iteration_number(&self.config)
    }

    pub fn date_for_iteration_number(&self, number: u32) -> Result<NaiveDate> {
        calendar::date_for_iteration_number(&self.config, calendar::today(), number)
    }
}
