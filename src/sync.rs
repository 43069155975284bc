//! Changeset synchronizer boundary.
//!
//! The server signals "changesets exist in range (from, to)"; each
//! changeset names one affected story. This module dedups the affected
//! ids and drives the per-story refresh fetches: known stories are
//! reloaded in place, unknown ones are registered first. Fetches are
//! independent network requests bounded by a timeout, issued
//! concurrently; one failing, hanging, or timing out never gates the
//! rest, and scheduling state is untouched until the host decides to
//! rebuild.

use std::collections::HashSet;
use std::time::Duration;

use futures::future;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::backlog::{Backlog, BacklogView};
use crate::story::Story;

/// Upper bound on a single story fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure of a single story fetch at the collaborator boundary.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("fetch timed out for story {0}")]
    Timeout(u64),

    #[error("transport failure for story {story_id}: {message}")]
    Transport { story_id: u64, message: String },

    #[error("malformed response for story {story_id}: {message}")]
    MalformedResponse { story_id: u64, message: String },
}

/// Server-side changeset range to fetch. `from` defaults to 0 when no
/// prior changeset id is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesetRange {
    pub from: u64,
    pub to: u64,
}

/// One server-side notification that a story was created or modified.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Changeset {
    pub id: u64,
    pub story_id: u64,
}

/// Fetches one story's current data from the server.
///
/// The returned futures are joined on a single task, so they do not
/// need to be `Send`.
#[allow(async_fn_in_trait)]
pub trait StoryFetcher {
    async fn fetch(&self, story_id: u64) -> Result<Story, SyncError>;
}

/// Outcome of applying a changeset batch to the backlog.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Stories whose data was reloaded
    pub refreshed: usize,
    /// Stories that were unknown locally and registered before fetching
    pub added: usize,
    /// Per-story fetch failures; the affected stories keep their stale data
    pub failures: Vec<(u64, SyncError)>,
}

/// Apply a changeset batch: dedup affected story ids, register unknown
/// stories, then refresh each one from the server. All fetches run
/// concurrently, so a hung story costs one timeout for the whole batch,
/// not one per story.
pub async fn apply_changesets<F: StoryFetcher>(
    backlog: &mut Backlog,
    changesets: &[Changeset],
    fetcher: &F,
    fetch_timeout: Duration,
) -> SyncReport {
    let mut seen = HashSet::new();
    let mut report = SyncReport::default();
    let mut pending = Vec::new();

    for changeset in changesets {
        let story_id = changeset.story_id;
        if !seen.insert(story_id) {
            continue;
        }

        if backlog.story_by_id(story_id).is_none() {
            // New story on the server that we don't have locally yet
            backlog.add_story(story_id);
            report.added += 1;
        }

        pending.push(async move {
            let outcome = tokio::time::timeout(fetch_timeout, fetcher.fetch(story_id)).await;
            (story_id, outcome)
        });
    }

    for (story_id, outcome) in future::join_all(pending).await {
        match outcome {
            Ok(Ok(story)) => {
                debug!(story_id, "refreshed story from changeset");
                backlog.refresh_story(story);
                report.refreshed += 1;
            }
            Ok(Err(err)) => {
                warn!(story_id, error = %err, "story fetch failed");
                report.failures.push((story_id, err));
            }
            Err(_) => {
                warn!(story_id, "story fetch timed out");
                report.failures.push((story_id, SyncError::Timeout(story_id)));
            }
        }
    }

    report
}
