//! Backlog store and the read-only query contract the scheduler consumes.
//!
//! The scheduler never reaches into story storage directly; `BacklogView`
//! is the only access path. The in-memory `Backlog` keeps stories in
//! priority order (insertion order) and exposes the mutators the changeset
//! synchronizer needs.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::story::{Column, Story};

/// Read-only backlog queries. Priority order is preserved by every method.
pub trait BacklogView {
    /// Stories in the given column, in backlog priority order.
    fn stories_by_column(&self, column: Column) -> Vec<Arc<Story>>;

    /// Look up a single story by id.
    fn story_by_id(&self, id: u64) -> Option<Arc<Story>>;
}

/// In-memory ordered story store.
#[derive(Debug, Clone, Default)]
pub struct Backlog {
    stories: Vec<Arc<Story>>,
}

impl Backlog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stories(stories: Vec<Story>) -> Self {
        Self {
            stories: stories.into_iter().map(Arc::new).collect(),
        }
    }

    /// Load a story list from a JSON file (an array of stories).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let stories: Vec<Story> = serde_json::from_str(&content)?;
        Ok(Self::from_stories(stories))
    }

    /// Save the story list as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let stories: Vec<&Story> = self.stories.iter().map(Arc::as_ref).collect();
        let content = serde_json::to_string_pretty(&stories)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Register a story id that exists on the server but is not known
    /// locally yet. The placeholder lands at the end of the priority order
    /// until a refresh fills in its data.
    pub fn add_story(&mut self, id: u64) {
        if self.story_by_id(id).is_some() {
            return;
        }
        self.stories.push(Arc::new(Story::new(id, Column::Backlog)));
    }

    /// Replace a story's data in place, preserving its priority position.
    /// Unknown stories are appended.
    pub fn refresh_story(&mut self, story: Story) {
        match self.stories.iter().position(|s| s.id == story.id) {
            Some(index) => self.stories[index] = Arc::new(story),
            None => self.stories.push(Arc::new(story)),
        }
    }
}

impl BacklogView for Backlog {
    fn stories_by_column(&self, column: Column) -> Vec<Arc<Story>> {
        self.stories
            .iter()
            .filter(|story| story.column == column)
            .cloned()
            .collect()
    }

    fn story_by_id(&self, id: u64) -> Option<Arc<Story>> {
        self.stories.iter().find(|story| story.id == id).cloned()
    }
}
