//! Command-line interface for iterplan
//!
//! The CLI is a thin host around the planning engine: it loads the
//! project configuration and a story list, runs a rebuild, and prints
//! the resulting iteration plan.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::backlog::{Backlog, BacklogView};
use crate::calendar;
use crate::config::ProjectConfig;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::scheduler;

/// iterplan - iteration planning engine
///
/// Schedules a prioritized backlog into capacity-bounded iterations and
/// estimates team velocity from completed work.
#[derive(Parser, Debug)]
#[command(name = "iterplan")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project directory containing .iterplan.toml (defaults to current directory)
    #[arg(long, global = true, env = "ITERPLAN_DIR")]
    pub dir: Option<PathBuf>,

    /// Story list JSON file (defaults to <dir>/stories.json)
    #[arg(long, global = true)]
    pub stories: Option<PathBuf>,

    /// Schedule as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild and print the full iteration plan
    Plan,

    /// Print the estimated velocity
    Velocity,

    /// Print the current iteration number
    Current,

    /// Print the start date of an iteration
    Date {
        /// Iteration number (1-based)
        number: u32,
    },

    /// Print a single story by id
    Story {
        /// Story id
        id: u64,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let dir = self.dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let config = ProjectConfig::load_from_dir(&dir);
        config.validate()?;

        let today = match self.today.as_deref() {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| Error::InvalidArgument(format!("invalid --today date: {raw:?}")))?,
            None => calendar::today(),
        };

        let options = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match &self.command {
            Commands::Plan => run_plan(&config, &self.load_backlog(&dir)?, today, options),
            Commands::Velocity => run_velocity(&config, &self.load_backlog(&dir)?, today, options),
            Commands::Current => run_current(&config, today, options),
            Commands::Date { number } => run_date(&config, today, *number, options),
            Commands::Story { id } => run_story(&self.load_backlog(&dir)?, *id, options),
        }
    }

    fn load_backlog(&self, dir: &std::path::Path) -> Result<Backlog> {
        let path = self
            .stories
            .clone()
            .unwrap_or_else(|| dir.join("stories.json"));
        if !path.exists() {
            return Err(Error::StoriesFileNotFound(path));
        }
        Backlog::load(&path)
    }
}

fn run_plan(
    config: &ProjectConfig,
    backlog: &Backlog,
    today: NaiveDate,
    options: OutputOptions,
) -> Result<()> {
    let plan = scheduler::rebuild(config, backlog, today)?;

    let mut human = HumanOutput::new(format!("Iteration plan for {}", plan.project));
    human.push_summary("velocity", plan.velocity.to_string());
    human.push_summary(
        "current iteration",
        plan.current_iteration_number.to_string(),
    );
    human.push_summary("iterations", plan.iterations.len().to_string());
    for iteration in &plan.iterations {
        let start = calendar::date_for_iteration_number(config, today, iteration.number)?;
        let mut line = format!(
            "iteration {:>3} [{}] starts {}: {} stories, {} points",
            iteration.number,
            iteration.column,
            start,
            iteration.stories.len(),
            iteration.points(),
        );
        if iteration.overflows_by() > 0 {
            line.push_str(&format!(" (overflows by {})", iteration.overflows_by()));
        }
        human.push_detail(line);
    }

    emit_success(options, "plan", &plan, Some(&human))
}

fn run_velocity(
    config: &ProjectConfig,
    backlog: &Backlog,
    today: NaiveDate,
    options: OutputOptions,
) -> Result<()> {
    let plan = scheduler::rebuild(config, backlog, today)?;

    #[derive(Serialize)]
    struct VelocityData {
        velocity: u32,
        done_iterations: usize,
    }

    let data = VelocityData {
        velocity: plan.velocity,
        done_iterations: plan.done_iterations().len(),
    };

    let mut human = HumanOutput::new(format!("Velocity: {}", data.velocity));
    human.push_summary("done iterations", data.done_iterations.to_string());
    if data.done_iterations == 0 {
        human.push_detail("no completed iterations yet, using default_velocity".to_string());
    }

    emit_success(options, "velocity", &data, Some(&human))
}

fn run_current(config: &ProjectConfig, today: NaiveDate, options: OutputOptions) -> Result<()> {
    let number = calendar::iteration_number_for_date(config, today, today)?;
    let start = calendar::date_for_iteration_number(config, today, number)?;

    #[derive(Serialize)]
    struct CurrentData {
        current_iteration_number: u32,
        start_date: NaiveDate,
    }

    let data = CurrentData {
        current_iteration_number: number,
        start_date: start,
    };

    let mut human = HumanOutput::new(format!("Current iteration: {number}"));
    human.push_summary("starts", start.to_string());

    emit_success(options, "current", &data, Some(&human))
}

fn run_date(
    config: &ProjectConfig,
    today: NaiveDate,
    number: u32,
    options: OutputOptions,
) -> Result<()> {
    if number == 0 {
        return Err(Error::InvalidArgument(
            "iteration numbers start at 1".to_string(),
        ));
    }
    let start = calendar::date_for_iteration_number(config, today, number)?;

    #[derive(Serialize)]
    struct DateData {
        number: u32,
        start_date: NaiveDate,
    }

    let data = DateData {
        number,
        start_date: start,
    };

    let human = HumanOutput::new(format!("Iteration {number} starts {start}"));
    emit_success(options, "date", &data, Some(&human))
}

fn run_story(backlog: &Backlog, id: u64, options: OutputOptions) -> Result<()> {
    let story = backlog.story_by_id(id).ok_or(Error::StoryNotFound(id))?;

    let mut human = HumanOutput::new(format!(
        "Story {}: {}",
        story.id,
        story.title.as_deref().unwrap_or("(untitled)")
    ));
    human.push_summary("column", story.column.to_string());
    human.push_summary("points", story.points().to_string());
    if let Some(number) = story.iteration_number {
        human.push_summary("iteration", number.to_string());
    }

    emit_success(options, "story", &*story, Some(&human))
}
