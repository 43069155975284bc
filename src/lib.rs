//! iterplan - Iteration Planning Library
//!
//! This library provides the core functionality for the iterplan CLI,
//! scheduling backlog work into time-boxed iterations.
//!
//! # Core Concepts
//!
//! - **Stories**: units of backlog work with a point estimate and status column
//! - **Iterations**: fixed-length capacity buckets aligned to a weekday
//! - **Velocity**: average throughput of recently completed iterations
//! - **Rebuild**: a pure full re-derivation of the iteration plan from a
//!   backlog snapshot, swapped in atomically by the host
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `.iterplan.toml`
//! - `error`: error types and result aliases
//! - `story`: story records and status columns
//! - `backlog`: story store and the read-only query contract
//! - `calendar`: date to iteration-number arithmetic
//! - `velocity`: throughput estimation from completed iterations
//! - `iteration`: capacity-bounded story containers
//! - `scheduler`: the full-plan rebuild (grouping, gap-filling, bin-packing)
//! - `project`: host aggregate owning config, backlog, and the current plan
//! - `sync`: changeset synchronizer boundary (async story fetches)
//! - `output`: human and JSON CLI output

pub mod backlog;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod error;
pub mod iteration;
pub mod output;
pub mod project;
pub mod scheduler;
pub mod story;
pub mod sync;
pub mod velocity;

pub use error::{Error, Result};
