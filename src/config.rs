//! Configuration loading and management
//!
//! Handles parsing of `.iterplan.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Project configuration, immutable for the duration of a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name, used as a non-owning back-reference on produced plans
    #[serde(default = "default_name")]
    pub name: String,

    /// Notional beginning of iteration 1, as `"YYYY/MM/DD"`.
    /// Defaults to today when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Weekday every iteration boundary falls on (0 = Sunday .. 6 = Saturday)
    #[serde(default = "default_iteration_start_day")]
    pub iteration_start_day: u32,

    /// Iteration duration in weeks
    #[serde(default = "default_iteration_length")]
    pub iteration_length: u32,

    /// Capacity used when no completed iterations exist yet
    #[serde(default = "default_velocity")]
    pub default_velocity: u32,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            start_date: None,
            iteration_start_day: default_iteration_start_day(),
            iteration_length: default_iteration_length(),
            default_velocity: default_velocity(),
        }
    }
}

fn default_name() -> String {
    "project".to_string()
}

fn default_iteration_start_day() -> u32 {
    1
}

fn default_iteration_length() -> u32 {
    1
}

fn default_velocity() -> u32 {
    10
}

impl ProjectConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ProjectConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, falling back to defaults when
    /// `.iterplan.toml` is missing or unreadable.
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(".iterplan.toml");
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &PathBuf) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.iteration_start_day > 6 {
            return Err(Error::InvalidConfig(
                "iteration_start_day must be between 0 (Sunday) and 6 (Saturday)".to_string(),
            ));
        }
        if self.iteration_length == 0 {
            return Err(Error::InvalidConfig(
                "iteration_length must be at least 1 week".to_string(),
            ));
        }
        if self.default_velocity == 0 {
            return Err(Error::InvalidConfig(
                "default_velocity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
