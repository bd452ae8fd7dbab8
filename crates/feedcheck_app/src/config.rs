//! Run configuration, read from an optional RON file and CLI overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use feedcheck_core::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TOLERANCE_MS};
use feedcheck_engine::{CollectSettings, FeedSortSettings, RetrySettings};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogDestination {
    /// Write to the configured log file.
    File,
    /// Write to terminal (stdout).
    #[default]
    Terminal,
    /// Write to both file and terminal.
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub target_count: usize,
    pub tolerance_ms: u64,
    pub max_attempts: u32,
    pub navigation_timeout_ms: u64,
    pub settle_timeout_ms: Option<u64>,
    pub max_pages: Option<usize>,
    /// Items shown from each end of the collected feed.
    pub preview_count: usize,
    pub log_level: String,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            target_count: 100,
            tolerance_ms: DEFAULT_TOLERANCE_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            navigation_timeout_ms: 5000,
            settle_timeout_ms: None,
            max_pages: None,
            preview_count: 5,
            log_level: "info".to_string(),
            log_destination: LogDestination::Terminal,
            log_file: PathBuf::from("./feedcheck.log"),
        }
    }
}

impl CheckConfig {
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(target_count) = cli.target_count {
            self.target_count = target_count;
        }
        if let Some(tolerance_ms) = cli.tolerance_ms {
            self.tolerance_ms = tolerance_ms;
        }
        if let Some(max_attempts) = cli.max_attempts {
            self.max_attempts = max_attempts;
        }
        if let Some(navigation_timeout_ms) = cli.navigation_timeout_ms {
            self.navigation_timeout_ms = navigation_timeout_ms;
        }
        self
    }

    pub fn feed_sort_settings(&self) -> FeedSortSettings {
        FeedSortSettings {
            collect: CollectSettings {
                target_count: self.target_count,
                settle_timeout: self.settle_timeout(),
                max_pages: self.max_pages,
            },
            tolerance_ms: self.tolerance_ms,
            ..FeedSortSettings::default()
        }
    }

    pub fn retry_settings(&self) -> RetrySettings {
        RetrySettings {
            max_attempts: self.max_attempts,
            navigation_timeout: Duration::from_millis(self.navigation_timeout_ms),
            settle_timeout: self.settle_timeout(),
        }
    }

    fn settle_timeout(&self) -> Option<Duration> {
        self.settle_timeout_ms.map(Duration::from_millis)
    }
}

/// Reads the configuration at `path`. A missing file, or no path at all,
/// yields the defaults; an unreadable or malformed file is an error.
pub fn load(path: Option<&Path>) -> anyhow::Result<CheckConfig> {
    let Some(path) = path else {
        return Ok(CheckConfig::default());
    };
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(CheckConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading config {}", path.display()));
        }
    };
    ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}
