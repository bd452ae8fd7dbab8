//! Collaborators that replay recorded feed pages and login observations
//! from a JSON fixture.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use feedcheck_core::Item;
use feedcheck_logging::{check_debug, check_info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ActorError, Credentials, FeedSource, SessionActor};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("could not read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid fixture json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayFixture {
    #[serde(default)]
    pub feed: FeedScript,
    #[serde(default)]
    pub login: LoginScript,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedScript {
    pub pages: Vec<Vec<Item>>,
    /// Delay applied when moving to the next page.
    #[serde(default)]
    pub settle_delay_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginScript {
    /// One entry per wait/check cycle: after the submit, then after each
    /// reload. The last entry repeats once the list is used up.
    pub observations: Vec<Observation>,
    /// Delay applied by every navigation and reload that settles.
    #[serde(default)]
    pub settle_delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Whether a navigation completes; if not the wait runs into its timeout.
    #[serde(default = "navigates_by_default")]
    pub navigates: bool,
    #[serde(default)]
    pub rate_limited: bool,
}

fn navigates_by_default() -> bool {
    true
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            navigates: true,
            rate_limited: false,
        }
    }
}

impl ReplayFixture {
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let json = fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[derive(Debug, Clone)]
pub struct ReplayFeed {
    script: FeedScript,
    page: usize,
    closed: bool,
}

impl ReplayFeed {
    pub fn new(script: FeedScript) -> Self {
        Self {
            script,
            page: 0,
            closed: false,
        }
    }

    /// Zero-based index of the page currently shown.
    pub fn page_index(&self) -> usize {
        self.page
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<(), ActorError> {
        if self.closed {
            Err(ActorError::failed("feed session already closed"))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl FeedSource for ReplayFeed {
    async fn current_page_items(&mut self) -> Result<Vec<Item>, ActorError> {
        self.ensure_open()?;
        Ok(self.script.pages.get(self.page).cloned().unwrap_or_default())
    }

    async fn has_next_page(&mut self) -> Result<bool, ActorError> {
        self.ensure_open()?;
        Ok(self.page + 1 < self.script.pages.len())
    }

    async fn advance_to_next_page(&mut self) -> Result<(), ActorError> {
        self.ensure_open()?;
        if self.page + 1 >= self.script.pages.len() {
            return Err(ActorError::failed("no next page to advance to"));
        }
        tokio::time::sleep(Duration::from_millis(self.script.settle_delay_ms)).await;
        self.page += 1;
        check_debug!("Replay feed now on page {}", self.page + 1);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ActorError> {
        self.ensure_open()?;
        self.closed = true;
        check_info!("Feed session closed");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ReplaySession {
    script: LoginScript,
    cycle: usize,
    submitted_as: Option<String>,
    reloads: u32,
    closed: bool,
}

impl ReplaySession {
    pub fn new(script: LoginScript) -> Self {
        Self {
            script,
            cycle: 0,
            submitted_as: None,
            reloads: 0,
            closed: false,
        }
    }

    pub fn submitted_as(&self) -> Option<&str> {
        self.submitted_as.as_deref()
    }

    pub fn reloads(&self) -> u32 {
        self.reloads
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn observation(&self) -> Observation {
        let observations = &self.script.observations;
        match observations.len() {
            0 => Observation::default(),
            len => observations[self.cycle.min(len - 1)],
        }
    }

    fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.script.settle_delay_ms)
    }

    fn ensure_open(&self) -> Result<(), ActorError> {
        if self.closed {
            Err(ActorError::failed("login session already closed"))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl SessionActor for ReplaySession {
    async fn submit_login_form(&mut self, credentials: &Credentials) -> Result<(), ActorError> {
        self.ensure_open()?;
        self.cycle = 0;
        self.submitted_as = Some(credentials.username.clone());
        Ok(())
    }

    async fn is_rate_limit_marker_visible(&mut self) -> Result<bool, ActorError> {
        self.ensure_open()?;
        Ok(self.observation().rate_limited)
    }

    async fn reload_and_settle(&mut self) -> Result<(), ActorError> {
        self.ensure_open()?;
        tokio::time::sleep(self.settle_delay()).await;
        self.reloads += 1;
        self.cycle += 1;
        Ok(())
    }

    async fn wait_for_navigation(&mut self) -> Result<(), ActorError> {
        self.ensure_open()?;
        if self.observation().navigates {
            tokio::time::sleep(self.settle_delay()).await;
            Ok(())
        } else {
            std::future::pending().await
        }
    }

    async fn close(&mut self) -> Result<(), ActorError> {
        self.ensure_open()?;
        self.closed = true;
        check_info!("Login session closed");
        Ok(())
    }
}
