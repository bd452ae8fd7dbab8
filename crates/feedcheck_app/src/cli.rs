use std::path::PathBuf;

use clap::Parser;

/// Validate feed ordering and a rate-limited login against a replay fixture.
#[derive(Debug, Clone, Parser)]
#[command(name = "feedcheck", version)]
pub struct Cli {
    /// RON configuration file; defaults apply when absent.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON fixture with recorded feed pages and login observations.
    #[arg(long)]
    pub fixture: PathBuf,

    #[arg(long)]
    pub target_count: Option<usize>,

    #[arg(long)]
    pub tolerance_ms: Option<u64>,

    #[arg(long)]
    pub max_attempts: Option<u32>,

    #[arg(long)]
    pub navigation_timeout_ms: Option<u64>,

    #[arg(long, env = "FEEDCHECK_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "FEEDCHECK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Skip the feed ordering flow.
    #[arg(long)]
    pub skip_feed: bool,

    /// Skip the login flow.
    #[arg(long)]
    pub skip_login: bool,
}
