use std::fmt;
use std::future::Future;
use std::time::Duration;

use feedcheck_core::{Item, MalformedLabel, RetryPhase};
use thiserror::Error;

/// Failure reported by, or while waiting on, an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActorError {
    #[error("{0}")]
    Failed(String),
    #[error("{what} did not settle within {after:?}")]
    SettleTimeout { what: &'static str, after: Duration },
}

impl ActorError {
    pub fn failed(message: impl Into<String>) -> Self {
        ActorError::Failed(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectError {
    #[error("feed source failed on page {page}: {source}")]
    Source {
        page: usize,
        #[source]
        source: ActorError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    /// Terminal: the marker was still visible once every reload was spent.
    #[error("max retries reached, rate limit still present after {attempts} reloads")]
    RateLimitExceeded { attempts: u32 },
    #[error("session error: {0}")]
    Session(#[from] ActorError),
    #[error("retry loop stopped in non-terminal phase {0:?}")]
    Stalled(RetryPhase),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("collection failed: {0}")]
    Collect(#[from] CollectError),
    #[error("validation failed: {0}")]
    Label(#[from] MalformedLabel),
    #[error("login failed: {0}")]
    Retry(#[from] RetryError),
    #[error("closing the session failed: {0}")]
    Close(#[source] ActorError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    /// No further page existed; the collection may be short.
    PaginationExhausted,
    /// The configured page cap was hit before the target.
    PageLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TargetReached => write!(f, "target reached"),
            StopReason::PaginationExhausted => write!(f, "pagination exhausted"),
            StopReason::PageLimit => write!(f, "page limit reached"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Items in presentation order, at most the requested target.
    pub items: Vec<Item>,
    pub pages_visited: usize,
    pub stop_reason: StopReason,
}

/// Awaits a settle future, bounded by `limit` when one is configured.
pub(crate) async fn settle<F>(
    limit: Option<Duration>,
    what: &'static str,
    wait: F,
) -> Result<(), ActorError>
where
    F: Future<Output = Result<(), ActorError>>,
{
    match limit {
        None => wait.await,
        Some(after) => tokio::time::timeout(after, wait)
            .await
            .map_err(|_| ActorError::SettleTimeout { what, after })?,
    }
}
