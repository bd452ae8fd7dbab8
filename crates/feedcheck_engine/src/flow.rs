//! Top-level flows. Each owns its collaborator for the whole run and closes
//! it exactly once, whether the flow succeeds or fails.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use feedcheck_core::{validate, Instant, Item, SortVerdict, DEFAULT_TOLERANCE_MS};
use feedcheck_logging::{check_info, check_warn, FlowGuard};

use crate::{
    collect, login_with_retry, ActorError, CollectSettings, Collection, Credentials, FeedSource,
    FlowError, LoginOutcome, RetrySettings, SessionActor,
};

pub const FEED_SORT_FLOW: &str = "feed-sort";
pub const LOGIN_FLOW: &str = "login";

/// Source of the reference instant for validation.
pub type Clock = Arc<dyn Fn() -> Instant + Send + Sync>;

#[derive(Clone)]
pub struct FeedSortSettings {
    pub collect: CollectSettings,
    pub tolerance_ms: u64,
    /// Read once, after collection, to anchor every label of the run.
    pub clock: Clock,
}

impl Default for FeedSortSettings {
    fn default() -> Self {
        Self {
            collect: CollectSettings::default(),
            tolerance_ms: DEFAULT_TOLERANCE_MS,
            clock: Arc::new(Utc::now),
        }
    }
}

impl fmt::Debug for FeedSortSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedSortSettings")
            .field("collect", &self.collect)
            .field("tolerance_ms", &self.tolerance_ms)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSortReport {
    pub collection: Collection,
    pub reference: Instant,
    pub verdict: SortVerdict,
}

impl FeedSortReport {
    pub fn is_sorted(&self) -> bool {
        self.verdict.is_sorted()
    }

    /// First `count` collected items.
    pub fn head(&self, count: usize) -> &[Item] {
        let items = &self.collection.items;
        &items[..count.min(items.len())]
    }

    /// Last `count` collected items.
    pub fn tail(&self, count: usize) -> &[Item] {
        let items = &self.collection.items;
        &items[items.len().saturating_sub(count)..]
    }
}

/// Collects the feed and checks it runs newest to oldest.
///
/// An out-of-order feed is reported through [`FeedSortReport::verdict`];
/// only collection failures and malformed labels are errors.
pub async fn run_feed_sort_flow<S>(
    source: &mut S,
    settings: &FeedSortSettings,
) -> Result<FeedSortReport, FlowError>
where
    S: FeedSource + ?Sized,
{
    let _flow = FlowGuard::enter(FEED_SORT_FLOW);
    let result = feed_sort(source, settings).await;
    finish(result, source.close().await)
}

async fn feed_sort<S>(source: &mut S, settings: &FeedSortSettings) -> Result<FeedSortReport, FlowError>
where
    S: FeedSource + ?Sized,
{
    let collection = collect(source, &settings.collect).await?;
    if collection.items.len() < settings.collect.target_count {
        check_warn!(
            "Collected {} of {} requested items ({})",
            collection.items.len(),
            settings.collect.target_count,
            collection.stop_reason
        );
    }

    let reference = (settings.clock)();
    let verdict = validate(&collection.items, reference, settings.tolerance_ms)?;
    match &verdict {
        SortVerdict::Sorted { .. } => {
            check_info!("All items are correctly sorted from newest to oldest")
        }
        SortVerdict::Unsorted(violation) => {
            check_warn!("Items are not correctly sorted: {}", violation)
        }
    }

    Ok(FeedSortReport {
        collection,
        reference,
        verdict,
    })
}

/// Logs in, riding out transient rate limiting.
pub async fn run_login_flow<A>(
    actor: &mut A,
    credentials: &Credentials,
    settings: &RetrySettings,
) -> Result<LoginOutcome, FlowError>
where
    A: SessionActor + ?Sized,
{
    let _flow = FlowGuard::enter(LOGIN_FLOW);
    let result = login_with_retry(actor, credentials, settings)
        .await
        .map_err(FlowError::from);
    if let Ok(outcome) = &result {
        check_info!("Login settled after {} reloads", outcome.reloads);
    }
    finish(result, actor.close().await)
}

fn finish<T>(result: Result<T, FlowError>, closed: Result<(), ActorError>) -> Result<T, FlowError> {
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(err)) => Err(FlowError::Close(err)),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            check_warn!("Closing the session also failed: {}", close_err);
            Err(err)
        }
    }
}
