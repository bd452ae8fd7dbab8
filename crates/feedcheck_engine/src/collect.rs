use std::time::Duration;

use feedcheck_logging::{check_debug, check_info};

use crate::types::settle;
use crate::{CollectError, Collection, FeedSource, StopReason};

#[derive(Debug, Clone)]
pub struct CollectSettings {
    pub target_count: usize,
    /// Bound on waiting for the next page to settle; `None` waits until idle.
    pub settle_timeout: Option<Duration>,
    /// Optional cap on the number of pages visited.
    pub max_pages: Option<usize>,
}

impl Default for CollectSettings {
    fn default() -> Self {
        Self {
            target_count: 100,
            settle_timeout: None,
            max_pages: None,
        }
    }
}

/// Gathers items page by page until `target_count` items are held or the
/// source runs out of pages.
///
/// Over-fetched items from the last page are dropped from the end. A short
/// result is not an error; see [`Collection::stop_reason`].
pub async fn collect<S>(source: &mut S, settings: &CollectSettings) -> Result<Collection, CollectError>
where
    S: FeedSource + ?Sized,
{
    let target = settings.target_count;
    let mut items = Vec::new();
    if target == 0 {
        return Ok(Collection {
            items,
            pages_visited: 0,
            stop_reason: StopReason::TargetReached,
        });
    }

    check_info!("Aiming to collect {} items", target);
    let mut page = 1;
    let stop_reason = loop {
        let batch = source
            .current_page_items()
            .await
            .map_err(|err| CollectError::Source { page, source: err })?;
        check_info!(
            "Collected {} items from page {} ({} so far)",
            batch.len(),
            page,
            items.len() + batch.len()
        );
        items.extend(batch);

        if items.len() >= target {
            break StopReason::TargetReached;
        }
        if settings.max_pages.is_some_and(|max| page >= max) {
            break StopReason::PageLimit;
        }

        let has_next = source
            .has_next_page()
            .await
            .map_err(|err| CollectError::Source { page, source: err })?;
        if !has_next {
            check_info!("No further page after page {}, ending collection", page);
            break StopReason::PaginationExhausted;
        }

        check_debug!("Advancing to page {}", page + 1);
        settle(
            settings.settle_timeout,
            "next page",
            source.advance_to_next_page(),
        )
        .await
        .map_err(|err| CollectError::Source { page, source: err })?;
        page += 1;
    };

    items.truncate(target);
    check_info!(
        "Data collection complete: {} items from {} pages ({})",
        items.len(),
        page,
        stop_reason
    );
    Ok(Collection {
        items,
        pages_visited: page,
        stop_reason,
    })
}
