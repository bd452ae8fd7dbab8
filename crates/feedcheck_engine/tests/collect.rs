use std::sync::Once;
use std::time::Duration;

use feedcheck_core::Item;
use feedcheck_engine::{
    collect, ActorError, CollectError, CollectSettings, FeedScript, FeedSource, ReplayFeed,
    StopReason,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(feedcheck_logging::initialize_for_tests);
}

fn page(number: usize, size: usize) -> Vec<Item> {
    (0..size)
        .map(|i| {
            let id = number * 100 + i;
            Item::new(id.to_string(), format!("Story {id}"), format!("{id} minutes ago"))
        })
        .collect()
}

fn settings(target_count: usize) -> CollectSettings {
    CollectSettings {
        target_count,
        ..CollectSettings::default()
    }
}

/// Scripted source that counts calls and can fail or stall on demand.
#[derive(Default)]
struct ScriptedSource {
    pages: Vec<Vec<Item>>,
    current: usize,
    page_reads: usize,
    advances: usize,
    fail_on_read: Option<usize>,
    advance_delay: Duration,
}

impl ScriptedSource {
    fn new(pages: Vec<Vec<Item>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl FeedSource for ScriptedSource {
    async fn current_page_items(&mut self) -> Result<Vec<Item>, ActorError> {
        self.page_reads += 1;
        if self.fail_on_read == Some(self.current) {
            return Err(ActorError::failed("page did not render"));
        }
        Ok(self.pages[self.current].clone())
    }

    async fn has_next_page(&mut self) -> Result<bool, ActorError> {
        Ok(self.current + 1 < self.pages.len())
    }

    async fn advance_to_next_page(&mut self) -> Result<(), ActorError> {
        tokio::time::sleep(self.advance_delay).await;
        self.advances += 1;
        self.current += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ActorError> {
        Ok(())
    }
}

#[tokio::test]
async fn over_fetched_last_page_is_trimmed() {
    init_logging();
    let pages: Vec<_> = (1..=4).map(|n| page(n, 30)).collect();
    let mut source = ScriptedSource::new(pages.clone());

    let collection = collect(&mut source, &settings(100)).await.unwrap();

    assert_eq!(collection.items.len(), 100);
    assert_eq!(collection.pages_visited, 4);
    assert_eq!(collection.stop_reason, StopReason::TargetReached);
    assert_eq!(collection.items[..30], pages[0][..]);
    assert_eq!(collection.items[90..], pages[3][..10]);
    assert_eq!(source.advances, 3);
}

#[tokio::test]
async fn short_feed_returns_what_exists() {
    init_logging();
    let mut source = ScriptedSource::new(vec![page(1, 30), page(2, 30)]);

    let collection = collect(&mut source, &settings(100)).await.unwrap();

    assert_eq!(collection.items.len(), 60);
    assert_eq!(collection.pages_visited, 2);
    assert_eq!(collection.stop_reason, StopReason::PaginationExhausted);
}

#[tokio::test]
async fn exact_fit_stops_without_asking_for_more() {
    init_logging();
    let mut source = ScriptedSource::new(vec![page(1, 30), page(2, 30), page(3, 30)]);

    let collection = collect(&mut source, &settings(60)).await.unwrap();

    assert_eq!(collection.items.len(), 60);
    assert_eq!(collection.stop_reason, StopReason::TargetReached);
    assert_eq!(source.page_reads, 2);
    assert_eq!(source.advances, 1);
}

#[tokio::test]
async fn empty_pages_still_advance_and_terminate() {
    init_logging();
    let mut source = ScriptedSource::new(vec![page(1, 5), Vec::new(), page(3, 5), Vec::new()]);

    let collection = collect(&mut source, &settings(100)).await.unwrap();

    assert_eq!(collection.items.len(), 10);
    assert_eq!(collection.pages_visited, 4);
    assert_eq!(collection.stop_reason, StopReason::PaginationExhausted);
}

#[tokio::test]
async fn zero_target_reads_nothing() {
    init_logging();
    let mut source = ScriptedSource::new(vec![page(1, 30)]);

    let collection = collect(&mut source, &settings(0)).await.unwrap();

    assert!(collection.items.is_empty());
    assert_eq!(collection.stop_reason, StopReason::TargetReached);
    assert_eq!(source.page_reads, 0);
}

#[tokio::test]
async fn huge_target_collects_what_exists() {
    init_logging();
    let mut source = ScriptedSource::new(vec![page(1, 4)]);

    let collection = collect(&mut source, &settings(usize::MAX)).await.unwrap();

    assert_eq!(collection.items, page(1, 4));
    assert_eq!(collection.pages_visited, 1);
    assert_eq!(collection.stop_reason, StopReason::PaginationExhausted);
}

#[tokio::test]
async fn page_cap_stops_collection() {
    init_logging();
    let mut source = ScriptedSource::new((1..=5).map(|n| page(n, 10)).collect());
    let settings = CollectSettings {
        target_count: 100,
        max_pages: Some(2),
        ..CollectSettings::default()
    };

    let collection = collect(&mut source, &settings).await.unwrap();

    assert_eq!(collection.items.len(), 20);
    assert_eq!(collection.stop_reason, StopReason::PageLimit);
}

#[tokio::test]
async fn source_failure_names_the_page() {
    init_logging();
    let mut source = ScriptedSource::new(vec![page(1, 30), page(2, 30)]);
    source.fail_on_read = Some(1);

    let err = collect(&mut source, &settings(100)).await.unwrap_err();

    assert_eq!(
        err,
        CollectError::Source {
            page: 2,
            source: ActorError::failed("page did not render"),
        }
    );
}

#[tokio::test(start_paused = true)]
async fn slow_page_settle_times_out_when_bounded() {
    init_logging();
    let mut source = ScriptedSource::new(vec![page(1, 30), page(2, 30)]);
    source.advance_delay = Duration::from_secs(30);
    let settings = CollectSettings {
        target_count: 100,
        settle_timeout: Some(Duration::from_secs(2)),
        ..CollectSettings::default()
    };

    let err = collect(&mut source, &settings).await.unwrap_err();

    assert_eq!(
        err,
        CollectError::Source {
            page: 1,
            source: ActorError::SettleTimeout {
                what: "next page",
                after: Duration::from_secs(2),
            },
        }
    );
}

#[tokio::test(start_paused = true)]
async fn unbounded_settle_waits_for_slow_pages() {
    init_logging();
    let mut source = ScriptedSource::new(vec![page(1, 30), page(2, 30)]);
    source.advance_delay = Duration::from_secs(30);

    let collection = collect(&mut source, &settings(100)).await.unwrap();

    assert_eq!(collection.items.len(), 60);
}

#[tokio::test]
async fn replay_feed_walks_its_pages() {
    init_logging();
    let mut feed = ReplayFeed::new(FeedScript {
        pages: vec![page(1, 30), page(2, 30), page(3, 30)],
        settle_delay_ms: 0,
    });

    let collection = collect(&mut feed, &settings(45)).await.unwrap();

    assert_eq!(collection.items.len(), 45);
    assert_eq!(collection.items[44].id, "214");
    assert_eq!(feed.page_index(), 1);
}
