use movie_studio::loader::{IncrementalLoader, LoadOutcome, LoaderState, PageSource, FIRST_FETCHED_PAGE};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// Pages served from a fixed map; a missing page is an empty one.
#[derive(Default)]
struct FakePages {
    pages: HashMap<u32, Vec<u32>>,
    fail_on: Option<u32>,
    delay: Option<Duration>,
    gate: Option<Arc<Notify>>,
    requested: Mutex<Vec<u32>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakePages {
    fn with_pages(pages: &[(u32, usize)]) -> Self {
        let pages = pages
            .iter()
            .map(|&(page, count)| (page, (0..count as u32).map(|i| page * 100 + i).collect()))
            .collect();
        Self {
            pages,
            ..Default::default()
        }
    }

    fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PageSource<u32> for FakePages {
    async fn fetch_page(&self, page: u32) -> anyhow::Result<Vec<u32>> {
        self.requested.lock().unwrap().push(page);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on == Some(page) {
            anyhow::bail!("page {} unavailable", page);
        }
        Ok(self.pages.get(&page).cloned().unwrap_or_default())
    }
}

fn seed() -> Vec<u32> {
    (0..20).map(|i| 100 + i).collect()
}

#[tokio::test]
async fn appends_in_page_order_then_exhausts() {
    let source = Arc::new(FakePages::with_pages(&[(2, 20), (3, 5)]));
    let loader = IncrementalLoader::new(source.clone(), seed());

    assert_eq!(loader.next_page().await, FIRST_FETCHED_PAGE);
    assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Appended(20));
    assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Appended(5));
    assert_eq!(loader.len().await, 45);

    let items = loader.items().await;
    assert_eq!(&items[..2], &[100, 101]);
    assert_eq!(items[20], 200);
    assert_eq!(items[44], 304);

    assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Exhausted);
    assert_eq!(loader.state().await, LoaderState::Idle { exhausted: true });

    // Exhausted for good: no further fetches.
    assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Skipped);
    assert_eq!(source.requested(), vec![2, 3, 4]);
    assert_eq!(loader.len().await, 45);
}

#[tokio::test]
async fn failed_fetch_keeps_items_and_stops() {
    let source = Arc::new(FakePages {
        fail_on: Some(2),
        ..FakePages::with_pages(&[(2, 20)])
    });
    let loader = IncrementalLoader::new(source.clone(), seed());

    assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Exhausted);
    assert_eq!(loader.len().await, 20);
    assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Skipped);
    assert_eq!(source.requested(), vec![2]);
}

#[tokio::test]
async fn at_most_one_fetch_in_flight() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(FakePages {
        gate: Some(gate.clone()),
        ..FakePages::with_pages(&[(2, 20)])
    });
    let loader = Arc::new(IncrementalLoader::new(source.clone(), seed()));

    let first = tokio::spawn({
        let loader = loader.clone();
        async move { loader.on_sentinel_visible().await }
    });
    while loader.state().await != LoaderState::Loading {
        tokio::task::yield_now().await;
    }

    // Sentinel fires repeatedly while the first page is still loading.
    for _ in 0..5 {
        assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Skipped);
    }

    gate.notify_one();
    assert_eq!(first.await.unwrap(), LoadOutcome::Appended(20));
    assert_eq!(source.requested(), vec![2]);
    assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(loader.next_page().await, 3);
}

#[tokio::test]
async fn teardown_discards_late_page() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(FakePages {
        gate: Some(gate.clone()),
        ..FakePages::with_pages(&[(2, 20)])
    });
    let loader = Arc::new(IncrementalLoader::new(source.clone(), seed()));

    let pending = tokio::spawn({
        let loader = loader.clone();
        async move { loader.on_sentinel_visible().await }
    });
    while loader.state().await != LoaderState::Loading {
        tokio::task::yield_now().await;
    }

    loader.teardown();
    gate.notify_one();

    assert_eq!(pending.await.unwrap(), LoadOutcome::Cancelled);
    assert!(loader.is_torn_down());
    assert_eq!(loader.len().await, 20);
    assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn slow_fetch_times_out_as_exhaustion() {
    let source = Arc::new(FakePages {
        delay: Some(Duration::from_secs(60)),
        ..FakePages::with_pages(&[(2, 20)])
    });
    let loader = IncrementalLoader::new(source, seed()).with_fetch_timeout(Duration::from_secs(10));

    assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Exhausted);
    assert_eq!(loader.len().await, 20);
}

#[tokio::test]
async fn empty_seed_still_fetches_from_page_two() {
    let source = Arc::new(FakePages::with_pages(&[(2, 3)]));
    let loader = IncrementalLoader::new(source.clone(), Vec::new());

    assert!(loader.is_empty().await);
    assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Appended(3));
    assert_eq!(loader.items().await, vec![200, 201, 202]);
}
