//! Incremental list loading for infinite-scroll grids.
//!
//! The loader holds a list seeded with the first page and appends further
//! pages each time the viewport sentinel becomes visible. At most one fetch
//! is in flight; an empty or failed page marks the list exhausted.

use anyhow::anyhow;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// The first page is supplied by the page render, so fetching starts here.
pub const FIRST_FETCHED_PAGE: u32 = 2;

#[async_trait]
pub trait PageSource<T: Send + 'static>: Send + Sync {
    async fn fetch_page(&self, page: u32) -> anyhow::Result<Vec<T>>;
}

#[async_trait]
impl<T, S> PageSource<T> for Arc<S>
where
    T: Send + 'static,
    S: PageSource<T> + ?Sized,
{
    async fn fetch_page(&self, page: u32) -> anyhow::Result<Vec<T>> {
        (**self).fetch_page(page).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    Idle { exhausted: bool },
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// This many items were appended.
    Appended(usize),
    /// The page came back empty or failed; no further fetches happen.
    Exhausted,
    /// A fetch was already in flight, or the list is exhausted.
    Skipped,
    /// The owning view went away; state was left untouched.
    Cancelled,
}

struct Inner<T> {
    items: Vec<T>,
    next_page: u32,
    state: LoaderState,
}

pub struct IncrementalLoader<T, S> {
    source: S,
    inner: Mutex<Inner<T>>,
    fetch_timeout: Option<Duration>,
    teardown: CancellationToken,
}

impl<T, S> IncrementalLoader<T, S>
where
    T: Clone + Send + 'static,
    S: PageSource<T>,
{
    pub fn new(source: S, first_page: Vec<T>) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner {
                items: first_page,
                next_page: FIRST_FETCHED_PAGE,
                state: LoaderState::Idle { exhausted: false },
            }),
            fetch_timeout: None,
            teardown: CancellationToken::new(),
        }
    }

    /// Treat a fetch that takes longer than `timeout` as failed.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub async fn state(&self) -> LoaderState {
        self.inner.lock().await.state
    }

    pub async fn items(&self) -> Vec<T> {
        self.inner.lock().await.items.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn next_page(&self) -> u32 {
        self.inner.lock().await.next_page
    }

    /// Signal that the consuming view is gone. Pending and future fetches
    /// will not touch the held list.
    pub fn teardown(&self) {
        self.teardown.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.teardown.is_cancelled()
    }

    /// Handle the viewport sentinel scrolling into view.
    pub async fn on_sentinel_visible(&self) -> LoadOutcome {
        if self.teardown.is_cancelled() {
            return LoadOutcome::Cancelled;
        }

        let page = {
            let mut inner = self.inner.lock().await;
            match inner.state {
                LoaderState::Idle { exhausted: false } => {
                    inner.state = LoaderState::Loading;
                    inner.next_page
                }
                state => {
                    debug!("Sentinel visible while {:?}, ignoring", state);
                    return LoadOutcome::Skipped;
                }
            }
        };

        let fetched = tokio::select! {
            biased;
            _ = self.teardown.cancelled() => {
                debug!("Loader torn down while fetching page {}", page);
                return LoadOutcome::Cancelled;
            }
            result = self.fetch(page) => result,
        };

        let mut inner = self.inner.lock().await;
        if self.teardown.is_cancelled() {
            return LoadOutcome::Cancelled;
        }

        match fetched {
            Ok(items) if !items.is_empty() => {
                let count = items.len();
                inner.items.extend(items);
                inner.next_page += 1;
                inner.state = LoaderState::Idle { exhausted: false };
                debug!("Appended {} items from page {}", count, page);
                LoadOutcome::Appended(count)
            }
            Ok(_) => {
                debug!("Page {} was empty, no more items", page);
                inner.state = LoaderState::Idle { exhausted: true };
                LoadOutcome::Exhausted
            }
            Err(e) => {
                warn!("Error loading page {}: {}", page, e);
                inner.state = LoaderState::Idle { exhausted: true };
                LoadOutcome::Exhausted
            }
        }
    }

    async fn fetch(&self, page: u32) -> anyhow::Result<Vec<T>> {
        match self.fetch_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.source.fetch_page(page))
                .await
                .map_err(|_| anyhow!("page {} timed out after {:?}", page, timeout))?,
            None => self.source.fetch_page(page).await,
        }
    }
}
