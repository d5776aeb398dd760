//! Debounced search-as-you-type.
//!
//! Keystrokes are fed to an actor task. Each keystroke restarts the
//! debounce window; when the window closes the trimmed query is dispatched.
//! Every dispatch carries a sequence number, and only the response to the
//! most recent dispatch may replace the visible state.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::models::MovieSummary;

pub const DEBOUNCE: Duration = Duration::from_millis(500);
pub const MIN_QUERY_CHARS: usize = 2;

#[async_trait]
pub trait QuerySource: Send + Sync + 'static {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<MovieSummary>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    NotSearched,
    Loading { query: String },
    /// An empty list means "no results", distinct from `NotSearched`.
    Results {
        query: String,
        movies: Vec<MovieSummary>,
    },
}

impl SearchState {
    pub fn query(&self) -> Option<&str> {
        match self {
            SearchState::NotSearched => None,
            SearchState::Loading { query } | SearchState::Results { query, .. } => Some(query),
        }
    }
}

/// Handle to a running search flow. Dropping it stops the actor and aborts
/// any dispatch still in flight.
pub struct SearchFlow {
    input: mpsc::UnboundedSender<String>,
    state: watch::Receiver<SearchState>,
    shutdown: CancellationToken,
}

impl SearchFlow {
    pub fn spawn<Q: QuerySource>(source: Arc<Q>) -> Self {
        Self::spawn_with_delay(source, DEBOUNCE)
    }

    pub fn spawn_with_delay<Q: QuerySource>(source: Arc<Q>, delay: Duration) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SearchState::NotSearched);
        let shutdown = CancellationToken::new();

        let actor = Actor {
            source,
            delay,
            state: state_tx,
            shutdown: shutdown.clone(),
        };
        tokio::spawn(actor.run(input_rx));

        Self {
            input: input_tx,
            state: state_rx,
            shutdown,
        }
    }

    /// Record the full text of the search field after a keystroke.
    pub fn input(&self, text: impl Into<String>) {
        if self.input.send(text.into()).is_err() {
            debug!("Search flow already stopped, dropping input");
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for SearchFlow {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

type Dispatched = (u64, String, anyhow::Result<Vec<MovieSummary>>);

struct Actor<Q> {
    source: Arc<Q>,
    delay: Duration,
    state: watch::Sender<SearchState>,
    shutdown: CancellationToken,
}

impl<Q: QuerySource> Actor<Q> {
    async fn run(self, mut input: mpsc::UnboundedReceiver<String>) {
        let mut pending: Option<String> = None;
        let mut deadline = Instant::now();
        let mut latest: u64 = 0;
        let mut in_flight: JoinSet<Dispatched> = JoinSet::new();

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                text = input.recv() => match text {
                    Some(text) => {
                        pending = Some(text);
                        deadline = Instant::now() + self.delay;
                    }
                    None => break,
                },
                _ = sleep_until(deadline), if pending.is_some() => {
                    if let Some(text) = pending.take() {
                        self.settle(&text, &mut latest, &mut in_flight);
                    }
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    match joined {
                        Ok((seq, query, result)) => self.resolve(seq, latest, query, result),
                        Err(e) if e.is_cancelled() => {}
                        Err(e) => warn!("Search dispatch panicked: {}", e),
                    }
                }
            }
        }

        in_flight.abort_all();
        debug!("Search flow stopped");
    }

    /// The debounce window closed on `text`.
    fn settle(&self, text: &str, latest: &mut u64, in_flight: &mut JoinSet<Dispatched>) {
        let query = text.trim();

        if query.is_empty() {
            *latest += 1;
            self.state.send_replace(SearchState::NotSearched);
            return;
        }
        if query.chars().count() < MIN_QUERY_CHARS {
            debug!("Query \"{}\" too short, not dispatching", query);
            return;
        }

        *latest += 1;
        let seq = *latest;
        let query = query.to_string();
        debug!("Dispatching search #{} for \"{}\"", seq, query);
        self.state.send_replace(SearchState::Loading {
            query: query.clone(),
        });

        let source = self.source.clone();
        in_flight.spawn(async move {
            let result = source.search(&query).await;
            (seq, query, result)
        });
    }

    fn resolve(
        &self,
        seq: u64,
        latest: u64,
        query: String,
        result: anyhow::Result<Vec<MovieSummary>>,
    ) {
        if seq != latest {
            debug!("Discarding stale results for \"{}\" (#{})", query, seq);
            return;
        }

        let movies = result.unwrap_or_else(|e| {
            warn!("Search error for \"{}\": {}", query, e);
            Vec::new()
        });
        self.state.send_replace(SearchState::Results { query, movies });
    }
}
