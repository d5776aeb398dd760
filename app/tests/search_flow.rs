use movie_studio::models::MovieSummary;
use movie_studio::search::{QuerySource, SearchFlow, SearchState, DEBOUNCE};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

/// Answers each query after its own configured latency.
#[derive(Default)]
struct SlowSearch {
    latency: HashMap<&'static str, Duration>,
    failing: Vec<&'static str>,
    queries: Mutex<Vec<String>>,
}

impl SlowSearch {
    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl QuerySource for SlowSearch {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<MovieSummary>> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(latency) = self.latency.get(query) {
            sleep(*latency).await;
        }
        if self.failing.iter().any(|f| *f == query) {
            anyhow::bail!("upstream failed for {}", query);
        }
        if query == "zzzzqqq" {
            return Ok(Vec::new());
        }
        Ok(vec![serde_json::from_value(json!({
            "id": query.len() as i64,
            "title": format!("{} movie", query)
        }))?])
    }
}

fn titles(state: &SearchState) -> Vec<String> {
    match state {
        SearchState::Results { movies, .. } => movies.iter().map(|m| m.title.clone()).collect(),
        _ => Vec::new(),
    }
}

async fn settle() {
    sleep(DEBOUNCE + Duration::from_millis(50)).await;
}

#[tokio::test(start_paused = true)]
async fn typing_burst_dispatches_once() {
    let source = Arc::new(SlowSearch::default());
    let flow = SearchFlow::spawn(source.clone());

    for text in ["b", "ba", "bat"] {
        flow.input(text);
        sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(flow.state(), SearchState::NotSearched);

    settle().await;
    assert_eq!(source.queries(), vec!["bat"]);
    assert_eq!(titles(&flow.state()), vec!["bat movie"]);
}

#[tokio::test(start_paused = true)]
async fn query_is_trimmed_before_dispatch() {
    let source = Arc::new(SlowSearch::default());
    let flow = SearchFlow::spawn(source.clone());

    flow.input("  matrix  ");
    settle().await;
    assert_eq!(source.queries(), vec!["matrix"]);
    assert_eq!(flow.state().query(), Some("matrix"));
}

#[tokio::test(start_paused = true)]
async fn short_query_is_not_dispatched() {
    let source = Arc::new(SlowSearch::default());
    let flow = SearchFlow::spawn(source.clone());

    flow.input("a");
    settle().await;
    assert!(source.queries().is_empty());
    assert_eq!(flow.state(), SearchState::NotSearched);
}

#[tokio::test(start_paused = true)]
async fn stale_response_never_overwrites_newer_one() {
    let source = Arc::new(SlowSearch {
        latency: HashMap::from([
            ("cat", Duration::from_secs(3)),
            ("dog", Duration::from_millis(200)),
        ]),
        ..Default::default()
    });
    let flow = SearchFlow::spawn(source.clone());
    let mut updates = flow.subscribe();

    flow.input("cat");
    settle().await;
    assert_eq!(
        flow.state(),
        SearchState::Loading {
            query: "cat".into()
        }
    );

    flow.input("dog");
    settle().await;
    sleep(Duration::from_millis(300)).await;
    assert_eq!(titles(&flow.state()), vec!["dog movie"]);

    // "cat" lands last and is dropped.
    sleep(Duration::from_secs(5)).await;
    assert_eq!(source.queries(), vec!["cat", "dog"]);
    assert_eq!(titles(&flow.state()), vec!["dog movie"]);
    assert_eq!(updates.borrow_and_update().query(), Some("dog"));
}

#[tokio::test(start_paused = true)]
async fn no_results_is_distinct_from_not_searched() {
    let source = Arc::new(SlowSearch::default());
    let flow = SearchFlow::spawn(source);

    flow.input("zzzzqqq");
    settle().await;
    assert_eq!(
        flow.state(),
        SearchState::Results {
            query: "zzzzqqq".into(),
            movies: Vec::new()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn failed_search_shows_empty_results() {
    let source = Arc::new(SlowSearch {
        failing: vec!["matrix"],
        ..Default::default()
    });
    let flow = SearchFlow::spawn(source);

    flow.input("matrix");
    settle().await;
    assert_eq!(
        flow.state(),
        SearchState::Results {
            query: "matrix".into(),
            movies: Vec::new()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn clearing_the_box_discards_pending_results() {
    let source = Arc::new(SlowSearch {
        latency: HashMap::from([("batman", Duration::from_secs(2))]),
        ..Default::default()
    });
    let flow = SearchFlow::spawn(source.clone());

    flow.input("batman");
    settle().await;
    assert!(matches!(flow.state(), SearchState::Loading { .. }));

    flow.input("   ");
    settle().await;
    assert_eq!(flow.state(), SearchState::NotSearched);

    sleep(Duration::from_secs(3)).await;
    assert_eq!(flow.state(), SearchState::NotSearched);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_dispatching() {
    let source = Arc::new(SlowSearch::default());
    let flow = SearchFlow::spawn(source.clone());

    flow.shutdown();
    flow.input("matrix");
    settle().await;
    assert!(source.queries().is_empty());
    assert_eq!(flow.state(), SearchState::NotSearched);
}
