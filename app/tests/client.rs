use movie_studio::client::GatewayClient;
use movie_studio::loader::{IncrementalLoader, LoadOutcome};
use movie_studio::search::{SearchFlow, SearchState};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn movies(from: i64, count: i64) -> serde_json::Value {
    json!((from..from + count)
        .map(|id| json!({ "id": id, "title": format!("Movie {}", id) }))
        .collect::<Vec<_>>())
}

#[tokio::test]
async fn loader_pages_through_the_popular_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/movies/popular"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movies(21, 20)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/movies/popular"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = GatewayClient::new(&server.uri()).unwrap();
    let first_page = client.popular(1).await.unwrap_or_default();
    let loader = IncrementalLoader::new(client, first_page);

    assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Appended(20));
    assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Exhausted);
    assert_eq!(loader.on_sentinel_visible().await, LoadOutcome::Skipped);

    let items = loader.items().await;
    assert_eq!(items.first().map(|m| m.id), Some(21));
    assert_eq!(items.last().map(|m| m.id), Some(40));
}

#[tokio::test]
async fn error_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/movies/popular"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = GatewayClient::new(&server.uri()).unwrap();
    assert!(client.popular(2).await.is_err());
}

#[tokio::test]
async fn genres_unwrap_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/genres"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "genres": [{ "id": 18, "name": "Drama" }]
        })))
        .mount(&server)
        .await;

    let client = GatewayClient::new(&server.uri()).unwrap();
    let genres = client.genres().await.unwrap();
    assert_eq!(genres[0].name, "Drama");
}

#[tokio::test]
async fn search_flow_runs_against_the_search_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("query", "alien"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movies(348, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(GatewayClient::new(&server.uri()).unwrap());
    let flow = SearchFlow::spawn_with_delay(client, Duration::from_millis(20));
    let mut updates = flow.subscribe();

    flow.input("al");
    flow.input("alien");

    let movies = loop {
        updates.changed().await.unwrap();
        if let SearchState::Results { movies, .. } = &*updates.borrow_and_update() {
            break movies.clone();
        }
    };
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].id, 348);
}
