use axum::http::StatusCode;
use movie_studio::error::GatewayError;
use movie_studio::tmdb::{MovieList, MovieSource, RetryPolicy, TmdbClient};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-read-token";

fn client(server: &MockServer) -> TmdbClient {
    TmdbClient::new(Some(KEY))
        .unwrap()
        .with_base_url(&server.uri())
        .with_retry(RetryPolicy {
            attempts: 1,
            backoff: Duration::from_millis(1),
        })
}

fn page_of(ids: &[i64]) -> serde_json::Value {
    json!({
        "page": 1,
        "results": ids.iter().map(|id| json!({ "id": id, "title": format!("Movie {}", id) })).collect::<Vec<_>>(),
        "total_pages": 500,
        "total_results": 10000
    })
}

#[tokio::test]
async fn popular_sends_bearer_and_list_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .and(header("Authorization", "Bearer test-read-token"))
        .and(query_param("include_adult", "false"))
        .and(query_param("language", "en-US"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(&[3, 1, 2])))
        .expect(1)
        .mount(&server)
        .await;

    let movies = client(&server).list(MovieList::Popular, 2).await.unwrap();
    let ids: Vec<i64> = movies.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[tokio::test]
async fn genre_listing_uses_discover() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("with_genres", "878"))
        .and(query_param("sort_by", "popularity.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(&[42])))
        .expect(1)
        .mount(&server)
        .await;

    let movies = client(&server).list(MovieList::Genre(878), 1).await.unwrap();
    assert_eq!(movies[0].id, 42);
}

#[tokio::test]
async fn search_sends_query_on_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "the matrix"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(&[603])))
        .expect(1)
        .mount(&server)
        .await;

    let movies = client(&server).search("the matrix").await.unwrap();
    assert_eq!(movies[0].title, "Movie 603");
}

#[tokio::test]
async fn genres_use_language_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "genres": [{ "id": 28, "name": "Action" }, { "id": 35, "name": "Comedy" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let genres = client(&server).genres().await.unwrap();
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[1].name, "Comedy");
}

#[tokio::test]
async fn transient_failure_is_retried_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(&[7])))
        .expect(1)
        .mount(&server)
        .await;

    let movies = client(&server).list(MovieList::Popular, 1).await.unwrap();
    assert_eq!(movies[0].id, 7);
}

#[tokio::test]
async fn persistent_server_error_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/upcoming"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;

    let err = client(&server)
        .list(MovieList::Upcoming, 1)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 7,
            "status_message": "Invalid API key: You must be granted a valid key."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).search("matrix").await.unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Upstream { status, .. } if status == StatusCode::UNAUTHORIZED
    ));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn missing_credential_fails_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_of(&[1])))
        .expect(0)
        .mount(&server)
        .await;

    let client = TmdbClient::new(None).unwrap().with_base_url(&server.uri());
    assert!(!client.has_credential());
    assert!(matches!(
        client.list(MovieList::Popular, 1).await,
        Err(GatewayError::MissingCredential)
    ));
    assert!(matches!(
        client.genres().await,
        Err(GatewayError::MissingCredential)
    ));
}

#[tokio::test]
async fn malformed_payload_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/now_playing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .list(MovieList::NowPlaying, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)));
}

#[tokio::test]
async fn detail_and_videos_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/603"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 603,
            "title": "The Matrix",
            "runtime": 136,
            "status": "Released",
            "genres": [{ "id": 28, "name": "Action" }],
            "production_companies": [{ "id": 79, "name": "Village Roadshow Pictures", "logo_path": null }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/603/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 603,
            "results": [
                { "id": "a", "key": "abc", "name": "Teaser", "site": "YouTube", "type": "Teaser", "official": true },
                { "id": "b", "key": "vFDx", "name": "Official Trailer", "site": "YouTube", "type": "Trailer", "official": true }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server);
    let detail = client.movie_detail(603).await.unwrap();
    assert_eq!(detail.runtime_label().as_deref(), Some("2h 16m"));
    assert_eq!(detail.production_companies[0].logo_url(), None);

    let videos = client.movie_videos(603).await.unwrap();
    let trailer = movie_studio::models::pick_trailer(&videos).unwrap();
    assert_eq!(trailer.key, "vFDx");

    let err = client.movie_detail(1).await.unwrap_err();
    assert!(err.is_not_found());
}
