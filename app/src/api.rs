use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;

use crate::{
    error::{AppError, GatewayError},
    models::MovieSummary,
    tmdb::{GenreList, MovieList},
    AppState,
};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/genres", get(get_genres))
        .route("/movies/popular", get(get_popular_movies))
        .route("/movies/top-rated", get(get_top_rated_movies))
        .route("/movies/now-playing", get(get_now_playing_movies))
        .route("/movies/upcoming", get(get_upcoming_movies))
        .route("/genre/:id", get(get_genre_movies))
        .route("/search", get(search))
        .route("/movie/:id", get(get_movie_detail))
        .route("/movie/:id/videos", get(get_movie_videos))
        .with_state(state)
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<String>,
}

/// Parse a path or query value, reading anything malformed as absent.
pub(crate) fn lenient<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|v| v.trim().parse().ok())
}

impl PageQuery {
    /// Anything that isn't a positive integer reads as the first page.
    fn page(&self) -> u32 {
        lenient::<u32>(self.page.as_deref())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    query: Option<String>,
}

fn cached<T: Serialize>(max_age: u64, body: T) -> Response {
    (
        [(header::CACHE_CONTROL, format!("public, max-age={}", max_age))],
        Json(body),
    )
        .into_response()
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn movie_list(state: &AppState, list: MovieList, page: u32) -> Response {
    match state.gateway.list(list, page).await {
        Ok(movies) => cached(state.gateway.list_ttl_secs(), movies),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Vec::<MovieSummary>::new()),
        )
            .into_response(),
    }
}

async fn get_genres(State(state): State<AppState>) -> Response {
    match state.gateway.list_genres().await {
        Ok(genres) => cached(state.gateway.genres_ttl_secs(), GenreList { genres }),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(GenreList { genres: Vec::new() }),
        )
            .into_response(),
    }
}

async fn get_popular_movies(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Response {
    movie_list(&state, MovieList::Popular, params.page()).await
}

async fn get_top_rated_movies(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Response {
    movie_list(&state, MovieList::TopRated, params.page()).await
}

async fn get_now_playing_movies(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Response {
    movie_list(&state, MovieList::NowPlaying, params.page()).await
}

async fn get_upcoming_movies(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Response {
    movie_list(&state, MovieList::Upcoming, params.page()).await
}

/// A genre id that isn't a number names no genre, so it lists nothing.
async fn get_genre_movies(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PageQuery>,
) -> Response {
    match lenient::<i64>(Some(&id)) {
        Some(id) => movie_list(&state, MovieList::Genre(id), params.page()).await,
        None => Json(Vec::<MovieSummary>::new()).into_response(),
    }
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchQuery>) -> Response {
    let query = params.query.unwrap_or_default();

    match state.gateway.search_movies(&query).await {
        Ok(movies) => cached(state.gateway.search_ttl_secs(), movies),
        Err(GatewayError::InvalidInput(msg)) => error_body(StatusCode::BAD_REQUEST, msg),
        Err(err @ GatewayError::Upstream { .. }) => {
            error_body(err.status_code(), err.to_string())
        }
        Err(_) => error_body(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to search movies",
        ),
    }
}

async fn get_movie_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(id) = lenient::<i64>(Some(&id)) else {
        return Ok(error_body(StatusCode::NOT_FOUND, "Not found"));
    };
    let movie = state.gateway.movie_detail(id).await?;
    Ok(cached(state.gateway.detail_ttl_secs(), movie))
}

async fn get_movie_videos(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(id) = lenient::<i64>(Some(&id)) else {
        return Json(Vec::<crate::models::Video>::new()).into_response();
    };
    match state.gateway.movie_videos(id).await {
        Ok(videos) => cached(state.gateway.detail_ttl_secs(), videos),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Vec::<crate::models::Video>::new()),
        )
            .into_response(),
    }
}
