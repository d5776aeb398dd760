use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

use crate::{
    api::lenient,
    gateway::or_empty,
    models::genre_name,
    templates::{self, HomeSections, MovieTab, StaticPage},
    widgets::{Disclosure, Modal},
    AppState,
};

#[derive(Deserialize)]
pub struct HomeQuery {
    slide: Option<String>,
    expanded: Option<String>,
}

pub async fn home_page(
    State(state): State<AppState>,
    Query(params): Query<HomeQuery>,
) -> Html<String> {
    let gateway = &state.gateway;
    let (now_playing, upcoming, top_rated, popular) = tokio::join!(
        gateway.list_now_playing(1),
        gateway.list_upcoming(1),
        gateway.list_top_rated(1),
        gateway.list_popular(1),
    );
    let (now_playing, upcoming, top_rated, popular) = (
        or_empty(now_playing),
        or_empty(upcoming),
        or_empty(top_rated),
        or_empty(popular),
    );

    let sections = HomeSections {
        now_playing: &now_playing,
        upcoming: &upcoming,
        top_rated: &top_rated,
        popular: &popular,
    };
    Html(templates::render_home(
        &sections,
        lenient(params.slide.as_deref()).unwrap_or(0),
        Disclosure::from_param(lenient(params.expanded.as_deref())),
    ))
}

#[derive(Deserialize)]
pub struct MoviesQuery {
    tab: Option<String>,
}

pub async fn movies_page(
    State(state): State<AppState>,
    Query(params): Query<MoviesQuery>,
) -> Html<String> {
    let gateway = &state.gateway;
    let (popular, top_rated, now_playing) = tokio::join!(
        gateway.list_popular(1),
        gateway.list_top_rated(1),
        gateway.list_now_playing(1),
    );

    Html(templates::render_movies(
        MovieTab::from_param(params.tab.as_deref()),
        &or_empty(popular),
        &or_empty(top_rated),
        &or_empty(now_playing),
    ))
}

#[derive(Deserialize)]
pub struct DetailQuery {
    trailer: Option<String>,
}

pub async fn movie_detail_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<DetailQuery>,
) -> Response {
    let Some(id) = lenient::<i64>(Some(&raw_id)) else {
        return (
            StatusCode::NOT_FOUND,
            Html(templates::render_movie_unavailable(&raw_id)),
        )
            .into_response();
    };
    let gateway = &state.gateway;
    let (detail, videos, popular) = tokio::join!(
        gateway.movie_detail(id),
        gateway.movie_videos(id),
        gateway.list_popular(1),
    );

    match detail {
        Ok(movie) => Html(templates::render_movie_detail(
            &movie,
            &or_empty(videos),
            &or_empty(popular),
            Modal::from_param(params.trailer.as_deref()),
        ))
        .into_response(),
        Err(e) => {
            warn!("Movie {} unavailable: {}", id, e);
            let status = if e.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_GATEWAY
            };
            (status, Html(templates::render_movie_unavailable(&raw_id))).into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct GenreQuery {
    genre: Option<String>,
}

pub async fn genre_page(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<GenreQuery>,
) -> Html<String> {
    let id = lenient::<i64>(Some(&raw_id));
    let name = params
        .genre
        .filter(|g| !g.trim().is_empty())
        .or_else(|| id.and_then(genre_name).map(str::to_string))
        .unwrap_or_else(|| "Genre".to_string());
    let movies = match id {
        Some(id) => or_empty(state.gateway.discover_by_genre(id, 1).await),
        None => Vec::new(),
    };

    Html(templates::render_genre(id.unwrap_or_default(), &name, &movies))
}

pub async fn popular_page(State(state): State<AppState>) -> Html<String> {
    let movies = or_empty(state.gateway.list_popular(1).await);
    Html(templates::render_popular(&movies))
}

#[derive(Deserialize)]
pub struct SearchPageQuery {
    q: Option<String>,
}

pub async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchPageQuery>,
) -> Html<String> {
    let query = params.q.unwrap_or_default();
    let trimmed = query.trim();

    let results = if trimmed.chars().count() >= crate::search::MIN_QUERY_CHARS {
        Some(or_empty(state.gateway.search_movies(trimmed).await))
    } else {
        None
    };
    let popular = or_empty(state.gateway.list_popular(1).await);

    Html(templates::render_search(&query, results.as_deref(), &popular))
}

pub async fn about_page() -> Html<String> {
    Html(templates::render_static(StaticPage::About))
}

pub async fn privacy_page() -> Html<String> {
    Html(templates::render_static(StaticPage::Privacy))
}

pub async fn terms_page() -> Html<String> {
    Html(templates::render_static(StaticPage::Terms))
}

pub async fn contact_page() -> Html<String> {
    Html(templates::render_static(StaticPage::Contact))
}
