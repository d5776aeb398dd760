use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod loader;
pub mod models;
pub mod pages;
pub mod search;
pub mod templates;
pub mod tmdb;
pub mod widgets;

use crate::gateway::Gateway;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home_page))
        .route("/movie", get(pages::movies_page))
        .route("/movie/:id", get(pages::movie_detail_page))
        .route("/genre/:id", get(pages::genre_page))
        .route("/popular", get(pages::popular_page))
        .route("/search", get(pages::search_page))
        .route("/about", get(pages::about_page))
        .route("/privacy", get(pages::privacy_page))
        .route("/terms", get(pages::terms_page))
        .route("/contact", get(pages::contact_page))
        .nest("/api", api::routes(state.clone()))
        .nest_service("/static", ServeDir::new("app/static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
