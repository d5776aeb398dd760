//! Upstream movie data gateway.
//!
//! Callers never see the upstream directly: the gateway validates input,
//! serves time-bounded cached copies, and hands back typed values or a
//! [`GatewayError`] that the HTTP layer turns into a stable failure shape.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use crate::cache::TtlCache;
use crate::config::CacheConfig;
use crate::error::GatewayError;
use crate::loader::PageSource;
use crate::models::{Genre, MovieDetail, MovieSummary, Video};
use crate::search::QuerySource;
use crate::tmdb::{MovieList, MovieSource};

const GENRES_KEY: &str = "genres";

pub struct Gateway {
    source: Arc<dyn MovieSource>,
    lists: TtlCache<Vec<MovieSummary>>,
    searches: TtlCache<Vec<MovieSummary>>,
    genres: TtlCache<Vec<Genre>>,
    details: TtlCache<MovieDetail>,
    videos: TtlCache<Vec<Video>>,
}

impl Gateway {
    pub fn new(source: Arc<dyn MovieSource>, cache: &CacheConfig) -> Self {
        Self {
            source,
            lists: TtlCache::new(cache.popular_ttl(), cache.max_entries),
            searches: TtlCache::new(cache.search_ttl(), cache.max_entries),
            genres: TtlCache::new(cache.genres_ttl(), cache.max_entries),
            details: TtlCache::new(cache.detail_ttl(), cache.max_entries),
            videos: TtlCache::new(cache.detail_ttl(), cache.max_entries),
        }
    }

    pub fn list_ttl_secs(&self) -> u64 {
        self.lists.ttl().as_secs()
    }

    pub fn search_ttl_secs(&self) -> u64 {
        self.searches.ttl().as_secs()
    }

    pub fn genres_ttl_secs(&self) -> u64 {
        self.genres.ttl().as_secs()
    }

    pub fn detail_ttl_secs(&self) -> u64 {
        self.details.ttl().as_secs()
    }

    pub async fn list_popular(&self, page: u32) -> Result<Vec<MovieSummary>, GatewayError> {
        self.list(MovieList::Popular, page).await
    }

    pub async fn list_top_rated(&self, page: u32) -> Result<Vec<MovieSummary>, GatewayError> {
        self.list(MovieList::TopRated, page).await
    }

    pub async fn list_now_playing(&self, page: u32) -> Result<Vec<MovieSummary>, GatewayError> {
        self.list(MovieList::NowPlaying, page).await
    }

    pub async fn list_upcoming(&self, page: u32) -> Result<Vec<MovieSummary>, GatewayError> {
        self.list(MovieList::Upcoming, page).await
    }

    pub async fn discover_by_genre(
        &self,
        genre_id: i64,
        page: u32,
    ) -> Result<Vec<MovieSummary>, GatewayError> {
        self.list(MovieList::Genre(genre_id), page).await
    }

    /// One page of an upstream listing, in upstream order.
    pub async fn list(&self, list: MovieList, page: u32) -> Result<Vec<MovieSummary>, GatewayError> {
        let page = page.max(1);
        let key = list.cache_key(page);
        if let Some(movies) = self.lists.get(&key).await {
            debug!("Cache hit for {}", key);
            return Ok(movies);
        }

        let movies = self.source.list(list, page).await.map_err(|e| {
            error!("Error fetching {:?} page {}: {}", list, page, e);
            e
        })?;
        self.lists.insert(key, movies.clone()).await;
        Ok(movies)
    }

    /// Upstream relevance order is kept as-is.
    pub async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, GatewayError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GatewayError::InvalidInput(
                "Query parameter is required".to_string(),
            ));
        }

        let key = format!("search:{}", query.to_lowercase());
        if let Some(movies) = self.searches.get(&key).await {
            debug!("Cache hit for {}", key);
            return Ok(movies);
        }

        let movies = self.source.search(query).await.map_err(|e| {
            error!("Search API error for \"{}\": {}", query, e);
            e
        })?;
        self.searches.insert(key, movies.clone()).await;
        Ok(movies)
    }

    pub async fn list_genres(&self) -> Result<Vec<Genre>, GatewayError> {
        if let Some(genres) = self.genres.get(GENRES_KEY).await {
            return Ok(genres);
        }

        let genres = self.source.genres().await.map_err(|e| {
            error!("Error fetching genres: {}", e);
            e
        })?;
        self.genres.insert(GENRES_KEY, genres.clone()).await;
        Ok(genres)
    }

    pub async fn movie_detail(&self, id: i64) -> Result<MovieDetail, GatewayError> {
        let key = format!("movie:{}", id);
        if let Some(detail) = self.details.get(&key).await {
            return Ok(detail);
        }

        let detail = self.source.movie_detail(id).await.map_err(|e| {
            error!("Error fetching movie {}: {}", id, e);
            e
        })?;
        self.details.insert(key, detail.clone()).await;
        Ok(detail)
    }

    pub async fn movie_videos(&self, id: i64) -> Result<Vec<Video>, GatewayError> {
        let key = format!("videos:{}", id);
        if let Some(videos) = self.videos.get(&key).await {
            return Ok(videos);
        }

        let videos = self.source.movie_videos(id).await.map_err(|e| {
            error!("Error fetching videos for movie {}: {}", id, e);
            e
        })?;
        self.videos.insert(key, videos.clone()).await;
        Ok(videos)
    }
}

/// Empty value for a failed fetch. The gateway has already logged it.
pub fn or_empty<T: Default>(result: Result<T, GatewayError>) -> T {
    result.unwrap_or_default()
}

#[async_trait]
impl PageSource<MovieSummary> for Gateway {
    async fn fetch_page(&self, page: u32) -> anyhow::Result<Vec<MovieSummary>> {
        Ok(self.list_popular(page).await?)
    }
}

#[async_trait]
impl QuerySource for Gateway {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<MovieSummary>> {
        Ok(self.search_movies(query).await?)
    }
}
