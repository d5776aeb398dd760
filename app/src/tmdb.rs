use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::{Config, DEFAULT_TMDB_BASE_URL};
use crate::error::GatewayError;
use crate::models::{null_as_default, Genre, MovieDetail, MovieSummary, Video};

/// Upstream listings the Gateway can page through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieList {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
    Genre(i64),
}

impl MovieList {
    fn path(self) -> &'static str {
        match self {
            MovieList::Popular => "/movie/popular",
            MovieList::TopRated => "/movie/top_rated",
            MovieList::NowPlaying => "/movie/now_playing",
            MovieList::Upcoming => "/movie/upcoming",
            MovieList::Genre(_) => "/discover/movie",
        }
    }

    pub fn cache_key(self, page: u32) -> String {
        match self {
            MovieList::Popular => format!("popular:{}", page),
            MovieList::TopRated => format!("top_rated:{}", page),
            MovieList::NowPlaying => format!("now_playing:{}", page),
            MovieList::Upcoming => format!("upcoming:{}", page),
            MovieList::Genre(id) => format!("genre:{}:{}", id, page),
        }
    }
}

/// The seam between the Gateway and the upstream metadata service.
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn list(&self, list: MovieList, page: u32) -> Result<Vec<MovieSummary>, GatewayError>;
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, GatewayError>;
    async fn genres(&self) -> Result<Vec<Genre>, GatewayError>;
    async fn movie_detail(&self, id: i64) -> Result<MovieDetail, GatewayError>;
    async fn movie_videos(&self, id: i64) -> Result<Vec<Video>, GatewayError>;
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Extra attempts after the first one, transient failures only.
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 1,
            backoff: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    access_key: Option<String>,
    language: String,
    retry: RetryPolicy,
}

impl TmdbClient {
    pub fn new(access_key: Option<&str>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            access_key: access_key.map(str::to_string),
            language: "en-US".to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.tmdb_base_url.trim_end_matches('/').to_string(),
            access_key: config.tmdb_read_access_key.clone(),
            language: config.language.clone(),
            retry: RetryPolicy {
                attempts: config.retry_attempts,
                backoff: config.retry_backoff(),
            },
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.access_key.is_some()
    }

    fn auth_header(&self) -> Result<String, GatewayError> {
        let key = self
            .access_key
            .as_deref()
            .ok_or(GatewayError::MissingCredential)?;
        if key.starts_with("Bearer ") {
            Ok(key.to_string())
        } else {
            Ok(format!("Bearer {}", key))
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let auth = self.auth_header()?;
        let mut attempt = 0;

        loop {
            match self.get_once(path, query, &auth).await {
                Err(err) if err.is_transient() && attempt < self.retry.attempts => {
                    attempt += 1;
                    warn!(
                        "TMDB request to {} failed ({}), retry {}/{}",
                        path, err, attempt, self.retry.attempts
                    );
                    tokio::time::sleep(self.retry.backoff * attempt).await;
                }
                result => return result,
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth: &str,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header("Authorization", auth)
            .header("accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("TMDB API error on {}: {} {}", path, status, error_text);
            return Err(GatewayError::Upstream {
                status,
                message: status
                    .canonical_reason()
                    .unwrap_or("upstream error")
                    .to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            error!("TMDB payload on {} did not match schema: {}", path, e);
            GatewayError::Decode(e.to_string())
        })
    }

    fn list_query(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("include_adult", "false".to_string()),
            ("language", self.language.clone()),
            ("page", page.to_string()),
        ]
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    async fn list(&self, list: MovieList, page: u32) -> Result<Vec<MovieSummary>, GatewayError> {
        debug!("Fetching {:?} page {}", list, page);

        let mut query = self.list_query(page);
        if let MovieList::Genre(genre_id) = list {
            query.push(("with_genres", genre_id.to_string()));
            query.push(("sort_by", "popularity.desc".to_string()));
        }

        let response: PagedResponse<MovieSummary> = self.get_json(list.path(), &query).await?;
        Ok(response.results)
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, GatewayError> {
        debug!("Searching TMDB for: {}", query);

        let mut params = self.list_query(1);
        params.push(("query", query.to_string()));

        let response: PagedResponse<MovieSummary> =
            self.get_json("/search/movie", &params).await?;
        debug!(
            "Search for \"{}\" returned {} results",
            query,
            response.results.len()
        );
        Ok(response.results)
    }

    async fn genres(&self) -> Result<Vec<Genre>, GatewayError> {
        let language = self
            .language
            .split('-')
            .next()
            .unwrap_or("en")
            .to_string();
        let response: GenreList = self
            .get_json("/genre/movie/list", &[("language", language)])
            .await?;
        Ok(response.genres)
    }

    async fn movie_detail(&self, id: i64) -> Result<MovieDetail, GatewayError> {
        let path = format!("/movie/{}", id);
        self.get_json(&path, &[("language", self.language.clone())])
            .await
    }

    async fn movie_videos(&self, id: i64) -> Result<Vec<Video>, GatewayError> {
        let path = format!("/movie/{}/videos", id);
        let response: VideoList = self
            .get_json(&path, &[("language", self.language.clone())])
            .await?;
        Ok(response.results)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PagedResponse<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_results: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenreList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Video>,
}
