use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::loader::PageSource;
use crate::models::{Genre, MovieSummary};
use crate::search::QuerySource;
use crate::tmdb::GenreList;

/// Typed client for this server's own `/api` surface, used by the
/// incremental loader and the search flow outside the browser.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> anyhow::Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("{} returned {}: {}", path, status, error_text);
        }

        response
            .json()
            .await
            .with_context(|| format!("decoding response from {}", path))
    }

    pub async fn popular(&self, page: u32) -> anyhow::Result<Vec<MovieSummary>> {
        self.get_json("/api/movies/popular", &[("page", page.to_string())])
            .await
    }

    pub async fn search(&self, query: &str) -> anyhow::Result<Vec<MovieSummary>> {
        self.get_json("/api/search", &[("query", query.to_string())])
            .await
    }

    pub async fn genres(&self) -> anyhow::Result<Vec<Genre>> {
        let list: GenreList = self.get_json("/api/genres", &[]).await?;
        Ok(list.genres)
    }
}

#[async_trait]
impl PageSource<MovieSummary> for GatewayClient {
    async fn fetch_page(&self, page: u32) -> anyhow::Result<Vec<MovieSummary>> {
        self.popular(page).await
    }
}

#[async_trait]
impl QuerySource for GatewayClient {
    async fn search(&self, query: &str) -> anyhow::Result<Vec<MovieSummary>> {
        GatewayClient::search(self, query).await
    }
}
