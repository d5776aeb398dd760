use config::{Config as ConfigBuilder, File};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Bearer credential for the upstream metadata service. Optional so the
    /// server can still start and answer with the failure shapes.
    #[serde(default)]
    pub tmdb_read_access_key: Option<String>,
    pub tmdb_base_url: String,
    pub language: String,
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub popular_ttl_secs: u64,
    pub search_ttl_secs: u64,
    pub genres_ttl_secs: u64,
    pub detail_ttl_secs: u64,
    /// Upper bound on entries held by each response cache.
    pub max_entries: u64,
}

impl Config {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = ConfigBuilder::builder()
            .set_default("tmdb_base_url", DEFAULT_TMDB_BASE_URL)?
            .set_default("language", "en-US")?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3000u16)?
            .set_default("request_timeout_secs", 30u64)?
            .set_default("retry_attempts", 1u32)?
            .set_default("retry_backoff_ms", 250u64)?
            .set_default("cache.popular_ttl_secs", 60 * 60u64)?
            .set_default("cache.search_ttl_secs", 60 * 60u64)?
            .set_default("cache.genres_ttl_secs", 60 * 60 * 24u64)?
            .set_default("cache.detail_ttl_secs", 60 * 60u64)?
            .set_default("cache.max_entries", 10_000u64)?
            .add_source(File::with_name("config").required(false))
            .set_override_option("tmdb_read_access_key", env_non_empty("TMDB_READ_ACCESS_KEY"))?
            .set_override_option("tmdb_base_url", env_non_empty("TMDB_BASE_URL"))?
            .set_override_option("language", env_non_empty("TMDB_LANGUAGE"))?
            .set_override_option("host", env_non_empty("HOST"))?
            .set_override_option("port", env_non_empty("PORT"))?
            .build()?;

        let mut config: Config = config.try_deserialize()?;
        config.tmdb_read_access_key = config
            .tmdb_read_access_key
            .filter(|key| !key.trim().is_empty());
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl CacheConfig {
    pub fn popular_ttl(&self) -> Duration {
        Duration::from_secs(self.popular_ttl_secs)
    }

    pub fn search_ttl(&self) -> Duration {
        Duration::from_secs(self.search_ttl_secs)
    }

    pub fn genres_ttl(&self) -> Duration {
        Duration::from_secs(self.genres_ttl_secs)
    }

    pub fn detail_ttl(&self) -> Duration {
        Duration::from_secs(self.detail_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            popular_ttl_secs: 60 * 60,
            search_ttl_secs: 60 * 60,
            genres_ttl_secs: 60 * 60 * 24,
            detail_ttl_secs: 60 * 60,
            max_entries: 10_000,
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
