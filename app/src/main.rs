use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use movie_studio::{build_router, config::Config, gateway::Gateway, tmdb::TmdbClient, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting movie studio...");

    let config = Config::new()?;
    info!("Configuration loaded");

    let tmdb_client = TmdbClient::from_config(&config)?;
    if tmdb_client.has_credential() {
        info!("TMDB client initialized");
    } else {
        warn!("TMDB_READ_ACCESS_KEY is not set, every upstream request will fail");
    }

    let gateway = Gateway::new(Arc::new(tmdb_client), &config.cache);
    let app = build_router(AppState::new(gateway));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
