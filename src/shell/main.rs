use anyhow::Context;
use std::sync::Arc;
use timelapse::modules::identity::adapters::outbound::oidc_verifier::OidcDiscovery;
use timelapse::shared::infrastructure::repository::TimelapseRepository;
use timelapse::shared::infrastructure::repository::in_memory::InMemoryRepository;
use timelapse::shared::infrastructure::repository::json_file::JsonFileRepository;
use timelapse::shell::config::ServerConfig;
use timelapse::shell::http::router;
use timelapse::shell::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = ServerConfig::from_env().context("invalid server configuration")?;

    let repository: Arc<dyn TimelapseRepository> = match &config.data_file {
        Some(path) => Arc::new(
            JsonFileRepository::open(path)
                .await
                .with_context(|| format!("cannot open document store {}", path.display()))?,
        ),
        None => {
            warn!("TIMELAPSE_DATA_FILE is not set; data lives in memory only");
            Arc::new(InMemoryRepository::new())
        }
    };

    let client = reqwest::Client::builder()
        .timeout(config.discovery_timeout)
        .build()
        .context("cannot build HTTP client")?;
    let discovery = OidcDiscovery::new(client, config.trusted_issuers.clone());

    let state = AppState::new(repository, discovery);
    let app = router(state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("cannot listen on {}", config.listen_addr))?;
    info!(
        address = %config.listen_addr,
        issuers = ?config.trusted_issuers,
        "Timelapse API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("server failed")
}
