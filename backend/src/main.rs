//! Events API entry-point: loads settings, prepares persistence and runs the
//! HTTP server.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use events_api::inbound::http::health::HealthState;
use events_api::outbound::persistence::{DbPool, PoolConfig, migrate};
use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(
        bind_addr,
        settings.token_settings().map_err(std::io::Error::other)?,
    )
    .with_public_base_url(settings.public_base_url().map_err(std::io::Error::other)?)
    .with_seed_accounts(settings.seed_accounts());

    match settings.database_url() {
        Some(database_url) => {
            let applied = migrate(database_url)
                .await
                .map_err(std::io::Error::other)?;
            info!(applied, "database schema is up to date");
            let pool = DbPool::new(PoolConfig::new(database_url))
                .await
                .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database URL configured; data lives in process memory"),
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::build_prometheus()?));

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting events API");
    let server = create_server(health_state, config).await?;
    server.await
}
