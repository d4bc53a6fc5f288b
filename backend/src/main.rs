//! Backend entry-point: loads settings, selects storage, seeds sample entries
//! and serves the REST API.

mod server;

use std::io;
use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mimir::domain::ports::{EntryRepository, FixtureIdentityProvider};
use mimir::inbound::http::health::HealthState;
use mimir::inbound::http::session_config::{BuildMode, session_settings};
use mimir::inbound::http::state::HttpState;
use mimir::outbound::persistence::{
    DbPool, DieselStorage, MemoryStorage, PoolConfig, run_pending_migrations,
};
use mimir::seed::seed_sample_entries;
use mimir::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load configuration: {e}")))?;
    info!(
        host = settings.host(),
        port = settings.port(),
        database = settings.database_url().is_some(),
        seed_sample_entries = settings.seed_sample_entries(),
        session_key_file = %settings.session_key_file().display(),
        "settings loaded"
    );

    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .map_err(|e| io::Error::other(e.to_string()))?;
    let http_state = build_http_state(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(session, settings.bind_address());
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics());
    let (host, port) = config.bind_addr();
    info!(host, port, "binding http server");

    let server = create_server(health_state, web::Data::new(http_state), config)?;
    server.await
}

/// Select the storage variant, apply migrations and seed when enabled.
async fn build_http_state(settings: &AppSettings) -> io::Result<HttpState> {
    let identity = Arc::new(FixtureIdentityProvider);
    let clock = Arc::new(DefaultClock);

    let Some(database_url) = settings.database_url() else {
        info!(storage = "memory", "no database configured; using in-memory storage");
        let storage = Arc::new(MemoryStorage::new(clock));
        seed_if_enabled(settings, storage.as_ref()).await?;
        return Ok(HttpState::from_storage(storage, identity));
    };

    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|e| io::Error::other(format!("migration task failed: {e}")))?
        .map_err(|e| io::Error::other(e.to_string()))?;
    info!(applied, "database migrations applied");

    let pool_config =
        PoolConfig::new(database_url).with_max_size(settings.database_max_connections());
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|e| io::Error::other(format!("database pool: {e}")))?;
    info!(storage = "postgres", "using relational storage");
    let storage = Arc::new(DieselStorage::new(pool, clock));
    seed_if_enabled(settings, storage.as_ref()).await?;
    Ok(HttpState::from_storage(storage, identity))
}

async fn seed_if_enabled(
    settings: &AppSettings,
    storage: &dyn EntryRepository,
) -> io::Result<()> {
    if !settings.seed_sample_entries() {
        info!(reason = "disabled", "sample entry seeding skipped");
        return Ok(());
    }
    seed_sample_entries(storage)
        .await
        .map(|_| ())
        .map_err(|e| io::Error::other(format!("sample entry seeding failed: {e}")))
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Option<PrometheusMetrics> {
    match PrometheusMetricsBuilder::new("mimir")
        .endpoint("/metrics")
        .build()
    {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "metrics registration failed; continuing without /metrics");
            None
        }
    }
}
