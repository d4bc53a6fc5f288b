//! Embedded PostgreSQL for the relational storage tests.
//!
//! Each call starts a throwaway cluster, creates a uniquely named database
//! and applies the embedded Diesel migrations to it. The cluster stops when
//! the returned [`TestDatabase`] is dropped.

use mimir::outbound::persistence::run_pending_migrations;
use postgresql_embedded::PostgreSQL;
use uuid::Uuid;

use super::cluster_skip::handle_cluster_setup_failure;

/// A running cluster and the URL of a freshly migrated database.
pub struct TestDatabase {
    _postgres: PostgreSQL,
    url: String,
}

impl TestDatabase {
    /// Connection string for the migrated database.
    pub fn url(&self) -> &str {
        &self.url
    }
}

async fn start() -> Result<TestDatabase, String> {
    let mut postgres = PostgreSQL::default();
    postgres
        .setup()
        .await
        .map_err(|err| format!("setup: {err}"))?;
    postgres
        .start()
        .await
        .map_err(|err| format!("start: {err}"))?;

    let name = format!("mimir_{}", Uuid::new_v4().simple());
    postgres
        .create_database(&name)
        .await
        .map_err(|err| format!("create database: {err}"))?;
    let url = postgres.settings().url(&name);

    let migration_url = url.clone();
    tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .map_err(|err| format!("migration task: {err}"))?
        .map_err(|err| format!("migrations: {err}"))?;

    Ok(TestDatabase {
        _postgres: postgres,
        url,
    })
}

/// Start a migrated test database, or `None` when the cluster is
/// unavailable and not required.
pub async fn test_database() -> Option<TestDatabase> {
    match start().await {
        Ok(database) => Some(database),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
