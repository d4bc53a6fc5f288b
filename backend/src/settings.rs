//! Application configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MIMIR_*` environment variables and config
//! files. Optional fields fall back to defaults in their accessors.
//!
//! Boolean switches are not exposed as CLI flags: a `SetTrue` flag that is
//! absent still reports `false`, which would mask `true` defaults and
//! environment values. Set them through the environment or a config file.

use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::DEFAULT_MAX_CONNECTIONS;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Server, storage and session settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MIMIR")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string; the in-memory store is used when unset.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub database_max_connections: Option<u32>,
    /// Create the sample entries when the store is empty.
    #[ortho_config(default = true, skip_cli)]
    pub seed_sample_entries: bool,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    #[ortho_config(default = true, skip_cli)]
    pub session_cookie_secure: bool,
    /// Allow a generated session key when the key file cannot be read.
    #[ortho_config(default = false, skip_cli)]
    pub session_allow_ephemeral: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            database_url: None,
            database_max_connections: None,
            seed_sample_entries: true,
            session_key_file: None,
            session_cookie_secure: true,
            session_allow_ephemeral: false,
        }
    }
}

impl AppSettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Address pair accepted by `HttpServer::bind`.
    pub fn bind_address(&self) -> (String, u16) {
        (self.host().to_owned(), self.port())
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn database_max_connections(&self) -> u32 {
        self.database_max_connections
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    pub fn seed_sample_entries(&self) -> bool {
        self.seed_sample_entries
    }

    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
    }

    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral
    }
}
