//! Storage adapters implementing the entry and user ports.
//!
//! - [`MemoryStorage`]: process-local maps, used when no database is
//!   configured.
//! - [`DieselStorage`]: PostgreSQL via Diesel, `diesel-async` and a `bb8`
//!   pool. Row structs and table definitions stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mimir::outbound::persistence::{DbPool, DieselStorage, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/mimir")).await?;
//! let storage = DieselStorage::new(pool, Arc::new(mockable::DefaultClock));
//! ```

mod diesel_error_mapping;
mod diesel_storage;
mod memory_storage;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_storage::DieselStorage;
pub use memory_storage::MemoryStorage;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};
