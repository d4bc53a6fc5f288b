//! Shared helpers for integration tests.

pub mod cluster_skip;
pub mod embedded_postgres;
