//! HTTP inbound adapter exposing the entries, auth and health endpoints.

pub mod auth;
pub mod entries;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::{ApiResult, json_config, query_config};
