//! Mimir backend library: a Norse mythology encyclopedia service.
//!
//! Layout follows a hexagonal split: `domain` holds types, validation, the
//! search rules and ports; `inbound::http` adapts them to Actix handlers;
//! `outbound::persistence` provides the in-memory and PostgreSQL stores.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod seed;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
