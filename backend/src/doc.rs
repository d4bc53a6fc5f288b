//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer (entries,
//! auth, health) together with the schema wrappers that describe domain
//! types without coupling them to utoipa. The document backs Swagger UI in
//! debug builds and is exported via `cargo run --bin openapi-dump`.

use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::schemas::{
    CategorySchema, EntryDraftSchema, EntryPageSchema, EntrySchema, ErrorCodeSchema, ErrorSchema,
    FieldErrorCodeSchema, FieldErrorSchema, MessageResponse, UserSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Mimir API",
        description = "Encyclopedia of Norse mythology: entry browsing, search and \
                       session-authenticated editing.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::entries::list_entries,
        crate::inbound::http::entries::get_entry,
        crate::inbound::http::entries::create_entry,
        crate::inbound::http::entries::update_entry,
        crate::inbound::http::entries::delete_entry,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        EntrySchema,
        EntryDraftSchema,
        EntryPageSchema,
        CategorySchema,
        UserSchema,
        ErrorSchema,
        ErrorCodeSchema,
        FieldErrorSchema,
        FieldErrorCodeSchema,
        MessageResponse,
        LoginRequest,
    )),
    tags(
        (name = "entries", description = "Browse, search and edit encyclopedia entries"),
        (name = "auth", description = "Session login and logout"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
