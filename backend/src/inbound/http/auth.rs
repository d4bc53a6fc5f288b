//! Authentication handlers.
//!
//! ```text
//! POST /api/login {"username":"admin","password":"password"}
//! POST /api/logout
//! GET  /api/auth/user
//! ```
//!
//! Credential checks are delegated to the identity provider port; the
//! returned profile is upserted into storage on every successful login.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::IdentityProviderError;
use crate::domain::{Error, LoginCredentials, LoginValidationError, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::user_storage_error;
use crate::inbound::http::schemas::{ErrorSchema, MessageResponse, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let code = match err {
        LoginValidationError::EmptyUsername => "empty_username",
        LoginValidationError::EmptyPassword => "empty_password",
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": code }))
}

fn map_identity_error(err: IdentityProviderError) -> Error {
    match err {
        IdentityProviderError::InvalidCredentials => Error::unauthorized("invalid credentials"),
        IdentityProviderError::Unavailable { message } => {
            warn!(%message, "identity provider unavailable");
            Error::service_unavailable("identity provider unavailable")
        }
    }
}

/// Authenticate, record the user's profile and establish a session.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserSchema,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<User>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let profile = state
        .identity
        .authenticate(&credentials)
        .await
        .map_err(map_identity_error)?;
    let user = state
        .users
        .upsert_user(profile)
        .await
        .map_err(|err| user_storage_error(err, "upsert user"))?;
    session.persist_user(&user.id)?;
    info!(user_id = %user.id, "user signed in");
    Ok(web::Json(user))
}

/// End the current session. Succeeds whether or not a session existed.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses((status = 200, description = "Logged out", body = MessageResponse)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::Ok().json(MessageResponse::new("Logged out"))
}

/// The signed-in user.
#[utoipa::path(
    get,
    path = "/api/auth/user",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/user")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let user_id = session.require_user_id()?;
    let user = state
        .users
        .get_user(&user_id)
        .await
        .map_err(|err| user_storage_error(err, "get user"))?;
    match user {
        Some(user) => Ok(web::Json(user)),
        None => {
            // A valid cookie for a user the store no longer knows, e.g. after
            // an in-memory store restarted.
            session.clear();
            Err(Error::unauthorized("login required"))
        }
    }
}
