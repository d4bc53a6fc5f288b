//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting the signed-in user or
//! resolving the actor for a write.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{ActorId, Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// The signed-in user as the actor recorded on writes.
    pub fn require_actor(&self) -> Result<ActorId, Error> {
        let user_id = self.require_user_id()?;
        ActorId::new(user_id.as_str())
            .map_err(|error| Error::internal(format!("invalid session actor: {error}")))
    }

    /// Drop every value stored in the session.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test, web};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .route(
                "/set",
                web::get().to(|session: SessionContext| async move {
                    let id = UserId::new("admin").expect("fixture id");
                    session.persist_user(&id)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/actor",
                web::get().to(|session: SessionContext| async move {
                    let actor = session.require_actor()?;
                    Ok::<_, Error>(HttpResponse::Ok().body(actor.to_string()))
                }),
            )
            .route(
                "/clear",
                web::get().to(|session: SessionContext| async move {
                    session.clear();
                    HttpResponse::Ok()
                }),
            )
            .route(
                "/set-padded",
                web::get().to(|session: Session| async move {
                    session
                        .insert(USER_ID_KEY, " admin ")
                        .expect("set padded user id");
                    HttpResponse::Ok()
                }),
            )
    }

    #[actix_web::test]
    async fn persisted_user_becomes_the_actor() {
        let app = actix_test::init_service(session_test_app()).await;

        let set_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/set").to_request(),
        )
        .await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/actor")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(res).await, "admin");
    }

    #[actix_web::test]
    async fn missing_user_is_unauthorised() {
        let app = actix_test::init_service(session_test_app()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/actor").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_user_id_is_unauthorised() {
        let app = actix_test::init_service(session_test_app()).await;

        let set_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/set-padded").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/actor")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn cleared_session_no_longer_authorises() {
        let app = actix_test::init_service(session_test_app()).await;

        let set_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/set").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res);

        let clear_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/clear")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let removal = clear_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("removal cookie");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/actor")
                .cookie(removal.into_owned())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
