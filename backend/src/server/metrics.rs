//! Prometheus middleware that can be switched off at runtime.
//!
//! Both arms box the wrapped service so `App::wrap` sees one type whether
//! or not metrics registration succeeded at startup.

use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::PrometheusMetrics;
use futures_util::future::LocalBoxFuture;

type BoxedResponse = ServiceResponse<BoxBody>;

#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        metrics.map_or(Self::Disabled, |metrics| Self::Enabled(Arc::new(metrics)))
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = BoxedResponse;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, BoxedResponse, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Self::Enabled(metrics) = self else {
            return Box::pin(async move {
                let passthrough = service.map(ServiceResponse::map_into_boxed_body);
                Ok(boxed::service(passthrough))
            });
        };
        let pending = Compat::new(PrometheusMetrics::clone(metrics)).new_transform(service);
        Box::pin(async move { Ok(boxed::service(pending.await?)) })
    }
}
