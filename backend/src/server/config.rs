//! HTTP server configuration object and helpers.

use mimir::inbound::http::session_config::SessionSettings;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: (String, u16),
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings and
    /// the address pair to bind.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: (String, u16)) -> Self {
        Self {
            session,
            bind_addr,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Return the address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.bind_addr.0.as_str(), self.bind_addr.1)
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
