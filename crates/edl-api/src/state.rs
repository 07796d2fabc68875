//! # Application State
//!
//! Shared state for the Axum application. Handlers hold no storage of
//! their own; everything goes through the [`LedgerService`] facade.

use std::fmt;

use metrics_exporter_prometheus::PrometheusHandle;

use edl_service::LedgerService;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Orchestration facade every handler delegates to.
    pub service: LedgerService,
    /// Prometheus render handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State without a metrics exporter. `/metrics` responds 404.
    pub fn new(service: LedgerService) -> Self {
        Self {
            service,
            metrics: None,
        }
    }

    /// State with a Prometheus render handle for `/metrics`.
    pub fn with_metrics(service: LedgerService, metrics: PrometheusHandle) -> Self {
        Self {
            service,
            metrics: Some(metrics),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}
