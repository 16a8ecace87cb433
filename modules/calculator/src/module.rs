//! Module declaration for the calculator module.

use std::sync::Arc;

use api_gateway::RestModule;
use axum::Router;
use tracing::info;
use utoipa::OpenApi;

use crate::api::rest::openapi::CalculatorApi;
use crate::api::rest::routes;
use crate::config::CalculatorConfig;
use crate::domain::repo::CalculationRepository;
use crate::domain::service::CalculatorService;
use crate::infra::InMemoryCalculationRepository;

/// Calculator module: owns the store and exposes the `/calculator` resource.
pub struct CalculatorModule {
    service: Arc<CalculatorService>,
}

impl CalculatorModule {
    #[must_use]
    pub fn new(cfg: &CalculatorConfig) -> Self {
        let repo: Arc<dyn CalculationRepository> = if cfg.seed {
            Arc::new(InMemoryCalculationRepository::seeded())
        } else {
            Arc::new(InMemoryCalculationRepository::new())
        };
        info!(seed = cfg.seed, "calculator module initialized");
        Self::with_repository(repo)
    }

    /// Builds the module over an existing store.
    #[must_use]
    pub fn with_repository(repo: Arc<dyn CalculationRepository>) -> Self {
        Self {
            service: Arc::new(CalculatorService::new(repo)),
        }
    }

    #[must_use]
    pub fn service(&self) -> Arc<CalculatorService> {
        Arc::clone(&self.service)
    }
}

impl RestModule for CalculatorModule {
    fn name(&self) -> &'static str {
        "calculator"
    }

    fn router(&self) -> Router {
        routes::router(self.service())
    }

    fn openapi(&self) -> utoipa::openapi::OpenApi {
        CalculatorApi::openapi()
    }
}
