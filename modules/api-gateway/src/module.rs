//! The `ApiGateway` host and the `RestModule` seam modules plug into.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use api_contract::Contract;
use axum::Router;
use axum::extract::{DefaultBodyLimit, Extension};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::field::Empty;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::config::ApiGatewayConfig;
use crate::middleware;
use crate::web;

/// A module exposing REST routes together with their OpenAPI description.
pub trait RestModule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Routes served by this module. Handlers may rely on the gateway's
    /// request extensions such as [`crate::RequestTimestamp`].
    fn router(&self) -> Router;

    /// OpenAPI fragment describing exactly the routes above.
    fn openapi(&self) -> utoipa::openapi::OpenApi;
}

/// Owns the HTTP server: assembles module routers, the contract and the middleware stack.
pub struct ApiGateway {
    config: Arc<ApiGatewayConfig>,
    modules: Vec<Arc<dyn RestModule>>,
}

impl ApiGateway {
    #[must_use]
    pub fn new(config: ApiGatewayConfig) -> Self {
        Self {
            config: Arc::new(config),
            modules: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_module(mut self, module: Arc<dyn RestModule>) -> Self {
        debug!(module = module.name(), "REST module mounted");
        self.modules.push(module);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ApiGatewayConfig {
        &self.config
    }

    /// The document generated from the gateway's own endpoints and every mounted module.
    #[must_use]
    pub fn build_openapi(&self) -> utoipa::openapi::OpenApi {
        let mut doc = web::GatewayApi::openapi();
        for module in &self.modules {
            doc.merge(module.openapi());
        }
        doc
    }

    /// The contract requests and responses are validated against: the file
    /// named by `contract_path` when set, the generated document otherwise.
    ///
    /// # Errors
    /// Returns an error if the document cannot be read, parsed or compiled.
    pub fn load_contract(&self) -> Result<Contract> {
        if let Some(path) = &self.config.contract_path {
            info!(path = %path.display(), "loading API contract from file");
            return Contract::from_file(path)
                .with_context(|| format!("invalid API contract in {}", path.display()));
        }

        let document = serde_json::to_value(self.build_openapi())
            .context("failed to serialize the generated OpenAPI document")?;
        Contract::from_document(document)
            .context("generated OpenAPI document is not a valid contract")
    }

    /// Apply trace layer to router.
    fn apply_trace_layer(router: Router) -> Router {
        router.layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                    let rid = req
                        .headers()
                        .get(middleware::request_id::header())
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("n/a");

                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri().path(),
                        request_id = %rid,
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<axum::body::Body>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", res.status().as_u16());
                        span.record("latency_ms", latency.as_millis());
                    },
                ),
        )
    }

    /// Apply all middleware layers to a router.
    ///
    /// Layers are registered innermost first. At runtime requests flow:
    /// `SetRequestId` → `PropagateRequestId` → Trace → `CatchPanic` → Timeout →
    /// `BodyLimit` → Timestamp → Contract → Router.
    fn apply_middleware_stack(&self, mut router: Router, contract: Arc<Contract>) -> Router {
        let config = &self.config;

        // 7) Contract validation
        router = router.layer(from_fn_with_state(
            middleware::contract::ContractValidation::new(contract, Arc::clone(config)),
            middleware::contract::validate_contract,
        ));

        // 6) Timestamp
        router = router.layer(from_fn(middleware::timestamp::stamp_request));

        // 5) Body limit
        router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));
        router = router.layer(DefaultBodyLimit::max(config.body_limit_bytes));

        // 4) Timeout
        router = router.layer(from_fn_with_state(
            config.request_timeout,
            middleware::timeout::enforce_timeout,
        ));

        // 3) Panics become 500 Problems
        router = router.layer(CatchPanicLayer::custom(middleware::panic::panic_to_problem));

        // 2) Trace
        router = Self::apply_trace_layer(router);

        // 1) Request id: generated or taken from the request, echoed on the response
        let x_request_id = middleware::request_id::header();
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router.layer(SetRequestIdLayer::new(
            x_request_id,
            middleware::request_id::MakeReqId,
        ))
    }

    /// Build the fully layered router.
    ///
    /// # Errors
    /// Returns an error if the contract cannot be loaded.
    pub fn build_router(&self) -> Result<Router> {
        let contract = Arc::new(self.load_contract()?);
        let document = web::ContractDocument(Arc::new(contract.document().clone()));
        info!(
            operations = contract.operations().count(),
            validate_requests = self.config.validate_requests,
            validate_responses = self.config.validate_responses,
            "API contract loaded"
        );

        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .route(
                "/openapi.json",
                get(web::openapi_document).layer(Extension(document)),
            );
        for module in &self.modules {
            router = router.merge(module.router());
        }
        let router = router
            .fallback(web::route_not_found)
            .method_not_allowed_fallback(web::method_not_allowed);

        Ok(self.apply_middleware_stack(router, contract))
    }

    /// Bind `addr` and serve until `cancel` fires, then drain in-flight requests.
    ///
    /// # Errors
    /// Returns an error if the router cannot be built, the address cannot be
    /// bound or the server fails.
    pub async fn serve(&self, addr: SocketAddr, cancel: CancellationToken) -> Result<()> {
        let router = self.build_router()?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!("HTTP server bound on {}", listener.local_addr().unwrap_or(addr));

        let shutdown = async move {
            cancel.cancelled().await;
            info!("HTTP server shutting down gracefully (cancellation)");
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
