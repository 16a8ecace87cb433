//! Route table for the calculator module.

use std::sync::Arc;

use axum::Router;
use axum::extract::Extension;
use axum::routing::get;

use super::handlers;
use crate::domain::service::CalculatorService;

pub fn router(service: Arc<CalculatorService>) -> Router {
    Router::new()
        .route(
            "/calculator",
            get(handlers::list_calculations).post(handlers::create_calculation),
        )
        .route(
            "/calculator/{id}",
            get(handlers::get_calculation)
                .put(handlers::update_calculation)
                .delete(handlers::delete_calculation),
        )
        .layer(Extension(service))
}
