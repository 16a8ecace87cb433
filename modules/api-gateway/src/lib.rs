//! HTTP host for REST modules.
//!
//! [`ApiGateway`] merges the routers and OpenAPI fragments of every mounted
//! [`RestModule`], compiles the merged document into an
//! [`api_contract::Contract`] and wraps the result in the middleware stack:
//!
//! `SetRequestId` → `PropagateRequestId` → Trace → `CatchPanic` → Timeout →
//! `BodyLimit` → Timestamp → Contract validation → Router.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod middleware;
pub mod module;
pub mod web;

pub use config::ApiGatewayConfig;
pub use middleware::timestamp::RequestTimestamp;
pub use module::{ApiGateway, RestModule};
