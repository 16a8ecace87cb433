//! API contract validation.
//!
//! A [`Contract`] is built once from an OpenAPI 3.x document and is read-only
//! afterwards. It resolves a method and path to the declared operation and
//! checks raw request and response parts (path, query, headers, JSON bodies)
//! against the operation's JSON schemas. Nothing here depends on the HTTP
//! framework, so the same object backs the server middleware and plain unit
//! tests over `serde_json` payloads.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod contract;
pub mod error;
mod schema;

pub use api_errors::ValidationViolation;
pub use contract::{Contract, Lookup, Operation, RequestParts, ResponseParts};
pub use error::ContractError;
