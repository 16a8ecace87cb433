//! Error model shared by the calculator API crates.
//!
//! - RFC 9457 Problem Details (`Problem`), the only error body the API emits
//! - The static catalog of problem types (`ErrDef`)
//! - The API error taxonomy (`ApiError`) and its translation into `Problem`
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod error;
pub mod problem;

pub use catalog::ErrDef;
pub use error::{ApiError, ApiResult};
pub use problem::{APPLICATION_PROBLEM_JSON, Problem, ValidationViolation};
