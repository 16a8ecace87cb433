//! Calculator module.
//!
//! Evaluates arithmetic commands and keeps the resulting records in an
//! ordered, in-memory store exposed as the `/calculator` REST resource.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod module;

pub use config::CalculatorConfig;
pub use module::CalculatorModule;
