pub mod error;
pub mod evaluator;
pub mod model;
pub mod repo;
pub mod service;
