//! Domain-level errors for the calculator module.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// No record carries the requested id.
    #[error("Calculation not found: {0}")]
    NotFound(String),

    /// An operator symbol outside `+ - * /` reached the domain.
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    #[must_use]
    pub fn invalid_operator(symbol: impl Into<String>) -> Self {
        Self::InvalidOperator(symbol.into())
    }
}
