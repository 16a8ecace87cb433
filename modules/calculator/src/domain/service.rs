//! Domain service for the calculator module.

use std::sync::Arc;

use tracing::debug;

use super::error::DomainError;
use super::model::{CalculationCommand, CalculationRecord};
use super::repo::CalculationRepository;

/// Calculator operations, delegating storage to a [`CalculationRepository`].
pub struct CalculatorService {
    repo: Arc<dyn CalculationRepository>,
}

impl CalculatorService {
    #[must_use]
    pub fn new(repo: Arc<dyn CalculationRepository>) -> Self {
        Self { repo }
    }

    /// # Errors
    ///
    /// Propagates repository failures.
    pub fn list(&self) -> Result<Vec<CalculationRecord>, DomainError> {
        self.repo.list()
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn get(&self, id: &str) -> Result<CalculationRecord, DomainError> {
        self.repo.get(id)
    }

    /// # Errors
    ///
    /// Propagates repository failures.
    pub fn create(
        &self,
        command: CalculationCommand,
        timestamp: i64,
    ) -> Result<CalculationRecord, DomainError> {
        let record = self.repo.create(command, timestamp)?;
        debug!(id = %record.id, operator = %record.operator, "calculation created");
        Ok(record)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn update(
        &self,
        id: &str,
        command: CalculationCommand,
        timestamp: i64,
    ) -> Result<CalculationRecord, DomainError> {
        let record = self.repo.update(id, command, timestamp)?;
        debug!(id = %record.id, operator = %record.operator, "calculation replaced");
        Ok(record)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.repo.delete(id)?;
        debug!(%id, "calculation deleted");
        Ok(())
    }
}
