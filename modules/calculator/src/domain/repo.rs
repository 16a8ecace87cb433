//! Storage abstraction for calculation records.

use super::error::DomainError;
use super::model::{CalculationCommand, CalculationRecord};

/// Ordered store of calculation records.
///
/// Implementations own id assignment and must apply each call atomically:
/// evaluation and mutation of a single `create` or `update` are never
/// interleaved with another operation.
pub trait CalculationRepository: Send + Sync {
    /// All records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the storage backend fails.
    fn list(&self) -> Result<Vec<CalculationRecord>, DomainError>;

    /// # Errors
    ///
    /// Returns `NotFound` if no record has this id.
    fn get(&self, id: &str) -> Result<CalculationRecord, DomainError>;

    /// Evaluates `command`, assigns a fresh id and appends the record.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the storage backend fails.
    fn create(
        &self,
        command: CalculationCommand,
        timestamp: i64,
    ) -> Result<CalculationRecord, DomainError>;

    /// Re-evaluates `command` and replaces the record in place, keeping its id
    /// and position.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no record has this id.
    fn update(
        &self,
        id: &str,
        command: CalculationCommand,
        timestamp: i64,
    ) -> Result<CalculationRecord, DomainError>;

    /// # Errors
    ///
    /// Returns `NotFound` if no record has this id.
    fn delete(&self, id: &str) -> Result<(), DomainError>;
}
