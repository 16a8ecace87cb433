//! In-memory calculation store.

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::model::{CalculationCommand, CalculationRecord, Operator};
use crate::domain::repo::CalculationRepository;

/// Demonstration records present at startup: `(operator, operand1, operand2, timestamp)`.
const SEED: [(Operator, f64, f64, i64); 5] = [
    (Operator::Add, 1.0, 0.0, 1_688_612_539_479),
    (Operator::Subtract, 20.0, 10.0, 1_843_612_559_479),
    (Operator::Multiply, 2.0, 3.0, 1_188_212_539_479),
    (Operator::Divide, 10.0, 2.0, 1_788_612_539_479),
    (Operator::Divide, 1.0, 0.0, 1_288_612_539_479),
];

/// Ordered collection behind a single lock.
///
/// Ids come from a counter that only moves forward, so a deleted id is never
/// handed out again.
pub struct InMemoryCalculationRepository {
    inner: Mutex<Inner>,
}

struct Inner {
    records: Vec<CalculationRecord>,
    next_id: u64,
}

impl Inner {
    fn position(&self, id: &str) -> Result<usize, DomainError> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DomainError::not_found(id))
    }

    fn allocate_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }
}

impl InMemoryCalculationRepository {
    /// An empty store whose first id is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// A store holding the five demonstration records with ids `1` to `5`.
    #[must_use]
    pub fn seeded() -> Self {
        let records = SEED
            .iter()
            .zip(1_u32..)
            .map(|(&(operator, a, b, timestamp), id)| {
                CalculationRecord::evaluate(
                    id.to_string(),
                    CalculationCommand::new(operator, a, b),
                    timestamp,
                )
            })
            .collect();
        Self::with_records(records)
    }

    /// A store holding `records` in the given order. The id counter starts
    /// past the highest numeric id among them.
    #[must_use]
    pub fn with_records(records: Vec<CalculationRecord>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|r| r.id.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);
        Self {
            inner: Mutex::new(Inner { records, next_id }),
        }
    }
}

impl Default for InMemoryCalculationRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculationRepository for InMemoryCalculationRepository {
    fn list(&self) -> Result<Vec<CalculationRecord>, DomainError> {
        Ok(self.inner.lock().records.clone())
    }

    fn get(&self, id: &str) -> Result<CalculationRecord, DomainError> {
        let inner = self.inner.lock();
        let idx = inner.position(id)?;
        Ok(inner.records[idx].clone())
    }

    fn create(
        &self,
        command: CalculationCommand,
        timestamp: i64,
    ) -> Result<CalculationRecord, DomainError> {
        let mut inner = self.inner.lock();
        let id = inner.allocate_id();
        let record = CalculationRecord::evaluate(id, command, timestamp);
        inner.records.push(record.clone());
        debug!(id = %record.id, size = inner.records.len(), "record appended");
        Ok(record)
    }

    fn update(
        &self,
        id: &str,
        command: CalculationCommand,
        timestamp: i64,
    ) -> Result<CalculationRecord, DomainError> {
        let mut inner = self.inner.lock();
        let idx = inner.position(id)?;
        let record = CalculationRecord::evaluate(id.to_owned(), command, timestamp);
        inner.records[idx] = record.clone();
        Ok(record)
    }

    fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut inner = self.inner.lock();
        let idx = inner.position(id)?;
        inner.records.remove(idx);
        debug!(%id, size = inner.records.len(), "record removed");
        Ok(())
    }
}
