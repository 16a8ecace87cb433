//! Calculator domain types.

use std::fmt;

use super::error::DomainError;
use super::evaluator::{self, Evaluation};

/// The four supported arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

impl TryFrom<&str> for Operator {
    type Error = DomainError;

    fn try_from(symbol: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|op| op.symbol() == symbol)
            .ok_or_else(|| DomainError::invalid_operator(symbol))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A client-submitted operation, not yet evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationCommand {
    pub operator: Operator,
    pub operand1: f64,
    pub operand2: f64,
}

impl CalculationCommand {
    #[must_use]
    pub const fn new(operator: Operator, operand1: f64, operand2: f64) -> Self {
        Self {
            operator,
            operand1,
            operand2,
        }
    }
}

/// A stored calculation. Exactly one of `result` and `message` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRecord {
    pub id: String,
    pub operator: Operator,
    pub operand1: f64,
    pub operand2: f64,
    pub result: Option<f64>,
    pub message: Option<String>,
    /// Milliseconds since the Unix epoch, captured at request ingress.
    pub timestamp: i64,
}

impl CalculationRecord {
    /// Evaluates `command` and builds the record stored under `id`.
    #[must_use]
    pub fn evaluate(id: String, command: CalculationCommand, timestamp: i64) -> Self {
        let (result, message) =
            match evaluator::evaluate(command.operator, command.operand1, command.operand2) {
                Evaluation::Value(value) => (Some(value), None),
                Evaluation::Message(text) => (None, Some(text)),
            };
        Self {
            id,
            operator: command.operator,
            operand1: command.operand1,
            operand2: command.operand2,
            result,
            message,
            timestamp,
        }
    }

    #[must_use]
    pub const fn command(&self) -> CalculationCommand {
        CalculationCommand::new(self.operator, self.operand1, self.operand2)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_operator_round_trips_through_symbol() {
        for op in Operator::ALL {
            assert_eq!(Operator::try_from(op.symbol()).unwrap(), op);
            assert_eq!(op.to_string(), op.symbol());
        }
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        let err = Operator::try_from("%").unwrap_err();
        assert!(matches!(err, DomainError::InvalidOperator(s) if s == "%"));
        assert!(Operator::try_from("").is_err());
        assert!(Operator::try_from("++").is_err());
    }

    #[test]
    fn test_record_sets_exactly_one_outcome() {
        let ok = CalculationRecord::evaluate(
            "7".to_owned(),
            CalculationCommand::new(Operator::Multiply, 2.0, 3.0),
            10,
        );
        assert_eq!(ok.result, Some(6.0));
        assert!(ok.message.is_none());
        assert_eq!(ok.timestamp, 10);

        let div0 = CalculationRecord::evaluate(
            "8".to_owned(),
            CalculationCommand::new(Operator::Divide, 1.0, 0.0),
            11,
        );
        assert!(div0.result.is_none());
        assert_eq!(div0.message.as_deref(), Some(evaluator::DIVISION_BY_ZERO));
        assert_eq!(div0.command(), CalculationCommand::new(Operator::Divide, 1.0, 0.0));
    }
}
