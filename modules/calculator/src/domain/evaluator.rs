//! Pure arithmetic over [`Operator`]s.

use super::model::Operator;

/// Message recorded instead of a result when dividing by zero.
pub const DIVISION_BY_ZERO: &str = "Division by zero";

/// Message recorded when the value overflows or is undefined in `f64`.
pub const NON_FINITE_RESULT: &str = "Result is not a finite number";

/// Outcome of evaluating a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Value(f64),
    Message(String),
}

/// Applies `operator` to the operands. Never fails: division by zero and
/// results outside the finite `f64` range are carried as [`Evaluation::Message`].
#[must_use]
pub fn evaluate(operator: Operator, operand1: f64, operand2: f64) -> Evaluation {
    let value = match operator {
        Operator::Add => operand1 + operand2,
        Operator::Subtract => operand1 - operand2,
        Operator::Multiply => operand1 * operand2,
        Operator::Divide if operand2 == 0.0 => {
            return Evaluation::Message(DIVISION_BY_ZERO.to_owned());
        }
        Operator::Divide => operand1 / operand2,
    };

    if value.is_finite() {
        Evaluation::Value(value)
    } else {
        Evaluation::Message(NON_FINITE_RESULT.to_owned())
    }
}
