//! REST DTOs for the calculator module.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::error::DomainError;
use crate::domain::model::{CalculationCommand, CalculationRecord, Operator};

/// Arithmetic operator symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum OperatorDto {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
}

impl From<Operator> for OperatorDto {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Add => Self::Add,
            Operator::Subtract => Self::Subtract,
            Operator::Multiply => Self::Multiply,
            Operator::Divide => Self::Divide,
        }
    }
}

/// Request body for creating or replacing a calculation.
///
/// `operator` is kept as raw text here and checked by the domain, so a
/// symbol that slips past contract validation still fails as a 400.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalculationCommandDto {
    #[schema(value_type = OperatorDto)]
    pub operator: String,
    pub operand1: f64,
    pub operand2: f64,
}

impl TryFrom<CalculationCommandDto> for CalculationCommand {
    type Error = DomainError;

    fn try_from(dto: CalculationCommandDto) -> Result<Self, Self::Error> {
        let operator = Operator::try_from(dto.operator.as_str())?;
        Ok(Self::new(operator, dto.operand1, dto.operand2))
    }
}

/// A stored calculation. Exactly one of `result` and `message` is present.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalculationDto {
    pub id: String,
    pub operator: OperatorDto,
    pub operand1: f64,
    pub operand2: f64,
    /// Present when the operation produced a value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(nullable = false)]
    pub result: Option<f64>,
    /// Present when the operation failed semantically, e.g. `Division by zero`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(nullable = false)]
    pub message: Option<String>,
    /// Milliseconds since the Unix epoch at which the request was received.
    pub timestamp: i64,
}

impl From<CalculationRecord> for CalculationDto {
    fn from(record: CalculationRecord) -> Self {
        Self {
            id: record.id,
            operator: record.operator.into(),
            operand1: record.operand1,
            operand2: record.operand2,
            result: record.result,
            message: record.message,
            timestamp: record.timestamp,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::domain::evaluator::DIVISION_BY_ZERO;
    use serde_json::json;

    #[test]
    fn test_absent_outcome_fields_are_omitted() {
        let record = CalculationRecord::evaluate(
            "5".to_owned(),
            CalculationCommand::new(Operator::Divide, 1.0, 0.0),
            1_288_612_539_479,
        );
        let value = serde_json::to_value(CalculationDto::from(record)).unwrap();

        assert_eq!(
            value,
            json!({
                "id": "5",
                "operator": "/",
                "operand1": 1.0,
                "operand2": 0.0,
                "message": DIVISION_BY_ZERO,
                "timestamp": 1_288_612_539_479_i64
            })
        );
    }

    #[test]
    fn test_command_conversion_checks_operator() {
        let dto: CalculationCommandDto =
            serde_json::from_value(json!({ "operator": "*", "operand1": 2, "operand2": 4 }))
                .unwrap();
        let cmd = CalculationCommand::try_from(dto).unwrap();
        assert_eq!(cmd, CalculationCommand::new(Operator::Multiply, 2.0, 4.0));

        let dto: CalculationCommandDto =
            serde_json::from_value(json!({ "operator": "^", "operand1": 2, "operand2": 4 }))
                .unwrap();
        assert!(matches!(
            CalculationCommand::try_from(dto),
            Err(DomainError::InvalidOperator(_))
        ));
    }

    #[test]
    fn test_server_assigned_fields_are_ignored_in_commands() {
        let dto: CalculationCommandDto = serde_json::from_value(json!({
            "id": "99",
            "timestamp": 1,
            "operator": "+",
            "operand1": 1,
            "operand2": 2
        }))
        .unwrap();
        assert_eq!(dto.operator, "+");
    }
}
