//! OpenAPI description of the calculator resource.

use api_errors::{Problem, ValidationViolation};
use utoipa::OpenApi;

use super::dto::{CalculationCommandDto, CalculationDto, OperatorDto};
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_calculations,
        handlers::get_calculation,
        handlers::create_calculation,
        handlers::update_calculation,
        handlers::delete_calculation,
    ),
    components(schemas(
        CalculationDto,
        CalculationCommandDto,
        OperatorDto,
        Problem,
        ValidationViolation,
    )),
    tags((name = "calculator", description = "Arithmetic calculations over two operands"))
)]
pub struct CalculatorApi;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_document_declares_every_operation() {
        let doc = serde_json::to_value(CalculatorApi::openapi()).unwrap();
        let paths = &doc["paths"];

        for method in ["get", "post"] {
            assert!(paths["/calculator"][method].is_object(), "{method} /calculator");
        }
        for method in ["get", "put", "delete"] {
            assert!(paths["/calculator/{id}"][method].is_object(), "{method} /calculator/{{id}}");
        }
        assert!(paths["/calculator/{id}"]["patch"].is_null());
    }

    #[test]
    fn test_operator_schema_lists_symbols() {
        let doc = serde_json::to_value(CalculatorApi::openapi()).unwrap();
        let operators = &doc["components"]["schemas"]["OperatorDto"]["enum"];
        assert_eq!(*operators, serde_json::json!(["+", "-", "*", "/"]));
    }

    #[test]
    fn test_optional_record_fields_are_not_nullable() {
        let doc = serde_json::to_value(CalculatorApi::openapi()).unwrap();
        let record = &doc["components"]["schemas"]["CalculationDto"];
        assert_eq!(record["properties"]["result"]["type"], "number");
        assert_eq!(record["properties"]["message"]["type"], "string");

        let required = record["required"].as_array().unwrap();
        assert!(!required.iter().any(|f| f == "result" || f == "message"));
    }
}
