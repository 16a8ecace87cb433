//! Compiled JSON schemas taken from a contract document.

use serde_json::{Map, Value};

use crate::ValidationViolation;
use crate::error::ContractError;

/// A schema fragment compiled together with the document's `components`,
/// so local `#/components/...` references resolve against the same root.
pub struct CompiledSchema {
    validator: jsonschema::Validator,
}

impl std::fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema").finish_non_exhaustive()
    }
}

impl CompiledSchema {
    pub fn compile(
        schema: &Value,
        components: Option<&Value>,
        location: &str,
    ) -> Result<Self, ContractError> {
        let mut root = Map::new();
        root.insert("allOf".to_owned(), Value::Array(vec![schema.clone()]));
        if let Some(components) = components {
            root.insert("components".to_owned(), components.clone());
        }

        let root = Value::Object(root);
        check_local_refs(&root, &root)?;

        let validator = jsonschema::validator_for(&root).map_err(|e| {
            ContractError::InvalidSchema {
                location: location.to_owned(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self { validator })
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Every violation of `instance`, reported under `field`.
    pub fn violations(&self, instance: &Value, field: &str) -> Vec<ValidationViolation> {
        self.validator
            .iter_errors(instance)
            .map(|err| ValidationViolation::new(field, err.to_string()))
            .collect()
    }
}

/// Fail fast on `#/...` references that point nowhere in `root`.
fn check_local_refs(root: &Value, node: &Value) -> Result<(), ContractError> {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(reference)) = map.get("$ref") {
                if let Some(pointer) = reference.strip_prefix('#') {
                    if root.pointer(pointer).is_none() {
                        return Err(ContractError::UnresolvedRef(reference.clone()));
                    }
                }
            }
            map.values().try_for_each(|v| check_local_refs(root, v))
        }
        Value::Array(items) => items.iter().try_for_each(|v| check_local_refs(root, v)),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_component_references() {
        let components = json!({
            "schemas": {
                "Op": { "type": "string", "enum": ["+", "-"] }
            }
        });
        let schema = CompiledSchema::compile(
            &json!({ "$ref": "#/components/schemas/Op" }),
            Some(&components),
            "test",
        )
        .unwrap();

        assert!(schema.is_valid(&json!("+")));
        assert!(!schema.is_valid(&json!("%")));
    }

    #[test]
    fn reports_violations_under_field() {
        let schema = CompiledSchema::compile(
            &json!({ "type": "object", "required": ["a"] }),
            None,
            "test",
        )
        .unwrap();

        let violations = schema.violations(&json!({}), "body");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "body");
        assert!(violations[0].message.contains('a'));
    }

    #[test]
    fn dangling_reference_fails_to_compile() {
        let result = CompiledSchema::compile(
            &json!({ "$ref": "#/components/schemas/Missing" }),
            Some(&json!({ "schemas": {} })),
            "test",
        );
        assert!(matches!(
            result,
            Err(ContractError::UnresolvedRef(r)) if r == "#/components/schemas/Missing"
        ));
    }
}
