#![deny(missing_docs)]

//! # Schema Conversion
//!
//! Converts a single draft-07 JSON Schema into an OpenAPI 3.0 Schema Object:
//! compile, fold `patternProperties`, downgrade draft-07 keywords, and
//! (optionally) prove the result valid by embedding it into a one-operation
//! document.

use crate::compile::{JsonSchemaCompiler, SchemaCompiler};
use crate::error::{AppError, AppResult};
use crate::oas::normalization::{downgrade_to_openapi30, normalize_pattern_properties};
use crate::oas::template::DRAFT_TEMPLATE;
use crate::oas::validation::{validate_document, DocumentValidator, StructuralValidator};
use serde_json::Value;

/// Pointer of the schema slot inside the draft document.
const DRAFT_SCHEMA_POINTER: &str = "/paths/~1get~1some~1/get/responses/200/content/application~1json/schema";

/// Options of [`convert_schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Validate the converted schema as part of an OpenAPI document.
    pub validate: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// Converts `schema` with the default compiler and validator.
pub fn convert_schema(schema: &Value, options: ConvertOptions) -> AppResult<Value> {
    convert_schema_with(
        schema,
        options,
        &JsonSchemaCompiler::default(),
        &StructuralValidator,
    )
}

/// Converts `schema` with caller supplied collaborators.
pub fn convert_schema_with(
    schema: &Value,
    options: ConvertOptions,
    compiler: &dyn SchemaCompiler,
    validator: &dyn DocumentValidator,
) -> AppResult<Value> {
    log::debug!("compiling schema");
    compiler.compile(schema)?;

    log::debug!("converting patternProperties");
    let mut converted = normalize_pattern_properties(schema);
    downgrade_to_openapi30(&mut converted);

    if !options.validate {
        return Ok(converted);
    }

    let mut draft: Value = serde_yaml::from_str(DRAFT_TEMPLATE)
        .map_err(|e| AppError::General(format!("Failed to parse draft document: {}", e)))?;
    let slot = draft
        .pointer_mut(DRAFT_SCHEMA_POINTER)
        .ok_or_else(|| AppError::General("Draft document has no schema slot".into()))?;
    *slot = converted.clone();

    validate_document(validator, &draft)?;
    log::debug!("converted schema is valid OpenAPI");
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::validation::ValidationIssue;
    use serde_json::json;

    fn reply_schema() -> Value {
        json!({
            "title": "RATES_IN_LOCATION",
            "description": "Rates in location",
            "type": "object",
            "properties": {
                "currency": { "type": "string", "minLength": 3, "maxLength": 3 },
                "id": { "type": "string", "minLength": 36, "maxLength": 36 },
                "version": { "enum": [2] },
                "fromCache": { "type": "boolean" },
                "rates": {
                    "type": "object",
                    "example": { "USDEUR": "0.881367883" },
                    "patternProperties": { "^[A-Z]{6}$": { "type": "string" } },
                    "additionalProperties": false
                },
                "branches": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "id": { "type": "string" }, "open": { "type": "boolean" } },
                        "additionalProperties": false,
                        "required": ["id"]
                    }
                }
            },
            "additionalProperties": false,
            "required": ["id", "version", "currency"]
        })
    }

    struct Rejecting;

    impl DocumentValidator for Rejecting {
        fn validate(&self, _document: &Value) -> Vec<ValidationIssue> {
            vec![ValidationIssue::new("/x", "rejected")]
        }
    }

    #[test]
    fn test_convert_reply_schema() {
        let converted = convert_schema(&reply_schema(), ConvertOptions::default()).unwrap();
        assert_eq!(
            converted["properties"]["rates"]["additionalProperties"],
            json!({ "type": "string" })
        );
        assert_eq!(converted["properties"]["rates"]["x-pattern"], json!("^[A-Z]{6}$"));
        assert_eq!(converted["additionalProperties"], json!(false));
        assert!(converted["properties"]["rates"].get("patternProperties").is_none());
    }

    #[test]
    fn test_convert_without_validation_skips_validator() {
        let converted = convert_schema_with(
            &reply_schema(),
            ConvertOptions { validate: false },
            &JsonSchemaCompiler::default(),
            &Rejecting,
        )
        .unwrap();
        assert_eq!(converted["required"], json!(["id", "version", "currency"]));
    }

    #[test]
    fn test_validator_findings_abort_conversion() {
        let err = convert_schema_with(
            &reply_schema(),
            ConvertOptions::default(),
            &JsonSchemaCompiler::default(),
            &Rejecting,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), r#"[{"path":"/x","message":"rejected"}]"#);
    }

    #[test]
    fn test_invalid_schema_fails_before_conversion() {
        let err = convert_schema(&json!({ "type": 12 }), ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, AppError::SchemaCompile(_)));
    }

    fn rejection_paths(schema: Value) -> Vec<String> {
        match convert_schema(&schema, ConvertOptions::default()) {
            Err(AppError::DocumentValidation(issues)) => issues.into_iter().map(|i| i.path).collect(),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_tuple_items_fail_validation() {
        let paths = rejection_paths(json!({
            "type": "array",
            "items": [{ "type": "string" }, { "type": "integer" }]
        }));
        assert_eq!(paths, vec![format!("{}/items", DRAFT_SCHEMA_POINTER)]);
    }

    #[test]
    fn test_conditional_keywords_fail_validation() {
        let paths = rejection_paths(json!({
            "type": "object",
            "if": { "properties": { "kind": { "const": "card" } } },
            "then": { "required": ["number"] },
            "propertyNames": { "maxLength": 8 },
            "dependencies": { "number": ["expiry"] }
        }));
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|p| p.starts_with(DRAFT_SCHEMA_POINTER)));
    }

    #[test]
    fn test_conditional_keywords_pass_without_validation() {
        let converted = convert_schema(
            &json!({ "type": "object", "propertyNames": { "maxLength": 8 } }),
            ConvertOptions { validate: false },
        )
        .unwrap();
        assert_eq!(converted["propertyNames"], json!({ "maxLength": 8 }));
    }

    #[test]
    fn test_draft_keywords_are_downgraded() {
        let converted = convert_schema(
            &json!({
                "$schema": "http://json-schema.org/draft-07/schema#",
                "type": ["integer", "null"],
                "exclusiveMaximum": 10
            }),
            ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(
            converted,
            json!({ "type": "integer", "nullable": true, "maximum": 10, "exclusiveMaximum": true })
        );
    }
}
