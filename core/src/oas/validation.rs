#![deny(missing_docs)]

//! # OpenAPI Validation
//!
//! Structural checks on assembled documents. Unlike parsing, validation never
//! stops at the first problem: every finding is collected so the caller can
//! report them together.
//!
//! Checks performed by [`StructuralValidator`]:
//! - `openapi` must be a 3.x version string.
//! - `info.title` and `info.version` must be present.
//! - Server URLs must be absolute URLs or relative references.
//! - Component keys must match `^[a-zA-Z0-9._-]+$`.
//! - Components must deserialize as OpenAPI Components.
//! - Every Schema Object, in `components` or under `paths`, must satisfy the
//!   OpenAPI 3.0 Schema Object definition (no tuple `items`, no `if`/`then`,
//!   `propertyNames`, `dependencies` or other JSON-Schema-only keywords).
//! - Local `$ref`s must resolve inside `components`.
//! - Operations must define at least one response.
//! - Path template parameters must be declared as required path parameters.

use crate::error::{AppError, AppResult};
use crate::oas::ref_utils::{collect_refs, encode_pointer_segment, split_component_ref};
use jsonschema::{Draft, Validator};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

/// Draft-04 definition of an OpenAPI 3.0 Schema Object.
const SCHEMA_OBJECT_DEFINITION: &str = include_str!("../../templates/schema_object.json");

static SCHEMA_OBJECT_VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();

const COMPONENT_KEY_PATTERN: &str = r"^[a-zA-Z0-9._-]+$";
const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// JSON pointer of the offending node.
    pub path: String,
    /// What is wrong.
    pub message: String,
}

impl ValidationIssue {
    /// Creates a finding.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Validates complete OpenAPI documents.
pub trait DocumentValidator {
    /// Returns every finding; an empty list means the document is valid.
    fn validate(&self, document: &Value) -> Vec<ValidationIssue>;
}

/// Runs `validator` and turns findings into `AppError::DocumentValidation`.
pub fn validate_document(validator: &dyn DocumentValidator, document: &Value) -> AppResult<()> {
    let issues = validator.validate(document);
    if issues.is_empty() {
        log::debug!("document passed validation");
        return Ok(());
    }
    log::debug!("document failed validation with {} issues", issues.len());
    Err(AppError::DocumentValidation(issues))
}

/// Default [`DocumentValidator`] covering the structural rules listed in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl DocumentValidator for StructuralValidator {
    fn validate(&self, document: &Value) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let Some(root) = document.as_object() else {
            issues.push(ValidationIssue::new("", "document must be an object"));
            return issues;
        };

        validate_version(root, &mut issues);
        validate_info(root, &mut issues);
        validate_servers(root, &mut issues);
        validate_components(root, &mut issues);
        validate_schemas(root, &mut issues);
        validate_refs(document, root, &mut issues);
        validate_operations(root, &mut issues);

        issues
    }
}

fn validate_version(root: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    match root.get("openapi").and_then(Value::as_str) {
        Some(version) if version.starts_with("3.") => {}
        Some(version) => issues.push(ValidationIssue::new(
            "/openapi",
            format!("unsupported OpenAPI version '{}'", version),
        )),
        None => issues.push(ValidationIssue::new(
            "/openapi",
            "missing required 'openapi' version string",
        )),
    }
}

fn validate_info(root: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    let Some(info) = root.get("info").and_then(Value::as_object) else {
        issues.push(ValidationIssue::new("/info", "missing required 'info' object"));
        return;
    };
    for field in ["title", "version"] {
        if !info.get(field).is_some_and(Value::is_string) {
            issues.push(ValidationIssue::new(
                format!("/info/{}", field),
                format!("missing required '{}' string", field),
            ));
        }
    }
}

fn validate_servers(root: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    let Some(servers) = root.get("servers") else {
        return;
    };
    let Some(servers) = servers.as_array() else {
        issues.push(ValidationIssue::new("/servers", "'servers' must be an array"));
        return;
    };
    for (index, server) in servers.iter().enumerate() {
        let location = format!("/servers/{}/url", index);
        match server.get("url").and_then(Value::as_str) {
            Some(url) if is_valid_uri_reference(url) => {}
            Some(url) => issues.push(ValidationIssue::new(
                location,
                format!("'{}' is not a valid URI reference", url),
            )),
            None => issues.push(ValidationIssue::new(location, "missing required 'url'")),
        }
    }
}

fn is_valid_uri_reference(value: &str) -> bool {
    if value.trim().is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    if Url::parse(value).is_ok() {
        return true;
    }
    Url::parse("https://example.com")
        .map(|base| Url::options().base_url(Some(&base)).parse(value).is_ok())
        .unwrap_or(false)
}

fn validate_components(root: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    let Some(components) = root.get("components") else {
        return;
    };
    let Some(sections) = components.as_object() else {
        issues.push(ValidationIssue::new("/components", "'components' must be an object"));
        return;
    };

    let key_re = Regex::new(COMPONENT_KEY_PATTERN).expect("Invalid regex constant");
    for (section, entries) in sections {
        if section.starts_with("x-") {
            continue;
        }
        let Some(entries) = entries.as_object() else {
            continue;
        };
        for key in entries.keys() {
            if !key_re.is_match(key) {
                issues.push(ValidationIssue::new(
                    format!("/components/{}/{}", section, key),
                    format!(
                        "component key '{}' must match {}",
                        key, COMPONENT_KEY_PATTERN
                    ),
                ));
            }
        }
    }

    if let Err(e) = serde_json::from_value::<utoipa::openapi::Components>(components.clone()) {
        issues.push(ValidationIssue::new(
            "/components",
            format!("invalid components: {}", e),
        ));
    }
}

fn schema_object_validator() -> &'static Result<Validator, String> {
    SCHEMA_OBJECT_VALIDATOR.get_or_init(|| {
        let definition: Value = serde_json::from_str(SCHEMA_OBJECT_DEFINITION)
            .map_err(|e| format!("Schema Object definition is not JSON: {}", e))?;
        jsonschema::options()
            .with_draft(Draft::Draft4)
            .build(&definition)
            .map_err(|e| format!("Schema Object definition failed to compile: {}", e))
    })
}

fn validate_schemas(root: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    let validator = match schema_object_validator() {
        Ok(validator) => validator,
        Err(e) => {
            issues.push(ValidationIssue::new("", e.clone()));
            return;
        }
    };

    for (location, schema) in schema_slots(root) {
        // Reference Objects are resolved by `validate_refs`.
        if schema.get("$ref").is_some() {
            continue;
        }
        for error in validator.iter_errors(schema) {
            issues.push(ValidationIssue::new(
                format!("{}{}", location, error.instance_path),
                error.to_string(),
            ));
        }
    }
}

/// Every Schema Object slot of the document, with its JSON pointer.
///
/// Nested schemas are covered by the definition itself.
fn schema_slots(root: &Map<String, Value>) -> Vec<(String, &Value)> {
    let mut slots = Vec::new();

    if let Some(components) = root.get("components").and_then(Value::as_object) {
        for (name, schema) in entries(components.get("schemas")) {
            slots.push((format!("/components/schemas/{}", encode_pointer_segment(name)), schema));
        }
        for section in ["responses", "requestBodies"] {
            for (name, owner) in entries(components.get(section)) {
                let location = format!("/components/{}/{}", section, encode_pointer_segment(name));
                content_slots(owner, &location, &mut slots);
            }
        }
        for (name, parameter) in entries(components.get("parameters")) {
            if let Some(schema) = parameter.get("schema") {
                let location = format!("/components/parameters/{}/schema", encode_pointer_segment(name));
                slots.push((location, schema));
            }
        }
    }

    for (path, item) in entries(root.get("paths")) {
        let path_location = format!("/paths/{}", encode_pointer_segment(path));
        parameter_slots(item, &path_location, &mut slots);

        for method in HTTP_METHODS {
            let Some(operation) = item.get(method) else {
                continue;
            };
            let location = format!("{}/{}", path_location, method);
            parameter_slots(operation, &location, &mut slots);
            if let Some(body) = operation.get("requestBody") {
                content_slots(body, &format!("{}/requestBody", location), &mut slots);
            }
            for (status, response) in entries(operation.get("responses")) {
                let response_location =
                    format!("{}/responses/{}", location, encode_pointer_segment(status));
                content_slots(response, &response_location, &mut slots);
            }
        }
    }

    slots
}

fn entries(value: Option<&Value>) -> impl Iterator<Item = (&String, &Value)> {
    value.and_then(Value::as_object).into_iter().flatten()
}

fn content_slots<'a>(owner: &'a Value, location: &str, slots: &mut Vec<(String, &'a Value)>) {
    for (media_type, media) in entries(owner.get("content")) {
        if let Some(schema) = media.get("schema") {
            let pointer = format!(
                "{}/content/{}/schema",
                location,
                encode_pointer_segment(media_type)
            );
            slots.push((pointer, schema));
        }
    }
}

fn parameter_slots<'a>(owner: &'a Value, location: &str, slots: &mut Vec<(String, &'a Value)>) {
    let Some(parameters) = owner.get("parameters").and_then(Value::as_array) else {
        return;
    };
    for (index, parameter) in parameters.iter().enumerate() {
        if let Some(schema) = parameter.get("schema") {
            slots.push((format!("{}/parameters/{}/schema", location, index), schema));
        }
    }
}

fn validate_refs(document: &Value, root: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    let components = root.get("components");
    for (location, target) in collect_refs(document) {
        if !target.starts_with('#') {
            continue;
        }
        let resolved = split_component_ref(&target).is_some_and(|(section, name)| {
            components
                .and_then(|c| c.get(section))
                .and_then(|s| s.get(&name))
                .is_some()
        });
        if !resolved {
            issues.push(ValidationIssue::new(
                location,
                format!("unresolved reference '{}'", target),
            ));
        }
    }
}

fn validate_operations(root: &Map<String, Value>, issues: &mut Vec<ValidationIssue>) {
    let Some(paths) = root.get("paths").and_then(Value::as_object) else {
        return;
    };

    for (path, item) in paths {
        let path_location = format!("/paths/{}", encode_pointer_segment(path));
        let templated = template_params(path);

        for method in HTTP_METHODS {
            let Some(operation) = item.get(method) else {
                continue;
            };
            let location = format!("{}/{}", path_location, method);

            let has_responses = operation
                .get("responses")
                .and_then(Value::as_object)
                .is_some_and(|r| !r.is_empty());
            if !has_responses {
                issues.push(ValidationIssue::new(
                    format!("{}/responses", location),
                    "operation must define at least one response",
                ));
            }

            validate_path_params(operation, &templated, &location, issues);
        }
    }
}

fn validate_path_params(
    operation: &Value,
    templated: &[String],
    location: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    let empty = Vec::new();
    let parameters = operation
        .get("parameters")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let mut declared = HashSet::new();
    for (index, param) in parameters.iter().enumerate() {
        if param.get("in").and_then(Value::as_str) != Some("path") {
            continue;
        }
        let Some(name) = param.get("name").and_then(Value::as_str) else {
            continue;
        };
        declared.insert(name);
        if param.get("required").and_then(Value::as_bool) != Some(true) {
            issues.push(ValidationIssue::new(
                format!("{}/parameters/{}", location, index),
                format!("path parameter '{}' must be required", name),
            ));
        }
    }

    for name in templated {
        if !declared.contains(name.as_str()) {
            issues.push(ValidationIssue::new(
                format!("{}/parameters", location),
                format!("path template parameter '{}' is not declared", name),
            ));
        }
    }
}

fn template_params(path: &str) -> Vec<String> {
    path.split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(name, _)| name.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_document() -> Value {
        json!({
            "openapi": "3.0.0",
            "info": { "title": "Billing", "version": "1.0.0" },
            "servers": [{ "url": "https://api.example.com/billing" }],
            "paths": {
                "/accounts/{id}": {
                    "get": {
                        "parameters": [{
                            "in": "path",
                            "name": "id",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": { "200": { "$ref": "#/components/responses/default200" } }
                    }
                }
            },
            "components": {
                "schemas": {},
                "responses": { "default200": { "description": "Successful operation" } }
            }
        })
    }

    #[test]
    fn test_valid_document_has_no_issues() {
        assert_eq!(StructuralValidator.validate(&valid_document()), vec![]);
    }

    #[test]
    fn test_missing_info_fields() {
        let mut doc = valid_document();
        doc["info"] = json!({ "description": "x" });
        let issues = StructuralValidator.validate(&doc);
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["/info/title", "/info/version"]);
    }

    #[test]
    fn test_wrong_version() {
        let mut doc = valid_document();
        doc["openapi"] = json!("2.0");
        let issues = StructuralValidator.validate(&doc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "/openapi");
    }

    #[test]
    fn test_unresolved_ref_is_reported() {
        let mut doc = valid_document();
        doc["paths"]["/accounts/{id}"]["get"]["responses"]["200"]["$ref"] =
            json!("#/components/responses/missing");
        let issues = StructuralValidator.validate(&doc);
        assert_eq!(
            issues,
            vec![ValidationIssue::new(
                "/paths/~1accounts~1{id}/get/responses/200/$ref",
                "unresolved reference '#/components/responses/missing'"
            )]
        );
    }

    #[test]
    fn test_optional_path_param_is_reported() {
        let mut doc = valid_document();
        doc["paths"]["/accounts/{id}"]["get"]["parameters"][0]
            .as_object_mut()
            .unwrap()
            .remove("required");
        let issues = StructuralValidator.validate(&doc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "path parameter 'id' must be required");
    }

    #[test]
    fn test_undeclared_template_param_and_empty_responses() {
        let mut doc = valid_document();
        doc["paths"]["/accounts/{id}"]["get"] = json!({ "parameters": [], "responses": {} });
        let messages: Vec<String> = StructuralValidator
            .validate(&doc)
            .into_iter()
            .map(|i| i.message)
            .collect();
        assert_eq!(
            messages,
            vec![
                "operation must define at least one response".to_string(),
                "path template parameter 'id' is not declared".to_string(),
            ]
        );
    }

    #[test]
    fn test_bad_component_key() {
        let mut doc = valid_document();
        doc["components"]["schemas"]["bad key"] = json!({ "type": "object" });
        let issues = StructuralValidator.validate(&doc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "/components/schemas/bad key");
    }

    #[test]
    fn test_bad_server_url() {
        let mut doc = valid_document();
        doc["servers"][0]["url"] = json!("http://exa mple.com");
        let issues = StructuralValidator.validate(&doc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "/servers/0/url");
    }

    #[test]
    fn test_validate_document_wraps_issues() {
        let err = validate_document(&StructuralValidator, &json!({ "openapi": "3.0.0" }))
            .unwrap_err();
        match err {
            AppError::DocumentValidation(issues) => assert!(!issues.is_empty()),
            other => panic!("unexpected error: {}", other),
        }
    }

    fn with_response_schema(schema: Value) -> Value {
        let mut doc = valid_document();
        doc["paths"]["/accounts/{id}"]["get"]["responses"]["200"] = json!({
            "description": "ok",
            "content": { "application/json": { "schema": schema } }
        });
        doc
    }

    const RESPONSE_SCHEMA: &str =
        "/paths/~1accounts~1{id}/get/responses/200/content/application~1json/schema";

    #[test]
    fn test_openapi_schema_under_paths_is_accepted() {
        let doc = with_response_schema(json!({
            "type": "object",
            "nullable": true,
            "required": ["id"],
            "properties": {
                "id": { "type": "string", "example": "a1" },
                "rates": {
                    "type": "object",
                    "additionalProperties": { "type": "string" },
                    "x-pattern": "^[A-Z]{6}$"
                },
                "limit": { "oneOf": [{ "type": "integer" }, { "$ref": "#/components/schemas/Limit" }] }
            },
            "additionalProperties": false
        }));
        let mut doc = doc;
        doc["components"]["schemas"]["Limit"] = json!({ "type": "string" });
        assert_eq!(StructuralValidator.validate(&doc), vec![]);
    }

    #[test]
    fn test_tuple_items_under_paths_are_rejected() {
        let doc = with_response_schema(json!({
            "type": "array",
            "items": [{ "type": "string" }, { "type": "integer" }]
        }));
        let issues = StructuralValidator.validate(&doc);
        assert!(!issues.is_empty());
        assert!(issues.iter().all(|i| i.path.starts_with(RESPONSE_SCHEMA)));
    }

    #[test]
    fn test_draft07_only_keywords_are_rejected() {
        let doc = with_response_schema(json!({
            "type": "object",
            "if": { "properties": { "kind": { "enum": ["a"] } } },
            "then": { "required": ["a"] },
            "propertyNames": { "maxLength": 3 },
            "dependencies": { "a": ["b"] }
        }));
        let issues = StructuralValidator.validate(&doc);
        assert!(!issues.is_empty());
        assert!(issues.iter().all(|i| i.path.starts_with(RESPONSE_SCHEMA)));
        let text: String = issues.iter().map(|i| i.message.as_str()).collect();
        for keyword in ["if", "then", "propertyNames", "dependencies"] {
            assert!(text.contains(keyword), "{} not reported in {}", keyword, text);
        }
    }

    #[test]
    fn test_parameter_and_component_schemas_are_checked() {
        let mut doc = valid_document();
        doc["paths"]["/accounts/{id}"]["get"]["parameters"][0]["schema"] = json!({ "type": "null" });
        doc["components"]["schemas"]["Tagged"] = json!({ "const": "x" });
        let paths: Vec<String> = StructuralValidator
            .validate(&doc)
            .into_iter()
            .map(|i| i.path)
            .collect();
        assert!(paths
            .iter()
            .any(|p| p.starts_with("/paths/~1accounts~1{id}/get/parameters/0/schema")));
        assert!(paths.iter().any(|p| p.starts_with("/components/schemas/Tagged")));
    }

    #[test]
    fn test_template_params() {
        assert_eq!(template_params("/a/{id}/b/{other}"), vec!["id", "other"]);
        assert!(template_params("/plain").is_empty());
    }
}
