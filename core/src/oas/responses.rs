#![deny(missing_docs)]

//! # Response Building
//!
//! Registers one response component per declared status code and flattens its
//! body schema into the schema registry.

use crate::error::AppResult;
use crate::oas::flatten::flatten_schema;
use crate::oas::models::{json_content, RefObject, ResponseSpec};
use crate::oas::naming::component_name;
use crate::oas::registry::ComponentRegistry;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Type label of flattened response body schemas.
pub const RESPONSE_LABEL: &str = "response";

/// Name of the shared response used by operations that declare none.
pub const DEFAULT_RESPONSE: &str = "default200";

/// Builds `status -> $ref` for every declared response, registering the components.
///
/// For status `S` under `prefix` the body schema lands at `{prefix}.S.response`
/// and the response object at `{prefix}.S`.
pub fn build_responses(
    registry: &mut ComponentRegistry,
    responses: &IndexMap<String, ResponseSpec>,
    prefix: &str,
) -> AppResult<IndexMap<String, RefObject>> {
    let mut out = IndexMap::with_capacity(responses.len());
    for (status, response) in responses {
        let reference = create_response(registry, response, prefix, status)?;
        out.insert(status.clone(), RefObject::new(reference));
    }
    Ok(out)
}

fn create_response(
    registry: &mut ComponentRegistry,
    response: &ResponseSpec,
    prefix: &str,
    status: &str,
) -> AppResult<String> {
    let name = component_name(prefix, status);

    let mut object = Map::new();
    if let Some(description) = &response.description {
        object.insert(
            "description".to_string(),
            Value::String(description.clone()),
        );
    }
    if let Some(schema) = &response.schema {
        let schema_ref = flatten_schema(registry, schema, &name, RESPONSE_LABEL)?;
        object.insert(
            "content".to_string(),
            serde_json::to_value(json_content(schema_ref))
                .map_err(|e| format!("Failed to serialize response content: {}", e))?,
        );
    } else {
        log::debug!("response {} declares no schema", name);
    }

    registry.add_response(&name, Value::Object(object))
}

/// The `{ "200": { $ref: default200 } }` map used when no responses are declared.
pub fn default_responses() -> IndexMap<String, RefObject> {
    let mut out = IndexMap::new();
    out.insert(
        "200".to_string(),
        RefObject::new(crate::oas::naming::response_ref(DEFAULT_RESPONSE)),
    );
    out
}
