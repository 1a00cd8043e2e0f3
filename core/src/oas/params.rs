#![deny(missing_docs)]

//! # Parameter Extraction
//!
//! Maps the `params`, `query`, `cookies` and `header` buckets of a request schema
//! onto OpenAPI Parameter Objects. Object-typed bucket members have no parameter
//! form and are skipped.

use crate::oas::flatten::declared_type;
use crate::oas::models::{is_required, ParamBucket, ParameterDescriptor, ParameterSchema};
use serde_json::Value;

/// Extracts one parameter per non-object property of `bucket_schema`.
pub fn extract_parameters(bucket: ParamBucket, bucket_schema: &Value) -> Vec<ParameterDescriptor> {
    let Some(properties) = bucket_schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    properties
        .iter()
        .filter_map(|(name, property)| {
            let schema_type = declared_type(property);
            if schema_type.as_deref() == Some("object") {
                log::debug!(
                    "skipping object parameter '{}' in {} bucket",
                    name,
                    bucket.key()
                );
                return None;
            }
            Some(create_param(bucket, name, property, schema_type, bucket_schema))
        })
        .collect()
}

fn create_param(
    bucket: ParamBucket,
    name: &str,
    property: &Value,
    schema_type: Option<String>,
    bucket_schema: &Value,
) -> ParameterDescriptor {
    let title = string_field(property, "title");
    ParameterDescriptor {
        location: bucket.location(),
        name: name.to_string(),
        description: title.clone(),
        required: is_required(bucket_schema, name).then_some(true),
        schema: ParameterSchema {
            schema_type,
            example: property
                .get("examples")
                .and_then(Value::as_array)
                .and_then(|examples| examples.first())
                .cloned(),
            pattern: string_field(property, "pattern"),
            description: title,
        },
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
