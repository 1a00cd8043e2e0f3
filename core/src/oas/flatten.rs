#![deny(missing_docs)]

//! # Schema Flattening
//!
//! Decomposes a nested JSON Schema into a flat set of named object components.
//!
//! Every object node is registered under a dot-joined name derived from its
//! position (`{prefix}.{label}.{property}...`) and replaced by a `$ref`; arrays and
//! `oneOf` lists are rebuilt in place with their members classified the same way;
//! anything else collapses to `{ type, title, description }`.

use crate::error::AppResult;
use crate::oas::naming::component_name;
use crate::oas::registry::ComponentRegistry;
use serde_json::{json, Map, Value};

/// Shape of a schema node, as far as flattening is concerned.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind<'a> {
    /// `type: object`; registered as its own component.
    Object,
    /// `type: array` with its optional `items` schema.
    Array(Option<&'a Value>),
    /// No declared type but a `oneOf` list of alternatives.
    OneOf(&'a [Value]),
    /// Anything else, with the lower-cased declared type if there is one.
    Primitive(Option<String>),
}

impl<'a> SchemaKind<'a> {
    /// Classifies a schema node. A declared string `type` wins over `oneOf`.
    pub fn classify(schema: &'a Value) -> Self {
        match declared_type(schema) {
            Some(ty) if ty == "object" => SchemaKind::Object,
            Some(ty) if ty == "array" => SchemaKind::Array(schema.get("items")),
            Some(ty) => SchemaKind::Primitive(Some(ty)),
            None => match schema.get("oneOf").and_then(Value::as_array) {
                Some(alternatives) => SchemaKind::OneOf(alternatives),
                None => SchemaKind::Primitive(None),
            },
        }
    }
}

/// Lower-cased `type` of a schema node, when declared as a string.
pub fn declared_type(schema: &Value) -> Option<String> {
    schema.get("type")?.as_str().map(str::to_lowercase)
}

/// Registers `schema` as the object component `{prefix}.{label}` and returns its reference.
///
/// Nested objects are registered first, so every `$ref` placed into the
/// component already resolves when the component itself is registered.
pub fn flatten_schema(
    registry: &mut ComponentRegistry,
    schema: &Value,
    prefix: &str,
    label: &str,
) -> AppResult<String> {
    let mut properties = Map::new();
    if let Some(declared) = schema.get("properties").and_then(Value::as_object) {
        for (name, property) in declared {
            let classified = classify_property(registry, property, name, prefix, label)?;
            properties.insert(name.clone(), classified);
        }
    }

    let mut component = Map::new();
    component.insert("type".to_string(), json!("object"));
    if let Some(required) = schema
        .get("required")
        .and_then(Value::as_array)
        .filter(|r| !r.is_empty())
    {
        component.insert("required".to_string(), Value::Array(required.clone()));
    }
    component.insert("properties".to_string(), Value::Object(properties));

    let name = component_name(prefix, label);
    log::debug!("flattened schema component {}", name);
    registry.add_schema(&name, Value::Object(component))
}

/// Classifies one property of a schema under `label`, registering nested objects.
pub fn classify_property(
    registry: &mut ComponentRegistry,
    property: &Value,
    name: &str,
    prefix: &str,
    label: &str,
) -> AppResult<Value> {
    match SchemaKind::classify(property) {
        SchemaKind::Object => {
            let reference =
                flatten_schema(registry, property, prefix, &component_name(label, name))?;
            Ok(json!({ "$ref": reference }))
        }
        SchemaKind::Array(items) => {
            let items = match items {
                Some(item) => classify_property(
                    registry,
                    item,
                    "items",
                    prefix,
                    &component_name(label, "array"),
                )?,
                None => json!({}),
            };
            Ok(json!({ "type": "array", "items": items }))
        }
        SchemaKind::OneOf(alternatives) => {
            let one_of_label = component_name(label, "oneOf");
            let mut classified = Vec::with_capacity(alternatives.len());
            for (index, alternative) in alternatives.iter().enumerate() {
                classified.push(classify_property(
                    registry,
                    alternative,
                    &index.to_string(),
                    prefix,
                    &one_of_label,
                )?);
            }
            Ok(json!({ "oneOf": classified }))
        }
        SchemaKind::Primitive(ty) => Ok(primitive_property(ty, name, property)),
    }
}

fn primitive_property(ty: Option<String>, name: &str, property: &Value) -> Value {
    let mut out = Map::new();
    if let Some(ty) = ty {
        out.insert("type".to_string(), Value::String(ty));
    }
    out.insert("title".to_string(), Value::String(name.to_string()));
    if let Some(title) = property.get("title").filter(|t| !t.is_null()) {
        out.insert("description".to_string(), title.clone());
    }
    Value::Object(out)
}
