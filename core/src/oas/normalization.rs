#![deny(missing_docs)]

//! # Schema Normalization
//!
//! Rewrites JSON Schema constructs that have no OpenAPI 3.0 counterpart into a
//! portable shape. `patternProperties` is folded into `additionalProperties`
//! with the regex kept under [`PATTERN_EXTENSION`], and the draft-07 forms of
//! `const`, nullable type unions and numeric exclusive bounds are downgraded.

use serde_json::{json, Map, Value};

/// Extension key recording the regex of a folded `patternProperties` entry.
pub const PATTERN_EXTENSION: &str = "x-pattern";

const ADDITIONAL_PROPERTIES: &str = "additionalProperties";
const PATTERN_PROPERTIES: &str = "patternProperties";

/// Replaces every `patternProperties` node with `additionalProperties` + `x-pattern`.
///
/// Entries are visited in document order. The first usable `additionalProperties`
/// wins; a literal `false` does not count as set, so a sibling pattern schema
/// replaces it. Only the first pattern of a `patternProperties` object is kept.
///
/// The transform is idempotent: no `patternProperties` survive a single pass.
pub fn normalize_pattern_properties(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(normalize_node(map)),
        Value::Array(items) => Value::Array(items.iter().map(normalize_pattern_properties).collect()),
        primitive => primitive.clone(),
    }
}

fn normalize_node(map: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();

    for (key, value) in map {
        match key.as_str() {
            ADDITIONAL_PROPERTIES => {
                if !has_additional_properties(&out) {
                    out.insert(key.clone(), normalize_pattern_properties(value));
                }
            }
            PATTERN_PROPERTIES => {
                let Some((pattern, schema)) = first_pattern(value) else {
                    log::debug!("dropping empty patternProperties");
                    continue;
                };
                if !has_additional_properties(&out) {
                    out.insert(
                        ADDITIONAL_PROPERTIES.to_string(),
                        normalize_pattern_properties(schema),
                    );
                }
                out.insert(
                    PATTERN_EXTENSION.to_string(),
                    Value::String(pattern.to_string()),
                );
            }
            _ => {
                out.insert(key.clone(), normalize_pattern_properties(value));
            }
        }
    }

    out
}

fn has_additional_properties(map: &Map<String, Value>) -> bool {
    map.get(ADDITIONAL_PROPERTIES)
        .is_some_and(|v| !matches!(v, Value::Bool(false)))
}

fn first_pattern(value: &Value) -> Option<(&str, &Value)> {
    let patterns = value.as_object()?;
    if patterns.len() > 1 {
        log::warn!(
            "patternProperties declares {} patterns; only the first is kept",
            patterns.len()
        );
    }
    patterns.iter().next().map(|(k, v)| (k.as_str(), v))
}

/// Downgrades a draft-07 schema tree in place into an OpenAPI 3.0 Schema Object.
///
/// - `$schema`, `$id`, string `id` and `$comment` are dropped
/// - `const` becomes a single-value `enum`
/// - `type: [T, "null"]` becomes `type: T` + `nullable: true`
/// - numeric `exclusiveMinimum` / `exclusiveMaximum` become bounds + boolean flags
/// - `examples` collapses into `example`
pub fn downgrade_to_openapi30(value: &mut Value) {
    match value {
        Value::Object(map) => downgrade_schema_node(map),
        Value::Array(items) => {
            for v in items.iter_mut() {
                downgrade_to_openapi30(v);
            }
        }
        _ => {}
    }
}

fn downgrade_schema_node(map: &mut Map<String, Value>) {
    map.remove("$schema");
    map.remove("$id");
    map.remove("$comment");
    if map.get("id").is_some_and(Value::is_string) {
        map.remove("id");
    }

    if let Some(const_val) = map.remove("const") {
        if !map.contains_key("enum") {
            map.insert("enum".to_string(), Value::Array(vec![const_val]));
        }
    }

    if let Some(Value::Array(types)) = map.get("type").cloned() {
        apply_type_union(map, &types);
    }

    for (flag, bound) in [("exclusiveMinimum", "minimum"), ("exclusiveMaximum", "maximum")] {
        if let Some(limit) = map.get(flag).filter(|v| v.is_number()).cloned() {
            map.insert(bound.to_string(), limit);
            map.insert(flag.to_string(), Value::Bool(true));
        }
    }

    if let Some(examples) = map.remove("examples") {
        if !map.contains_key("example") {
            if let Some(first) = examples.as_array().and_then(|e| e.first()) {
                map.insert("example".to_string(), first.clone());
            }
        }
    }

    for key in ["properties", "definitions"] {
        if let Some(children) = map.get_mut(key).and_then(|v| v.as_object_mut()) {
            for child in children.values_mut() {
                downgrade_to_openapi30(child);
            }
        }
    }
    for key in ["items", "not", ADDITIONAL_PROPERTIES, "oneOf", "anyOf", "allOf"] {
        if let Some(child) = map.get_mut(key) {
            downgrade_to_openapi30(child);
        }
    }
}

fn apply_type_union(map: &mut Map<String, Value>, types: &[Value]) {
    let concrete: Vec<Value> = types
        .iter()
        .filter(|t| t.as_str() != Some("null"))
        .cloned()
        .collect();
    let nullable = concrete.len() != types.len();

    match concrete.as_slice() {
        [] => {
            map.remove("type");
        }
        [single] => {
            map.insert("type".to_string(), single.clone());
        }
        many => {
            map.remove("type");
            if !map.contains_key("anyOf") {
                let branches = many.iter().map(|t| json!({ "type": t })).collect();
                map.insert("anyOf".to_string(), Value::Array(branches));
            }
        }
    }

    if nullable {
        map.insert("nullable".to_string(), Value::Bool(true));
    }
}
