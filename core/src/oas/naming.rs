#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Derives component names and `$ref` strings. Names are dot-joined segments built
//! from the route path, the HTTP method and the nested property path.

/// JSON pointer prefix of registered schema components.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// JSON pointer prefix of registered response components.
pub const RESPONSE_REF_PREFIX: &str = "#/components/responses/";

/// Derives the operation name for a route/method pair.
///
/// Every character outside `[A-Za-z0-9_]` is stripped from the path.
///
/// e.g. `GET /accounts/{id}` -> `accountsid.get`
pub fn operation_name(path: &str, method: &str) -> String {
    let stripped: String = path
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    format!("{}.{}", stripped, method.to_lowercase())
}

/// Joins a prefix and a label into a component name (`prefix.label`).
pub fn component_name(prefix: &str, label: &str) -> String {
    format!("{}.{}", prefix, label)
}

/// Builds `#/components/schemas/{name}`.
pub fn schema_ref(name: &str) -> String {
    format!("{}{}", SCHEMA_REF_PREFIX, name)
}

/// Builds `#/components/responses/{name}`.
pub fn response_ref(name: &str) -> String {
    format!("{}{}", RESPONSE_REF_PREFIX, name)
}
