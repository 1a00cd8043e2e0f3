#![deny(missing_docs)]

//! # Route & Operation Models
//!
//! Input route definitions (deserialized from JSON / YAML) and the OpenAPI
//! operation structures emitted for them.
//!
//! Request schemas stay as raw `serde_json::Value` trees so they can be handed to
//! the schema compiler untouched; the typed accessors below pick out the
//! parameter buckets and the body.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Media type used for every request and response body.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// One API path and its per-method request/response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// URL path, e.g. `/accounts/{id}`.
    pub path: String,
    /// Method name (any case) -> method definition, in source order.
    #[serde(default)]
    pub methods: IndexMap<String, MethodSpec>,
}

/// Definition of a single HTTP method on a route.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MethodSpec {
    /// Request schema: `{ properties: { params?, query?, cookies?, header?, body? }, required? }`.
    #[serde(default)]
    pub schema: Value,
    /// Documentation-only metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swagger: Option<SwaggerMeta>,
}

impl MethodSpec {
    /// Returns the sub-schema of a request bucket (`params`, `body`, ...), if declared.
    pub fn bucket(&self, name: &str) -> Option<&Value> {
        self.schema.get("properties")?.get(name)
    }

    /// Whether the request schema lists `name` in its `required` array.
    pub fn requires(&self, name: &str) -> bool {
        is_required(&self.schema, name)
    }
}

/// Documentation metadata attached to a method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwaggerMeta {
    /// Operation summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared responses keyed by status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<IndexMap<String, ResponseSpec>>,
}

/// A declared response of a method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// Response description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema of the response body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

/// The request buckets that map onto OpenAPI parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamBucket {
    /// `params` -> path parameters.
    Params,
    /// `query` -> query parameters.
    Query,
    /// `cookies` -> cookie parameters.
    Cookies,
    /// `header` -> header parameters.
    Header,
}

impl ParamBucket {
    /// All parameter buckets, in the order their parameters are emitted.
    pub const ALL: [ParamBucket; 4] = [
        ParamBucket::Params,
        ParamBucket::Query,
        ParamBucket::Cookies,
        ParamBucket::Header,
    ];

    /// Property name of the bucket inside a request schema.
    pub fn key(self) -> &'static str {
        match self {
            ParamBucket::Params => "params",
            ParamBucket::Query => "query",
            ParamBucket::Cookies => "cookies",
            ParamBucket::Header => "header",
        }
    }

    /// Where parameters of this bucket are placed.
    pub fn location(self) -> ParamLocation {
        match self {
            ParamBucket::Params => ParamLocation::Path,
            ParamBucket::Query => ParamLocation::Query,
            ParamBucket::Cookies => ParamLocation::Cookie,
            ParamBucket::Header => ParamLocation::Header,
        }
    }
}

/// OpenAPI parameter location (`in`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Path segment.
    Path,
    /// Query string.
    Query,
    /// Cookie.
    Cookie,
    /// Request header.
    Header,
}

/// An OpenAPI Parameter Object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Parameter name.
    pub name: String,
    /// Taken from the property `title`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `Some(true)` when the bucket requires the parameter; never `Some(false)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Parameter schema.
    pub schema: ParameterSchema,
}

/// Simplified schema of a parameter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Lower-cased declared type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// First entry of `examples`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Regex constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Taken from the property `title`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A `{ "$ref": ... }` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefObject {
    /// Target JSON pointer.
    #[serde(rename = "$ref")]
    pub reference: String,
}

impl RefObject {
    /// Wraps a reference string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// A Media Type Object carrying a referenced schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    /// Referenced body schema.
    pub schema: RefObject,
}

/// Content map keyed by media type.
pub type Content = IndexMap<String, MediaType>;

/// Builds `{ "application/json": { "schema": { "$ref": reference } } }`.
pub fn json_content(reference: impl Into<String>) -> Content {
    let mut content = Content::new();
    content.insert(
        JSON_MEDIA_TYPE.to_string(),
        MediaType {
            schema: RefObject::new(reference),
        },
    );
    content
}

/// An OpenAPI Request Body Object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// `Some(true)` when the request schema requires `body`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Body content.
    pub content: Content,
}

/// An OpenAPI Operation Object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Operation description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path, query, cookie and header parameters.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Request body, when the request schema declares `body`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Status code -> response reference.
    #[serde(default)]
    pub responses: IndexMap<String, RefObject>,
}

/// Path item: lower-cased method -> operation.
pub type PathItem = IndexMap<String, Operation>;

/// Whether a schema's `required` array contains `name`.
pub(crate) fn is_required(schema: &Value, name: &str) -> bool {
    schema
        .get("required")
        .and_then(Value::as_array)
        .is_some_and(|required| required.iter().any(|r| r.as_str() == Some(name)))
}
