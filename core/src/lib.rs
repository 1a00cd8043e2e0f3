#![deny(missing_docs)]

//! # schema2oas Core
//!
//! Turns JSON Schema route definitions into OpenAPI 3 documents.
//!
//! The heavy lifting happens in [`oas`]: the `patternProperties` normalizer, the
//! schema flattener that decomposes nested schemas into named components, and the
//! [`DocumentAssembler`] that drives both per route.

/// Shared error types.
pub mod error;

/// OpenAPI document assembly.
pub mod oas;

/// Input schema compilation (draft-07).
pub mod compile;

/// Stand-alone JSON Schema -> OpenAPI schema conversion.
pub mod convert;

pub use compile::{JsonSchemaCompiler, SchemaCompiler};
pub use convert::{convert_schema, convert_schema_with, ConvertOptions};
pub use error::{AppError, AppResult};
pub use oas::{
    normalize_pattern_properties, validate_document, AssemblerOptions, CollisionPolicy,
    ComponentRegistry, DocumentAssembler, DocumentMetadata, DocumentTemplate, DocumentValidator,
    OpenApiDocument, ParamLocation, ParameterDescriptor, RouteDefinition, SchemaKind,
    StructuralValidator, ValidationIssue,
};
