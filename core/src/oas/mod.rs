#![deny(missing_docs)]

//! # OpenAPI Assembly Module
//!
//! - **normalization**: `patternProperties` rewriting and OpenAPI 3.0 downgrades.
//! - **flatten**: Decomposition of nested schemas into named components.
//! - **params**: Parameter buckets -> OpenAPI parameters.
//! - **responses**: Declared responses -> registered response components.
//! - **document**: The document assembler tying the above together.
//! - **validation**: Structural checks on assembled documents.

pub mod document;
pub mod flatten;
pub mod models;
pub mod naming;
pub mod normalization;
pub mod params;
pub mod ref_utils;
pub mod registry;
pub mod responses;
pub mod template;
pub mod validation;

pub use document::{AssemblerOptions, DocumentAssembler, DocumentMetadata, OpenApiDocument};
pub use flatten::SchemaKind;
pub use models::{ParamLocation, ParameterDescriptor, RouteDefinition};
pub use normalization::normalize_pattern_properties;
pub use registry::{CollisionPolicy, ComponentRegistry};
pub use template::DocumentTemplate;
pub use validation::{validate_document, DocumentValidator, StructuralValidator, ValidationIssue};
