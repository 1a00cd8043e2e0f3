#![deny(missing_docs)]

//! # Schema Compilation
//!
//! Input schemas are compiled before any conversion so that structurally invalid
//! schemas are rejected with the compiler's own message.

use crate::error::{AppError, AppResult};
use jsonschema::Draft;
use serde_json::Value;

/// Compiles input JSON Schemas.
pub trait SchemaCompiler {
    /// Fails with `AppError::SchemaCompile` when `schema` is not a valid schema.
    fn compile(&self, schema: &Value) -> AppResult<()>;
}

/// [`SchemaCompiler`] backed by the `jsonschema` crate.
#[derive(Debug, Clone, Copy)]
pub struct JsonSchemaCompiler {
    draft: Draft,
}

impl Default for JsonSchemaCompiler {
    fn default() -> Self {
        Self {
            draft: Draft::Draft7,
        }
    }
}

impl JsonSchemaCompiler {
    /// Compiles against a specific draft instead of draft-07.
    pub fn with_draft(draft: Draft) -> Self {
        Self { draft }
    }
}

impl SchemaCompiler for JsonSchemaCompiler {
    fn compile(&self, schema: &Value) -> AppResult<()> {
        jsonschema::options()
            .with_draft(self.draft)
            .build(schema)
            .map(|_| ())
            .map_err(|e| {
                log::debug!("schema compilation failed: {}", e);
                AppError::SchemaCompile(e.to_string())
            })
    }
}
