#![deny(missing_docs)]

//! # Document Templates
//!
//! The skeleton every assembled document starts from. Unlike the final document,
//! a template lists its servers as a map keyed by environment name; the assembler
//! narrows it to the single selected server.

use crate::error::{AppError, AppResult};
use crate::oas::models::PathItem;
use crate::oas::registry::ComponentRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Built-in base template.
pub(crate) const BASE_TEMPLATE: &str = include_str!("../../templates/base.yaml");

/// Built-in single-operation document used to validate converted schemas.
pub(crate) const DRAFT_TEMPLATE: &str = include_str!("../../templates/draft.yaml");

/// Document-level metadata (`info`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Version of the API document.
    #[serde(default = "default_version")]
    pub version: String,
    /// Any other `info` fields (contact, license, `x-` extensions).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// A server entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerTemplate {
    /// Base URL; the module name is appended to it.
    pub url: String,
    /// Human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Any other server fields (variables, `x-` extensions).
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// A base OpenAPI document with servers keyed by environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTemplate {
    /// OpenAPI version string.
    pub openapi: String,
    /// Document metadata.
    pub info: Info,
    /// Environment name -> server.
    #[serde(default)]
    pub servers: IndexMap<String, ServerTemplate>,
    /// Pre-existing paths.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Pre-existing components (including the shared `default200` response).
    #[serde(default)]
    pub components: ComponentRegistry,
    /// Any other root fields (tags, security, `x-` extensions).
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl DocumentTemplate {
    /// Returns a fresh copy of the built-in base template.
    pub fn base() -> AppResult<Self> {
        Self::from_yaml_str(BASE_TEMPLATE)
    }

    /// Parses a template from YAML (or JSON, which YAML accepts).
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| AppError::General(format!("Failed to parse document template: {}", e)))
    }

    /// Loads a template from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        log::debug!("loaded document template from {:?}", path);
        Self::from_yaml_str(&content)
    }

    /// Looks up the server of an environment.
    pub fn server(&self, environment: &str) -> Option<&ServerTemplate> {
        self.servers.get(environment)
    }
}
