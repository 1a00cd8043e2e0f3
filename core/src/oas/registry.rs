#![deny(missing_docs)]

//! # Component Registry
//!
//! Holds the `components.schemas` and `components.responses` maps of the document
//! being assembled. Entries are only ever added or replaced.

use crate::error::{AppError, AppResult};
use crate::oas::naming::{response_ref, schema_ref};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What to do when a derived component name is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Last write wins. A warning is logged when the replaced value differs.
    #[default]
    Overwrite,
    /// Reject the second registration with `AppError::DuplicateComponent`.
    Fail,
}

/// Registry of named schema and response components.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentRegistry {
    /// Schema name -> Schema Object.
    #[serde(default)]
    pub schemas: IndexMap<String, Value>,
    /// Response name -> Response Object.
    #[serde(default)]
    pub responses: IndexMap<String, Value>,
    /// Extra component sections carried over from the template.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
    #[serde(skip)]
    policy: CollisionPolicy,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the collision policy.
    pub fn with_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active collision policy.
    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Registers a schema and returns its `#/components/schemas/...` reference.
    pub fn add_schema(&mut self, name: &str, schema: Value) -> AppResult<String> {
        insert(&mut self.schemas, self.policy, "schemas", name, schema)?;
        Ok(schema_ref(name))
    }

    /// Registers a response and returns its `#/components/responses/...` reference.
    pub fn add_response(&mut self, name: &str, response: Value) -> AppResult<String> {
        insert(&mut self.responses, self.policy, "responses", name, response)?;
        Ok(response_ref(name))
    }

    /// Looks up a registered schema.
    pub fn schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Looks up a registered response.
    pub fn response(&self, name: &str) -> Option<&Value> {
        self.responses.get(name)
    }
}

fn insert(
    section: &mut IndexMap<String, Value>,
    policy: CollisionPolicy,
    section_name: &'static str,
    name: &str,
    value: Value,
) -> AppResult<()> {
    if let Some(existing) = section.get(name) {
        match policy {
            CollisionPolicy::Fail => {
                return Err(AppError::DuplicateComponent {
                    section: section_name,
                    name: name.to_string(),
                });
            }
            CollisionPolicy::Overwrite if existing != &value => {
                log::warn!("overwriting components.{}.{}", section_name, name);
            }
            CollisionPolicy::Overwrite => {}
        }
    }

    log::trace!("registering components.{}.{}", section_name, name);
    section.insert(name.to_string(), value);
    Ok(())
}
