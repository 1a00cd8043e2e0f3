#![deny(missing_docs)]

//! # Document Assembly
//!
//! [`DocumentAssembler`] owns one OpenAPI document and its component registry.
//! It is constructed for a module and an environment, then fed route definitions;
//! every route/method pair becomes an operation whose parameters, request body and
//! responses are derived from the method's request schema.

use crate::compile::SchemaCompiler;
use crate::error::{AppError, AppResult};
use crate::oas::flatten::flatten_schema;
use crate::oas::models::{
    json_content, MethodSpec, Operation, ParamBucket, PathItem, RequestBody, RouteDefinition,
};
use crate::oas::naming::operation_name;
use crate::oas::params::extract_parameters;
use crate::oas::registry::{CollisionPolicy, ComponentRegistry};
use crate::oas::responses::{build_responses, default_responses};
use crate::oas::template::{DocumentTemplate, Info, ServerTemplate};
use crate::oas::validation::{validate_document, DocumentValidator};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request schema property holding the body schema.
pub const BODY_BUCKET: &str = "body";

/// Type label of flattened request bodies.
pub const BODY_LABEL: &str = "body";

/// Title and description of the generated document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// `info.title`.
    #[serde(default)]
    pub title: Option<String>,
    /// `info.description`.
    #[serde(default)]
    pub description: Option<String>,
}

impl DocumentMetadata {
    /// Creates metadata with a title and description.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }
}

/// Construction options of a [`DocumentAssembler`].
#[derive(Debug, Clone)]
pub struct AssemblerOptions {
    /// Server template key to select. Defaults to `default`.
    pub environment: String,
    /// Base template. The built-in template is used when `None`.
    pub template: Option<DocumentTemplate>,
    /// Behaviour on component name collisions.
    pub collision: CollisionPolicy,
}

impl Default for AssemblerOptions {
    fn default() -> Self {
        Self {
            environment: "default".to_string(),
            template: None,
            collision: CollisionPolicy::default(),
        }
    }
}

impl AssemblerOptions {
    /// Selects the environment.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Replaces the base template.
    pub fn with_template(mut self, template: DocumentTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Sets the collision policy.
    pub fn with_collision_policy(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }
}

/// An assembled OpenAPI 3 document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    /// OpenAPI version string.
    pub openapi: String,
    /// Document metadata.
    pub info: Info,
    /// The single selected server.
    pub servers: Vec<ServerTemplate>,
    /// Path -> method -> operation.
    pub paths: IndexMap<String, PathItem>,
    /// Registered components.
    pub components: ComponentRegistry,
    /// Root fields carried over from the template.
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

impl OpenApiDocument {
    /// Serializes the document into a JSON value.
    pub fn to_value(&self) -> AppResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| AppError::General(format!("Failed to serialize document: {}", e)))
    }

    /// Looks up an operation by path and (any case) method.
    pub fn operation(&self, path: &str, method: &str) -> Option<&Operation> {
        self.paths.get(path)?.get(&method.to_lowercase())
    }
}

/// Builds an OpenAPI document route by route.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    document: OpenApiDocument,
}

impl DocumentAssembler {
    /// Creates an assembler for `module_name` with the default options.
    pub fn new(module_name: &str, metadata: DocumentMetadata) -> AppResult<Self> {
        Self::with_options(module_name, metadata, AssemblerOptions::default())
    }

    /// Creates an assembler for `module_name`.
    ///
    /// Fails with `AppError::WrongType` (message `WRONG_TYPE`) when the template
    /// has no server for `options.environment`.
    pub fn with_options(
        module_name: &str,
        metadata: DocumentMetadata,
        options: AssemblerOptions,
    ) -> AppResult<Self> {
        let template = match options.template {
            Some(template) => template,
            None => DocumentTemplate::base()?,
        };
        let Some(mut server) = template.server(&options.environment).cloned() else {
            log::error!("no server template for environment '{}'", options.environment);
            return Err(AppError::WrongType(options.environment));
        };
        let DocumentTemplate {
            openapi,
            mut info,
            paths,
            components,
            extensions,
            ..
        } = template;
        server.url.push_str(module_name);

        info.title = metadata.title;
        info.description = metadata.description;

        log::debug!(
            "assembling document for module '{}' against {}",
            module_name,
            server.url
        );

        Ok(Self {
            document: OpenApiDocument {
                openapi,
                info,
                servers: vec![server],
                paths,
                components: components.with_policy(options.collision),
                extensions,
            },
        })
    }

    /// The document assembled so far.
    pub fn document(&self) -> &OpenApiDocument {
        &self.document
    }

    /// Consumes the assembler, returning the document.
    pub fn into_document(self) -> OpenApiDocument {
        self.document
    }

    /// The component registry.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.document.components
    }

    /// Adds every route, in order.
    pub fn create_paths(&mut self, routes: &[RouteDefinition]) -> AppResult<()> {
        for route in routes {
            self.add_route(route)?;
        }
        Ok(())
    }

    /// Compiles every request schema of every route, then adds them in order.
    pub fn create_paths_checked(
        &mut self,
        routes: &[RouteDefinition],
        compiler: &dyn SchemaCompiler,
    ) -> AppResult<()> {
        for route in routes {
            self.add_route_checked(route, compiler)?;
        }
        Ok(())
    }

    /// Adds one operation per method of `route`.
    ///
    /// Methods of an already known path are merged into its path item.
    pub fn add_route(&mut self, route: &RouteDefinition) -> AppResult<()> {
        for (method, spec) in &route.methods {
            let operation = self.make_operation(&route.path, method, spec)?;
            self.document
                .paths
                .entry(route.path.clone())
                .or_default()
                .insert(method.to_lowercase(), operation);
        }
        Ok(())
    }

    /// Like [`add_route`](Self::add_route), but compiles each request schema first.
    ///
    /// A schema that fails to compile aborts before anything is flattened.
    pub fn add_route_checked(
        &mut self,
        route: &RouteDefinition,
        compiler: &dyn SchemaCompiler,
    ) -> AppResult<()> {
        for (method, spec) in &route.methods {
            if !spec.schema.is_null() {
                log::debug!("compiling request schema of {} {}", method, route.path);
                compiler.compile(&spec.schema)?;
            }
        }
        self.add_route(route)
    }

    /// Runs `validator` over the current document.
    pub fn validate(&self, validator: &dyn DocumentValidator) -> AppResult<()> {
        validate_document(validator, &self.document.to_value()?)
    }

    fn make_operation(&mut self, path: &str, method: &str, spec: &MethodSpec) -> AppResult<Operation> {
        let name = operation_name(path, method);
        log::debug!("building operation {}", name);

        let mut parameters = Vec::new();
        for bucket in ParamBucket::ALL {
            if let Some(bucket_schema) = spec.bucket(bucket.key()) {
                parameters.extend(extract_parameters(bucket, bucket_schema));
            }
        }

        let request_body = match spec.bucket(BODY_BUCKET) {
            Some(body) => {
                let reference =
                    flatten_schema(&mut self.document.components, body, &name, BODY_LABEL)?;
                Some(RequestBody {
                    required: spec.requires(BODY_BUCKET).then_some(true),
                    content: json_content(reference),
                })
            }
            None => None,
        };

        let swagger = spec.swagger.as_ref();
        let responses = match swagger.and_then(|s| s.responses.as_ref()) {
            Some(declared) => build_responses(&mut self.document.components, declared, &name)?,
            None => default_responses(),
        };

        Ok(Operation {
            summary: swagger.and_then(|s| s.summary.clone()),
            description: swagger.and_then(|s| s.description.clone()),
            parameters,
            request_body,
            responses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::models::RefObject;
    use serde_json::json;

    fn route(value: Value) -> RouteDefinition {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_construction_selects_single_server() {
        let assembler = DocumentAssembler::new("name", DocumentMetadata::default()).unwrap();
        let doc = assembler.document();
        assert_eq!(doc.servers.len(), 1);
        assert_eq!(doc.servers[0].url, "http://localhost:3000/name");
        assert_eq!(doc.info.title, None);
    }

    #[test]
    fn test_unknown_environment_is_wrong_type() {
        let err = DocumentAssembler::with_options(
            "name",
            DocumentMetadata::default(),
            AssemblerOptions::default().with_environment("some"),
        )
        .unwrap_err();
        assert!(matches!(&err, AppError::WrongType(env) if env == "some"));
        assert_eq!(err.to_string(), "WRONG_TYPE");
    }

    #[test]
    fn test_metadata_sets_info() {
        let assembler = DocumentAssembler::with_options(
            "billing",
            DocumentMetadata::new("Billing", "Billing API"),
            AssemblerOptions::default().with_environment("production"),
        )
        .unwrap();
        let doc = assembler.document();
        assert_eq!(doc.info.title.as_deref(), Some("Billing"));
        assert_eq!(doc.info.description.as_deref(), Some("Billing API"));
        assert_eq!(doc.servers[0].url, "https://api.example.com/billing");
    }

    #[test]
    fn test_operation_with_body_and_responses() {
        let mut assembler = DocumentAssembler::new("name", DocumentMetadata::default()).unwrap();
        assembler
            .add_route(&route(json!({
                "path": "/accounts",
                "methods": {
                    "POST": {
                        "schema": {
                            "properties": {
                                "body": {
                                    "type": "object",
                                    "properties": {
                                        "owner": { "type": "object", "properties": { "name": { "type": "string" } } },
                                        "currency": { "type": "string" }
                                    }
                                },
                                "header": { "properties": { "x-trace": { "type": "string" } } }
                            },
                            "required": ["body"]
                        },
                        "swagger": {
                            "summary": "summary",
                            "description": "description",
                            "responses": {
                                "201": {
                                    "description": "Created",
                                    "schema": { "type": "object", "properties": { "id": { "type": "string" } } }
                                }
                            }
                        }
                    }
                }
            })))
            .unwrap();

        let op = assembler.document().operation("/accounts", "POST").unwrap();
        assert_eq!(op.summary.as_deref(), Some("summary"));
        assert_eq!(op.description.as_deref(), Some("description"));
        assert_eq!(op.parameters.len(), 1);

        let body = op.request_body.as_ref().unwrap();
        assert_eq!(body.required, Some(true));
        assert_eq!(
            body.content["application/json"].schema,
            RefObject::new("#/components/schemas/accounts.post.body")
        );
        assert_eq!(
            op.responses["201"],
            RefObject::new("#/components/responses/accounts.post.201")
        );

        let registry = assembler.registry();
        for name in [
            "accounts.post.body",
            "accounts.post.body.owner",
            "accounts.post.201.response",
        ] {
            assert!(registry.schema(name).is_some(), "missing schema {}", name);
        }
        assert!(registry.response("accounts.post.201").is_some());
        assert!(registry.response("default200").is_some());
    }

    #[test]
    fn test_optional_body_and_default_responses() {
        let mut assembler = DocumentAssembler::new("name", DocumentMetadata::default()).unwrap();
        assembler
            .add_route(&route(json!({
                "path": "/notes",
                "methods": {
                    "put": { "schema": { "properties": { "body": { "type": "object", "properties": {} } } } }
                }
            })))
            .unwrap();

        let op = assembler.document().operation("/notes", "put").unwrap();
        assert_eq!(op.request_body.as_ref().unwrap().required, None);
        assert_eq!(op.responses, default_responses());
        assert_eq!(op.summary, None);
        assert!(op.parameters.is_empty());
    }

    #[test]
    fn test_routes_on_same_path_are_merged() {
        let mut assembler = DocumentAssembler::new("name", DocumentMetadata::default()).unwrap();
        assembler
            .create_paths(&[
                route(json!({ "path": "/one", "methods": { "GET": { "schema": {} } } })),
                route(json!({ "path": "/one", "methods": { "DELETE": { "schema": {} } } })),
            ])
            .unwrap();

        let methods: Vec<&str> = assembler.document().paths["/one"]
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(methods, vec!["get", "delete"]);
    }

    #[test]
    fn test_fail_policy_surfaces_collisions() {
        let mut assembler = DocumentAssembler::with_options(
            "name",
            DocumentMetadata::default(),
            AssemblerOptions::default().with_collision_policy(CollisionPolicy::Fail),
        )
        .unwrap();
        assert_eq!(assembler.registry().policy(), CollisionPolicy::Fail);
        let definition = route(json!({
            "path": "/one",
            "methods": { "POST": { "schema": { "properties": { "body": { "type": "object" } } } } }
        }));

        assembler.add_route(&definition).unwrap();
        let err = assembler.add_route(&definition).unwrap_err();
        assert!(matches!(err, AppError::DuplicateComponent { .. }));
    }

    #[test]
    fn test_assemblers_start_from_an_untouched_template() {
        let mut first =
            DocumentAssembler::new("first", DocumentMetadata::new("First", "One")).unwrap();
        first
            .add_route(&route(json!({
                "path": "/one",
                "methods": { "post": { "schema": { "properties": { "body": { "type": "object" } } } } }
            })))
            .unwrap();
        let mut used = first.into_document();
        used.info.version = "9.9.9".into();
        used.servers[0].url.push_str("/mutated");

        let second = DocumentAssembler::new("second", DocumentMetadata::default()).unwrap();
        let doc = second.document();
        assert_eq!(doc.info.title, None);
        assert_eq!(doc.info.version, "1.0.0");
        assert_eq!(doc.servers.len(), 1);
        assert_eq!(doc.servers[0].url, "http://localhost:3000/second");
        assert!(doc.paths.is_empty());
        assert!(doc.components.schemas.is_empty());
        assert_eq!(second.registry().policy(), CollisionPolicy::Overwrite);
    }

    #[test]
    fn test_checked_route_rejects_invalid_schema_before_flattening() {
        let mut assembler = DocumentAssembler::new("name", DocumentMetadata::default()).unwrap();
        let definition = route(json!({
            "path": "/bad",
            "methods": {
                "POST": {
                    "schema": {
                        "type": "object",
                        "properties": { "body": { "type": "object", "minProperties": -1 } }
                    }
                }
            }
        }));

        let err = assembler
            .add_route_checked(&definition, &crate::compile::JsonSchemaCompiler::default())
            .unwrap_err();
        assert!(matches!(err, AppError::SchemaCompile(_)));
        assert!(assembler.registry().schemas.is_empty());
        assert!(assembler.document().paths.is_empty());
    }
}
