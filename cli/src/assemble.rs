#![deny(missing_docs)]

//! # Assemble Command
//!
//! Builds an OpenAPI document from a file of route definitions
//! (a JSON or YAML array of `{ path, methods }` objects).

use crate::error::CliResult;
use crate::output::{read_structured, write_structured};
use schema2oas_core::{
    AssemblerOptions, CollisionPolicy, DocumentAssembler, DocumentMetadata, DocumentTemplate,
    JsonSchemaCompiler, RouteDefinition, StructuralValidator,
};
use std::path::PathBuf;

/// Arguments for the assemble command.
#[derive(clap::Args, Debug, Clone)]
pub struct AssembleArgs {
    /// Route definitions file (.json, .yaml or .yml).
    #[clap(long)]
    pub routes: PathBuf,

    /// Module name, appended to the server URL.
    #[clap(long)]
    pub module: String,

    /// Document title.
    #[clap(long)]
    pub title: Option<String>,

    /// Document description.
    #[clap(long)]
    pub description: Option<String>,

    /// Server environment picked from the template.
    #[clap(long = "env", env = "SCHEMA2OAS_ENV", default_value = "default")]
    pub environment: String,

    /// Replacement document template.
    #[clap(long, env = "SCHEMA2OAS_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Fail on duplicate component names instead of overwriting.
    #[clap(long)]
    pub strict: bool,

    /// Compile each request schema before flattening it.
    #[clap(long)]
    pub check: bool,

    /// Validate the assembled document.
    #[clap(long)]
    pub validate: bool,

    /// Output path. Supports .json and .yaml/.yml extensions.
    /// If not provided, prints JSON to stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Executes the assemble command.
pub fn execute(args: &AssembleArgs) -> CliResult<()> {
    let routes: Vec<RouteDefinition> = read_structured(&args.routes)?;
    log::info!("loaded {} route(s) from {:?}", routes.len(), args.routes);

    let mut options = AssemblerOptions::default().with_environment(args.environment.as_str());
    if let Some(path) = &args.template {
        options = options.with_template(DocumentTemplate::from_path(path)?);
    }
    if args.strict {
        options = options.with_collision_policy(CollisionPolicy::Fail);
    }

    let metadata = DocumentMetadata {
        title: args.title.clone(),
        description: args.description.clone(),
    };
    let mut assembler = DocumentAssembler::with_options(&args.module, metadata, options)?;

    if args.check {
        assembler.create_paths_checked(&routes, &JsonSchemaCompiler::default())?;
    } else {
        assembler.create_paths(&routes)?;
    }

    if args.validate {
        assembler.validate(&StructuralValidator)?;
        log::info!("document is valid");
    }

    let document = assembler.into_document().to_value()?;
    write_structured(&document, args.output.as_deref())
}
