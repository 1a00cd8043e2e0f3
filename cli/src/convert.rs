#![deny(missing_docs)]

//! # Convert Command
//!
//! Converts a single JSON Schema file into an OpenAPI 3.0 Schema Object.

use crate::error::CliResult;
use crate::output::{read_structured, write_structured};
use schema2oas_core::{convert_schema, ConvertOptions};
use serde_json::Value;
use std::path::PathBuf;

/// Arguments for the convert command.
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// JSON Schema file (.json, .yaml or .yml).
    #[clap(long)]
    pub schema: PathBuf,

    /// Skip validating the converted schema inside a draft document.
    #[clap(long)]
    pub no_validate: bool,

    /// Output path. Supports .json and .yaml/.yml extensions.
    /// If not provided, prints JSON to stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Executes the convert command.
pub fn execute(args: &ConvertArgs) -> CliResult<()> {
    let schema: Value = read_structured(&args.schema)?;
    let converted = convert_schema(
        &schema,
        ConvertOptions {
            validate: !args.no_validate,
        },
    )?;
    write_structured(&converted, args.output.as_deref())
}
