#![deny(missing_docs)]

//! # schema2oas
//!
//! Command Line Interface for turning JSON Schema route definitions into
//! OpenAPI 3 documents.
//!
//! Supported Commands:
//! - `assemble`: Route definitions -> OpenAPI document.
//! - `convert`: JSON Schema -> OpenAPI Schema Object.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::error::CliResult;

mod assemble;
mod convert;
mod error;
mod logging;
mod output;

#[derive(Parser, Debug)]
#[clap(author, version, about = "JSON Schema to OpenAPI toolchain")]
struct Cli {
    /// Default log level, overridden by RUST_LOG.
    #[clap(long, global = true, default_value = "warn")]
    log_level: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble an OpenAPI document from route definitions.
    Assemble(assemble::AssembleArgs),
    /// Convert one JSON Schema into an OpenAPI Schema Object.
    Convert(convert::ConvertArgs),
}

fn run(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Assemble(args) => assemble::execute(args),
        Commands::Convert(args) => convert::execute(args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _logger = match logging::init(&cli.log_level) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
