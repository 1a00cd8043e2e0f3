//! Shared input/output helpers for the commands.

use crate::error::{CliError, CliResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Reads a JSON or YAML file (YAML accepts JSON) into `T`.
pub fn read_structured<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    if !path.exists() {
        return Err(CliError::General(format!("Input file not found: {:?}", path)));
    }
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content)
        .map_err(|e| CliError::General(format!("Failed to parse {:?}: {}", path, e)))
}

/// Writes `value` to `output` (format picked by extension) or pretty JSON to stdout.
pub fn write_structured<T: Serialize>(value: &T, output: Option<&Path>) -> CliResult<()> {
    let Some(out_path) = output else {
        println!("{}", to_json(value)?);
        return Ok(());
    };

    let ext = out_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("json");
    let rendered = match ext {
        "yaml" | "yml" => serde_yaml::to_string(value)
            .map_err(|e| CliError::General(format!("YAML serialization failed: {}", e)))?,
        _ => to_json(value)?,
    };

    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(out_path, rendered)?;
    log::info!("wrote {:?}", out_path);
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::General(format!("JSON serialization failed: {}", e)))
}
