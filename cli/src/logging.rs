//! Logger setup.

use flexi_logger::{Logger, LoggerHandle};

use crate::error::CliResult;

/// Starts logging to stderr. `RUST_LOG` overrides `default_level`.
///
/// The returned handle must be kept alive for the duration of the program.
pub fn init(default_level: &str) -> CliResult<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(default_level)?
        .log_to_stderr()
        .start()?;
    Ok(handle)
}
