//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use crate::oas::validation::ValidationIssue;
use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// The requested environment has no server template.
    ///
    /// Holds the rejected environment name; the message is always `WRONG_TYPE`.
    #[from(ignore)]
    #[display("WRONG_TYPE")]
    WrongType(String),

    /// The input JSON Schema failed to compile. Carries the compiler message verbatim.
    #[from(ignore)]
    #[display("{_0}")]
    SchemaCompile(String),

    /// The assembled document failed structural validation.
    #[display("{}", render_issues(_0))]
    DocumentValidation(Vec<ValidationIssue>),

    /// A component name was derived twice under `CollisionPolicy::Fail`.
    #[from(ignore)]
    #[display("Duplicate component '{name}' in components.{section}")]
    DuplicateComponent {
        /// Components section (`schemas` or `responses`).
        section: &'static str,
        /// The derived component name.
        name: String,
    },

    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

fn render_issues(issues: &[ValidationIssue]) -> String {
    serde_json::to_string(issues).unwrap_or_else(|_| format!("{} validation issues", issues.len()))
}
