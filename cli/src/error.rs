//! Error type for the `docopt-merge` binary.
//!
//! Every failure maps to a process exit status: contract violations exit
//! with 70 (`EX_SOFTWARE`), coercion errors with 64 (`EX_USAGE`), anything
//! else with 1.

use std::path::PathBuf;

use docopt_merge_core::BindError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File or stdin could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The parse result is not a JSON object of bools, strings and string
    /// lists.
    #[error("invalid parse result: {0}")]
    Args(#[from] serde_json::Error),

    /// The bound record could not be rendered as JSON.
    #[error("failed to render bound record: {0}")]
    Render(#[source] serde_json::Error),

    /// A YAML manifest or config could not be parsed.
    #[error("invalid YAML in '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The field manifest is well-formed YAML but describes an invalid
    /// record.
    #[error("invalid manifest: {0}")]
    Manifest(String),

    /// Binding failed.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The audit found contract violations.
    #[error("{0} contract violation(s) found")]
    Violations(usize),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Bind(err) if err.is_fatal() => 70,
            CliError::Bind(_) => 64,
            _ => 1,
        }
    }
}

/// Convenience alias for results with [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
