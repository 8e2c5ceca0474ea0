//! Optional YAML configuration for the `docopt-merge` binary.
//!
//! # Example YAML
//!
//! ```yaml
//! bind:
//!   missing_key: leave_unchanged
//! log: docopt_merge_core=debug
//! ```

use std::path::Path;

use docopt_merge_core::BindOptions;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Options handed to the binder.
    pub bind: BindOptions,
    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    pub log: Option<String>,
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw, path)
    }

    /// Loads configuration from `path`, or returns the defaults when no
    /// file is given.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn from_yaml(raw: &str, path: &Path) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|source| CliError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}
