//! Error types emitted by the fire CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use fire_store::FireDbError;
use thiserror::Error;

/// Errors emitted by the fire CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// The referenced register database does not exist on disk.
    #[error("{field} path {path} does not exist or is not a file")]
    MissingDatabase {
        /// Name of the option referencing the path.
        field: &'static str,
        /// The path that failed the check.
        path: Utf8PathBuf,
    },
    /// A register operation failed.
    #[error(transparent)]
    Register(#[from] FireDbError),
    /// Serializing the punkt info failed.
    #[error("failed to serialize punkt info: {0}")]
    SerializeInfo(#[source] serde_json::Error),
    /// Writing the punkt info failed.
    #[error("failed to write punkt info: {0}")]
    WriteOutput(#[source] std::io::Error),
}
