//! CLI error types.

use apinav_config::ConfigError;
use apinav_sidebar::{CompileError, EmitError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Compile(#[from] CompileError),

    #[error("{0}")]
    Emit(#[from] EmitError),
}
