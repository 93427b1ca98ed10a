//! Error types for rendering.

use strata_core::ConfigError;
use thiserror::Error;

/// Result type alias for renderer operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while rendering an output.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A cascade bundler could not identify the base permutation.
    #[error("no base permutation available for output '{output}'")]
    MissingBasePermutation { output: String },

    /// Output or template configuration problems.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
