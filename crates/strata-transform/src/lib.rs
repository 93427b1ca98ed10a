//! Filter and transform plugins.
//!
//! Filters are pure predicates over resolved tokens, AND-composed per
//! output and run before transforms. Transforms rewrite a token's name
//! or value, optionally gated by a matcher; they must not change `path`
//! or the token type.

pub mod apply;
pub mod filters;
pub mod transforms;

use strata_core::Token;

pub use apply::{apply_output_pipeline, PipelineError};
pub use filters::{ByPath, ByType, FilterFn, IsAlias, IsBase, IsFigmaCompatible};
pub use transforms::{
    ColorHex, ColorRgb, DimensionToPx, DimensionToRem, DurationToMs, NameCase, NamePrefix,
    TransformFn,
};

/// A pure include/exclude predicate over a resolved token.
pub trait Filter: Send + Sync {
    /// Identity used in logs and error reports.
    fn name(&self) -> &str {
        "filter"
    }

    /// Whether the token is included.
    fn filter(&self, token: &Token) -> bool;
}

/// Error returned by a transform's mapping function.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransformError(pub String);

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A token rewrite, optionally gated by a matcher predicate.
pub trait Transform: Send + Sync {
    /// Identity used in logs and error reports.
    fn name(&self) -> &str {
        "transform"
    }

    /// Whether this transform applies to the token. Defaults to all.
    fn matcher(&self, _token: &Token) -> bool {
        true
    }

    /// Rewrite the token. May change `name` and `value` only.
    fn apply(&self, token: Token) -> Result<Token, TransformError>;
}
