//! Per-output application of filters and transforms.

use std::sync::Arc;

use strata_core::{ConfigError, TokenTable};
#[cfg(test)]
use strata_core::Token;
use thiserror::Error;
use tracing::debug;

use crate::{Filter, Transform};

/// Errors from the filter/transform stage of one output.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A transform's mapping function failed.
    #[error("transform '{transform}' failed on token '{token}' (value {value}): {message}")]
    Transform {
        transform: String,
        token: String,
        value: String,
        message: String,
    },

    /// A transform violated its contract.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Run an output's filters and transforms over a resolved table.
///
/// Filters are AND-composed and run first. Transforms run in list order;
/// each sees the output of the previous one. A transform that changes
/// `path` or the token type is rejected as a malformed plugin.
pub fn apply_output_pipeline(
    table: &TokenTable,
    filters: &[Arc<dyn Filter>],
    transforms: &[Arc<dyn Transform>],
) -> Result<TokenTable, PipelineError> {
    let mut out = TokenTable::new();
    let mut dropped = 0usize;

    'tokens: for token in table.iter() {
        for filter in filters {
            if !filter.filter(token) {
                dropped += 1;
                continue 'tokens;
            }
        }

        let mut current = token.clone();
        for transform in transforms {
            if !transform.matcher(&current) {
                continue;
            }
            let before = current.clone();
            current = transform.apply(current).map_err(|err| {
                PipelineError::Transform {
                    transform: transform.name().to_string(),
                    token: before.name.clone(),
                    value: before.value.to_json().to_string(),
                    message: err.to_string(),
                }
            })?;
            if current.path != before.path || current.ty != before.ty {
                return Err(ConfigError::MalformedPlugin {
                    plugin: transform.name().to_string(),
                    reason: format!(
                        "transform changed path or $type of token '{}'",
                        before.name
                    ),
                }
                .into());
            }
        }
        out.insert(current);
    }

    if dropped > 0 {
        debug!(dropped, kept = out.len(), "filtered tokens");
    }
    Ok(out)
}
