//! Preprocessor plugin contract.

use strata_core::{Result, Value};

/// A user-supplied pass over the raw merged token document, run after
/// merging and before the reference pass.
pub trait Preprocessor: Send + Sync {
    /// Identity used in error reports.
    fn name(&self) -> &str {
        "preprocessor"
    }

    /// Rewrite the merged document.
    fn preprocess(&self, document: Value) -> Result<Value>;
}

/// A preprocessor backed by a plain function.
pub struct PreprocessorFn<F> {
    name: String,
    func: F,
}

impl<F> PreprocessorFn<F>
where
    F: Fn(Value) -> Result<Value> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Preprocessor for PreprocessorFn<F>
where
    F: Fn(Value) -> Result<Value> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn preprocess(&self, document: Value) -> Result<Value> {
        (self.func)(document)
    }
}
