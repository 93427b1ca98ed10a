//! Reference (`$ref`) resolution.
//!
//! Expands every reference in a document to the referent's value. URI
//! forms: `#/<pointer>` into the current document, relative or absolute
//! file paths with an optional `#/<pointer>` fragment. Chained references
//! are fully expanded before substitution; sibling keys on a `$ref`
//! object are merged in afterwards as property-level overrides.
//!
//! Each resolution call owns its `visited` trail. The shared file cache
//! never holds cycle state, which is what makes permutations safe to
//! resolve in parallel.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use indexmap::IndexMap;
use strata_core::{
    Issue, ReferenceError, Result, Value, ValidationError, REF_KEY,
};
use tracing::debug;

use crate::cache::FileCache;

/// Default bound on chained reference depth.
pub const DEFAULT_REFERENCE_DEPTH: u32 = 10;

/// Label used for documents that did not come from a file.
const INLINE_LABEL: &str = "<inline>";

/// Resolves `$ref` objects against a shared file cache.
pub struct ReferenceResolver {
    cache: Arc<FileCache>,
    max_depth: u32,
}

/// The document a pointer fragment resolves against.
struct DocContext {
    root: Arc<Value>,
    dir: PathBuf,
    label: String,
}

/// Per-call resolution state; never shared between calls.
struct ResolveState {
    visited: Vec<String>,
}

type RefFuture<'a> = Pin<Box<dyn Future<Output = Result<Value>> + Send + 'a>>;

impl ReferenceResolver {
    pub fn new(cache: Arc<FileCache>) -> Self {
        Self {
            cache,
            max_depth: DEFAULT_REFERENCE_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve every reference in `value`, with `dir` as the base
    /// directory for relative paths and `label` identifying the document
    /// in cycle trails.
    pub async fn resolve(&self, value: &Value, dir: &Path, label: &str) -> Result<Value> {
        let ctx = Arc::new(DocContext {
            root: Arc::new(value.clone()),
            dir: dir.to_path_buf(),
            label: label.to_string(),
        });
        let mut state = ResolveState {
            visited: Vec::new(),
        };
        self.resolve_value(value.clone(), ctx, &mut state).await
    }

    /// Materialize a source document named by a `$ref` URI, fully
    /// expanding references inside it.
    pub async fn resolve_source(&self, reference: &str, dir: &Path) -> Result<Value> {
        self.resolve(&Value::Ref(reference.to_string()), dir, INLINE_LABEL)
            .await
    }

    /// Load a source document without expanding inner references. Used
    /// when a resolution failure is downgraded to a warning and the raw
    /// document passes through.
    pub async fn load_source(&self, reference: &str, dir: &Path) -> Result<Value> {
        let (path_part, fragment) = split_fragment(reference);
        if path_part.is_empty() {
            return Err(ReferenceError::unknown(reference).into());
        }
        let path = join_path(dir, path_part);
        let (canonical, value) = self.cache.load(&path).await?;
        match fragment {
            None => Ok((*value).clone()),
            Some(pointer) => value
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| missing_pointer(pointer, &canonical.display().to_string())),
        }
    }

    fn resolve_value<'a>(
        &'a self,
        value: Value,
        ctx: Arc<DocContext>,
        state: &'a mut ResolveState,
    ) -> RefFuture<'a> {
        Box::pin(async move {
            match value {
                Value::Ref(uri) => self.resolve_uri(uri, ctx, state).await,
                Value::Object(fields) => self.resolve_object(fields, ctx, state).await,
                Value::Array(items) => {
                    let mut resolved = Vec::with_capacity(items.len());
                    for item in items {
                        resolved.push(self.resolve_value(item, ctx.clone(), state).await?);
                    }
                    Ok(Value::Array(resolved))
                }
                other => Ok(other),
            }
        })
    }

    async fn resolve_object(
        &self,
        mut fields: IndexMap<String, Value>,
        ctx: Arc<DocContext>,
        state: &mut ResolveState,
    ) -> Result<Value> {
        let Some(reference) = fields.shift_remove(REF_KEY) else {
            let mut resolved = IndexMap::with_capacity(fields.len());
            for (key, value) in fields {
                resolved.insert(key, self.resolve_value(value, ctx.clone(), state).await?);
            }
            return Ok(Value::Object(resolved));
        };

        let Value::String(uri) = reference else {
            return Err(ValidationError::Invalid {
                issues: vec![Issue {
                    path: ctx.label.clone(),
                    message: "$ref must be a string".to_string(),
                }],
            }
            .into());
        };

        let substituted = self.resolve_uri(uri, ctx.clone(), state).await?;

        // Sibling keys override properties of the referent.
        if fields.is_empty() {
            return Ok(substituted);
        }
        let Value::Object(mut merged) = substituted else {
            return Ok(substituted);
        };
        for (key, value) in fields {
            let resolved = self.resolve_value(value, ctx.clone(), state).await?;
            merged.insert(key, resolved);
        }
        Ok(Value::Object(merged))
    }

    fn resolve_uri<'a>(
        &'a self,
        uri: String,
        ctx: Arc<DocContext>,
        state: &'a mut ResolveState,
    ) -> RefFuture<'a> {
        Box::pin(async move {
            if let Some(pointer) = uri.strip_prefix('#') {
                let canonical_uri = format!("{}#{}", ctx.label, pointer);
                self.check_trail(&canonical_uri, state)?;

                let target = ctx
                    .root
                    .pointer(pointer)
                    .cloned()
                    .ok_or_else(|| missing_pointer(pointer, &ctx.label))?;

                state.visited.push(canonical_uri);
                let resolved = self.resolve_value(target, ctx.clone(), state).await?;
                state.visited.pop();
                return Ok(resolved);
            }

            let (path_part, fragment) = split_fragment(&uri);
            let path = join_path(&ctx.dir, path_part);
            let (canonical, file_value) = self.cache.load(&path).await?;
            let canonical_uri = match fragment {
                Some(pointer) => format!("{}#{}", canonical.display(), pointer),
                None => canonical.display().to_string(),
            };
            self.check_trail(&canonical_uri, state)?;

            let target = match fragment {
                Some(pointer) => file_value
                    .pointer(pointer)
                    .cloned()
                    .ok_or_else(|| missing_pointer(pointer, &canonical.display().to_string()))?,
                None => (*file_value).clone(),
            };

            debug!(uri = %uri, target = %canonical_uri, "expanding reference");
            let file_ctx = Arc::new(DocContext {
                root: file_value,
                dir: canonical
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default(),
                label: canonical.display().to_string(),
            });
            state.visited.push(canonical_uri);
            let resolved = self.resolve_value(target, file_ctx, state).await?;
            state.visited.pop();
            Ok(resolved)
        })
    }

    fn check_trail(&self, canonical_uri: &str, state: &ResolveState) -> Result<()> {
        if state.visited.iter().any(|seen| seen == canonical_uri) {
            let mut trail = state.visited.clone();
            trail.push(canonical_uri.to_string());
            return Err(ReferenceError::Circular { trail }.into());
        }
        if state.visited.len() as u32 >= self.max_depth {
            return Err(ReferenceError::DepthExceeded {
                at: canonical_uri.to_string(),
                limit: self.max_depth,
            }
            .into());
        }
        Ok(())
    }
}

fn missing_pointer(pointer: &str, file: &str) -> strata_core::StrataError {
    ReferenceError::MissingPointer {
        pointer: pointer.to_string(),
        file: file.to_string(),
    }
    .into()
}

fn split_fragment(uri: &str) -> (&str, Option<&str>) {
    match uri.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (uri, None),
    }
}

fn join_path(dir: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        dir.join(candidate)
    }
}
