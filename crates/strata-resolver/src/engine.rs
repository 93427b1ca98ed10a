//! Resolution engine: permutation enumeration and document merging.
//!
//! For each permutation the engine merges the documents named by
//! `resolutionOrder` with a deep last-wins merge, stamping every token
//! leaf with the set or modifier context that most recently wrote it,
//! then runs the preprocessors, the reference pass, the flattener and
//! the alias resolver.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use strata_core::{
    Diagnostic, ModifierError, ModifierInputs, Origin, ReferenceResolution, ReferenceError,
    ResolvedPermutation, ResolverDocument, Result, SourceMap, StrataError, ValidationOptions,
    Value,
};
use tracing::debug;

use crate::alias::{resolve_aliases, DEFAULT_ALIAS_DEPTH};
use crate::cache::FileCache;
use crate::flatten::flatten;
use crate::preprocess::Preprocessor;
use crate::references::ReferenceResolver;

/// Runs stages 2-7 for individual permutations.
pub struct ResolutionEngine {
    document: ResolverDocument,
    base_dir: PathBuf,
    references: ReferenceResolver,
    alias_depth: u32,
}

impl ResolutionEngine {
    pub fn new(document: ResolverDocument, base_dir: PathBuf, cache: Arc<FileCache>) -> Self {
        Self {
            document,
            base_dir,
            references: ReferenceResolver::new(cache),
            alias_depth: DEFAULT_ALIAS_DEPTH,
        }
    }

    pub fn with_reference_depth(mut self, depth: u32) -> Self {
        self.references = self.references.with_max_depth(depth);
        self
    }

    pub fn with_alias_depth(mut self, depth: u32) -> Self {
        self.alias_depth = depth;
        self
    }

    pub fn document(&self) -> &ResolverDocument {
        &self.document
    }

    /// All permutations: the lexicographic Cartesian product of modifier
    /// contexts, modifiers in declaration order. With no modifiers there
    /// is exactly one (empty) permutation.
    pub fn permutations(&self) -> Vec<ModifierInputs> {
        let mut result = vec![ModifierInputs::new()];
        for (name, modifier) in &self.document.modifiers {
            let mut next = Vec::with_capacity(result.len() * modifier.contexts.len().max(1));
            for existing in &result {
                for context in modifier.context_names() {
                    let mut inputs = existing.clone();
                    inputs.insert(name.clone(), context);
                    next.push(inputs);
                }
            }
            result = next;
        }
        result
    }

    /// The base permutation: every modifier at its declared default.
    pub fn base_inputs(&self) -> ModifierInputs {
        self.document
            .modifiers
            .iter()
            .map(|(name, modifier)| (name.clone(), modifier.default.clone()))
            .collect()
    }

    /// Build a full inputs mapping from a partial request, filling
    /// missing modifiers with their defaults. Unknown modifiers or
    /// contexts are an error.
    pub fn inputs_from(&self, requested: &[(String, String)]) -> Result<ModifierInputs> {
        let mut inputs = self.base_inputs();
        for (modifier, context) in requested {
            let Some((declared, definition)) = self.document.modifier(modifier) else {
                return Err(ModifierError::UnknownModifier {
                    name: modifier.clone(),
                    available: self
                        .document
                        .modifiers
                        .keys()
                        .cloned()
                        .collect(),
                }
                .into());
            };
            let Some((declared_context, _)) = definition.context(context) else {
                return Err(ModifierError::UnknownContext {
                    modifier: declared.to_string(),
                    context: context.clone(),
                    available: definition.context_names().map(str::to_string).collect(),
                }
                .into());
            };
            inputs.insert(declared.to_string(), declared_context.to_string());
        }
        Ok(inputs)
    }

    /// Run stages 2-7 for one permutation.
    pub async fn resolve_permutation(
        &self,
        inputs: &ModifierInputs,
        preprocessors: &[Arc<dyn Preprocessor>],
        validation: &ValidationOptions,
    ) -> Result<ResolvedPermutation> {
        let mut merged = Value::object();
        let mut sources = SourceMap::new();
        let mut reference_resolution = ReferenceResolution::Resolved;

        for entry in &self.document.resolution_order {
            match entry {
                strata_core::OrderEntry::Set(name) => {
                    let set = self
                        .document
                        .set(name)
                        .ok_or_else(|| ReferenceError::unknown(format!("#/sets/{name}")))?;
                    let origin = Origin::Set(name.clone());
                    for source in &set.sources {
                        let document = self
                            .materialize(&source.reference, validation, &mut reference_resolution)
                            .await?;
                        merge_layer(&mut merged, &document, &origin, &mut sources);
                    }
                }
                strata_core::OrderEntry::Modifier(name) => {
                    let (declared, modifier) = self
                        .document
                        .modifier(name)
                        .ok_or_else(|| ReferenceError::unknown(format!("#/modifiers/{name}")))?;
                    let context = inputs.get(declared).ok_or_else(|| {
                        StrataError::from(ModifierError::UnknownModifier {
                            name: declared.to_string(),
                            available: self.document.modifiers.keys().cloned().collect(),
                        })
                    })?;
                    let Some((declared_context, context_sources)) = modifier.context(context)
                    else {
                        return Err(ModifierError::UnknownContext {
                            modifier: declared.to_string(),
                            context: context.to_string(),
                            available: modifier.context_names().map(str::to_string).collect(),
                        }
                        .into());
                    };
                    let origin = Origin::Modifier {
                        modifier: declared.to_lowercase(),
                        context: declared_context.to_lowercase(),
                    };
                    for source in context_sources {
                        let document = self
                            .materialize(&source.reference, validation, &mut reference_resolution)
                            .await?;
                        merge_layer(&mut merged, &document, &origin, &mut sources);
                    }
                }
            }
        }

        for preprocessor in preprocessors {
            merged = preprocessor.preprocess(merged)?;
        }

        // Reference pass: expand anything introduced by merging or
        // preprocessing. Recoverable failures downgrade to warnings and
        // the document passes through unresolved.
        merged = match self
            .references
            .resolve(&merged, &self.base_dir, "<merged>")
            .await
        {
            Ok(resolved) => resolved,
            Err(StrataError::Reference(err)) if validation.downgrades() => {
                validation.emit(Diagnostic::warning(err.kind(), err.to_string()));
                reference_resolution = ReferenceResolution::Skipped;
                merged
            }
            Err(err) => return Err(err),
        };

        let table = flatten(&merged, validation)?;
        let table = resolve_aliases(&table, self.alias_depth, validation)?;

        debug!(permutation = %inputs.key(), tokens = table.len(), "resolved permutation");
        Ok(ResolvedPermutation::new(
            inputs.clone(),
            table,
            sources,
            reference_resolution,
        ))
    }

    async fn materialize(
        &self,
        reference: &str,
        validation: &ValidationOptions,
        reference_resolution: &mut ReferenceResolution,
    ) -> Result<Value> {
        match self.references.resolve_source(reference, &self.base_dir).await {
            Ok(document) => Ok(document),
            Err(StrataError::Reference(err)) if validation.downgrades() => {
                validation
                    .emit(Diagnostic::warning(err.kind(), err.to_string()).with_source(reference));
                *reference_resolution = ReferenceResolution::Skipped;
                self.references.load_source(reference, &self.base_dir).await
            }
            Err(err) => Err(err),
        }
    }
}

/// Merge one source document into the accumulating tree.
///
/// Token leaves replace entirely; groups merge key-by-key. Every leaf the
/// layer writes is stamped with `origin` in the source map.
pub fn merge_layer(dest: &mut Value, src: &Value, origin: &Origin, sources: &mut SourceMap) {
    let Some(src_fields) = src.as_object() else {
        return;
    };
    let Some(dest_fields) = dest.as_object_mut() else {
        return;
    };
    merge_fields(dest_fields, src_fields, &mut Vec::new(), origin, sources);
}

fn merge_fields(
    dest: &mut IndexMap<String, Value>,
    src: &IndexMap<String, Value>,
    path: &mut Vec<String>,
    origin: &Origin,
    sources: &mut SourceMap,
) {
    for (key, incoming) in src {
        path.push(key.clone());
        match dest.get_mut(key) {
            Some(existing) if is_group(existing) && is_group(incoming) => {
                let (Value::Object(dest_children), Value::Object(src_children)) =
                    (existing, incoming)
                else {
                    unreachable!("groups are objects");
                };
                merge_fields(dest_children, src_children, path, origin, sources);
            }
            Some(existing) => {
                // Last wins: replace the node entirely and refresh
                // provenance underneath it.
                let name = path.join(".");
                sources.remove(&name);
                sources.remove_below(&name);
                *existing = incoming.clone();
                stamp(incoming, path, origin, sources);
            }
            None => {
                dest.insert(key.clone(), incoming.clone());
                stamp(incoming, path, origin, sources);
            }
        }
        path.pop();
    }
}

fn is_group(value: &Value) -> bool {
    matches!(value, Value::Object(_)) && !value.is_token_node()
}

fn stamp(value: &Value, path: &mut Vec<String>, origin: &Origin, sources: &mut SourceMap) {
    if value.is_token_node() {
        sources.insert(path.join("."), origin.clone());
    } else if let Value::Object(children) = value {
        for (key, child) in children {
            if key.starts_with('$') {
                continue;
            }
            path.push(key.clone());
            stamp(child, path, origin, sources);
            path.pop();
        }
    }
}
