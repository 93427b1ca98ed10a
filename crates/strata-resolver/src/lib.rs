//! Reference resolution, merging, flattening and alias expansion.
//!
//! This crate implements the per-permutation half of the pipeline:
//! loading and normalizing the resolver document, expanding `$ref`
//! references against a shared read cache, merging source documents in
//! resolution order with source attribution, flattening groups into
//! dot-paths, and expanding `{a.b.c}` aliases.

pub mod alias;
pub mod cache;
pub mod engine;
pub mod flatten;
pub mod loader;
pub mod preprocess;
pub mod references;

pub use alias::{resolve_aliases, DEFAULT_ALIAS_DEPTH};
pub use cache::FileCache;
pub use engine::{merge_layer, ResolutionEngine};
pub use flatten::flatten;
pub use loader::{load, normalize, LoadedResolver, ResolverSource, SUPPORTED_VERSION};
pub use preprocess::{Preprocessor, PreprocessorFn};
pub use references::{ReferenceResolver, DEFAULT_REFERENCE_DEPTH};
