//! Core types for the strata design-token compiler.
//!
//! This crate provides the foundational types used across all other strata
//! crates:
//! - The JSON-like [`Value`] tree with a first-class `$ref` variant
//! - Token, token-table and source-attribution types
//! - The normalized resolver document model
//! - Error taxonomy and the diagnostics hook

pub mod document;
pub mod errors;
pub mod permutation;
pub mod tokens;
pub mod types;
pub mod value;

pub use document::{Modifier, OrderEntry, ResolverDocument, SourceRef, TokenSet};
pub use errors::{
    closest_matches, ConfigError, Diagnostic, FileError, Issue, ModifierError, ReferenceError,
    Result, Severity, StrataError, ValidationError, ValidationMode, ValidationOptions, WarningSink,
};
pub use permutation::{ModifierInputs, ReferenceResolution, ResolvedPermutation};
pub use tokens::{Origin, SourceMap, Token, TokenTable};
pub use types::{Color, Dimension, TokenType};
pub use value::{as_alias, format_number, Value, REF_KEY, VALUE_KEY};
