//! Modifier inputs and per-permutation results.

use crate::tokens::{SourceMap, TokenTable};
use indexmap::IndexMap;

/// A concrete assignment of one context to every modifier.
///
/// Lookups are case-insensitive; the original casing of contexts is kept
/// for file-name interpolation only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifierInputs {
    /// Normalized (lowercase) modifier -> context.
    entries: IndexMap<String, String>,
    /// Original casing, in the same order.
    display: IndexMap<String, String>,
}

impl ModifierInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a context to a modifier, keeping the declared casing for
    /// display and a lowercase form for comparison.
    pub fn insert(&mut self, modifier: impl Into<String>, context: impl Into<String>) {
        let modifier = modifier.into();
        let context = context.into();
        self.entries
            .insert(modifier.to_lowercase(), context.to_lowercase());
        self.display.insert(modifier, context);
    }

    /// The normalized context for a modifier (case-insensitive lookup).
    pub fn get(&self, modifier: &str) -> Option<&str> {
        self.entries
            .get(&modifier.to_lowercase())
            .map(String::as_str)
    }

    /// The context with its original casing, for filename interpolation.
    pub fn display_context(&self, modifier: &str) -> Option<&str> {
        let wanted = modifier.to_lowercase();
        self.display
            .iter()
            .find(|(name, _)| name.to_lowercase() == wanted)
            .map(|(_, context)| context.as_str())
    }

    /// Normalized (modifier, context) pairs in dimension order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The permutation key: context values joined by `-` in dimension order.
    pub fn key(&self) -> String {
        self.entries
            .values()
            .cloned()
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for ModifierInputs {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut inputs = Self::new();
        for (modifier, context) in iter {
            inputs.insert(modifier, context);
        }
        inputs
    }
}

/// Whether the reference pass completed for a permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceResolution {
    Resolved,
    /// The pass failed and was downgraded; the document passed through
    /// with its references unexpanded.
    Skipped,
}

/// One fully-resolved permutation: its inputs, its token table, and the
/// source attribution collected during merging.
#[derive(Debug, Clone)]
pub struct ResolvedPermutation {
    pub inputs: ModifierInputs,
    pub tokens: TokenTable,
    sources: SourceMap,
    pub reference_resolution: ReferenceResolution,
}

impl ResolvedPermutation {
    pub fn new(
        inputs: ModifierInputs,
        tokens: TokenTable,
        sources: SourceMap,
        reference_resolution: ReferenceResolution,
    ) -> Self {
        Self {
            inputs,
            tokens,
            sources,
            reference_resolution,
        }
    }

    /// Source attribution for this permutation's tokens.
    ///
    /// This is the bundler-facing opt-in: renderers that emit minimal
    /// overrides read it; everything else should ignore provenance.
    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Replace the token table, keeping inputs and attribution.
    /// Used by the per-output filter/transform stage.
    pub fn with_tokens(&self, tokens: TokenTable) -> Self {
        Self {
            inputs: self.inputs.clone(),
            tokens,
            sources: self.sources.clone(),
            reference_resolution: self.reference_resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let mut inputs = ModifierInputs::new();
        inputs.insert("Theme", "Dark");
        assert_eq!(inputs.get("theme"), Some("dark"));
        assert_eq!(inputs.get("THEME"), Some("dark"));
        assert_eq!(inputs.display_context("theme"), Some("Dark"));
    }

    #[test]
    fn test_key_joins_in_order() {
        let mut inputs = ModifierInputs::new();
        inputs.insert("theme", "dark");
        inputs.insert("platform", "web");
        assert_eq!(inputs.key(), "dark-web");
    }
}
