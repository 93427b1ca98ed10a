//! JSON renderer.

use serde_json::Map;
use strata_core::ResolvedPermutation;

use super::{Preset, Renderer};
use crate::bundle::{meta_json, permutation_key};
use crate::context::{OutputTree, RenderContext};
use crate::error::Result;

/// Emits a flat name -> value JSON object per permutation, or one keyed
/// bundle with a `_meta` header covering all of them.
pub struct JsonRenderer {
    pub preset: Preset,
}

impl JsonRenderer {
    pub fn bundle() -> Self {
        Self {
            preset: Preset::Bundle,
        }
    }

    pub fn standalone() -> Self {
        Self {
            preset: Preset::Standalone,
        }
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::bundle()
    }
}

impl Renderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn format(&self, ctx: &RenderContext<'_>) -> Result<OutputTree> {
        let mut tree = OutputTree::new();
        match self.preset {
            Preset::Standalone => {
                for permutation in ctx.permutations {
                    let contents = serde_json::to_string_pretty(&tokens_json(permutation))?;
                    let file = ctx.file_name(&permutation.inputs)?;
                    tree.try_insert(&ctx.output.name, file, contents + "\n")?;
                }
            }
            Preset::Bundle => {
                let mut root = Map::new();
                root.insert("_meta".to_string(), meta_json(&ctx.meta));
                for permutation in ctx.permutations {
                    root.insert(
                        permutation_key(&permutation.inputs),
                        serde_json::Value::Object(tokens_json(permutation)),
                    );
                }
                let contents =
                    serde_json::to_string_pretty(&serde_json::Value::Object(root))?;
                let inputs = ctx
                    .base()
                    .map(|base| base.inputs.clone())
                    .unwrap_or_default();
                let file = ctx.file_name(&inputs)?;
                tree.try_insert(&ctx.output.name, file, contents + "\n")?;
            }
        }
        Ok(tree)
    }
}

fn tokens_json(permutation: &ResolvedPermutation) -> Map<String, serde_json::Value> {
    permutation
        .tokens
        .sorted()
        .into_iter()
        .map(|token| (token.name.clone(), token.value.to_json()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OutputDescriptor;
    use indexmap::IndexMap;
    use strata_core::{
        ModifierInputs, ReferenceResolution, ResolverDocument, SourceMap, Token, TokenTable,
        Value,
    };

    fn resolver() -> ResolverDocument {
        ResolverDocument {
            version: "2025.10".to_string(),
            name: None,
            sets: IndexMap::new(),
            modifiers: IndexMap::new(),
            resolution_order: Vec::new(),
        }
    }

    #[test]
    fn test_keyed_bundle_has_meta() {
        let mut tokens = TokenTable::new();
        tokens.insert(Token::new("spacing.md", None, Value::Number(16.0)));
        let permutations = vec![ResolvedPermutation::new(
            ModifierInputs::new(),
            tokens,
            SourceMap::new(),
            ReferenceResolution::Resolved,
        )];
        let resolver = resolver();
        let output = OutputDescriptor {
            name: "json".to_string(),
            file: "tokens.json".to_string(),
        };
        let ctx = RenderContext::new(&permutations, &resolver, &output);
        let tree = JsonRenderer::bundle().format(&ctx).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(tree.get("tokens.json").unwrap()).unwrap();
        assert!(parsed.get("_meta").is_some());
        assert_eq!(
            parsed.pointer("/default/spacing.md"),
            Some(&serde_json::Value::Number(16.into()))
        );
    }
}
