//! JavaScript module renderer.

use serde_json::Map;
use strata_core::ResolvedPermutation;

use super::{Preset, Renderer};
use crate::bundle::{meta_json, permutation_key};
use crate::context::{OutputTree, RenderContext};
use crate::error::Result;

/// Emits tokens as an ES module.
///
/// Standalone: `export const tokens = {...}` per permutation. Bundle:
/// permutations keyed by dimension values plus an exported `meta` object
/// so a runtime helper can compute the key at lookup time.
pub struct JsRenderer {
    pub preset: Preset,
}

impl JsRenderer {
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

impl Default for JsRenderer {
    fn default() -> Self {
        Self::bundle()
    }
}

impl Renderer for JsRenderer {
    fn name(&self) -> &'static str {
        "js"
    }

    fn format(&self, ctx: &RenderContext<'_>) -> Result<OutputTree> {
        let mut tree = OutputTree::new();
        match self.preset {
            Preset::Standalone => {
                for permutation in ctx.permutations {
                    let object =
                        serde_json::to_string_pretty(&tokens_json(permutation))?;
                    let contents =
                        format!("export const tokens = {object};\n\nexport default tokens;\n");
                    let file = ctx.file_name(&permutation.inputs)?;
                    tree.try_insert(&ctx.output.name, file, contents)?;
                }
            }
            Preset::Bundle => {
                let meta = serde_json::to_string_pretty(&meta_json(&ctx.meta))?;
                let mut themes = Map::new();
                for permutation in ctx.permutations {
                    themes.insert(
                        permutation_key(&permutation.inputs),
                        serde_json::Value::Object(tokens_json(permutation)),
                    );
                }
                let themes = serde_json::to_string_pretty(&serde_json::Value::Object(themes))?;
                let contents = format!(
                    "export const meta = {meta};\n\nexport const themes = {themes};\n\nexport default themes;\n"
                );
                let inputs = ctx
                    .base()
                    .map(|base| base.inputs.clone())
                    .unwrap_or_default();
                let file = ctx.file_name(&inputs)?;
                tree.try_insert(&ctx.output.name, file, contents)?;
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

    #[test]
    fn test_standalone_module_shape() {
        let mut tokens = TokenTable::new();
        tokens.insert(Token::new(
            "colorBrand",
            None,
            Value::String("#0080ff".into()),
        ));
        let permutations = vec![ResolvedPermutation::new(
            ModifierInputs::new(),
            tokens,
            SourceMap::new(),
            ReferenceResolution::Resolved,
        )];
        let resolver = ResolverDocument {
            version: "2025.10".to_string(),
            name: None,
            sets: IndexMap::new(),
            modifiers: IndexMap::new(),
            resolution_order: Vec::new(),
        };
        let output = OutputDescriptor {
            name: "js".to_string(),
            file: "tokens.js".to_string(),
        };
        let ctx = RenderContext::new(&permutations, &resolver, &output);
        let tree = JsRenderer::standalone().format(&ctx).unwrap();
        let contents = tree.get("tokens.js").unwrap();
        assert!(contents.starts_with("export const tokens = {"));
        assert!(contents.contains("\"colorBrand\": \"#0080ff\""));
        assert!(contents.ends_with("export default tokens;\n"));
    }
}
