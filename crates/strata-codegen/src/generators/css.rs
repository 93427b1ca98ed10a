//! CSS custom-property renderer.

use strata_core::Token;

use super::{Preset, Renderer};
use crate::bundle::{cascade_blocks, default_selector, SelectorArgs, SelectorFn};
use crate::context::{OutputTree, RenderContext};
use crate::css_value::css_string;
use crate::error::Result;

/// Emits tokens as CSS custom properties.
///
/// The bundle preset produces a cascade: one `:root` block for the base
/// permutation and one attribute-selector block per single-dimension
/// deviation, holding only that deviation's overrides.
pub struct CssRenderer {
    pub preset: Preset,
    /// Override the block selector; defaults to `:root` /
    /// `[data-<modifier>="<context>"]`.
    pub selector: Option<SelectorFn>,
}

impl CssRenderer {
    pub fn bundle() -> Self {
        Self {
            preset: Preset::Bundle,
            selector: None,
        }
    }

    pub fn standalone() -> Self {
        Self {
            preset: Preset::Standalone,
            selector: None,
        }
    }

    fn selector(&self, args: &SelectorArgs<'_>) -> String {
        match &self.selector {
            Some(selector) => selector(args),
            None => default_selector(args),
        }
    }
}

impl Default for CssRenderer {
    fn default() -> Self {
        Self::bundle()
    }
}

impl Renderer for CssRenderer {
    fn name(&self) -> &'static str {
        "css"
    }

    fn format(&self, ctx: &RenderContext<'_>) -> Result<OutputTree> {
        let mut tree = OutputTree::new();
        match self.preset {
            Preset::Standalone => {
                for permutation in ctx.permutations {
                    let selector = self.selector(&SelectorArgs {
                        modifier: None,
                        context: None,
                        is_base: true,
                        inputs: &permutation.inputs,
                    });
                    let contents = block(&selector, &permutation.tokens.sorted());
                    let file = ctx.file_name(&permutation.inputs)?;
                    tree.try_insert(&ctx.output.name, file, contents)?;
                }
            }
            Preset::Bundle => {
                let base = ctx.base()?;
                let mut blocks = Vec::new();
                let selector = self.selector(&SelectorArgs {
                    modifier: None,
                    context: None,
                    is_base: true,
                    inputs: &base.inputs,
                });
                blocks.push(block(&selector, &base.tokens.sorted()));

                for cascade in cascade_blocks(ctx.permutations, &ctx.meta) {
                    if cascade.tokens.is_empty() {
                        continue;
                    }
                    let selector = self.selector(&SelectorArgs {
                        modifier: Some(cascade.modifier),
                        context: Some(cascade.context),
                        is_base: false,
                        inputs: &cascade.permutation.inputs,
                    });
                    blocks.push(block(&selector, &cascade.tokens));
                }

                let file = ctx.file_name(&base.inputs)?;
                tree.try_insert(&ctx.output.name, file, blocks.join("\n"))?;
            }
        }
        Ok(tree)
    }
}

/// Render one selector block of custom properties.
fn block(selector: &str, tokens: &[&Token]) -> String {
    let mut out = String::new();
    out.push_str(selector);
    out.push_str(" {\n");
    for token in tokens {
        out.push_str(&format!(
            "  {}: {};\n",
            custom_property(&token.name),
            css_string(token)
        ));
    }
    out.push_str("}\n");
    out
}

/// The custom-property name for a token; dots in untransformed names
/// would be invalid, so they become hyphens.
fn custom_property(name: &str) -> String {
    format!("--{}", name.replace('.', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OutputDescriptor;
    use indexmap::IndexMap;
    use strata_core::{
        ModifierInputs, Origin, ReferenceResolution, ResolvedPermutation, ResolverDocument,
        SourceMap, TokenTable, TokenType, Value,
    };

    fn empty_resolver() -> ResolverDocument {
        ResolverDocument {
            version: "2025.10".to_string(),
            name: None,
            sets: IndexMap::new(),
            modifiers: IndexMap::new(),
            resolution_order: Vec::new(),
        }
    }

    #[test]
    fn test_single_permutation_root_block() {
        let mut tokens = TokenTable::new();
        tokens.insert(Token::new(
            "color-brand",
            Some(TokenType::Color),
            Value::String("#0080ff".into()),
        ));
        let permutations = vec![ResolvedPermutation::new(
            ModifierInputs::new(),
            tokens,
            SourceMap::new(),
            ReferenceResolution::Resolved,
        )];
        let resolver = empty_resolver();
        let output = OutputDescriptor {
            name: "css".to_string(),
            file: "tokens.css".to_string(),
        };
        let ctx = RenderContext::new(&permutations, &resolver, &output);

        let tree = CssRenderer::bundle().format(&ctx).unwrap();
        assert_eq!(
            tree.get("tokens.css").unwrap(),
            ":root {\n  --color-brand: #0080ff;\n}\n"
        );
    }

    #[test]
    fn test_cascade_emits_override_block() {
        let mut modifiers = IndexMap::new();
        let mut contexts = IndexMap::new();
        contexts.insert("light".to_string(), Vec::new());
        contexts.insert("dark".to_string(), Vec::new());
        modifiers.insert(
            "theme".to_string(),
            strata_core::Modifier {
                default: "light".to_string(),
                contexts,
                description: None,
            },
        );
        let resolver = ResolverDocument {
            modifiers,
            ..empty_resolver()
        };

        let mut base_inputs = ModifierInputs::new();
        base_inputs.insert("theme", "light");
        let mut base_tokens = TokenTable::new();
        base_tokens.insert(Token::new("color-text", None, Value::String("#000".into())));
        let base = ResolvedPermutation::new(
            base_inputs,
            base_tokens,
            SourceMap::new(),
            ReferenceResolution::Resolved,
        );

        let mut dark_inputs = ModifierInputs::new();
        dark_inputs.insert("theme", "dark");
        let mut dark_tokens = TokenTable::new();
        let mut dark_token = Token::new("color-text", None, Value::String("#fff".into()));
        dark_token.path = vec!["color".to_string(), "text".to_string()];
        dark_tokens.insert(dark_token);
        let mut dark_sources = SourceMap::new();
        dark_sources.insert(
            "color.text",
            Origin::Modifier {
                modifier: "theme".to_string(),
                context: "dark".to_string(),
            },
        );
        let dark = ResolvedPermutation::new(
            dark_inputs,
            dark_tokens,
            dark_sources,
            ReferenceResolution::Resolved,
        );

        let permutations = vec![base, dark];
        let output = OutputDescriptor {
            name: "css".to_string(),
            file: "tokens.css".to_string(),
        };
        let ctx = RenderContext::new(&permutations, &resolver, &output);
        let tree = CssRenderer::bundle().format(&ctx).unwrap();
        let contents = tree.get("tokens.css").unwrap();
        assert!(contents.contains(":root {\n  --color-text: #000;\n}"));
        assert!(contents.contains("[data-theme=\"dark\"] {\n  --color-text: #fff;\n}"));
    }

    #[test]
    fn test_standalone_one_file_per_permutation() {
        let mut modifiers = IndexMap::new();
        let mut contexts = IndexMap::new();
        contexts.insert("light".to_string(), Vec::new());
        contexts.insert("dark".to_string(), Vec::new());
        modifiers.insert(
            "theme".to_string(),
            strata_core::Modifier {
                default: "light".to_string(),
                contexts,
                description: None,
            },
        );
        let resolver = ResolverDocument {
            modifiers,
            ..empty_resolver()
        };

        let permutations: Vec<ResolvedPermutation> = ["light", "dark"]
            .iter()
            .map(|context| {
                let mut inputs = ModifierInputs::new();
                inputs.insert("theme", *context);
                ResolvedPermutation::new(
                    inputs,
                    TokenTable::new(),
                    SourceMap::new(),
                    ReferenceResolution::Resolved,
                )
            })
            .collect();
        let output = OutputDescriptor {
            name: "css".to_string(),
            file: "tokens-{theme}.css".to_string(),
        };
        let ctx = RenderContext::new(&permutations, &resolver, &output);
        let tree = CssRenderer::standalone().format(&ctx).unwrap();
        let paths: Vec<&str> = tree.paths().collect();
        assert_eq!(paths, vec!["tokens-light.css", "tokens-dark.css"]);
    }

    #[test]
    fn test_standalone_collision_is_config_error() {
        let permutations: Vec<ResolvedPermutation> = (0..2)
            .map(|i| {
                let mut inputs = ModifierInputs::new();
                inputs.insert("theme", if i == 0 { "light" } else { "dark" });
                ResolvedPermutation::new(
                    inputs,
                    TokenTable::new(),
                    SourceMap::new(),
                    ReferenceResolution::Resolved,
                )
            })
            .collect();
        let resolver = empty_resolver();
        let output = OutputDescriptor {
            name: "css".to_string(),
            // No placeholder: both permutations collide.
            file: "tokens.css".to_string(),
        };
        let ctx = RenderContext::new(&permutations, &resolver, &output);
        assert!(CssRenderer::standalone().format(&ctx).is_err());
    }
}
