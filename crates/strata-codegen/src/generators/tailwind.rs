//! Tailwind `@theme` renderer.
//!
//! Tailwind v4 reads design tokens from an `@theme` block of custom
//! properties. The bundle preset shares cascade semantics with the CSS
//! renderer: deviations land in plain attribute-selector blocks after
//! the theme block.

use strata_core::Token;

use super::{Preset, Renderer};
use crate::bundle::{cascade_blocks, default_selector, SelectorArgs};
use crate::context::{OutputTree, RenderContext};
use crate::css_value::css_string;
use crate::error::Result;

/// Emits tokens as a Tailwind `@theme` block.
pub struct TailwindRenderer {
    pub preset: Preset,
}

impl TailwindRenderer {
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

impl Default for TailwindRenderer {
    fn default() -> Self {
        Self::bundle()
    }
}

impl Renderer for TailwindRenderer {
    fn name(&self) -> &'static str {
        "tailwind"
    }

    fn format(&self, ctx: &RenderContext<'_>) -> Result<OutputTree> {
        let mut tree = OutputTree::new();
        match self.preset {
            Preset::Standalone => {
                for permutation in ctx.permutations {
                    let contents = theme_block(&permutation.tokens.sorted());
                    let file = ctx.file_name(&permutation.inputs)?;
                    tree.try_insert(&ctx.output.name, file, contents)?;
                }
            }
            Preset::Bundle => {
                let base = ctx.base()?;
                let mut sections = vec![theme_block(&base.tokens.sorted())];
                for cascade in cascade_blocks(ctx.permutations, &ctx.meta) {
                    if cascade.tokens.is_empty() {
                        continue;
                    }
                    let selector = default_selector(&SelectorArgs {
                        modifier: Some(cascade.modifier),
                        context: Some(cascade.context),
                        is_base: false,
                        inputs: &cascade.permutation.inputs,
                    });
                    let mut block = String::new();
                    block.push_str(&selector);
                    block.push_str(" {\n");
                    for token in &cascade.tokens {
                        block.push_str(&property_line(token));
                    }
                    block.push_str("}\n");
                    sections.push(block);
                }
                let file = ctx.file_name(&base.inputs)?;
                tree.try_insert(&ctx.output.name, file, sections.join("\n"))?;
            }
        }
        Ok(tree)
    }
}

fn theme_block(tokens: &[&Token]) -> String {
    let mut out = String::from("@theme {\n");
    for token in tokens {
        out.push_str(&property_line(token));
    }
    out.push_str("}\n");
    out
}

fn property_line(token: &Token) -> String {
    format!(
        "  --{}: {};\n",
        token.name.replace('.', "-"),
        css_string(token)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OutputDescriptor;
    use indexmap::IndexMap;
    use strata_core::{
        ModifierInputs, ReferenceResolution, ResolvedPermutation, ResolverDocument, SourceMap,
        TokenTable, TokenType, Value,
    };

    #[test]
    fn test_theme_block() {
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
        let resolver = ResolverDocument {
            version: "2025.10".to_string(),
            name: None,
            sets: IndexMap::new(),
            modifiers: IndexMap::new(),
            resolution_order: Vec::new(),
        };
        let output = OutputDescriptor {
            name: "tailwind".to_string(),
            file: "theme.css".to_string(),
        };
        let ctx = RenderContext::new(&permutations, &resolver, &output);
        let tree = TailwindRenderer::bundle().format(&ctx).unwrap();
        assert_eq!(
            tree.get("theme.css").unwrap(),
            "@theme {\n  --color-brand: #0080ff;\n}\n"
        );
    }
}
