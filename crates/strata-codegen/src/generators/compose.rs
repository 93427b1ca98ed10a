//! Jetpack Compose code generator.

use convert_case::{Case, Casing};
use strata_core::{format_number, Color, Dimension, Token, TokenType, Value};

use super::{Preset, Renderer};
use crate::context::{OutputTree, RenderContext};
use crate::error::Result;

/// Generates a Kotlin object of token constants per permutation.
pub struct ComposeRenderer {
    /// Name of the generated object.
    pub object_name: String,
    /// Kotlin package for the generated file.
    pub package: String,
    pub preset: Preset,
}

impl ComposeRenderer {
    pub fn new() -> Self {
        Self {
            object_name: "DesignTokens".to_string(),
            package: "design.tokens".to_string(),
            preset: Preset::Standalone,
        }
    }
}

impl Default for ComposeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for ComposeRenderer {
    fn name(&self) -> &'static str {
        "compose"
    }

    fn format(&self, ctx: &RenderContext<'_>) -> Result<OutputTree> {
        let mut tree = OutputTree::new();
        let permutations: Vec<_> = match self.preset {
            Preset::Standalone => ctx.permutations.iter().collect(),
            Preset::Bundle => vec![ctx.base()?],
        };
        for permutation in permutations {
            let mut lines = Vec::new();
            lines.push(format!("package {}", self.package));
            lines.push(String::new());
            lines.push("import androidx.compose.ui.graphics.Color".to_string());
            lines.push("import androidx.compose.ui.unit.dp".to_string());
            lines.push(String::new());
            lines.push(format!("object {} {{", self.object_name));
            for token in permutation.tokens.sorted() {
                if let Some(line) = constant_line(token) {
                    lines.push(format!("    {line}"));
                }
            }
            lines.push("}".to_string());
            lines.push(String::new());

            let file = ctx.file_name(&permutation.inputs)?;
            tree.try_insert(&ctx.output.name, file, lines.join("\n"))?;
        }
        Ok(tree)
    }
}

fn constant_line(token: &Token) -> Option<String> {
    let name = token.name.to_case(Case::Pascal);
    match token.ty {
        Some(TokenType::Color) => {
            let color = Color::from_value(&token.value)?;
            let (r, g, b, a) = color.to_rgba8();
            Some(format!(
                "val {name} = Color(0x{a:02X}{r:02X}{g:02X}{b:02X})"
            ))
        }
        Some(TokenType::Dimension) => {
            let dimension = Dimension::from_value(&token.value)?;
            Some(format!(
                "val {name} = {}.dp",
                format_number(dimension.value)
            ))
        }
        Some(TokenType::Duration) => {
            let dimension = Dimension::from_value(&token.value)?;
            let millis = match dimension.unit.as_str() {
                "s" => dimension.value * 1000.0,
                _ => dimension.value,
            };
            Some(format!("const val {name}Millis = {}", format_number(millis)))
        }
        Some(TokenType::Number) | Some(TokenType::FontWeight) => {
            let value = token.value.as_f64()?;
            Some(format!("const val {name} = {}", format_number(value)))
        }
        Some(TokenType::FontFamily) => {
            let family = match &token.value {
                Value::String(family) => family.clone(),
                Value::Array(items) => items.first()?.as_str()?.to_string(),
                _ => return None,
            };
            Some(format!("const val {name} = \"{family}\""))
        }
        None => token
            .value
            .as_str()
            .map(|literal| format!("const val {name} = \"{literal}\"")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OutputDescriptor;
    use indexmap::IndexMap;
    use strata_core::{
        ModifierInputs, ReferenceResolution, ResolvedPermutation, ResolverDocument, SourceMap,
        TokenTable,
    };

    fn parse(json: &str) -> Value {
        Value::from_json(&serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_generated_object() {
        let mut tokens = TokenTable::new();
        tokens.insert(Token::new(
            "color.brand",
            Some(TokenType::Color),
            parse(r#"{"colorSpace": "srgb", "components": [0, 0.5, 1]}"#),
        ));
        tokens.insert(Token::new(
            "spacing.md",
            Some(TokenType::Dimension),
            parse(r#"{"value": 16, "unit": "px"}"#),
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
            name: "compose".to_string(),
            file: "DesignTokens.kt".to_string(),
        };
        let ctx = RenderContext::new(&permutations, &resolver, &output);
        let tree = ComposeRenderer::new().format(&ctx).unwrap();
        let contents = tree.get("DesignTokens.kt").unwrap();
        assert!(contents.contains("object DesignTokens {"));
        assert!(contents.contains("val ColorBrand = Color(0xFF0080FF)"));
        assert!(contents.contains("val SpacingMd = 16.dp"));
    }
}
