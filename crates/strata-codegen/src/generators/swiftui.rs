//! SwiftUI code generator.

use convert_case::{Case, Casing};
use strata_core::{format_number, Color, Dimension, Token, TokenType, Value};

use super::{Preset, Renderer};
use crate::context::{OutputTree, RenderContext};
use crate::error::Result;

/// Generates a Swift enum of static token constants per permutation.
pub struct SwiftUiRenderer {
    /// Name of the generated enum.
    pub type_name: String,
    pub preset: Preset,
}

impl SwiftUiRenderer {
    pub fn new() -> Self {
        Self {
            type_name: "DesignTokens".to_string(),
            preset: Preset::Standalone,
        }
    }
}

impl Default for SwiftUiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SwiftUiRenderer {
    fn name(&self) -> &'static str {
        "swiftui"
    }

    fn format(&self, ctx: &RenderContext<'_>) -> Result<OutputTree> {
        let mut tree = OutputTree::new();
        let permutations: Vec<_> = match self.preset {
            Preset::Standalone => ctx.permutations.iter().collect(),
            Preset::Bundle => vec![ctx.base()?],
        };
        for permutation in permutations {
            let mut lines = Vec::new();
            lines.push("import SwiftUI".to_string());
            lines.push(String::new());
            lines.push(format!("enum {} {{", self.type_name));
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

/// One `static let` per token; types SwiftUI has no literal for are
/// skipped.
fn constant_line(token: &Token) -> Option<String> {
    let name = token.name.to_case(Case::Camel);
    match token.ty {
        Some(TokenType::Color) => {
            let color = Color::from_value(&token.value)?;
            Some(format!(
                "static let {name} = Color(red: {}, green: {}, blue: {}, opacity: {})",
                swift_float(color.r as f64),
                swift_float(color.g as f64),
                swift_float(color.b as f64),
                swift_float(color.a as f64),
            ))
        }
        Some(TokenType::Dimension) => {
            let dimension = Dimension::from_value(&token.value)?;
            Some(format!(
                "static let {name}: CGFloat = {}",
                format_number(dimension.value)
            ))
        }
        Some(TokenType::Duration) => {
            let dimension = Dimension::from_value(&token.value)?;
            let seconds = match dimension.unit.as_str() {
                "ms" => dimension.value / 1000.0,
                _ => dimension.value,
            };
            Some(format!(
                "static let {name}: TimeInterval = {}",
                swift_float(seconds)
            ))
        }
        Some(TokenType::Number) | Some(TokenType::FontWeight) => {
            let value = token.value.as_f64()?;
            Some(format!(
                "static let {name}: Double = {}",
                format_number(value)
            ))
        }
        Some(TokenType::FontFamily) => {
            let family = match &token.value {
                Value::String(family) => family.clone(),
                Value::Array(items) => items.first()?.as_str()?.to_string(),
                _ => return None,
            };
            Some(format!("static let {name} = \"{family}\""))
        }
        None => token
            .value
            .as_str()
            .map(|literal| format!("static let {name} = \"{literal}\"")),
        // Composite types have no single-constant representation.
        _ => None,
    }
}

fn swift_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        // Swift literals keep short round-trippable precision.
        let rounded = (value * 1000.0).round() / 1000.0;
        format!("{}", rounded)
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
    fn test_generated_enum() {
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
            name: "swiftui".to_string(),
            file: "DesignTokens.swift".to_string(),
        };
        let ctx = RenderContext::new(&permutations, &resolver, &output);
        let tree = SwiftUiRenderer::new().format(&ctx).unwrap();
        let contents = tree.get("DesignTokens.swift").unwrap();
        assert!(contents.contains("enum DesignTokens {"));
        assert!(contents
            .contains("static let colorBrand = Color(red: 0.0, green: 0.5, blue: 1.0, opacity: 1.0)"));
        assert!(contents.contains("static let spacingMd: CGFloat = 16"));
    }
}
