//! Figma Variables renderer.
//!
//! Emits a variables document: a base collection carrying every
//! compatible token at its base value, plus one collection per modifier
//! whose modes are the modifier's contexts and whose variables are the
//! tokens that modifier's contexts override. Token types Figma variables
//! cannot express are excluded.

use serde_json::{json, Map};
use strata_core::{Color, Dimension, ResolvedPermutation, Token, TokenType, Value};

use super::Renderer;
use crate::context::{OutputTree, RenderContext};
use crate::error::Result;

/// Emits tokens as a Figma Variables JSON document.
#[derive(Debug, Default)]
pub struct FigmaRenderer;

impl Renderer for FigmaRenderer {
    fn name(&self) -> &'static str {
        "figma"
    }

    fn format(&self, ctx: &RenderContext<'_>) -> Result<OutputTree> {
        let base = ctx.base()?;
        let mut collections = Vec::new();

        // Base collection: one mode, every compatible token.
        let mut variables = Vec::new();
        for token in base.tokens.sorted() {
            if let Some(variable) = variable_json(token, "default") {
                variables.push(variable);
            }
        }
        collections.push(json!({
            "name": "base",
            "modes": ["default"],
            "variables": variables,
        }));

        // One collection per modifier, modes from its contexts. Values
        // come from the single-dimension permutation for each context.
        for dimension in &ctx.meta.dimensions {
            let mut modes = Vec::new();
            let mut overridden: Vec<&Token> = Vec::new();
            let mut per_mode: Vec<(&str, &ResolvedPermutation)> = Vec::new();

            for permutation in ctx.permutations {
                let deviations = ctx.meta.deviations(&permutation.inputs);
                if deviations.is_empty() {
                    let default_mode = ctx
                        .meta
                        .defaults
                        .get(dimension)
                        .map(String::as_str)
                        .unwrap_or_default();
                    per_mode.push((default_mode, permutation));
                } else if deviations.len() == 1 && deviations[0].0 == dimension.as_str() {
                    let (modifier, context) = deviations[0];
                    per_mode.push((context, permutation));
                    for token in permutation.tokens.sorted() {
                        let original = token.path.join(".");
                        let stamped = permutation
                            .sources()
                            .get(&original)
                            .and_then(|origin| origin.as_modifier())
                            .is_some_and(|(m, _)| m == modifier);
                        if stamped && !overridden.iter().any(|t| t.name == token.name) {
                            overridden.push(token);
                        }
                    }
                }
            }
            if per_mode.len() < 2 {
                continue;
            }

            let mut variables = Vec::new();
            for token in &overridden {
                let Some(ty) = figma_type(token) else {
                    continue;
                };
                let mut values = Map::new();
                for (mode, permutation) in &per_mode {
                    if let Some(value) = permutation
                        .tokens
                        .get(&token.name)
                        .and_then(|t| figma_value(t))
                    {
                        values.insert((*mode).to_string(), value);
                    }
                }
                variables.push(json!({
                    "name": token.path.join("/"),
                    "type": ty,
                    "valuesByMode": values,
                }));
            }
            for (mode, _) in &per_mode {
                modes.push((*mode).to_string());
            }
            collections.push(json!({
                "name": dimension,
                "modes": modes,
                "variables": variables,
            }));
        }

        let document = json!({ "collections": collections });
        let mut tree = OutputTree::new();
        let file = ctx.file_name(&base.inputs)?;
        tree.try_insert(
            &ctx.output.name,
            file,
            serde_json::to_string_pretty(&document)? + "\n",
        )?;
        Ok(tree)
    }
}

fn variable_json(token: &Token, mode: &str) -> Option<serde_json::Value> {
    let ty = figma_type(token)?;
    let value = figma_value(token)?;
    let mut values = Map::new();
    values.insert(mode.to_string(), value);
    Some(json!({
        "name": token.path.join("/"),
        "type": ty,
        "valuesByMode": values,
    }))
}

fn figma_type(token: &Token) -> Option<&'static str> {
    match token.ty {
        Some(TokenType::Color) => Some("COLOR"),
        Some(TokenType::Dimension)
        | Some(TokenType::Number)
        | Some(TokenType::FontWeight) => Some("FLOAT"),
        Some(TokenType::FontFamily) => Some("STRING"),
        None => match token.value {
            Value::String(_) => Some("STRING"),
            Value::Number(_) => Some("FLOAT"),
            Value::Bool(_) => Some("BOOLEAN"),
            _ => None,
        },
        _ => None,
    }
}

fn figma_value(token: &Token) -> Option<serde_json::Value> {
    match token.ty {
        Some(TokenType::Color) => {
            let color = Color::from_value(&token.value)?;
            Some(json!({
                "r": color.r,
                "g": color.g,
                "b": color.b,
                "a": color.a,
            }))
        }
        Some(TokenType::Dimension) => {
            let dimension = Dimension::from_value(&token.value)?;
            serde_json::Number::from_f64(dimension.value).map(serde_json::Value::Number)
        }
        Some(TokenType::Number) | Some(TokenType::FontWeight) => token
            .value
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number),
        Some(TokenType::FontFamily) => match &token.value {
            Value::String(family) => Some(serde_json::Value::String(family.clone())),
            Value::Array(items) => items
                .first()
                .and_then(Value::as_str)
                .map(|family| serde_json::Value::String(family.to_string())),
            _ => None,
        },
        None => match &token.value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Some(token.value.to_json()),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OutputDescriptor;
    use indexmap::IndexMap;
    use strata_core::{
        Modifier, ModifierInputs, Origin, ReferenceResolution, ResolverDocument, SourceMap,
        TokenTable,
    };

    fn parse(json: &str) -> Value {
        Value::from_json(&serde_json::from_str(json).unwrap())
    }

    fn color_token(name: &str, components: &str) -> Token {
        Token::new(
            name,
            Some(TokenType::Color),
            parse(&format!(
                r#"{{"colorSpace": "srgb", "components": {components}}}"#
            )),
        )
    }

    #[test]
    fn test_collections_per_modifier() {
        let mut contexts = IndexMap::new();
        contexts.insert("light".to_string(), Vec::new());
        contexts.insert("dark".to_string(), Vec::new());
        let mut modifiers = IndexMap::new();
        modifiers.insert(
            "theme".to_string(),
            Modifier {
                default: "light".to_string(),
                contexts,
                description: None,
            },
        );
        let resolver = ResolverDocument {
            version: "2025.10".to_string(),
            name: None,
            sets: IndexMap::new(),
            modifiers,
            resolution_order: Vec::new(),
        };

        let mut light_inputs = ModifierInputs::new();
        light_inputs.insert("theme", "light");
        let mut light_tokens = TokenTable::new();
        light_tokens.insert(color_token("color.text", "[0, 0, 0]"));
        let light = ResolvedPermutation::new(
            light_inputs,
            light_tokens,
            SourceMap::new(),
            ReferenceResolution::Resolved,
        );

        let mut dark_inputs = ModifierInputs::new();
        dark_inputs.insert("theme", "dark");
        let mut dark_tokens = TokenTable::new();
        dark_tokens.insert(color_token("color.text", "[1, 1, 1]"));
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

        let permutations = vec![light, dark];
        let output = OutputDescriptor {
            name: "figma".to_string(),
            file: "variables.json".to_string(),
        };
        let ctx = RenderContext::new(&permutations, &resolver, &output);
        let tree = FigmaRenderer.format(&ctx).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(tree.get("variables.json").unwrap()).unwrap();

        let collections = parsed["collections"].as_array().unwrap();
        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0]["name"], "base");
        assert_eq!(collections[1]["name"], "theme");
        let variable = &collections[1]["variables"][0];
        assert_eq!(variable["name"], "color/text");
        assert_eq!(variable["type"], "COLOR");
        assert!(variable["valuesByMode"]["light"].is_object());
        assert!(variable["valuesByMode"]["dark"].is_object());
    }
}
