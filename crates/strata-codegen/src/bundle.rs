//! Cascade and keyed bundling helpers.
//!
//! Cascade bundling emits the base permutation under a default selector
//! and, for every single-dimension deviation from base, a narrow block
//! holding only the tokens that deviation's modifier context wrote.
//! Keyed bundling nests every permutation under a stable key derived
//! from the dimension values in dimension order.

use std::sync::Arc;

use strata_core::{ModifierInputs, ResolvedPermutation, Token};

use crate::context::BuildMeta;

/// Arguments handed to a selector function.
pub struct SelectorArgs<'a> {
    /// The deviating modifier, `None` for the base block.
    pub modifier: Option<&'a str>,
    /// The deviating context, `None` for the base block.
    pub context: Option<&'a str>,
    pub is_base: bool,
    /// The full inputs of the permutation being emitted.
    pub inputs: &'a ModifierInputs,
}

/// Maps a permutation to the CSS selector its block is emitted under.
pub type SelectorFn = Arc<dyn Fn(&SelectorArgs<'_>) -> String + Send + Sync>;

/// The default selector: `:root` for base, `[data-<modifier>="<context>"]`
/// for a deviation.
pub fn default_selector(args: &SelectorArgs<'_>) -> String {
    if args.is_base {
        return ":root".to_string();
    }
    format!(
        "[data-{}=\"{}\"]",
        args.modifier.unwrap_or_default(),
        args.context.unwrap_or_default()
    )
}

/// A single-dimension deviation and the tokens its context wrote.
pub struct CascadeBlock<'a> {
    pub modifier: &'a str,
    pub context: &'a str,
    pub permutation: &'a ResolvedPermutation,
    pub tokens: Vec<&'a Token>,
}

/// Collect the cascade override blocks from a permutation list.
///
/// Permutations deviating on more than one dimension are skipped: their
/// overrides cannot be expressed as independent selectors.
pub fn cascade_blocks<'a>(
    permutations: &'a [ResolvedPermutation],
    meta: &'a BuildMeta,
) -> Vec<CascadeBlock<'a>> {
    let mut blocks = Vec::new();
    for permutation in permutations {
        let deviations = meta.deviations(&permutation.inputs);
        if deviations.len() != 1 {
            continue;
        }
        let (modifier, context) = deviations[0];
        let tokens: Vec<&Token> = permutation
            .tokens
            .sorted()
            .into_iter()
            .filter(|token| {
                let original = token.path.join(".");
                permutation
                    .sources()
                    .get(&original)
                    .and_then(|origin| origin.as_modifier())
                    .is_some_and(|(m, c)| m == modifier && c == context)
            })
            .collect();
        blocks.push(CascadeBlock {
            modifier,
            context,
            permutation,
            tokens,
        });
    }
    blocks
}

/// The keyed-bundle key for a permutation: context values joined by `-`
/// in dimension order. The no-modifier build keys its single permutation
/// as `default`.
pub fn permutation_key(inputs: &ModifierInputs) -> String {
    if inputs.is_empty() {
        "default".to_string()
    } else {
        inputs.key()
    }
}

/// The `_meta` payload for keyed bundles.
pub fn meta_json(meta: &BuildMeta) -> serde_json::Value {
    let dimensions: Vec<serde_json::Value> = meta
        .dimensions
        .iter()
        .map(|dimension| serde_json::Value::String(dimension.clone()))
        .collect();
    let defaults: serde_json::Map<String, serde_json::Value> = meta
        .defaults
        .iter()
        .map(|(modifier, context)| {
            (
                modifier.clone(),
                serde_json::Value::String(context.clone()),
            )
        })
        .collect();
    serde_json::json!({
        "dimensions": dimensions,
        "defaults": defaults,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use strata_core::{
        Modifier, Origin, ReferenceResolution, ResolverDocument, SourceMap, TokenTable, Value,
    };

    fn resolver_two_dims() -> ResolverDocument {
        let mut modifiers = IndexMap::new();
        for (name, contexts, default) in [
            ("theme", vec!["light", "dark"], "light"),
            ("density", vec!["normal", "compact"], "normal"),
        ] {
            let mut map = IndexMap::new();
            for context in contexts {
                map.insert(context.to_string(), Vec::new());
            }
            modifiers.insert(
                name.to_string(),
                Modifier {
                    default: default.to_string(),
                    contexts: map,
                    description: None,
                },
            );
        }
        ResolverDocument {
            version: "2025.10".to_string(),
            name: None,
            sets: IndexMap::new(),
            modifiers,
            resolution_order: Vec::new(),
        }
    }

    fn permutation(
        pairs: &[(&str, &str)],
        stamped: &[(&str, &str, &str)],
    ) -> ResolvedPermutation {
        let mut inputs = ModifierInputs::new();
        for (modifier, context) in pairs {
            inputs.insert(*modifier, *context);
        }
        let mut tokens = TokenTable::new();
        let mut sources = SourceMap::new();
        for (name, modifier, context) in stamped {
            tokens.insert(Token::new(*name, None, Value::String("v".into())));
            sources.insert(
                *name,
                Origin::Modifier {
                    modifier: modifier.to_string(),
                    context: context.to_string(),
                },
            );
        }
        ResolvedPermutation::new(inputs, tokens, sources, ReferenceResolution::Resolved)
    }

    #[test]
    fn test_multi_dimension_deviation_skipped() {
        let resolver = resolver_two_dims();
        let permutations = vec![
            permutation(&[("theme", "light"), ("density", "normal")], &[]),
            permutation(
                &[("theme", "dark"), ("density", "normal")],
                &[("color.text", "theme", "dark")],
            ),
            permutation(
                &[("theme", "dark"), ("density", "compact")],
                &[("color.text", "theme", "dark")],
            ),
        ];
        let meta = BuildMeta::compute(&resolver, &permutations);
        let blocks = cascade_blocks(&permutations, &meta);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].modifier, "theme");
        assert_eq!(blocks[0].context, "dark");
        assert_eq!(blocks[0].tokens.len(), 1);
    }

    #[test]
    fn test_block_holds_only_stamped_tokens() {
        let resolver = resolver_two_dims();
        let mut deviating = permutation(
            &[("theme", "dark"), ("density", "normal")],
            &[("color.text", "theme", "dark")],
        );
        // A token written by a set must stay out of the override block.
        deviating
            .tokens
            .insert(Token::new("color.bg", None, Value::String("v".into())));
        let permutations = vec![
            permutation(&[("theme", "light"), ("density", "normal")], &[]),
            deviating,
        ];
        let meta = BuildMeta::compute(&resolver, &permutations);
        let blocks = cascade_blocks(&permutations, &meta);
        assert_eq!(blocks[0].tokens.len(), 1);
        assert_eq!(blocks[0].tokens[0].name, "color.text");
    }

    #[test]
    fn test_default_selector() {
        let inputs = ModifierInputs::new();
        assert_eq!(
            default_selector(&SelectorArgs {
                modifier: None,
                context: None,
                is_base: true,
                inputs: &inputs,
            }),
            ":root"
        );
        assert_eq!(
            default_selector(&SelectorArgs {
                modifier: Some("theme"),
                context: Some("dark"),
                is_base: false,
                inputs: &inputs,
            }),
            "[data-theme=\"dark\"]"
        );
    }

    #[test]
    fn test_permutation_key_default() {
        assert_eq!(permutation_key(&ModifierInputs::new()), "default");
    }
}
