//! Render context and output tree.

use indexmap::IndexMap;
use strata_core::{ConfigError, ModifierInputs, ResolvedPermutation, ResolverDocument};

use crate::error::{RenderError, Result};

/// Virtual files produced by a renderer: path -> contents.
#[derive(Debug, Clone, Default)]
pub struct OutputTree {
    files: IndexMap<String, String>,
}

impl OutputTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, failing on a colliding path. Collisions across
    /// permutations mean the filename template is under-parameterized.
    pub fn try_insert(
        &mut self,
        output: &str,
        path: impl Into<String>,
        contents: impl Into<String>,
    ) -> Result<()> {
        let path = path.into();
        if self.files.contains_key(&path) {
            return Err(ConfigError::DuplicateOutputPath {
                output: output.to_string(),
                path,
            }
            .into());
        }
        self.files.insert(path, contents.into());
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// The output an individual renderer is producing.
#[derive(Debug, Clone)]
pub struct OutputDescriptor {
    /// Output name, used in error reports.
    pub name: String,
    /// Filename template with `{<modifier>}` and `{_base}` placeholders.
    pub file: String,
}

/// Dimension metadata shared with renderers and runtime helpers.
#[derive(Debug, Clone)]
pub struct BuildMeta {
    /// Normalized modifier names in dimension order.
    pub dimensions: Vec<String>,
    /// Normalized default context per modifier.
    pub defaults: IndexMap<String, String>,
    /// Index of the base permutation in the permutation list, if present.
    pub base_index: Option<usize>,
}

impl BuildMeta {
    pub fn compute(resolver: &ResolverDocument, permutations: &[ResolvedPermutation]) -> Self {
        let dimensions: Vec<String> = resolver
            .modifiers
            .keys()
            .map(|name| name.to_lowercase())
            .collect();
        let defaults: IndexMap<String, String> = resolver
            .modifiers
            .iter()
            .map(|(name, modifier)| (name.to_lowercase(), modifier.default.to_lowercase()))
            .collect();
        let base_index = permutations.iter().position(|permutation| {
            defaults
                .iter()
                .all(|(modifier, default)| permutation.inputs.get(modifier) == Some(default))
        });
        Self {
            dimensions,
            defaults,
            base_index,
        }
    }

    /// Dimensions on which `inputs` deviates from the defaults.
    pub fn deviations<'a>(&'a self, inputs: &'a ModifierInputs) -> Vec<(&'a str, &'a str)> {
        self.defaults
            .iter()
            .filter_map(|(modifier, default)| {
                let context = inputs.get(modifier)?;
                (context != default).then_some((modifier.as_str(), context))
            })
            .collect()
    }
}

/// Everything a renderer sees: the permutation list (filtered and
/// transformed for this output), the resolver document, the output
/// descriptor, and dimension metadata.
pub struct RenderContext<'a> {
    pub permutations: &'a [ResolvedPermutation],
    pub resolver: &'a ResolverDocument,
    pub output: &'a OutputDescriptor,
    pub meta: BuildMeta,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        permutations: &'a [ResolvedPermutation],
        resolver: &'a ResolverDocument,
        output: &'a OutputDescriptor,
    ) -> Self {
        let meta = BuildMeta::compute(resolver, permutations);
        Self {
            permutations,
            resolver,
            output,
            meta,
        }
    }

    /// The base permutation, required by cascade bundlers.
    pub fn base(&self) -> Result<&'a ResolvedPermutation> {
        self.meta
            .base_index
            .and_then(|index| self.permutations.get(index))
            .ok_or_else(|| RenderError::MissingBasePermutation {
                output: self.output.name.clone(),
            })
    }

    /// Render the output's filename template for one permutation.
    pub fn file_name(&self, inputs: &ModifierInputs) -> Result<String> {
        render_file_name(&self.output.file, inputs)
    }
}

/// Substitute `{<modifier>}` placeholders with the permutation's context
/// (original casing) and `{_base}` with the literal `base`.
pub fn render_file_name(template: &str, inputs: &ModifierInputs) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        let Some(end) = after.find('}') else {
            return Err(ConfigError::InvalidTemplate {
                template: template.to_string(),
                reason: "unclosed placeholder".to_string(),
            }
            .into());
        };
        let placeholder = &after[1..end];
        if placeholder == "_base" {
            out.push_str("base");
        } else {
            match inputs.display_context(placeholder) {
                Some(context) => out.push_str(context),
                None => {
                    return Err(ConfigError::InvalidTemplate {
                        template: template.to_string(),
                        reason: format!("unknown modifier '{placeholder}'"),
                    }
                    .into())
                }
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_substitution() {
        let mut inputs = ModifierInputs::new();
        inputs.insert("theme", "Dark");
        inputs.insert("platform", "web");
        assert_eq!(
            render_file_name("tokens-{theme}-{platform}.css", &inputs).unwrap(),
            "tokens-Dark-web.css"
        );
        assert_eq!(
            render_file_name("tokens-{_base}.css", &inputs).unwrap(),
            "tokens-base.css"
        );
    }

    #[test]
    fn test_file_name_unknown_placeholder() {
        let inputs = ModifierInputs::new();
        assert!(render_file_name("tokens-{theme}.css", &inputs).is_err());
    }

    #[test]
    fn test_output_tree_collision() {
        let mut tree = OutputTree::new();
        tree.try_insert("css", "tokens.css", "a").unwrap();
        let err = tree.try_insert("css", "tokens.css", "b").unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }
}
