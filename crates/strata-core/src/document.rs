//! Resolver document model.
//!
//! The normalized form of the on-disk resolver JSON: named sets, named
//! modifiers with contexts, and the ordered resolution sequence. Modifier
//! declaration order is the dimension order used throughout the pipeline.

use indexmap::IndexMap;

/// A source entry: a `$ref` URI naming a token document.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRef {
    pub reference: String,
}

impl SourceRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// A named, ordered list of token-document sources merged as one layer.
#[derive(Debug, Clone, Default)]
pub struct TokenSet {
    pub sources: Vec<SourceRef>,
    pub description: Option<String>,
}

/// A named dimension with discrete contexts.
#[derive(Debug, Clone)]
pub struct Modifier {
    /// Default context name, as declared.
    pub default: String,
    /// Context name -> sources, in declaration order.
    pub contexts: IndexMap<String, Vec<SourceRef>>,
    pub description: Option<String>,
}

impl Modifier {
    /// Case-insensitive context lookup; returns the declared name too.
    pub fn context(&self, name: &str) -> Option<(&str, &[SourceRef])> {
        let wanted = name.to_lowercase();
        self.contexts
            .iter()
            .find(|(declared, _)| declared.to_lowercase() == wanted)
            .map(|(declared, sources)| (declared.as_str(), sources.as_slice()))
    }

    /// Context names in declaration order.
    pub fn context_names(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }
}

/// One normalized entry of `resolutionOrder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEntry {
    Set(String),
    Modifier(String),
}

/// A normalized resolver document.
#[derive(Debug, Clone)]
pub struct ResolverDocument {
    pub version: String,
    pub name: Option<String>,
    pub sets: IndexMap<String, TokenSet>,
    /// Declaration order determines dimension order.
    pub modifiers: IndexMap<String, Modifier>,
    pub resolution_order: Vec<OrderEntry>,
}

impl ResolverDocument {
    /// Modifier names in declaration (dimension) order.
    pub fn dimensions(&self) -> Vec<&str> {
        self.modifiers.keys().map(String::as_str).collect()
    }

    /// Case-insensitive modifier lookup; returns the declared name too.
    pub fn modifier(&self, name: &str) -> Option<(&str, &Modifier)> {
        let wanted = name.to_lowercase();
        self.modifiers
            .iter()
            .find(|(declared, _)| declared.to_lowercase() == wanted)
            .map(|(declared, modifier)| (declared.as_str(), modifier))
    }

    /// Set lookup by declared name.
    pub fn set(&self, name: &str) -> Option<&TokenSet> {
        self.sets.get(name)
    }

    /// Default context per modifier, declared casing, dimension order.
    pub fn defaults(&self) -> IndexMap<String, String> {
        self.modifiers
            .iter()
            .map(|(name, modifier)| (name.clone(), modifier.default.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResolverDocument {
        let mut contexts = IndexMap::new();
        contexts.insert("Light".to_string(), vec![SourceRef::new("./light.json")]);
        contexts.insert("Dark".to_string(), vec![SourceRef::new("./dark.json")]);
        let mut modifiers = IndexMap::new();
        modifiers.insert(
            "Theme".to_string(),
            Modifier {
                default: "Light".to_string(),
                contexts,
                description: None,
            },
        );
        ResolverDocument {
            version: "2025.10".to_string(),
            name: None,
            sets: IndexMap::new(),
            modifiers,
            resolution_order: vec![OrderEntry::Modifier("Theme".to_string())],
        }
    }

    #[test]
    fn test_case_insensitive_modifier_lookup() {
        let doc = sample();
        let (declared, modifier) = doc.modifier("theme").unwrap();
        assert_eq!(declared, "Theme");
        let (context, _) = modifier.context("dark").unwrap();
        assert_eq!(context, "Dark");
    }

    #[test]
    fn test_dimensions_in_declaration_order() {
        let doc = sample();
        assert_eq!(doc.dimensions(), vec!["Theme"]);
    }
}
