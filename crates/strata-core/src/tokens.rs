//! Resolved token and token table types.

use crate::types::TokenType;
use crate::value::Value;
use indexmap::IndexMap;

/// A flattened design token.
///
/// `value` holds the current `$value`; `original_value` is the value as it
/// stood before alias expansion, which filters and bundlers introspect.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Dot-path name (`color.brand`).
    pub name: String,
    /// Ordered path segments.
    pub path: Vec<String>,
    /// Resolved `$type`, local or inherited from the nearest group.
    pub ty: Option<TokenType>,
    /// Current value.
    pub value: Value,
    /// Value before alias expansion.
    pub original_value: Value,
    /// Optional `$description`.
    pub description: Option<String>,
    /// Optional `$deprecated` (boolean or reason string).
    pub deprecated: Option<Value>,
    /// Optional `$extensions` object.
    pub extensions: Option<Value>,
}

impl Token {
    /// Create a token with the given name and value; the path is derived
    /// from the dot-separated name.
    pub fn new(name: impl Into<String>, ty: Option<TokenType>, value: Value) -> Self {
        let name = name.into();
        let path = name.split('.').map(str::to_string).collect();
        Self {
            name,
            path,
            ty,
            original_value: value.clone(),
            value,
            description: None,
            deprecated: None,
            extensions: None,
        }
    }

    /// Whether the pre-expansion value referenced another token.
    pub fn is_alias(&self) -> bool {
        self.original_value.contains_alias()
    }
}

/// A map of tokens keyed by dot-path name.
///
/// Insertion order is the depth-first order the flattener produced; use
/// [`TokenTable::sorted`] before any rendering that depends on order.
#[derive(Debug, Clone, Default)]
pub struct TokenTable {
    tokens: IndexMap<String, Token>,
}

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a token, keyed by its name. Returns the previous token at
    /// that name, if any.
    pub fn insert(&mut self, token: Token) -> Option<Token> {
        self.tokens.insert(token.name.clone(), token)
    }

    /// Get a token by dot-path name.
    pub fn get(&self, name: &str) -> Option<&Token> {
        self.tokens.get(name)
    }

    /// Check whether a token exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tokens.contains_key(name)
    }

    /// Iterate over tokens in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    /// All token names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tokens.keys().map(String::as_str)
    }

    /// Tokens sorted by name; the stable order applied before rendering.
    pub fn sorted(&self) -> Vec<&Token> {
        let mut tokens: Vec<&Token> = self.tokens.values().collect();
        tokens.sort_by(|a, b| a.name.cmp(&b.name));
        tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl IntoIterator for TokenTable {
    type Item = Token;
    type IntoIter = indexmap::map::IntoValues<String, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_values()
    }
}

impl FromIterator<Token> for TokenTable {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        let mut table = Self::new();
        for token in iter {
            table.insert(token);
        }
        table
    }
}

/// Where a token's current value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Written by a set in `resolutionOrder`.
    Set(String),
    /// Written by a modifier context.
    Modifier { modifier: String, context: String },
}

impl Origin {
    /// The attribution label (`core`, or `theme-dark` for modifiers).
    pub fn label(&self) -> String {
        match self {
            Origin::Set(name) => name.clone(),
            Origin::Modifier { modifier, context } => format!("{}-{}", modifier, context),
        }
    }

    /// The modifier/context pair, if this origin is a modifier write.
    pub fn as_modifier(&self) -> Option<(&str, &str)> {
        match self {
            Origin::Modifier { modifier, context } => Some((modifier, context)),
            Origin::Set(_) => None,
        }
    }
}

/// Source attribution for a merged document, keyed by dot-path name.
///
/// Kept parallel to the token table rather than inside token values so
/// transforms cannot corrupt provenance. Consumed only by bundlers.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    entries: IndexMap<String, Origin>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the origin of the leaf at `name`, replacing any earlier one.
    pub fn insert(&mut self, name: impl Into<String>, origin: Origin) {
        self.entries.insert(name.into(), origin);
    }

    pub fn get(&self, name: &str) -> Option<&Origin> {
        self.entries.get(name)
    }

    /// Drop the entry at exactly `name`.
    pub fn remove(&mut self, name: &str) {
        self.entries.shift_remove(name);
    }

    /// Drop all entries underneath the group at `prefix`.
    pub fn remove_below(&mut self, prefix: &str) {
        let needle = format!("{}.", prefix);
        self.entries.retain(|name, _| !name.starts_with(&needle));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Origin)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
