//! Built-in filters.

use strata_core::{Token, TokenType};

use crate::Filter;

/// Include tokens of one type.
pub struct ByType(pub TokenType);

impl Filter for ByType {
    fn name(&self) -> &str {
        "byType"
    }

    fn filter(&self, token: &Token) -> bool {
        token.ty == Some(self.0)
    }
}

/// Include tokens whose name matches a pattern.
///
/// A plain pattern matches as a dot-path prefix (`color` matches
/// `color.brand` but not `colorful.x`); a trailing `*` makes it a raw
/// string prefix.
pub struct ByPath {
    pattern: String,
}

impl ByPath {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Filter for ByPath {
    fn name(&self) -> &str {
        "byPath"
    }

    fn filter(&self, token: &Token) -> bool {
        if let Some(prefix) = self.pattern.strip_suffix('*') {
            return token.name.starts_with(prefix);
        }
        token.name == self.pattern
            || token
                .name
                .strip_prefix(&self.pattern)
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

/// Include only tokens whose pre-expansion value was an alias.
pub struct IsAlias;

impl Filter for IsAlias {
    fn name(&self) -> &str {
        "isAlias"
    }

    fn filter(&self, token: &Token) -> bool {
        token.is_alias()
    }
}

/// Include only tokens with literal (non-alias) values.
pub struct IsBase;

impl Filter for IsBase {
    fn name(&self) -> &str {
        "isBase"
    }

    fn filter(&self, token: &Token) -> bool {
        !token.is_alias()
    }
}

/// Exclude token types Figma Variables cannot express.
pub struct IsFigmaCompatible;

impl Filter for IsFigmaCompatible {
    fn name(&self) -> &str {
        "isFigmaCompatible"
    }

    fn filter(&self, token: &Token) -> bool {
        match token.ty {
            Some(ty) => ty.figma_compatible(),
            // Untyped primitives map to plain variables.
            None => true,
        }
    }
}

/// A filter backed by a plain function.
pub struct FilterFn<F> {
    name: String,
    func: F,
}

impl<F> FilterFn<F>
where
    F: Fn(&Token) -> bool + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Filter for FilterFn<F>
where
    F: Fn(&Token) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn filter(&self, token: &Token) -> bool {
        (self.func)(token)
    }
}
