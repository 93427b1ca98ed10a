//! Alias expansion over the flat token table.
//!
//! Replaces every `"{a.b.c}"` alias expression with the referenced
//! token's resolved value. Whole-string aliases substitute the entire
//! value; aliases embedded in a larger string substitute the textual
//! form. Property-level JSON-Pointer references inside composite values
//! and arrays resolve against the flat map by walking the pointer's
//! segments until a known token name is found.

use indexmap::IndexMap;
use strata_core::{
    as_alias, closest_matches, Diagnostic, ReferenceError, Result, TokenTable,
    ValidationOptions, Value, VALUE_KEY,
};

/// Default bound on alias chain depth.
pub const DEFAULT_ALIAS_DEPTH: u32 = 10;

/// Resolve all aliases in `table`, producing a new table.
///
/// Token metadata (`name`, `path`, type, description, `original_value`)
/// is preserved; only values change.
pub fn resolve_aliases(
    table: &TokenTable,
    max_depth: u32,
    validation: &ValidationOptions,
) -> Result<TokenTable> {
    let mut resolver = AliasResolver {
        table,
        resolved: IndexMap::new(),
        max_depth,
        validation,
    };
    let mut out = TokenTable::new();
    for token in table.iter() {
        let mut stack = Vec::new();
        let value = resolver.resolve_token(&token.name, &mut stack)?;
        let mut resolved = token.clone();
        resolved.value = value;
        out.insert(resolved);
    }
    Ok(out)
}

struct AliasResolver<'a> {
    table: &'a TokenTable,
    /// Memo of fully-resolved values by token name.
    resolved: IndexMap<String, Value>,
    max_depth: u32,
    validation: &'a ValidationOptions,
}

impl AliasResolver<'_> {
    fn resolve_token(&mut self, name: &str, stack: &mut Vec<String>) -> Result<Value> {
        if let Some(done) = self.resolved.get(name) {
            return Ok(done.clone());
        }
        if stack.iter().any(|seen| seen == name) {
            let mut trail = stack.clone();
            trail.push(name.to_string());
            return Err(ReferenceError::Circular { trail }.into());
        }
        stack.push(name.to_string());
        if stack.len() as u32 > self.max_depth {
            return Err(ReferenceError::DepthExceeded {
                at: name.to_string(),
                limit: self.max_depth,
            }
            .into());
        }

        let token = self.table.get(name).ok_or_else(|| {
            strata_core::StrataError::from(ReferenceError::Unknown {
                uri: name.to_string(),
                suggestions: closest_matches(name, self.table.names(), 3),
            })
        })?;
        let value = self.resolve_value(token.value.clone(), stack)?;
        stack.pop();
        self.resolved.insert(name.to_string(), value.clone());
        Ok(value)
    }

    fn resolve_value(&mut self, value: Value, stack: &mut Vec<String>) -> Result<Value> {
        match value {
            Value::String(s) => {
                if let Some(path) = as_alias(&s) {
                    return self.resolve_token(path, stack);
                }
                if s.contains('{') {
                    return Ok(Value::String(self.interpolate(&s, stack)?));
                }
                Ok(Value::String(s))
            }
            Value::Array(items) => {
                // Each alias element resolves to a single element; the
                // array length is the literal number of entries.
                let mut resolved = Vec::with_capacity(items.len());
                for item in items {
                    resolved.push(self.resolve_value(item, stack)?);
                }
                Ok(Value::Array(resolved))
            }
            Value::Object(fields) => {
                let mut resolved = IndexMap::with_capacity(fields.len());
                for (key, field) in fields {
                    resolved.insert(key, self.resolve_value(field, stack)?);
                }
                Ok(Value::Object(resolved))
            }
            Value::Ref(pointer) => self.resolve_pointer(&pointer, stack),
            other => Ok(other),
        }
    }

    fn interpolate(&mut self, text: &str, stack: &mut Vec<String>) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start..];
            let Some(end) = after.find('}') else {
                out.push_str(after);
                return Ok(out);
            };
            let path = &after[1..end];
            let value = self.resolve_token(path, stack)?;
            out.push_str(&value.display_string());
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Resolve a property-level pointer (`#/a/b/$value/components/0`)
    /// against the flat map.
    fn resolve_pointer(&mut self, pointer: &str, stack: &mut Vec<String>) -> Result<Value> {
        let Some(trimmed) = pointer.strip_prefix("#/") else {
            // A non-pointer reference that survived a downgraded
            // reference pass; keep it when failures are tolerated.
            if self.validation.downgrades() {
                self.validation.emit(Diagnostic::warning(
                    "token-reference",
                    format!("unresolved reference {pointer}"),
                ));
                return Ok(Value::Ref(pointer.to_string()));
            }
            return Err(ReferenceError::unknown(pointer).into());
        };

        let segments: Vec<String> = trimmed.split('/').map(unescape_segment).collect();
        for split in 1..=segments.len() {
            let prefix = segments[..split].join(".");
            if !self.table.contains(&prefix) {
                continue;
            }
            let value = self.resolve_token(&prefix, stack)?;
            let mut rest = &segments[split..];
            if rest.first().map(String::as_str) == Some(VALUE_KEY) {
                rest = &rest[1..];
            }
            return navigate(&value, rest).cloned().ok_or_else(|| {
                ReferenceError::MissingPointer {
                    pointer: pointer.to_string(),
                    file: prefix,
                }
                .into()
            });
        }

        // Unresolved pointers survive a downgraded reference pass; keep
        // them when failures are tolerated.
        if self.validation.downgrades() {
            self.validation.emit(Diagnostic::warning(
                "token-reference",
                format!("unresolved reference {pointer}"),
            ));
            return Ok(Value::Ref(pointer.to_string()));
        }
        Err(ReferenceError::Unknown {
            uri: pointer.to_string(),
            suggestions: closest_matches(
                &trimmed.replace('/', "."),
                self.table.names(),
                3,
            ),
        }
        .into())
    }
}

fn navigate<'a>(value: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = value;
    for segment in segments {
        current = match current {
            Value::Object(fields) => fields.get(segment.as_str())?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{StrataError, Token, TokenType};

    fn parse(json: &str) -> Value {
        Value::from_json(&serde_json::from_str(json).unwrap())
    }

    fn table_of(entries: &[(&str, &str)]) -> TokenTable {
        entries
            .iter()
            .map(|(name, json)| Token::new(*name, Some(TokenType::Color), parse(json)))
            .collect()
    }

    fn resolve(table: &TokenTable) -> Result<TokenTable> {
        resolve_aliases(table, DEFAULT_ALIAS_DEPTH, &ValidationOptions::default())
    }

    #[test]
    fn test_whole_string_alias() {
        let table = table_of(&[
            ("color.base", r##""#111""##),
            ("color.text", r#""{color.base}""#),
        ]);
        let resolved = resolve(&table).unwrap();
        assert_eq!(
            resolved.get("color.text").unwrap().value.as_str(),
            Some("#111")
        );
        // Metadata survives expansion.
        assert_eq!(
            resolved.get("color.text").unwrap().original_value,
            Value::String("{color.base}".into())
        );
    }

    #[test]
    fn test_interpolated_alias() {
        let table = table_of(&[
            ("size.base", "16"),
            ("size.line", r#""calc({size.base}px * 1.5)""#),
        ]);
        let resolved = resolve(&table).unwrap();
        assert_eq!(
            resolved.get("size.line").unwrap().value.as_str(),
            Some("calc(16px * 1.5)")
        );
    }

    #[test]
    fn test_chain_resolves_through() {
        let table = table_of(&[
            ("a", r#""{b}""#),
            ("b", r#""{c}""#),
            ("c", r#""done""#),
        ]);
        let resolved = resolve(&table).unwrap();
        assert_eq!(resolved.get("a").unwrap().value.as_str(), Some("done"));
    }

    #[test]
    fn test_cycle_trail() {
        let table = table_of(&[("a", r#""{b}""#), ("b", r#""{a}""#)]);
        let err = resolve(&table).unwrap_err();
        match err {
            StrataError::Reference(ReferenceError::Circular { trail }) => {
                assert_eq!(trail, vec!["a", "b", "a"]);
            }
            other => panic!("expected circular reference, got {other:?}"),
        }
    }

    #[test]
    fn test_depth_bound_at_limit_and_past_it() {
        // Chain of exactly `depth` tokens succeeds.
        let depth = DEFAULT_ALIAS_DEPTH as usize;
        let mut entries: Vec<(String, String)> = Vec::new();
        for i in 0..depth - 1 {
            entries.push((format!("t{i}"), format!("\"{{t{}}}\"", i + 1)));
        }
        entries.push((format!("t{}", depth - 1), "\"end\"".to_string()));
        let table: TokenTable = entries
            .iter()
            .map(|(name, json)| Token::new(name.clone(), None, parse(json)))
            .collect();
        let resolved = resolve(&table).unwrap();
        assert_eq!(resolved.get("t0").unwrap().value.as_str(), Some("end"));

        // One more link fails.
        let mut entries: Vec<(String, String)> = Vec::new();
        for i in 0..depth {
            entries.push((format!("t{i}"), format!("\"{{t{}}}\"", i + 1)));
        }
        entries.push((format!("t{depth}"), "\"end\"".to_string()));
        let table: TokenTable = entries
            .iter()
            .map(|(name, json)| Token::new(name.clone(), None, parse(json)))
            .collect();
        let err = resolve(&table).unwrap_err();
        assert!(matches!(
            err,
            StrataError::Reference(ReferenceError::DepthExceeded { .. })
        ));
    }

    #[test]
    fn test_property_level_pointer() {
        let table = table_of(&[
            (
                "base.blue",
                r#"{"colorSpace": "srgb", "components": [0.2, 0.4, 0.9]}"#,
            ),
            (
                "semantic.primary",
                r##"{"colorSpace": "srgb", "components": [
                    {"$ref": "#/base/blue/$value/components/0"},
                    {"$ref": "#/base/blue/$value/components/1"},
                    0.7
                ]}"##,
            ),
        ]);
        let resolved = resolve(&table).unwrap();
        let components = resolved
            .get("semantic.primary")
            .unwrap()
            .value
            .get("components")
            .unwrap()
            .as_array()
            .unwrap()
            .to_vec();
        let nums: Vec<f64> = components.iter().filter_map(Value::as_f64).collect();
        assert_eq!(nums, vec![0.2, 0.4, 0.7]);
    }

    #[test]
    fn test_array_alias_single_elements() {
        let table = table_of(&[
            ("shadow.base", r#"{"offsetX": "0px", "blur": "2px"}"#),
            ("shadow.accent", r#"{"offsetX": "0px", "blur": "8px"}"#),
            (
                "shadow.layered",
                r#"["{shadow.base}", "{shadow.accent}", {"offsetX": "1px", "blur": "0px"}]"#,
            ),
        ]);
        let resolved = resolve(&table).unwrap();
        let layers = resolved
            .get("shadow.layered")
            .unwrap()
            .value
            .as_array()
            .unwrap()
            .to_vec();
        assert_eq!(layers.len(), 3);
        for layer in &layers {
            assert!(layer.as_object().is_some());
        }
        assert_eq!(
            layers[1].get("blur").and_then(Value::as_str),
            Some("8px")
        );
    }

    #[test]
    fn test_unknown_alias_has_suggestions() {
        let table = table_of(&[
            ("color.brand", r##""#00f""##),
            ("color.text", r#""{color.brnad}""#),
        ]);
        let err = resolve(&table).unwrap_err();
        match err {
            StrataError::Reference(ReferenceError::Unknown { suggestions, .. }) => {
                assert_eq!(suggestions, vec!["color.brand".to_string()]);
            }
            other => panic!("expected unknown reference, got {other:?}"),
        }
    }
}
