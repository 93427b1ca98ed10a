//! Token parser / flattener.
//!
//! Walks the merged tree depth-first and emits a flat table keyed by
//! dot-path. Group-level `$type` annotations are inherited by descendant
//! tokens that do not set their own; other group metadata is
//! informational and not carried onto tokens.

use indexmap::IndexMap;
use strata_core::{
    ConfigError, Diagnostic, Result, Token, TokenTable, TokenType, ValidationOptions, Value,
    REF_KEY, VALUE_KEY,
};

/// Flatten a merged token document into a table.
pub fn flatten(document: &Value, validation: &ValidationOptions) -> Result<TokenTable> {
    let mut table = TokenTable::new();
    if let Some(fields) = document.as_object() {
        walk(fields, &mut Vec::new(), None, &mut table, validation)?;
    }
    Ok(table)
}

fn walk(
    fields: &IndexMap<String, Value>,
    path: &mut Vec<String>,
    inherited: Option<TokenType>,
    table: &mut TokenTable,
    validation: &ValidationOptions,
) -> Result<()> {
    let group_type = type_annotation(fields, path, validation).or(inherited);

    for (key, child) in fields {
        if key.starts_with('$') {
            continue;
        }
        path.push(key.clone());
        if child.is_token_node() {
            emit(child, path, group_type, table, validation)?;
        } else if let Value::Object(children) = child {
            walk(children, path, group_type, table, validation)?;
        } else {
            validation.emit(
                Diagnostic::warning(
                    "validation",
                    format!("ignoring non-token value at {}", path.join(".")),
                )
                .with_source(format!("/{}", path.join("/"))),
            );
        }
        path.pop();
    }
    Ok(())
}

fn emit(
    node: &Value,
    path: &[String],
    inherited: Option<TokenType>,
    table: &mut TokenTable,
    validation: &ValidationOptions,
) -> Result<()> {
    let name = path.join(".");
    if table.contains(&name) {
        // Impossible after merging, but fatal if it ever happens.
        return Err(ConfigError::DuplicateTokenPath { path: name }.into());
    }

    let (ty, value, description, deprecated, extensions) = match node {
        // An unresolved reference that survived a downgraded reference
        // pass; carried through as-is.
        Value::Ref(uri) => (inherited, Value::Ref(uri.clone()), None, None, None),
        Value::Object(fields) => {
            let ty = type_annotation(fields, path, validation).or(inherited);
            let value = match fields.get(VALUE_KEY) {
                Some(value) => value.clone(),
                None => match fields.get(REF_KEY).and_then(Value::as_str) {
                    Some(uri) => Value::Ref(uri.to_string()),
                    None => {
                        validation.emit(Diagnostic::warning(
                            "validation",
                            format!("token {name} has neither $value nor $ref"),
                        ));
                        return Ok(());
                    }
                },
            };
            (
                ty,
                value,
                fields
                    .get("$description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                fields.get("$deprecated").cloned(),
                fields.get("$extensions").cloned(),
            )
        }
        _ => return Ok(()),
    };

    let mut token = Token::new(name, ty, value);
    token.path = path.to_vec();
    token.description = description;
    token.deprecated = deprecated;
    token.extensions = extensions;
    table.insert(token);
    Ok(())
}

fn type_annotation(
    fields: &IndexMap<String, Value>,
    path: &[String],
    validation: &ValidationOptions,
) -> Option<TokenType> {
    let raw = fields.get("$type").and_then(Value::as_str)?;
    match TokenType::parse(raw) {
        Some(ty) => Some(ty),
        None => {
            validation.emit(Diagnostic::warning(
                "validation",
                format!("unknown $type '{raw}' at {}", path.join(".")),
            ));
            None
        }
    }
}
