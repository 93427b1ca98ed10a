//! Resolver document loading and normalization.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use strata_core::{
    FileError, Issue, Modifier, OrderEntry, ResolverDocument, Result, SourceRef, TokenSet,
    ValidationError, Value,
};
use tracing::debug;

/// The resolver document version this pipeline accepts.
pub const SUPPORTED_VERSION: &str = "2025.10";

/// Where the resolver document comes from.
#[derive(Debug, Clone)]
pub enum ResolverSource {
    /// An on-disk JSON file; its directory becomes the base directory.
    Path(PathBuf),
    /// An in-memory document with an explicit base directory.
    Inline { value: Value, base_dir: PathBuf },
}

/// A normalized resolver document plus the directory for relative refs.
#[derive(Debug, Clone)]
pub struct LoadedResolver {
    pub document: ResolverDocument,
    pub base_dir: PathBuf,
}

/// Load and normalize a resolver document.
pub async fn load(source: &ResolverSource) -> Result<LoadedResolver> {
    match source {
        ResolverSource::Path(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|err| FileError::read(path, err))?;
            let json: serde_json::Value =
                serde_json::from_str(&text).map_err(|err| ValidationError::Parse {
                    path: path.display().to_string(),
                    message: err.to_string(),
                })?;
            let value = Value::from_json(&json);
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            let document = normalize(&value)?;
            debug!(path = %path.display(), sets = document.sets.len(),
                   modifiers = document.modifiers.len(), "loaded resolver");
            Ok(LoadedResolver { document, base_dir })
        }
        ResolverSource::Inline { value, base_dir } => Ok(LoadedResolver {
            document: normalize(value)?,
            base_dir: base_dir.clone(),
        }),
    }
}

/// Normalize a raw resolver value into the document model.
///
/// Rejects missing or unknown versions, parses `resolutionOrder` into
/// `{ kind, name }` entries, and validates that every entry names a
/// declared set or modifier. Modifier iteration order is the declaration
/// order, which fixes dimension ordering for the whole pipeline.
pub fn normalize(value: &Value) -> Result<ResolverDocument> {
    let version = match value.get("version").and_then(Value::as_str) {
        Some(version) => version.to_string(),
        None => return Err(ValidationError::MissingVersion.into()),
    };
    if version != SUPPORTED_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version,
            expected: SUPPORTED_VERSION.to_string(),
        }
        .into());
    }

    let mut issues = Vec::new();
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut sets = IndexMap::new();
    if let Some(fields) = value.get("sets").and_then(Value::as_object) {
        for (set_name, raw) in fields {
            sets.insert(
                set_name.clone(),
                TokenSet {
                    sources: parse_sources(
                        raw.get("sources"),
                        &format!("/sets/{set_name}/sources"),
                        &mut issues,
                    ),
                    description: raw
                        .get("description")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                },
            );
        }
    }

    let mut modifiers = IndexMap::new();
    if let Some(fields) = value.get("modifiers").and_then(Value::as_object) {
        for (modifier_name, raw) in fields {
            let default = raw
                .get("default")
                .and_then(Value::as_str)
                .map(str::to_string);
            let mut contexts = IndexMap::new();
            if let Some(raw_contexts) = raw.get("contexts").and_then(Value::as_object) {
                for (context_name, sources) in raw_contexts {
                    contexts.insert(
                        context_name.clone(),
                        parse_sources(
                            Some(sources),
                            &format!("/modifiers/{modifier_name}/contexts/{context_name}"),
                            &mut issues,
                        ),
                    );
                }
            }
            let Some(default) = default else {
                issues.push(Issue {
                    path: format!("/modifiers/{modifier_name}"),
                    message: "missing default context".to_string(),
                });
                continue;
            };
            if !contexts
                .keys()
                .any(|context| context.to_lowercase() == default.to_lowercase())
            {
                issues.push(Issue {
                    path: format!("/modifiers/{modifier_name}"),
                    message: format!("default '{default}' is not a declared context"),
                });
            }
            modifiers.insert(
                modifier_name.clone(),
                Modifier {
                    default,
                    contexts,
                    description: raw
                        .get("description")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                },
            );
        }
    }

    let mut resolution_order = Vec::new();
    match value.get("resolutionOrder").and_then(Value::as_array) {
        None => issues.push(Issue {
            path: "/resolutionOrder".to_string(),
            message: "missing or not an array".to_string(),
        }),
        Some(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                let uri = match entry {
                    Value::Ref(uri) => Some(uri.as_str()),
                    other => other.get("$ref").and_then(Value::as_str),
                };
                let Some(uri) = uri else {
                    issues.push(Issue {
                        path: format!("/resolutionOrder/{index}"),
                        message: "entry must be a $ref object".to_string(),
                    });
                    continue;
                };
                if let Some(set_name) = uri.strip_prefix("#/sets/") {
                    if sets.contains_key(set_name) {
                        resolution_order.push(OrderEntry::Set(set_name.to_string()));
                    } else {
                        issues.push(Issue {
                            path: format!("/resolutionOrder/{index}"),
                            message: format!("unknown set '{set_name}'"),
                        });
                    }
                } else if let Some(modifier_name) = uri.strip_prefix("#/modifiers/") {
                    let declared = modifiers
                        .keys()
                        .find(|name| name.to_lowercase() == modifier_name.to_lowercase());
                    match declared {
                        Some(declared) => {
                            resolution_order.push(OrderEntry::Modifier(declared.clone()))
                        }
                        None => issues.push(Issue {
                            path: format!("/resolutionOrder/{index}"),
                            message: format!("unknown modifier '{modifier_name}'"),
                        }),
                    }
                } else {
                    issues.push(Issue {
                        path: format!("/resolutionOrder/{index}"),
                        message: format!("'{uri}' is not a #/sets/ or #/modifiers/ reference"),
                    });
                }
            }
        }
    }

    if !issues.is_empty() {
        return Err(ValidationError::Invalid { issues }.into());
    }

    Ok(ResolverDocument {
        version,
        name,
        sets,
        modifiers,
        resolution_order,
    })
}

fn parse_sources(value: Option<&Value>, path: &str, issues: &mut Vec<Issue>) -> Vec<SourceRef> {
    let Some(entries) = value.and_then(Value::as_array) else {
        issues.push(Issue {
            path: path.to_string(),
            message: "missing or not an array".to_string(),
        });
        return Vec::new();
    };
    let mut sources = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let uri = match entry {
            Value::Ref(uri) => Some(uri.as_str()),
            other => other.get("$ref").and_then(Value::as_str),
        };
        match uri {
            Some(uri) => sources.push(SourceRef::new(uri)),
            None => issues.push(Issue {
                path: format!("{path}/{index}"),
                message: "source must be a $ref object".to_string(),
            }),
        }
    }
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::StrataError;

    fn parse(json: &str) -> Value {
        Value::from_json(&serde_json::from_str(json).unwrap())
    }

    fn minimal(version: &str) -> Value {
        parse(&format!(
            r##"{{
                "version": "{version}",
                "sets": {{"core": {{"sources": [{{"$ref": "./core.json"}}]}}}},
                "resolutionOrder": [{{"$ref": "#/sets/core"}}]
            }}"##
        ))
    }

    #[test]
    fn test_normalize_minimal() {
        let document = normalize(&minimal("2025.10")).unwrap();
        assert_eq!(document.version, "2025.10");
        assert_eq!(
            document.resolution_order,
            vec![OrderEntry::Set("core".to_string())]
        );
        assert_eq!(document.sets["core"].sources[0].reference, "./core.json");
    }

    #[test]
    fn test_missing_version_rejected() {
        let err = normalize(&parse(r#"{"resolutionOrder": []}"#)).unwrap_err();
        assert!(matches!(
            err,
            StrataError::Validation(ValidationError::MissingVersion)
        ));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let err = normalize(&minimal("2024.01")).unwrap_err();
        assert!(matches!(
            err,
            StrataError::Validation(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_unknown_order_target_is_issue() {
        let value = parse(
            r##"{
                "version": "2025.10",
                "resolutionOrder": [{"$ref": "#/sets/ghost"}]
            }"##,
        );
        let err = normalize(&value).unwrap_err();
        assert!(matches!(
            err,
            StrataError::Validation(ValidationError::Invalid { .. })
        ));
    }

    #[test]
    fn test_modifier_order_is_declaration_order() {
        let value = parse(
            r##"{
                "version": "2025.10",
                "modifiers": {
                    "theme": {"default": "light", "contexts": {"light": [], "dark": []}},
                    "density": {"default": "normal", "contexts": {"normal": []}}
                },
                "resolutionOrder": [
                    {"$ref": "#/modifiers/theme"},
                    {"$ref": "#/modifiers/density"}
                ]
            }"##,
        );
        let document = normalize(&value).unwrap();
        assert_eq!(document.dimensions(), vec!["theme", "density"]);
    }

    #[test]
    fn test_default_must_name_context() {
        let value = parse(
            r##"{
                "version": "2025.10",
                "modifiers": {
                    "theme": {"default": "sepia", "contexts": {"light": []}}
                },
                "resolutionOrder": []
            }"##,
        );
        assert!(normalize(&value).is_err());
    }
}
