//! JSON-like value tree for token documents.
//!
//! Token documents are parsed into [`Value`] trees. The variant set mirrors
//! JSON with one addition: an object whose only key is `$ref` is collapsed
//! into [`Value::Ref`] so the reference and alias resolvers can treat
//! references as first-class leaves. Objects that carry `$ref` alongside
//! sibling keys are kept as objects; the reference resolver applies the
//! property-level override merge for those.

use indexmap::IndexMap;

/// Reserved key marking a reference object.
pub const REF_KEY: &str = "$ref";

/// Reserved key marking a token's value.
pub const VALUE_KEY: &str = "$value";

/// A JSON-like value with a distinguished reference variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
    /// A pure `{ "$ref": <uri> }` object.
    Ref(String),
}

impl Value {
    /// Create an empty object value.
    pub fn object() -> Self {
        Value::Object(IndexMap::new())
    }

    /// Convert from a parsed JSON value, collapsing pure `$ref` objects.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(fields) => {
                if fields.len() == 1 {
                    if let Some(serde_json::Value::String(uri)) = fields.get(REF_KEY) {
                        return Value::Ref(uri.clone());
                    }
                }
                Value::Object(
                    fields
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::from_json(v)))
                        .collect(),
                )
            }
        }
    }

    /// Convert back to a JSON value. `Ref` becomes a `$ref` object.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => {
                // Integral numbers round-trip as integers for stable output.
                if n.fract() == 0.0 && n.abs() < 9e15 {
                    serde_json::Value::Number((*n as i64).into())
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            }
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Ref(uri) => {
                let mut obj = serde_json::Map::new();
                obj.insert(REF_KEY.to_string(), serde_json::Value::String(uri.clone()));
                serde_json::Value::Object(obj)
            }
        }
    }

    /// Get the fields of an object value.
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get the fields of an object value, mutably.
    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get the elements of an array value.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get a numeric value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Look up a key on an object value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|fields| fields.get(key))
    }

    /// Navigate a JSON Pointer (RFC 6901) into this value.
    ///
    /// The empty pointer returns the value itself. `~0`/`~1` escapes are
    /// honoured; array segments must be decimal indices.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        if pointer.is_empty() {
            return Some(self);
        }
        if !pointer.starts_with('/') {
            return None;
        }
        let mut current = self;
        for raw in pointer[1..].split('/') {
            let segment = unescape_pointer_segment(raw);
            current = match current {
                Value::Object(fields) => fields.get(segment.as_ref())?,
                Value::Array(items) => {
                    let index: usize = segment.parse().ok()?;
                    items.get(index)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Whether this node is a token leaf (carries `$value` or a reference).
    pub fn is_token_node(&self) -> bool {
        match self {
            Value::Ref(_) => true,
            Value::Object(fields) => {
                fields.contains_key(VALUE_KEY) || fields.contains_key(REF_KEY)
            }
            _ => false,
        }
    }

    /// Textual form used when an alias is interpolated into a string.
    pub fn display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            other => other.to_json().to_string(),
        }
    }

    /// Whether any string in this tree contains an alias expression, or any
    /// node is an unresolved reference.
    pub fn contains_alias(&self) -> bool {
        match self {
            Value::String(s) => s.contains('{') && s.contains('}'),
            Value::Array(items) => items.iter().any(Value::contains_alias),
            Value::Object(fields) => fields.values().any(Value::contains_alias),
            Value::Ref(_) => true,
            _ => false,
        }
    }
}

/// Format a number without a trailing `.0` for integral values.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Parse a whole-string alias expression (`"{a.b.c}"`), returning the path.
pub fn as_alias(s: &str) -> Option<&str> {
    let inner = s.strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() || inner.contains('{') || inner.contains('}') {
        return None;
    }
    Some(inner)
}

fn unescape_pointer_segment(segment: &str) -> std::borrow::Cow<'_, str> {
    if segment.contains('~') {
        std::borrow::Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        std::borrow::Cow::Borrowed(segment)
    }
}
