//! Built-in transforms.

use convert_case::{Case, Casing};
use strata_core::{Color, Dimension, Token, TokenType, Value};

use crate::{Transform, TransformError};

/// Re-case token names (`color.brand` -> `color-brand`, `colorBrand`, ...).
pub struct NameCase(pub Case);

impl NameCase {
    pub fn kebab() -> Self {
        Self(Case::Kebab)
    }

    pub fn camel() -> Self {
        Self(Case::Camel)
    }

    pub fn pascal() -> Self {
        Self(Case::Pascal)
    }

    pub fn snake() -> Self {
        Self(Case::Snake)
    }
}

impl Transform for NameCase {
    fn name(&self) -> &str {
        "name/case"
    }

    fn apply(&self, mut token: Token) -> Result<Token, TransformError> {
        token.name = token.name.to_case(self.0);
        Ok(token)
    }
}

/// Prefix token names (`brand-color.brand`).
pub struct NamePrefix(pub String);

impl Transform for NamePrefix {
    fn name(&self) -> &str {
        "name/prefix"
    }

    fn apply(&self, mut token: Token) -> Result<Token, TransformError> {
        token.name = format!("{}{}", self.0, token.name);
        Ok(token)
    }
}

/// Rewrite color values to lowercase hex strings.
pub struct ColorHex;

impl Transform for ColorHex {
    fn name(&self) -> &str {
        "color/hex"
    }

    fn matcher(&self, token: &Token) -> bool {
        token.ty == Some(TokenType::Color)
    }

    fn apply(&self, mut token: Token) -> Result<Token, TransformError> {
        let color = Color::from_value(&token.value).ok_or_else(|| {
            TransformError::new(format!("not a color value: {:?}", token.value))
        })?;
        token.value = Value::String(color.to_hex());
        Ok(token)
    }
}

/// Rewrite color values to `rgb()` functional strings.
pub struct ColorRgb;

impl Transform for ColorRgb {
    fn name(&self) -> &str {
        "color/rgb"
    }

    fn matcher(&self, token: &Token) -> bool {
        token.ty == Some(TokenType::Color)
    }

    fn apply(&self, mut token: Token) -> Result<Token, TransformError> {
        let color = Color::from_value(&token.value).ok_or_else(|| {
            TransformError::new(format!("not a color value: {:?}", token.value))
        })?;
        token.value = Value::String(color.to_rgb_string());
        Ok(token)
    }
}

/// Convert rem dimensions to px against a root font size.
pub struct DimensionToPx {
    pub base: f64,
}

impl Default for DimensionToPx {
    fn default() -> Self {
        Self { base: 16.0 }
    }
}

impl Transform for DimensionToPx {
    fn name(&self) -> &str {
        "dimension/px"
    }

    fn matcher(&self, token: &Token) -> bool {
        token.ty == Some(TokenType::Dimension)
    }

    fn apply(&self, mut token: Token) -> Result<Token, TransformError> {
        let Some(dimension) = Dimension::from_value(&token.value) else {
            return Ok(token);
        };
        if dimension.unit == "rem" {
            token.value = dimension_value(dimension.value * self.base, "px");
        }
        Ok(token)
    }
}

/// Convert px dimensions to rem against a root font size.
pub struct DimensionToRem {
    pub base: f64,
}

impl Default for DimensionToRem {
    fn default() -> Self {
        Self { base: 16.0 }
    }
}

impl Transform for DimensionToRem {
    fn name(&self) -> &str {
        "dimension/rem"
    }

    fn matcher(&self, token: &Token) -> bool {
        token.ty == Some(TokenType::Dimension)
    }

    fn apply(&self, mut token: Token) -> Result<Token, TransformError> {
        let Some(dimension) = Dimension::from_value(&token.value) else {
            return Ok(token);
        };
        if dimension.unit == "px" {
            token.value = dimension_value(dimension.value / self.base, "rem");
        }
        Ok(token)
    }
}

/// Convert second-based durations to milliseconds.
pub struct DurationToMs;

impl Transform for DurationToMs {
    fn name(&self) -> &str {
        "duration/ms"
    }

    fn matcher(&self, token: &Token) -> bool {
        token.ty == Some(TokenType::Duration)
    }

    fn apply(&self, mut token: Token) -> Result<Token, TransformError> {
        let Some(dimension) = Dimension::from_value(&token.value) else {
            return Ok(token);
        };
        if dimension.unit == "s" {
            token.value = dimension_value(dimension.value * 1000.0, "ms");
        }
        Ok(token)
    }
}

fn dimension_value(value: f64, unit: &str) -> Value {
    let mut fields = indexmap::IndexMap::new();
    fields.insert("value".to_string(), Value::Number(value));
    fields.insert("unit".to_string(), Value::String(unit.to_string()));
    Value::Object(fields)
}

/// A transform backed by plain functions.
pub struct TransformFn<F> {
    name: String,
    func: F,
}

impl<F> TransformFn<F>
where
    F: Fn(Token) -> Result<Token, TransformError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Transform for TransformFn<F>
where
    F: Fn(Token) -> Result<Token, TransformError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, token: Token) -> Result<Token, TransformError> {
        (self.func)(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Value {
        Value::from_json(&serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_name_kebab() {
        let token = Token::new("color.brandPrimary", None, Value::Null);
        let out = NameCase::kebab().apply(token).unwrap();
        assert_eq!(out.name, "color-brand-primary");
    }

    #[test]
    fn test_name_camel() {
        let token = Token::new("color.brand-primary", None, Value::Null);
        let out = NameCase::camel().apply(token).unwrap();
        assert_eq!(out.name, "colorBrandPrimary");
    }

    #[test]
    fn test_color_hex() {
        let value = parse(r#"{"colorSpace": "srgb", "components": [0, 0.5, 1]}"#);
        let token = Token::new("color.brand", Some(TokenType::Color), value);
        let out = ColorHex.apply(token).unwrap();
        assert_eq!(out.value.as_str(), Some("#0080ff"));
    }

    #[test]
    fn test_color_hex_rejects_non_color() {
        let token = Token::new("color.bad", Some(TokenType::Color), Value::Number(3.0));
        assert!(ColorHex.apply(token).is_err());
    }

    #[test]
    fn test_rem_to_px() {
        let value = parse(r#"{"value": 1.5, "unit": "rem"}"#);
        let token = Token::new("spacing.lg", Some(TokenType::Dimension), value);
        let out = DimensionToPx::default().apply(token).unwrap();
        assert_eq!(
            Dimension::from_value(&out.value).unwrap().css_string(),
            "24px"
        );
    }

    #[test]
    fn test_duration_to_ms() {
        let value = parse(r#"{"value": 0.3, "unit": "s"}"#);
        let token = Token::new("motion.fast", Some(TokenType::Duration), value);
        let out = DurationToMs.apply(token).unwrap();
        assert_eq!(
            Dimension::from_value(&out.value).unwrap().css_string(),
            "300ms"
        );
    }

    #[test]
    fn test_matcher_gates_by_type() {
        let token = Token::new("spacing.md", Some(TokenType::Dimension), Value::Null);
        assert!(!ColorHex.matcher(&token));
        assert!(DimensionToPx::default().matcher(&token));
    }
}
