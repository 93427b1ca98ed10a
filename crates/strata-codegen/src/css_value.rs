//! Token values as CSS strings.
//!
//! Typed formatting for everything a custom property can hold. Values
//! that already arrived as strings (after a color transform, say) pass
//! through untouched.

use strata_core::{format_number, Color, Dimension, Token, TokenType, Value};

/// Format a resolved token value for CSS output.
pub fn css_string(token: &Token) -> String {
    value_css(&token.value, token.ty)
}

fn value_css(value: &Value, ty: Option<TokenType>) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(*n),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Ref(uri) => uri.clone(),
        Value::Array(items) => match ty {
            Some(TokenType::CubicBezier) => cubic_bezier_css(items),
            Some(TokenType::FontFamily) => items
                .iter()
                .map(font_family_css)
                .collect::<Vec<_>>()
                .join(", "),
            Some(TokenType::Gradient) => gradient_css(items),
            Some(TokenType::Shadow) => items
                .iter()
                .map(shadow_css)
                .collect::<Vec<_>>()
                .join(", "),
            _ => items
                .iter()
                .map(|item| value_css(item, ty))
                .collect::<Vec<_>>()
                .join(", "),
        },
        Value::Object(_) => match ty {
            Some(TokenType::Color) => color_css(value),
            Some(TokenType::Dimension) | Some(TokenType::Duration) => dimension_css(value),
            Some(TokenType::Shadow) => shadow_css(value),
            Some(TokenType::Border) => border_css(value),
            Some(TokenType::Typography) => typography_css(value),
            Some(TokenType::StrokeStyle) => stroke_style_css(value),
            _ => value.to_json().to_string(),
        },
    }
}

fn color_css(value: &Value) -> String {
    Color::from_value(value)
        .map(|color| color.to_hex())
        .unwrap_or_else(|| value.to_json().to_string())
}

fn dimension_css(value: &Value) -> String {
    Dimension::from_value(value)
        .map(|dimension| dimension.css_string())
        .unwrap_or_else(|| value.to_json().to_string())
}

fn cubic_bezier_css(items: &[Value]) -> String {
    let parts: Vec<String> = items
        .iter()
        .map(|item| item.as_f64().map(format_number).unwrap_or_default())
        .collect();
    format!("cubic-bezier({})", parts.join(", "))
}

fn font_family_css(value: &Value) -> String {
    match value.as_str() {
        Some(family) if family.contains(' ') => format!("'{family}'"),
        Some(family) => family.to_string(),
        None => value.to_json().to_string(),
    }
}

fn shadow_css(value: &Value) -> String {
    let Some(fields) = value.as_object() else {
        return value_css(value, None);
    };
    let mut parts = Vec::new();
    if fields.get("inset").and_then(Value::as_bool) == Some(true) {
        parts.push("inset".to_string());
    }
    for field in ["offsetX", "offsetY", "blur", "spread"] {
        if let Some(part) = fields.get(field) {
            parts.push(sized_css(part));
        }
    }
    if let Some(color) = fields.get("color") {
        parts.push(color_css(color));
    }
    parts.join(" ")
}

fn border_css(value: &Value) -> String {
    let Some(fields) = value.as_object() else {
        return value_css(value, None);
    };
    let mut parts = Vec::new();
    if let Some(width) = fields.get("width") {
        parts.push(sized_css(width));
    }
    if let Some(style) = fields.get("style") {
        parts.push(stroke_style_css(style));
    }
    if let Some(color) = fields.get("color") {
        parts.push(color_css(color));
    }
    parts.join(" ")
}

fn stroke_style_css(value: &Value) -> String {
    match value {
        Value::String(style) => style.clone(),
        // The object form carries dashArray/lineCap; CSS has no direct
        // equivalent, so it renders as dashed.
        Value::Object(_) => "dashed".to_string(),
        other => value_css(other, None),
    }
}

fn gradient_css(stops: &[Value]) -> String {
    let rendered: Vec<String> = stops
        .iter()
        .map(|stop| {
            let Some(fields) = stop.as_object() else {
                return value_css(stop, None);
            };
            let color = fields.get("color").map(color_css).unwrap_or_default();
            match fields.get("position").and_then(Value::as_f64) {
                Some(position) => {
                    format!("{} {}%", color, format_number(position * 100.0))
                }
                None => color,
            }
        })
        .collect();
    format!("linear-gradient(90deg, {})", rendered.join(", "))
}

fn typography_css(value: &Value) -> String {
    let Some(fields) = value.as_object() else {
        return value_css(value, None);
    };
    let mut parts = Vec::new();
    if let Some(weight) = fields.get("fontWeight") {
        parts.push(value_css(weight, Some(TokenType::FontWeight)));
    }
    let size = fields.get("fontSize").map(sized_css);
    let line_height = fields.get("lineHeight").map(|v| value_css(v, None));
    match (size, line_height) {
        (Some(size), Some(line_height)) => parts.push(format!("{size}/{line_height}")),
        (Some(size), None) => parts.push(size),
        _ => {}
    }
    if let Some(family) = fields.get("fontFamily") {
        parts.push(value_css(family, Some(TokenType::FontFamily)));
    }
    parts.join(" ")
}

/// A sub-field that is a dimension object or an already-formatted string.
fn sized_css(value: &Value) -> String {
    match value {
        Value::Object(_) => dimension_css(value),
        other => value_css(other, None),
    }
}
