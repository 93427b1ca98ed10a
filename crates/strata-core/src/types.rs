//! Token types and value helpers.

use crate::value::Value;

/// The closed set of token types relevant to rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Color,
    Dimension,
    FontFamily,
    FontWeight,
    Duration,
    CubicBezier,
    Number,
    StrokeStyle,
    Typography,
    Border,
    Shadow,
    Gradient,
}

impl TokenType {
    /// Parse a `$type` string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "color" => Some(Self::Color),
            "dimension" => Some(Self::Dimension),
            "fontFamily" => Some(Self::FontFamily),
            "fontWeight" => Some(Self::FontWeight),
            "duration" => Some(Self::Duration),
            "cubicBezier" => Some(Self::CubicBezier),
            "number" => Some(Self::Number),
            "strokeStyle" => Some(Self::StrokeStyle),
            "typography" => Some(Self::Typography),
            "border" => Some(Self::Border),
            "shadow" => Some(Self::Shadow),
            "gradient" => Some(Self::Gradient),
            _ => None,
        }
    }

    /// The `$type` string for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Dimension => "dimension",
            Self::FontFamily => "fontFamily",
            Self::FontWeight => "fontWeight",
            Self::Duration => "duration",
            Self::CubicBezier => "cubicBezier",
            Self::Number => "number",
            Self::StrokeStyle => "strokeStyle",
            Self::Typography => "typography",
            Self::Border => "border",
            Self::Shadow => "shadow",
            Self::Gradient => "gradient",
        }
    }

    /// Whether values of this type are composite objects (or arrays of them).
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::Typography | Self::Border | Self::Shadow | Self::Gradient | Self::StrokeStyle
        )
    }

    /// Whether Figma Variables can express this type.
    ///
    /// Figma variables cover colors, floats and strings; composites,
    /// easing curves and gradients have no variable representation.
    pub fn figma_compatible(&self) -> bool {
        matches!(
            self,
            Self::Color | Self::Dimension | Self::FontFamily | Self::FontWeight | Self::Number
        )
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An sRGB color value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a color from a DTCG color value.
    ///
    /// Accepts the object form `{ colorSpace, components, alpha?, hex? }`
    /// and a plain hex string. Only the srgb color space is interpreted;
    /// an object carrying a `hex` fallback is honoured for other spaces.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::from_hex(s),
            Value::Object(fields) => {
                let space = fields.get("colorSpace").and_then(Value::as_str);
                let alpha = fields.get("alpha").and_then(Value::as_f64).unwrap_or(1.0);
                if space.is_none() || space == Some("srgb") {
                    let components = fields.get("components")?.as_array()?;
                    if components.len() != 3 {
                        return None;
                    }
                    let r = components[0].as_f64()? as f32;
                    let g = components[1].as_f64()? as f32;
                    let b = components[2].as_f64()? as f32;
                    return Some(Self::rgba(r, g, b, alpha as f32));
                }
                fields
                    .get("hex")
                    .and_then(Value::as_str)
                    .and_then(Self::from_hex)
            }
            _ => None,
        }
    }

    /// Parse a hex string (`#rrggbb` or `#rrggbbaa`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let parse = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(
                parse(0..2)? as f32 / 255.0,
                parse(2..4)? as f32 / 255.0,
                parse(4..6)? as f32 / 255.0,
            )),
            8 => Some(Self::rgba(
                parse(0..2)? as f32 / 255.0,
                parse(2..4)? as f32 / 255.0,
                parse(4..6)? as f32 / 255.0,
                parse(6..8)? as f32 / 255.0,
            )),
            _ => None,
        }
    }

    /// Convert to 8-bit RGBA components.
    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        )
    }

    /// Convert to a lowercase hex string, with alpha only when present.
    pub fn to_hex(&self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Convert to a modern `rgb()` functional string.
    pub fn to_rgb_string(&self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        if a == 255 {
            format!("rgb({} {} {})", r, g, b)
        } else {
            format!("rgb({} {} {} / {})", r, g, b, self.a)
        }
    }
}

/// A dimension value with unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub value: f64,
    pub unit: String,
}

impl Dimension {
    /// Parse a dimension from the DTCG object form `{ value, unit }`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        Some(Self {
            value: fields.get("value")?.as_f64()?,
            unit: fields.get("unit")?.as_str()?.to_string(),
        })
    }

    /// Format as a CSS dimension (`16px`, `1.5rem`).
    pub fn css_string(&self) -> String {
        format!("{}{}", crate::value::format_number(self.value), self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn parse(json: &str) -> Value {
        Value::from_json(&serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_type_parse_round_trip() {
        for name in [
            "color",
            "dimension",
            "fontFamily",
            "fontWeight",
            "duration",
            "cubicBezier",
            "number",
            "strokeStyle",
            "typography",
            "border",
            "shadow",
            "gradient",
        ] {
            assert_eq!(TokenType::parse(name).unwrap().as_str(), name);
        }
        assert!(TokenType::parse("flavor").is_none());
    }

    #[test]
    fn test_color_from_components() {
        let value = parse(r#"{"colorSpace": "srgb", "components": [0, 0.5, 1]}"#);
        let color = Color::from_value(&value).unwrap();
        assert_eq!(color.to_hex(), "#0080ff");
    }

    #[test]
    fn test_color_alpha_hex() {
        let value = parse(r#"{"colorSpace": "srgb", "components": [1, 0, 0], "alpha": 0.5}"#);
        let color = Color::from_value(&value).unwrap();
        assert_eq!(color.to_hex(), "#ff000080");
    }

    #[test]
    fn test_color_hex_fallback_for_unknown_space() {
        let value = parse(r##"{"colorSpace": "oklch", "components": [0.7, 0.1, 250], "hex": "#336699"}"##);
        let color = Color::from_value(&value).unwrap();
        assert_eq!(color.to_hex(), "#336699");
    }

    #[test]
    fn test_dimension() {
        let value = parse(r#"{"value": 16, "unit": "px"}"#);
        assert_eq!(Dimension::from_value(&value).unwrap().css_string(), "16px");
    }
}
