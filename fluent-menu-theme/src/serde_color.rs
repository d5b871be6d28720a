//! Custom serialization helpers for `vello::peniko::Color`.
//!
//! Colours are written as `#rrggbb`, or `#rrggbbaa` when not fully opaque.

use serde::{Deserialize, Deserializer, Serializer};
use vello::peniko::Color;

/// Serialize a Color as a hex string.
pub fn serialize<S>(color: &Color, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_hex(*color))
}

/// Deserialize a Color from a hex string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let hex = String::deserialize(deserializer)?;
    parse_hex_color(&hex).map_err(Error::custom)
}

/// Format a colour as `#rrggbb` or `#rrggbbaa`.
pub fn to_hex(color: Color) -> String {
    let c = color.to_rgba8();
    if c.a == 255 {
        format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
    }
}

/// Parse `#rrggbb` / `#rrggbbaa` (the leading `#` is optional).
pub fn parse_hex_color(hex: &str) -> Result<Color, String> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return Err(format!("Invalid hex color '{hex}'"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("Invalid hex color '{hex}'"))
    };
    match hex.len() {
        6 => Ok(Color::from_rgb8(channel(0)?, channel(2)?, channel(4)?)),
        8 => Ok(Color::from_rgba8(
            channel(0)?,
            channel(2)?,
            channel(4)?,
            channel(6)?,
        )),
        _ => Err("Hex color must be 6 or 8 characters".to_string()),
    }
}
