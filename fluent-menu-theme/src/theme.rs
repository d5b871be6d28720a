use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use vello::peniko::Color;

use crate::error::{ThemeError, ThemeResult};

/// Colours, shadow curve and row metrics of a popup menu.
///
/// Themes are plain values. Menus share them behind an `Rc` and compare by
/// pointer, so replacing a theme always means installing a new value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Human readable name, used in logs and by [Theme::by_name].
    pub name: String,
    /// Whether this is a dark theme. Drives the menu's `dark_mode` property.
    pub dark: bool,

    /// Popup background fill.
    #[serde(with = "crate::serde_color")]
    pub background: Color,
    /// One pixel outline around the popup.
    #[serde(with = "crate::serde_color")]
    pub border: Color,
    /// Label colour of enabled rows.
    #[serde(with = "crate::serde_color")]
    pub text: Color,
    /// Label colour of disabled rows.
    #[serde(with = "crate::serde_color")]
    pub text_disabled: Color,
    /// Shortcut label colour.
    #[serde(with = "crate::serde_color")]
    pub shortcut_text: Color,
    /// Pill fill behind the hovered or keyboard-selected row.
    #[serde(with = "crate::serde_color")]
    pub hover_fill: Color,
    /// Pill fill behind a row while the pointer is pressed on it.
    #[serde(with = "crate::serde_color")]
    pub pressed_fill: Color,
    /// Check mark stroke.
    #[serde(with = "crate::serde_color")]
    pub check_mark: Color,
    /// Separator line.
    #[serde(with = "crate::serde_color")]
    pub separator: Color,
    /// Shadow colour. Its alpha is the base alpha of the innermost layer.
    #[serde(with = "crate::serde_color")]
    pub shadow: Color,
    /// Tint handed to the host when it draws item icons.
    #[serde(with = "crate::serde_color")]
    pub icon_tint: Color,

    /// Corner radius of the popup body.
    pub corner_radius: f64,
    /// Shadow blur radius: number of layers and the margin they occupy.
    pub shadow_radius: usize,
    /// Height of an ordinary row.
    pub item_height: f64,
    /// Corner radius of the hover pill.
    pub item_radius: f64,
    /// Horizontal padding inside a row.
    pub item_h_pad: f64,
    /// Edge length of item icons.
    pub icon_size: f64,
    /// Label font size.
    pub font_size: f32,
    /// Shortcut font size.
    pub shortcut_font_size: f32,
}

impl Theme {
    /// The canonical light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            dark: false,
            background: Color::from_rgb8(249, 249, 249),
            border: Color::from_rgb8(229, 229, 229),
            text: Color::from_rgb8(26, 26, 26),
            text_disabled: Color::from_rgb8(160, 160, 160),
            shortcut_text: Color::from_rgb8(110, 110, 110),
            hover_fill: Color::from_rgb8(235, 235, 235),
            pressed_fill: Color::from_rgb8(224, 224, 224),
            check_mark: Color::from_rgb8(0, 95, 184),
            separator: Color::from_rgb8(229, 229, 229),
            shadow: Color::from_rgba8(0, 0, 0, 50),
            icon_tint: Color::from_rgb8(26, 26, 26),
            ..Self::metrics()
        }
    }

    /// The canonical dark theme.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            dark: true,
            background: Color::from_rgb8(43, 43, 43),
            border: Color::from_rgb8(60, 60, 60),
            text: Color::from_rgb8(228, 228, 228),
            text_disabled: Color::from_rgb8(110, 110, 110),
            shortcut_text: Color::from_rgb8(154, 154, 154),
            hover_fill: Color::from_rgb8(61, 61, 61),
            pressed_fill: Color::from_rgb8(51, 51, 51),
            check_mark: Color::from_rgb8(76, 194, 255),
            separator: Color::from_rgb8(60, 60, 60),
            shadow: Color::from_rgba8(0, 0, 0, 100),
            icon_tint: Color::from_rgb8(228, 228, 228),
            ..Self::metrics()
        }
    }

    /// Metrics shared by both canonical themes. Colours are placeholders.
    fn metrics() -> Self {
        Self {
            name: String::new(),
            dark: false,
            background: Color::TRANSPARENT,
            border: Color::TRANSPARENT,
            text: Color::TRANSPARENT,
            text_disabled: Color::TRANSPARENT,
            shortcut_text: Color::TRANSPARENT,
            hover_fill: Color::TRANSPARENT,
            pressed_fill: Color::TRANSPARENT,
            check_mark: Color::TRANSPARENT,
            separator: Color::TRANSPARENT,
            shadow: Color::TRANSPARENT,
            icon_tint: Color::TRANSPARENT,
            corner_radius: 8.0,
            shadow_radius: 12,
            item_height: 32.0,
            item_radius: 4.0,
            item_h_pad: 12.0,
            icon_size: 16.0,
            font_size: 13.0,
            shortcut_font_size: 12.0,
        }
    }

    /// One of the canonical themes picked by the `dark` flag.
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Look up a built-in theme by name (`light` or `dark`, case-insensitive).
    pub fn by_name(name: &str) -> ThemeResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "light" => Ok(Self::light()),
            "dark" => Ok(Self::dark()),
            _ => Err(ThemeError::not_found(name)),
        }
    }

    /// Alpha of the innermost shadow layer, in `0.0..=1.0`.
    pub fn shadow_base_alpha(&self) -> f32 {
        self.shadow.components[3]
    }

    /// Parse a theme from TOML. Missing fields come from [Theme::light].
    pub fn from_toml_str(content: &str) -> ThemeResult<Self> {
        toml::from_str(content).map_err(|e| ThemeError::Serialization(e.to_string()))
    }

    /// Load a theme from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ThemeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ThemeError::file_not_found(path));
        }
        let content = fs::read_to_string(path)?;
        let theme: Self =
            toml::from_str(&content).map_err(|e| ThemeError::parse_error(path, e.to_string()))?;
        log::debug!("Loaded theme '{}' from {:?}", theme.name, path);
        Ok(theme)
    }

    /// Serialize the theme to TOML.
    pub fn to_toml_string(&self) -> ThemeResult<String> {
        toml::to_string(self).map_err(|e| ThemeError::Serialization(e.to_string()))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(c: Color) -> (u8, u8, u8, u8) {
        let c = c.to_rgba8();
        (c.r, c.g, c.b, c.a)
    }

    #[test]
    fn canonical_themes_differ_in_palette_not_metrics() {
        let light = Theme::light();
        let dark = Theme::dark();
        assert!(!light.dark);
        assert!(dark.dark);
        assert_ne!(rgba(light.background), rgba(dark.background));
        assert_eq!(light.corner_radius, dark.corner_radius);
        assert_eq!(light.shadow_radius, 12);
        assert_eq!(dark.item_height, 32.0);
    }

    #[test]
    fn shadow_base_alpha_comes_from_the_shadow_colour() {
        assert!((Theme::light().shadow_base_alpha() - 50.0 / 255.0).abs() < 1e-3);
        assert!((Theme::dark().shadow_base_alpha() - 100.0 / 255.0).abs() < 1e-3);
    }

    #[test]
    fn by_name_knows_the_builtins() {
        assert!(Theme::by_name("Dark").unwrap().dark);
        assert!(!Theme::by_name("light").unwrap().dark);
        assert!(matches!(
            Theme::by_name("neon"),
            Err(ThemeError::ThemeNotFound { .. })
        ));
    }

    #[test]
    fn partial_toml_fills_in_from_light() {
        let theme = Theme::from_toml_str(
            r##"
            name = "midnight"
            dark = true
            background = "#101418"
            corner_radius = 6.0
            "##,
        )
        .unwrap();
        assert_eq!(theme.name, "midnight");
        assert!(theme.dark);
        assert_eq!(rgba(theme.background), (0x10, 0x14, 0x18, 255));
        assert_eq!(theme.corner_radius, 6.0);
        assert_eq!(rgba(theme.text), rgba(Theme::light().text));
        assert_eq!(theme.item_height, 32.0);
    }

    #[test]
    fn toml_output_reads_back() {
        let text = Theme::dark().to_toml_string().unwrap();
        assert!(text.contains("background = \"#2b2b2b\""));
        let back = Theme::from_toml_str(&text).unwrap();
        assert_eq!(rgba(back.shadow), (0, 0, 0, 100));
        assert!(back.dark);
    }

    #[test]
    fn bad_colour_is_a_serialization_error() {
        let err = Theme::from_toml_str("background = \"#12\"").unwrap_err();
        assert!(matches!(err, ThemeError::Serialization(_)));
    }
}
