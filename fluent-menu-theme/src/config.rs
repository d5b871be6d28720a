//! # Theme Configuration
//!
//! Pick the menu theme from environment variables, a TOML file or code.
//!
//! ## Environment Variables
//!
//! - `FLUENT_MENU_THEME`: the default theme (`light`, `dark` or `file:<path>`)
//! - `FLUENT_MENU_THEME_FALLBACK`: used when the default cannot be resolved
//!
//! ## Configuration File Format
//!
//! ```toml
//! [theme]
//! default = "file:/home/me/.config/fluent-menu/midnight.toml"
//! fallback = "dark"
//! ```
//!
//! ## Programmatic Configuration
//!
//! ```rust
//! use fluent_menu_theme::config::{ThemeConfig, ThemeSource};
//!
//! let config = ThemeConfig::new()
//!     .with_default_theme(ThemeSource::Dark)
//!     .with_fallback_theme(ThemeSource::Light);
//! assert!(config.resolve_theme().unwrap().dark);
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ThemeError, ThemeResult};
use crate::theme::Theme;

/// Environment variable holding the default theme source.
pub const THEME_ENV: &str = "FLUENT_MENU_THEME";
/// Environment variable holding the fallback theme source.
pub const THEME_FALLBACK_ENV: &str = "FLUENT_MENU_THEME_FALLBACK";

/// Where a theme comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeSource {
    /// The canonical light theme.
    Light,
    /// The canonical dark theme.
    Dark,
    /// A TOML theme file.
    File(PathBuf),
}

impl ThemeSource {
    /// Parse `light`, `dark` or `file:<path>`. Unknown names yield `None`.
    pub fn parse(source: &str) -> Option<Self> {
        let source = source.trim();
        if let Some(path) = source.strip_prefix("file:") {
            return Some(Self::File(PathBuf::from(path)));
        }
        match source.to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Produce the theme this source names.
    pub fn resolve(&self) -> ThemeResult<Theme> {
        match self {
            Self::Light => Ok(Theme::light()),
            Self::Dark => Ok(Theme::dark()),
            Self::File(path) => Theme::from_file(path),
        }
    }
}

/// Default and fallback theme selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    /// The default theme source.
    pub default_theme: ThemeSource,
    /// The fallback theme source.
    pub fallback_theme: Option<ThemeSource>,
}

#[derive(Deserialize)]
struct ConfigFile {
    theme: Option<ThemeSection>,
}

#[derive(Deserialize)]
struct ThemeSection {
    default: Option<String>,
    fallback: Option<String>,
}

impl ThemeConfig {
    /// Light by default, dark as fallback.
    pub fn new() -> Self {
        Self {
            default_theme: ThemeSource::Light,
            fallback_theme: Some(ThemeSource::Dark),
        }
    }

    /// Read [THEME_ENV] and [THEME_FALLBACK_ENV], keeping defaults for anything unset.
    pub fn from_env_or_default() -> Self {
        let mut config = Self::new();

        if let Ok(theme_env) = env::var(THEME_ENV) {
            match ThemeSource::parse(&theme_env) {
                Some(source) => config.default_theme = source,
                None => log::warn!("Ignoring unknown {THEME_ENV} value '{theme_env}'"),
            }
        }

        if let Ok(fallback_env) = env::var(THEME_FALLBACK_ENV) {
            match ThemeSource::parse(&fallback_env) {
                Some(source) => config.fallback_theme = Some(source),
                None => log::warn!("Ignoring unknown {THEME_FALLBACK_ENV} value '{fallback_env}'"),
            }
        }

        config
    }

    /// Load the `[theme]` table of a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ThemeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ThemeError::file_not_found(path));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| match e {
            ThemeError::Serialization(details) => ThemeError::parse_error(path, details),
            other => other,
        })
    }

    /// Parse the `[theme]` table from TOML content.
    pub fn from_toml(content: &str) -> ThemeResult<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ThemeError::Serialization(e.to_string()))?;
        let mut config = Self::new();
        let Some(section) = file.theme else {
            return Ok(config);
        };
        if let Some(default) = section.default {
            config.default_theme = ThemeSource::parse(&default).ok_or_else(|| ThemeError::not_found(&default))?;
        }
        if let Some(fallback) = section.fallback {
            config.fallback_theme =
                Some(ThemeSource::parse(&fallback).ok_or_else(|| ThemeError::not_found(&fallback))?);
        }
        Ok(config)
    }

    /// Set the default theme source.
    pub fn with_default_theme(mut self, theme: ThemeSource) -> Self {
        self.default_theme = theme;
        self
    }

    /// Set the fallback theme source.
    pub fn with_fallback_theme(mut self, theme: ThemeSource) -> Self {
        self.fallback_theme = Some(theme);
        self
    }

    /// Resolve the default theme, falling back when it cannot be loaded.
    ///
    /// The error of the default source is returned when there is no fallback
    /// or the fallback fails too.
    pub fn resolve_theme(&self) -> ThemeResult<Theme> {
        match self.default_theme.resolve() {
            Ok(theme) => Ok(theme),
            Err(err) => {
                let Some(fallback) = &self.fallback_theme else {
                    return Err(err);
                };
                log::warn!("Theme {:?} unavailable ({err}), using {:?}", self.default_theme, fallback);
                fallback.resolve().map_err(|_| err)
            }
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sources() {
        assert_eq!(ThemeSource::parse("DARK"), Some(ThemeSource::Dark));
        assert_eq!(ThemeSource::parse(" light "), Some(ThemeSource::Light));
        assert_eq!(
            ThemeSource::parse("file:/tmp/t.toml"),
            Some(ThemeSource::File(PathBuf::from("/tmp/t.toml")))
        );
        assert_eq!(ThemeSource::parse("sepia"), None);
    }

    #[test]
    fn toml_section_overrides_defaults() {
        let config = ThemeConfig::from_toml(
            r#"
            [theme]
            default = "dark"
            fallback = "light"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_theme, ThemeSource::Dark);
        assert_eq!(config.fallback_theme, Some(ThemeSource::Light));
    }

    #[test]
    fn missing_section_keeps_defaults() {
        assert_eq!(ThemeConfig::from_toml("").unwrap(), ThemeConfig::new());
    }

    #[test]
    fn unknown_name_in_file_is_reported() {
        let err = ThemeConfig::from_toml("[theme]\ndefault = \"neon\"").unwrap_err();
        assert!(matches!(err, ThemeError::ThemeNotFound { .. }));
    }

    #[test]
    fn missing_theme_file_falls_back() {
        let config = ThemeConfig::new()
            .with_default_theme(ThemeSource::File(PathBuf::from("/nonexistent/theme.toml")))
            .with_fallback_theme(ThemeSource::Dark);
        assert!(config.resolve_theme().unwrap().dark);
    }

    #[test]
    fn missing_theme_file_without_fallback_errors() {
        let config = ThemeConfig {
            default_theme: ThemeSource::File(PathBuf::from("/nonexistent/theme.toml")),
            fallback_theme: None,
        };
        assert!(matches!(
            config.resolve_theme(),
            Err(ThemeError::ThemeFileNotFound { .. })
        ));
    }
}
