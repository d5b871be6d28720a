use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use xdg::BaseDirectories;

use crate::menu::constants::{DEFAULT_HOVER_OPEN_DELAY_MS, MIN_WIDTH};

/// Directory name under the XDG config directories.
pub const CONFIG_PREFIX: &str = "fluent-menu";
/// File name of the menu configuration.
pub const CONFIG_FILE: &str = "menu.toml";
/// Environment variable overriding [MenuConfig::hover_open_delay_ms].
pub const HOVER_DELAY_ENV: &str = "FLUENT_MENU_HOVER_DELAY_MS";

/// Runtime behaviour of context menus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// Dwell before a hovered submenu row opens its child, in milliseconds.
    pub hover_open_delay_ms: u64,
    /// Minimum content width of a popup.
    pub min_width: u32,
    /// Distance kept between a popup and the screen edges.
    pub screen_margin: u32,
    /// Built-in theme (`light` or `dark`) for new menus. `None` follows the theme configuration.
    pub theme: Option<String>,
}

/// One layer of configuration as found in a file. Unset keys leave earlier layers alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    hover_open_delay_ms: Option<u64>,
    min_width: Option<u32>,
    screen_margin: Option<u32>,
    theme: Option<String>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            hover_open_delay_ms: DEFAULT_HOVER_OPEN_DELAY_MS,
            min_width: MIN_WIDTH as u32,
            screen_margin: 0,
            theme: None,
        }
    }
}

impl MenuConfig {
    /// Load configuration from standard locations, then apply environment overrides.
    ///
    /// Order (later overrides earlier):
    /// 1. System Config: `/etc/xdg/fluent-menu/menu.toml` (and `XDG_CONFIG_DIRS`)
    /// 2. User Config: `~/.config/fluent-menu/menu.toml` (`XDG_CONFIG_HOME`)
    /// 3. `FLUENT_MENU_HOVER_DELAY_MS`
    ///
    /// Unreadable or malformed files are skipped with a warning.
    pub fn load() -> Result<Self> {
        let xdg_dirs = BaseDirectories::with_prefix(CONFIG_PREFIX)
            .context("Failed to resolve XDG base directories")?;

        // Most important first; apply least important first.
        let mut paths: Vec<PathBuf> = xdg_dirs.find_config_files(CONFIG_FILE).collect();
        paths.reverse();

        let mut config = Self::load_files(&paths);
        config.apply_env();
        Ok(config)
    }

    /// Layer the files at `paths` over the defaults, least important first.
    ///
    /// Unreadable or malformed files are skipped with a warning.
    pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Self {
        let mut config = Self::default();
        for path in paths {
            if let Err(e) = config.load_file(path.as_ref()) {
                log::warn!("{:#}", e);
            }
        }
        config
    }

    /// Merge the keys set in the TOML file at `path`.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        log::debug!("Loading menu config from: {:?}", path);
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read menu config {:?}", path))?;
        self.merge_toml(&content)
            .with_context(|| format!("Failed to parse menu config {:?}", path))
    }

    /// Merge the keys set in TOML `content`.
    pub fn merge_toml(&mut self, content: &str) -> Result<()> {
        let layer: ConfigLayer = toml::from_str(content)?;
        self.merge(layer);
        Ok(())
    }

    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(delay) = layer.hover_open_delay_ms {
            self.hover_open_delay_ms = delay;
        }
        if let Some(width) = layer.min_width {
            self.min_width = width;
        }
        if let Some(margin) = layer.screen_margin {
            self.screen_margin = margin;
        }
        if layer.theme.is_some() {
            self.theme = layer.theme;
        }
    }

    /// Apply [HOVER_DELAY_ENV] if it is set to a valid number.
    pub fn apply_env(&mut self) {
        if let Ok(value) = env::var(HOVER_DELAY_ENV) {
            match value.trim().parse::<u64>() {
                Ok(delay) => self.hover_open_delay_ms = delay,
                Err(_) => log::warn!("Ignoring invalid {HOVER_DELAY_ENV} value '{value}'"),
            }
        }
    }

    /// The submenu dwell delay.
    pub fn hover_open_delay(&self) -> Duration {
        Duration::from_millis(self.hover_open_delay_ms)
    }

    /// Set the submenu dwell delay.
    pub fn with_hover_open_delay(mut self, delay: Duration) -> Self {
        self.hover_open_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the minimum popup width.
    pub fn with_min_width(mut self, width: u32) -> Self {
        self.min_width = width;
        self
    }

    /// Set the margin kept to the screen edges.
    pub fn with_screen_margin(mut self, margin: u32) -> Self {
        self.screen_margin = margin;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MenuConfig::default();
        assert_eq!(config.hover_open_delay(), Duration::from_millis(200));
        assert_eq!(config.min_width, 180);
        assert_eq!(config.screen_margin, 0);
        assert_eq!(config.theme, None);
    }

    #[test]
    fn layers_only_override_what_they_set() {
        let mut config = MenuConfig::default();
        config.merge_toml("hover_open_delay_ms = 350\ntheme = \"dark\"").unwrap();
        config.merge_toml("min_width = 220").unwrap();

        assert_eq!(config.hover_open_delay_ms, 350);
        assert_eq!(config.min_width, 220);
        assert_eq!(config.theme.as_deref(), Some("dark"));
    }

    #[test]
    fn files_are_layered_and_bad_ones_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let system = dir.path().join("system.toml");
        let user = dir.path().join("menu.toml");
        let broken = dir.path().join("broken.toml");
        fs::write(&system, "hover_open_delay_ms = 300\nmin_width = 200\n").unwrap();
        fs::write(&user, "min_width = 240\n").unwrap();
        fs::write(&broken, "min_width = [\n").unwrap();
        let missing = dir.path().join("missing.toml");

        let config = MenuConfig::load_files(&[&system, &broken, &missing, &user]);
        assert_eq!(config.hover_open_delay_ms, 300);
        assert_eq!(config.min_width, 240);
        assert_eq!(config.theme, None);
    }

    #[test]
    fn load_file_names_the_file_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "theme = 3\n").unwrap();

        let mut config = MenuConfig::default();
        let err = config.load_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains(CONFIG_FILE));
        assert_eq!(config, MenuConfig::default());

        fs::write(&path, "theme = \"dark\"\n").unwrap();
        config.load_file(&path).unwrap();
        assert_eq!(config.theme.as_deref(), Some("dark"));
    }

    #[test]
    fn malformed_layer_leaves_config_untouched() {
        let mut config = MenuConfig::default();
        assert!(config.merge_toml("min_width = \"wide\"").is_err());
        assert_eq!(config, MenuConfig::default());
    }
}
