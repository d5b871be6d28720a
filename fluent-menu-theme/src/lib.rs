#![warn(missing_docs)]

//! # fluent-menu theming
//!
//! Colours and metrics for the popup menu.
//!
//! - **[Theme](theme::Theme)**: a palette plus the shadow curve and row metrics.
//!   [Theme::light](theme::Theme::light) and [Theme::dark](theme::Theme::dark)
//!   are the two canonical instances; any other value is a custom theme.
//! - **[ThemeConfig](config::ThemeConfig)**: choose a theme from environment
//!   variables, TOML files or code, with a fallback.
//! - **[ThemeError](error::ThemeError)**: what can go wrong while loading one.
//!
//! ## Custom themes in TOML
//!
//! Every field is optional; missing fields come from the light theme.
//!
//! ```toml
//! name = "midnight"
//! dark = true
//! background = "#101418"
//! hover_fill = "#2a3340"
//! shadow = "#00000080"
//! corner_radius = 6.0
//! ```

/// Theme configuration from environment variables and files.
pub mod config;

/// Error types for theme loading.
pub mod error;

/// Hex string (de)serialization for colours.
pub mod serde_color;

/// The [Theme](theme::Theme) value and its canonical instances.
pub mod theme;

pub use theme::Theme;
