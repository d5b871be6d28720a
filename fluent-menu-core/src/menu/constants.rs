//! Menu layout constants
//!
//! Metrics that are not part of a [Theme](fluent_menu_theme::Theme). Row heights,
//! paddings and font sizes live on the theme.

/// Minimum content width of a popup
pub const MIN_WIDTH: f64 = 180.0;

/// Top and bottom padding inside the popup body
pub const VERTICAL_PADDING: f64 = 4.0;

/// Horizontal inset of the hover pill from the popup edges
pub const PILL_MARGIN: f64 = 4.0;

/// Width of the icon / check mark column, reserved when any row needs it
pub const ICON_COLUMN_WIDTH: f64 = 28.0;

/// Minimum gap between a label and its shortcut
pub const SHORTCUT_GAP: f64 = 32.0;

/// Width reserved at the end of submenu rows for the chevron
pub const DISCLOSURE_WIDTH: f64 = 20.0;

/// Height of a separator row
pub const SEPARATOR_HEIGHT: f64 = 9.0;

/// Half extent of the submenu chevron
pub const ARROW_SIZE: f64 = 3.5;

/// Border stroke width
pub const BORDER_STROKE_WIDTH: f64 = 1.0;

/// Check mark stroke width
pub const CHECK_STROKE_WIDTH: f64 = 1.5;

/// Horizontal overlap between a parent popup and its child
pub const CHILD_POPUP_OVERLAP: f64 = 2.0;

/// Downward offset of every shadow layer
pub const SHADOW_OFFSET_Y: f64 = 2.0;

/// Corner radius growth per shadow layer
pub const SHADOW_RADIUS_STEP: f64 = 0.5;

/// Estimated glyph advance as a fraction of the font size
pub const TEXT_CHAR_WIDTH_EM: f64 = 0.55;

/// Dwell before a hovered submenu row opens its child
pub const DEFAULT_HOVER_OPEN_DELAY_MS: u64 = 200;
