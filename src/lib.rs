#![warn(missing_docs)]

//! Custom-drawn popup context menus for Rust.
//!
//! A [ContextMenu](widgets::context_menu::ContextMenu) owns its items and child
//! menus, draws itself through [vello] and talks to the windowing system
//! through a [PopupHost](core::platform::PopupHost).

pub use vello::peniko as color;

pub use fluent_menu_core as core;
pub use fluent_menu_theme as theme;
pub use fluent_menu_widgets as widgets;

/// A "prelude" for users of fluent-menu.
///
/// Importing this module brings into scope the types needed to build and
/// drive a menu.
///
/// ```rust
/// use fluent_menu::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::config::MenuConfig;
    pub use crate::core::menu::interaction::{MenuKey, Selection};
    pub use crate::core::menu::item::{IconHandle, ItemId, ItemKind, ItemSnapshot, NewItem};
    pub use crate::core::menu::surface::{PopupState, SurfaceId};
    pub use crate::core::menu::Update;
    pub use crate::core::platform::{ContextMenuTarget, HeadlessHost, PopupHost, TargetId, TextMeasure};
    pub use crate::core::vgi::{Graphics, VelloGraphics};

    pub use crate::theme::config::{ThemeConfig, ThemeSource};
    pub use crate::theme::Theme;

    pub use crate::widgets::context_menu::{ContextMenu, ItemHandle, MenuEvent};

    pub use crate::core::vg::kurbo::{Point, Rect, Size};
}
