// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context menu widget
//!
//! A [ContextMenu] is a tree of popups: every menu owns its items, one
//! [PopupSurface], an [InteractionController] and a [SubmenuCoordinator] for
//! its children. Children hold a weak link back to their parent. All menus of a
//! tree share the host, the configuration and one trigger channel.

mod attach;
mod handle;
mod routing;

pub use handle::ItemHandle;
pub use routing::MenuEvent;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use fluent_menu_core::config::MenuConfig;
use fluent_menu_core::menu::dispatch::{SubscriptionId, TriggerDispatcher};
use fluent_menu_core::menu::interaction::{InteractionController, Selection};
use fluent_menu_core::menu::item::{ItemId, ItemModel, ItemSnapshot, NewItem};
use fluent_menu_core::menu::submenu::SubmenuCoordinator;
use fluent_menu_core::menu::surface::{Placement, PopupState, PopupSurface, ShowRequest, SurfaceId};
use fluent_menu_core::platform::{PopupHost, TargetId};
use fluent_menu_core::vg::kurbo::{Point, Rect};
use fluent_menu_core::vgi::Graphics;
use fluent_menu_theme::config::ThemeConfig;
use fluent_menu_theme::Theme;
use indexmap::IndexSet;

/// State shared by every menu of one tree.
struct Shared {
    host: Rc<dyn PopupHost>,
    config: MenuConfig,
    dispatcher: TriggerDispatcher,
}

struct MenuNode {
    model: ItemModel<ContextMenu>,
    surface: PopupSurface,
    controller: InteractionController,
    submenus: SubmenuCoordinator<ContextMenu>,
    parent: Weak<RefCell<MenuNode>>,
    theme: Rc<Theme>,
    shared: Rc<Shared>,
    attached: IndexSet<TargetId>,
}

impl Drop for MenuNode {
    fn drop(&mut self) {
        self.submenus.cancel_dwell();
        if let Some((_, child)) = self.submenus.take_open() {
            child.close_tree();
        }
        self.surface.close(self.shared.host.as_ref());
    }
}

/// A custom popup context menu.
///
/// Cloning yields another handle to the same menu.
#[derive(Clone)]
pub struct ContextMenu {
    inner: Rc<RefCell<MenuNode>>,
}

impl ContextMenu {
    /// Create a menu with the default configuration and the light theme.
    pub fn new(host: Rc<dyn PopupHost>) -> Self {
        Self::with_config(host, MenuConfig::default())
    }

    /// Create a menu with `config`. Its `theme` names the initial built-in theme.
    pub fn with_config(host: Rc<dyn PopupHost>, config: MenuConfig) -> Self {
        let theme = match config.theme.as_deref() {
            Some(name) => Theme::by_name(name).unwrap_or_else(|e| {
                log::warn!("{}, using the light theme", e);
                Theme::light()
            }),
            None => Theme::light(),
        };
        Self::with_theme(host, config, theme)
    }

    /// Create a menu from the user's configuration files and environment.
    ///
    /// Reads `menu.toml` from the XDG config directories and resolves the
    /// theme through [ThemeConfig] unless the file names one.
    pub fn from_environment(host: Rc<dyn PopupHost>) -> anyhow::Result<Self> {
        let config = MenuConfig::load()?;
        if config.theme.is_some() {
            return Ok(Self::with_config(host, config));
        }
        let theme = ThemeConfig::from_env_or_default().resolve_theme()?;
        Ok(Self::with_theme(host, config, theme))
    }

    /// Create a menu with an explicit theme.
    pub fn with_theme(host: Rc<dyn PopupHost>, config: MenuConfig, theme: Theme) -> Self {
        let shared = Rc::new(Shared {
            host,
            config,
            dispatcher: TriggerDispatcher::new(),
        });
        Self::from_parts(shared, Rc::new(theme), Weak::new())
    }

    fn from_parts(shared: Rc<Shared>, theme: Rc<Theme>, parent: Weak<RefCell<MenuNode>>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MenuNode {
                model: ItemModel::new(),
                surface: PopupSurface::new(),
                controller: InteractionController::new(),
                submenus: SubmenuCoordinator::new(shared.config.hover_open_delay()),
                parent,
                theme,
                shared,
                attached: IndexSet::new(),
            })),
        }
    }

    fn from_inner(inner: Rc<RefCell<MenuNode>>) -> Self {
        Self { inner }
    }

    /// Whether both handles refer to the same menu.
    pub fn ptr_eq(&self, other: &ContextMenu) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn mutate<R>(&self, change: impl FnOnce(&mut MenuNode) -> R) -> R {
        let mut node = self.inner.borrow_mut();
        let result = change(&mut *node);
        node.surface.invalidate();
        result
    }

    fn handle_for(&self, id: ItemId) -> ItemHandle {
        ItemHandle::new(id, Rc::downgrade(&self.inner))
    }

    /// Append an action row. Accepts plain text or a [NewItem].
    pub fn add_item(&self, item: impl Into<NewItem>) -> ItemHandle {
        let id = self.mutate(|node| node.model.push(item));
        self.handle_for(id)
    }

    /// Append a separator.
    pub fn add_separator(&self) -> ItemHandle {
        let id = self.mutate(|node| node.model.push_separator());
        self.handle_for(id)
    }

    /// Append a row opening a new, empty child menu, and return the child.
    ///
    /// The child shares this menu's host, configuration, theme and trigger channel.
    pub fn add_submenu(&self, item: impl Into<NewItem>) -> ContextMenu {
        let (shared, theme) = {
            let node = self.inner.borrow();
            (node.shared.clone(), node.theme.clone())
        };
        let child = Self::from_parts(shared, theme, Rc::downgrade(&self.inner));
        let stored = child.clone();
        self.mutate(|node| node.model.push_submenu(item, stored));
        child
    }

    /// Remove an item. Removing an open submenu row closes its child first.
    pub fn remove(&self, id: ItemId) -> bool {
        let open_child = {
            let mut node = self.inner.borrow_mut();
            let Some(item) = node.model.get(id) else {
                return false;
            };
            let removes_open_child = match (item.submenu(), node.submenus.open_child()) {
                (Some(child), Some(open)) => child.ptr_eq(open),
                _ => false,
            };
            if removes_open_child {
                node.submenus.cancel_dwell();
                node.submenus.take_open().map(|(_, child)| child)
            } else {
                None
            }
        };
        if let Some(child) = open_child {
            child.close_tree();
        }
        self.mutate(|node| node.model.remove(id)).is_some()
    }

    /// Remove every item, closing any open child.
    pub fn clear(&self) {
        let open_child = {
            let mut node = self.inner.borrow_mut();
            node.submenus.cancel_dwell();
            node.submenus.take_open().map(|(_, child)| child)
        };
        if let Some(child) = open_child {
            child.close_tree();
        }
        self.mutate(|node| {
            node.model.clear();
        });
    }

    /// Number of rows, separators included.
    pub fn len(&self) -> usize {
        self.inner.borrow().model.len()
    }

    /// Whether the menu has no rows.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().model.is_empty()
    }

    /// Snapshots of every item in row order.
    pub fn items(&self) -> Vec<ItemSnapshot> {
        self.inner.borrow().model.snapshots()
    }

    /// Handle of an existing item.
    pub fn item(&self, id: ItemId) -> Option<ItemHandle> {
        let exists = self.inner.borrow().model.get(id).is_some();
        exists.then(|| self.handle_for(id))
    }

    /// The child menu of a submenu row.
    pub fn submenu(&self, id: ItemId) -> Option<ContextMenu> {
        let node = self.inner.borrow();
        let child = node.model.get(id)?.submenu().cloned();
        child
    }

    /// The theme new popups of this menu are built with.
    pub fn theme(&self) -> Rc<Theme> {
        self.inner.borrow().theme.clone()
    }

    /// Switch the theme of this menu and its submenus.
    ///
    /// Visible popups keep their colours; the next show uses the new theme.
    pub fn set_theme(&self, theme: impl Into<Rc<Theme>>) {
        let theme = theme.into();
        log::debug!("theme set to '{}'", theme.name);
        self.apply_theme(&theme);
    }

    fn apply_theme(&self, theme: &Rc<Theme>) {
        let children: Vec<ContextMenu> = self.mutate(|node| {
            node.theme = theme.clone();
            node.model.iter().filter_map(|item| item.submenu().cloned()).collect()
        });
        for child in children {
            child.apply_theme(theme);
        }
    }

    /// Whether the current theme is dark.
    pub fn dark_mode(&self) -> bool {
        self.inner.borrow().theme.dark
    }

    /// Switch between the canonical light and dark themes.
    pub fn set_dark_mode(&self, dark: bool) {
        if self.dark_mode() != dark {
            self.set_theme(Theme::for_mode(dark));
        }
    }

    /// Subscribe to trigger notifications of this menu tree.
    pub fn on_triggered(&self, listener: impl Fn(&str, &ItemSnapshot) + 'static) -> SubscriptionId {
        self.inner.borrow().shared.dispatcher.subscribe(listener)
    }

    /// Remove a trigger subscription.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        self.inner.borrow().shared.dispatcher.unsubscribe(id)
    }

    /// Show the menu with its top-left corner at a global point.
    ///
    /// A menu that is already visible is closed and shown again at the new point.
    pub fn show_at(&self, point: Point) {
        if self.is_visible() {
            self.close();
        }
        self.show_with(Placement::AtPoint(point));
    }

    fn show_with(&self, placement: Placement) -> Rect {
        let mut node = self.inner.borrow_mut();
        let node = &mut *node;
        let items = node.model.snapshots();
        let shared = node.shared.clone();
        node.controller.reset();
        node.surface.show(
            ShowRequest {
                placement,
                items: &items,
                theme: &node.theme,
                min_width: shared.config.min_width as f64,
                screen_margin: shared.config.screen_margin as f64,
            },
            shared.host.as_ref(),
        )
    }

    /// Close this menu and every open descendant.
    pub fn close(&self) {
        self.detach_from_parent();
        self.close_tree();
    }

    /// Close children first, then this popup.
    fn close_tree(&self) {
        let child = {
            let mut node = self.inner.borrow_mut();
            node.submenus.cancel_dwell();
            node.submenus.take_open().map(|(_, child)| child)
        };
        if let Some(child) = child {
            child.close_tree();
        }
        let mut node = self.inner.borrow_mut();
        let node = &mut *node;
        node.controller.reset();
        node.surface.close(node.shared.host.as_ref());
    }

    /// If this menu is the open child of its parent, unlink it and return the
    /// parent with the row it was opened from.
    fn detach_from_parent(&self) -> Option<(ContextMenu, usize)> {
        let parent = self.open_parent()?;
        let row = {
            let mut node = parent.inner.borrow_mut();
            node.submenus.cancel_dwell();
            node.submenus.take_open().map(|(row, _)| row)
        }?;
        Some((parent, row))
    }

    /// The parent, if this menu is currently its open child.
    fn open_parent(&self) -> Option<ContextMenu> {
        let parent = self.inner.borrow().parent.upgrade()?;
        let is_open_child = parent
            .borrow()
            .submenus
            .open_child()
            .is_some_and(|child| child.ptr_eq(self));
        is_open_child.then(|| Self::from_inner(parent))
    }

    /// The outermost menu of the open chain this menu belongs to.
    fn chain_root(&self) -> ContextMenu {
        let mut root = self.clone();
        while let Some(parent) = root.open_parent() {
            root = parent;
        }
        root
    }

    /// The open child, if any.
    pub fn open_submenu(&self) -> Option<ContextMenu> {
        self.inner.borrow().submenus.open_child().cloned()
    }

    /// This menu followed by its open descendants, outermost first.
    pub fn open_chain(&self) -> Vec<ContextMenu> {
        let mut chain = Vec::new();
        if !self.is_visible() {
            return chain;
        }
        let mut current = Some(self.clone());
        while let Some(menu) = current {
            current = menu.open_submenu().filter(ContextMenu::is_visible);
            chain.push(menu);
        }
        chain
    }

    /// Whether the popup is shown.
    pub fn is_visible(&self) -> bool {
        self.inner.borrow().surface.is_shown()
    }

    /// Lifecycle state of the popup.
    pub fn state(&self) -> PopupState {
        self.inner.borrow().surface.state()
    }

    /// Id of the popup surface, stable for the lifetime of the menu.
    pub fn surface_id(&self) -> SurfaceId {
        self.inner.borrow().surface.id()
    }

    /// Global content frame while shown.
    pub fn frame(&self) -> Option<Rect> {
        self.inner.borrow().surface.frame()
    }

    /// Global rectangle of a row while shown.
    pub fn row_rect(&self, row: usize) -> Option<Rect> {
        self.inner.borrow().surface.row_rect(row)
    }

    /// Current selection.
    pub fn selection(&self) -> Selection {
        self.inner.borrow().controller.selection()
    }

    /// Whether the next show has to rebuild the draw spec.
    pub fn needs_rebuild(&self) -> bool {
        self.inner.borrow().surface.cache().is_dirty()
    }

    /// Paint this popup in window-local coordinates.
    pub fn paint(&self, graphics: &mut dyn Graphics) {
        let node = self.inner.borrow();
        let highlight = node.controller.selection().row();
        let pressed = highlight.is_some() && node.controller.pressed() == highlight;
        node.surface.paint(graphics, highlight, pressed);
    }

    /// Paint the popup of the open chain that owns `surface`.
    pub fn paint_surface(&self, surface: SurfaceId, graphics: &mut dyn Graphics) -> bool {
        match self
            .open_chain()
            .into_iter()
            .find(|menu| menu.surface_id() == surface)
        {
            Some(menu) => {
                menu.paint(graphics);
                true
            },
            None => false,
        }
    }
}

impl fmt::Debug for ContextMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(node) => f
                .debug_struct("ContextMenu")
                .field("surface", &node.surface.id())
                .field("state", &node.surface.state())
                .field("items", &node.model.len())
                .field("theme", &node.theme.name)
                .finish(),
            Err(_) => f.write_str("ContextMenu { <borrowed> }"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluent_menu_core::platform::HeadlessHost;

    fn menu() -> (Rc<HeadlessHost>, ContextMenu) {
        let host = Rc::new(HeadlessHost::new(Rect::new(0.0, 0.0, 1280.0, 800.0)));
        let menu = ContextMenu::new(host.clone());
        (host, menu)
    }

    #[test]
    fn mutations_mark_the_cache_dirty() {
        let (_host, menu) = menu();
        menu.add_item("Cut");
        menu.show_at(Point::new(10.0, 10.0));
        assert!(!menu.needs_rebuild());

        let copy = menu.add_item("Copy");
        assert!(menu.needs_rebuild());
        menu.close();
        menu.show_at(Point::new(10.0, 10.0));
        assert!(!menu.needs_rebuild());

        copy.set_enabled(false);
        assert!(menu.needs_rebuild());
    }

    #[test]
    fn config_theme_name_picks_the_builtin() {
        let host = Rc::new(HeadlessHost::new(Rect::new(0.0, 0.0, 800.0, 600.0)));
        let dark = ContextMenu::with_config(
            host.clone(),
            MenuConfig {
                theme: Some("dark".into()),
                ..MenuConfig::default()
            },
        );
        assert!(dark.dark_mode());

        let unknown = ContextMenu::with_config(
            host,
            MenuConfig {
                theme: Some("neon".into()),
                ..MenuConfig::default()
            },
        );
        assert!(!unknown.dark_mode());
    }

    #[test]
    fn dark_mode_propagates_to_submenus() {
        let (_host, menu) = menu();
        let share = menu.add_submenu("Share");
        let nested = share.add_submenu("More");
        menu.set_dark_mode(true);
        assert!(share.dark_mode());
        assert!(nested.dark_mode());
        assert!(Rc::ptr_eq(&menu.theme(), &nested.theme()));
    }

    #[test]
    fn close_is_idempotent() {
        let (host, menu) = menu();
        menu.add_item("Cut");
        menu.close();
        assert!(host.events().is_empty());
        menu.show_at(Point::new(5.0, 5.0));
        menu.close();
        menu.close();
        assert_eq!(host.events().len(), 4);
        assert_eq!(menu.state(), PopupState::Closed);
    }

    #[test]
    fn show_at_while_visible_reopens_at_the_new_point() {
        let (_host, menu) = menu();
        menu.add_item("Cut");
        menu.show_at(Point::new(5.0, 5.0));
        menu.show_at(Point::new(300.0, 200.0));
        assert_eq!(menu.frame().map(|f| f.origin()), Some(Point::new(300.0, 200.0)));
    }

    #[test]
    fn submenu_lookup_by_item() {
        let (_host, menu) = menu();
        let share = menu.add_submenu("Share");
        let id = menu.items()[0].id;
        assert!(menu.submenu(id).is_some_and(|child| child.ptr_eq(&share)));
        assert!(menu.item(id).is_some());
        assert!(menu.remove(id));
        assert!(menu.item(id).is_none());
        assert!(menu.is_empty());
    }
}
