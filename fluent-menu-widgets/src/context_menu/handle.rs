// SPDX-License-Identifier: MIT OR Apache-2.0
use std::cell::RefCell;
use std::rc::Weak;

use fluent_menu_core::menu::item::{IconHandle, ItemCallback, ItemId, ItemKind, ItemSnapshot, MenuItemDef};

use super::{ContextMenu, MenuNode};

/// A live reference to one item of a [ContextMenu].
///
/// Does not keep the menu alive. Once the item is removed or the menu dropped,
/// setters do nothing and getters return `None`.
#[derive(Clone)]
pub struct ItemHandle {
    id: ItemId,
    menu: Weak<RefCell<MenuNode>>,
}

impl ItemHandle {
    pub(super) fn new(id: ItemId, menu: Weak<RefCell<MenuNode>>) -> Self {
        Self { id, menu }
    }

    /// Item id.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Whether the item still exists.
    pub fn is_alive(&self) -> bool {
        self.read(|_| ()).is_some()
    }

    /// The menu owning the item.
    pub fn menu(&self) -> Option<ContextMenu> {
        self.menu.upgrade().map(ContextMenu::from_inner)
    }

    /// Current state of the item.
    pub fn snapshot(&self) -> Option<ItemSnapshot> {
        self.read(MenuItemDef::snapshot)
    }

    /// Label text.
    pub fn text(&self) -> Option<String> {
        self.read(|item| item.text.clone())
    }

    /// Check state.
    pub fn is_checked(&self) -> Option<bool> {
        self.read(|item| item.checked)
    }

    /// Whether the item is enabled.
    pub fn is_enabled(&self) -> Option<bool> {
        self.read(|item| item.enabled)
    }

    /// Change the label text.
    pub fn set_text(&self, text: impl Into<String>) -> bool {
        let text = text.into();
        self.write(move |item| item.text = text)
    }

    /// Change the shortcut hint shown on the right.
    pub fn set_shortcut(&self, shortcut: Option<String>) -> bool {
        self.write(move |item| item.shortcut = shortcut)
    }

    /// Change the icon.
    pub fn set_icon(&self, icon: Option<IconHandle>) -> bool {
        self.write(move |item| item.icon = icon)
    }

    /// Enable or disable the item.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        self.write(move |item| item.enabled = enabled)
    }

    /// Make the item checkable. Ignored for separators and submenu rows.
    pub fn set_checkable(&self, checkable: bool) -> bool {
        self.write(move |item| {
            if item.kind() == ItemKind::Action {
                item.checkable = checkable;
                if !checkable {
                    item.checked = false;
                }
            }
        })
    }

    /// Set the check state. Only meaningful on checkable items.
    pub fn set_checked(&self, checked: bool) -> bool {
        self.write(move |item| item.checked = checked && item.checkable)
    }

    /// Replace the per-item callback, run after trigger listeners.
    pub fn set_callback(&self, callback: Option<ItemCallback>) -> bool {
        self.write(move |item| item.callback = callback)
    }

    fn read<R>(&self, f: impl FnOnce(&MenuItemDef<ContextMenu>) -> R) -> Option<R> {
        let menu = self.menu.upgrade()?;
        let node = menu.borrow();
        let result = node.model.get(self.id).map(f);
        result
    }

    fn write(&self, f: impl FnOnce(&mut MenuItemDef<ContextMenu>)) -> bool {
        let Some(menu) = self.menu.upgrade() else {
            return false;
        };
        let mut node = menu.borrow_mut();
        let changed = node.model.update(self.id, f);
        if changed {
            node.surface.invalidate();
        }
        changed
    }
}

impl std::fmt::Debug for ItemHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemHandle")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use fluent_menu_core::menu::item::NewItem;
    use fluent_menu_core::platform::HeadlessHost;
    use fluent_menu_core::vg::kurbo::Rect;

    use super::*;

    fn menu() -> ContextMenu {
        ContextMenu::new(Rc::new(HeadlessHost::new(Rect::new(0.0, 0.0, 800.0, 600.0))))
    }

    #[test]
    fn setters_update_the_model() {
        let menu = menu();
        let copy = menu.add_item("Copy");
        assert!(copy.set_text("Copy Link"));
        assert!(copy.set_shortcut(Some("Ctrl+L".into())));
        assert!(copy.set_enabled(false));

        let snapshot = copy.snapshot().unwrap();
        assert_eq!(snapshot.text, "Copy Link");
        assert_eq!(snapshot.shortcut.as_deref(), Some("Ctrl+L"));
        assert!(!snapshot.enabled);
    }

    #[test]
    fn checked_requires_checkable() {
        let menu = menu();
        let wrap = menu.add_item("Word Wrap");
        wrap.set_checked(true);
        assert_eq!(wrap.is_checked(), Some(false));

        wrap.set_checkable(true);
        wrap.set_checked(true);
        assert_eq!(wrap.is_checked(), Some(true));

        wrap.set_checkable(false);
        assert_eq!(wrap.is_checked(), Some(false));
    }

    #[test]
    fn separators_and_submenus_never_become_checkable() {
        let menu = menu();
        let separator = menu.add_separator();
        separator.set_checkable(true);
        assert!(!separator.snapshot().unwrap().checkable);

        menu.add_submenu(NewItem::new("Share"));
        let share = menu.item(menu.items()[1].id).unwrap();
        share.set_checkable(true);
        assert!(!share.snapshot().unwrap().checkable);
    }

    #[test]
    fn handles_of_removed_items_are_inert() {
        let menu = menu();
        let cut = menu.add_item("Cut");
        assert!(menu.remove(cut.id()));
        assert!(!cut.is_alive());
        assert!(!cut.set_text("Gone"));
        assert_eq!(cut.text(), None);
    }

    #[test]
    fn handles_do_not_keep_the_menu_alive() {
        let cut = menu().add_item("Cut");
        assert!(cut.menu().is_none());
        assert!(!cut.set_enabled(false));
    }
}
