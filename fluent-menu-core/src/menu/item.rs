use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Identifier of an item, allocated by its [ItemModel] and never reused there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    /// The raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle of a host-resolved, fixed-size icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconHandle(pub u64);

/// What a row is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A plain action.
    Action,
    /// A thin divider without interaction.
    Separator,
    /// A row that opens a child menu.
    Submenu,
}

/// Callback invoked when an item is triggered.
pub type ItemCallback = Rc<dyn Fn()>;

/// Observable state of an item, without callback or child menu.
///
/// Delivered alongside the item text with every trigger notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSnapshot {
    /// Item id.
    pub id: ItemId,
    /// Row kind.
    pub kind: ItemKind,
    /// Display text. Empty for separators.
    pub text: String,
    /// Icon, if any.
    pub icon: Option<IconHandle>,
    /// Shortcut label, if any.
    pub shortcut: Option<String>,
    /// Whether the row can be selected and triggered.
    pub enabled: bool,
    /// Whether triggering toggles `checked`.
    pub checkable: bool,
    /// Check state.
    pub checked: bool,
    /// Position in the menu.
    pub row: usize,
}

impl ItemSnapshot {
    /// Enabled and not a separator.
    pub fn is_selectable(&self) -> bool {
        self.enabled && self.kind != ItemKind::Separator
    }
}

/// One item of a menu. `C` is the child menu type of submenu rows.
pub struct MenuItemDef<C> {
    id: ItemId,
    kind: ItemKind,
    row: usize,
    submenu: Option<C>,
    /// Display text.
    pub text: String,
    /// Icon, if any.
    pub icon: Option<IconHandle>,
    /// Shortcut label, if any.
    pub shortcut: Option<String>,
    /// Whether the row can be selected and triggered.
    pub enabled: bool,
    /// Whether triggering toggles `checked`.
    pub checkable: bool,
    /// Check state.
    pub checked: bool,
    /// Invoked on trigger, after the trigger notification.
    pub callback: Option<ItemCallback>,
}

impl<C> MenuItemDef<C> {
    /// Item id.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Row kind.
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Position in the menu.
    pub fn row(&self) -> usize {
        self.row
    }

    /// The child menu of a submenu row.
    pub fn submenu(&self) -> Option<&C> {
        self.submenu.as_ref()
    }

    /// Take the child menu out, typically when the item is discarded.
    pub fn into_submenu(self) -> Option<C> {
        self.submenu
    }

    /// Enabled and not a separator.
    pub fn is_selectable(&self) -> bool {
        self.enabled && self.kind != ItemKind::Separator
    }

    /// Copy of the observable fields.
    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            id: self.id,
            kind: self.kind,
            text: self.text.clone(),
            icon: self.icon,
            shortcut: self.shortcut.clone(),
            enabled: self.enabled,
            checkable: self.checkable,
            checked: self.checked,
            row: self.row,
        }
    }
}

impl<C> fmt::Debug for MenuItemDef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItemDef")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("row", &self.row)
            .field("text", &self.text)
            .field("enabled", &self.enabled)
            .field("checkable", &self.checkable)
            .field("checked", &self.checked)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// Everything needed to add an action row.
#[derive(Clone, Default)]
pub struct NewItem {
    text: String,
    icon: Option<IconHandle>,
    shortcut: Option<String>,
    enabled: bool,
    checkable: bool,
    checked: bool,
    callback: Option<ItemCallback>,
}

impl NewItem {
    /// An enabled, non-checkable action.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            enabled: true,
            ..Default::default()
        }
    }

    /// Attach an icon.
    pub fn with_icon(mut self, icon: IconHandle) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Show a shortcut label.
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    /// Enable or disable the row.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Make the row toggle its check state on trigger.
    pub fn with_checkable(mut self, checkable: bool) -> Self {
        self.checkable = checkable;
        self
    }

    /// Initial check state.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Callback invoked on trigger.
    pub fn with_callback(mut self, callback: impl Fn() + 'static) -> Self {
        self.callback = Some(Rc::new(callback));
        self
    }
}

impl From<&str> for NewItem {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for NewItem {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// The ordered items of one menu.
///
/// Every mutation bumps [ItemModel::revision].
pub struct ItemModel<C> {
    items: IndexMap<ItemId, MenuItemDef<C>>,
    next_id: u64,
    revision: u64,
}

impl<C> Default for ItemModel<C> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
            next_id: 1,
            revision: 0,
        }
    }
}

impl<C> ItemModel<C> {
    /// An empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows, separators included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the model has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Monotonic mutation counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn insert(&mut self, kind: ItemKind, item: NewItem, submenu: Option<C>) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        let row = self.items.len();
        self.items.insert(
            id,
            MenuItemDef {
                id,
                kind,
                row,
                submenu,
                text: item.text,
                icon: item.icon,
                shortcut: item.shortcut,
                enabled: item.enabled,
                checkable: item.checkable,
                checked: item.checked,
                callback: item.callback,
            },
        );
        self.revision += 1;
        id
    }

    /// Append an action row.
    pub fn push(&mut self, item: impl Into<NewItem>) -> ItemId {
        self.insert(ItemKind::Action, item.into(), None)
    }

    /// Append a separator.
    pub fn push_separator(&mut self) -> ItemId {
        self.insert(ItemKind::Separator, NewItem::new("").with_enabled(false), None)
    }

    /// Append a row that opens `child`.
    pub fn push_submenu(&mut self, item: impl Into<NewItem>, child: C) -> ItemId {
        let mut item = item.into();
        item.checkable = false;
        item.checked = false;
        self.insert(ItemKind::Submenu, item, Some(child))
    }

    /// Remove an item, renumbering the rows after it.
    pub fn remove(&mut self, id: ItemId) -> Option<MenuItemDef<C>> {
        let removed = self.items.shift_remove(&id)?;
        for (row, item) in self.items.values_mut().enumerate().skip(removed.row) {
            item.row = row;
        }
        self.revision += 1;
        Some(removed)
    }

    /// Remove every item.
    pub fn clear(&mut self) -> Vec<MenuItemDef<C>> {
        self.revision += 1;
        self.items.drain(..).map(|(_, item)| item).collect()
    }

    /// Look an item up by id.
    pub fn get(&self, id: ItemId) -> Option<&MenuItemDef<C>> {
        self.items.get(&id)
    }

    /// Look an item up by row.
    pub fn at_row(&self, row: usize) -> Option<&MenuItemDef<C>> {
        self.items.get_index(row).map(|(_, item)| item)
    }

    /// Change an item in place. Returns `false` when the id is unknown.
    pub fn update(&mut self, id: ItemId, change: impl FnOnce(&mut MenuItemDef<C>)) -> bool {
        match self.items.get_mut(&id) {
            Some(item) => {
                change(item);
                self.revision += 1;
                true
            },
            None => false,
        }
    }

    /// Items in row order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuItemDef<C>> {
        self.items.values()
    }

    /// Snapshots of every item in row order.
    pub fn snapshots(&self) -> Vec<ItemSnapshot> {
        self.items.values().map(MenuItemDef::snapshot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut model: ItemModel<()> = ItemModel::new();
        let a = model.push("Cut");
        model.remove(a);
        let b = model.push("Copy");
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn remove_renumbers_rows() {
        let mut model: ItemModel<()> = ItemModel::new();
        let cut = model.push("Cut");
        model.push_separator();
        let paste = model.push("Paste");
        assert_eq!(model.get(paste).unwrap().row(), 2);

        model.remove(cut);
        assert_eq!(model.get(paste).unwrap().row(), 1);
        let rows: Vec<usize> = model.iter().map(MenuItemDef::row).collect();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn every_mutation_bumps_the_revision() {
        let mut model: ItemModel<()> = ItemModel::new();
        let r0 = model.revision();
        let id = model.push("Cut");
        let r1 = model.revision();
        assert!(model.update(id, |item| item.enabled = false));
        let r2 = model.revision();
        model.clear();
        let r3 = model.revision();
        assert!(r0 < r1 && r1 < r2 && r2 < r3);
        assert!(model.is_empty());
    }

    #[test]
    fn update_of_unknown_id_is_a_noop() {
        let mut model: ItemModel<()> = ItemModel::new();
        let id = model.push("Cut");
        model.remove(id);
        let before = model.revision();
        assert!(!model.update(id, |item| item.text.clear()));
        assert_eq!(model.revision(), before);
    }

    #[test]
    fn separators_and_disabled_rows_are_not_selectable() {
        let mut model: ItemModel<()> = ItemModel::new();
        model.push("Cut");
        model.push_separator();
        model.push(NewItem::new("Paste").with_enabled(false));
        let selectable: Vec<bool> = model.snapshots().iter().map(ItemSnapshot::is_selectable).collect();
        assert_eq!(selectable, vec![true, false, false]);
    }

    #[test]
    fn submenu_rows_keep_their_child() {
        let mut model: ItemModel<&'static str> = ItemModel::new();
        let id = model.push_submenu(NewItem::new("Share").with_checkable(true), "child");
        let item = model.get(id).unwrap();
        assert_eq!(item.kind(), ItemKind::Submenu);
        assert!(!item.checkable);
        assert_eq!(item.submenu(), Some(&"child"));
        assert_eq!(model.remove(id).and_then(MenuItemDef::into_submenu), Some("child"));
    }
}
