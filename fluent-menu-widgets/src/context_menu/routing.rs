// SPDX-License-Identifier: MIT OR Apache-2.0
//! Event routing across an open menu chain.
//!
//! The host feeds every event to any menu of the chain. Pointer events are
//! hit-tested against the popups from the innermost outward, keys go to the
//! innermost popup. Each popup turns its input into effects through its
//! [InteractionController](fluent_menu_core::menu::interaction::InteractionController)
//! and this module carries them out.

use std::time::Instant;

use fluent_menu_core::menu::interaction::{Effect, MenuKey, NavContext, PopupInput, RowInfo};
use fluent_menu_core::menu::item::ItemId;
use fluent_menu_core::menu::submenu::DwellAction;
use fluent_menu_core::menu::surface::Placement;
use fluent_menu_core::menu::Update;
use fluent_menu_core::vg::kurbo::Point;

use super::{ContextMenu, MenuNode};

/// Input a host forwards to an open menu, in global coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuEvent {
    /// The pointer moved.
    PointerMoved(Point),
    /// A pointer button went down.
    PointerPressed(Point),
    /// A pointer button went up.
    PointerReleased(Point),
    /// The pointer left every popup window.
    PointerLeft,
    /// A key was pressed.
    Key(MenuKey),
    /// The popups lost keyboard focus to another window.
    FocusLost,
}

fn row_infos(node: &MenuNode) -> Vec<RowInfo> {
    node.surface
        .shown_spec()
        .map(|spec| RowInfo::from_layout(&spec.layout))
        .unwrap_or_default()
}

/// The item painted on `row` of the visible popup, if it still exists.
fn shown_item(node: &MenuNode, row: usize) -> Option<ItemId> {
    let id = node.surface.shown_spec()?.layout.rows.get(row)?.item;
    node.model.get(id).map(|item| item.id())
}

impl ContextMenu {
    /// Feed one host event to the open chain this menu belongs to.
    pub fn handle_event(&self, event: MenuEvent, now: Instant) -> Update {
        if !self.is_visible() {
            return Update::empty();
        }
        let root = self.chain_root();
        let chain = root.open_chain();
        let target = |point: Point| chain.iter().rposition(|menu| menu.contains(point));

        let mut update = Update::empty();
        match event {
            MenuEvent::PointerMoved(point) => {
                let target = target(point);
                for (idx, menu) in chain.iter().enumerate() {
                    let input = if target == Some(idx) {
                        PopupInput::PointerMoved(menu.hit_test(point))
                    } else {
                        PopupInput::PointerLeft
                    };
                    update |= menu.feed(input, now);
                }
            },
            MenuEvent::PointerPressed(point) => match target(point) {
                Some(idx) => {
                    let menu = &chain[idx];
                    update |= menu.feed(PopupInput::PointerPressed(menu.hit_test(point)), now);
                },
                None => {
                    log::debug!("press outside the menu, dismissing");
                    root.close();
                },
            },
            MenuEvent::PointerReleased(point) => {
                let target = target(point);
                for (idx, menu) in chain.iter().enumerate() {
                    let hit = if target == Some(idx) {
                        menu.hit_test(point)
                    } else {
                        None
                    };
                    update |= menu.feed(PopupInput::PointerReleased(hit), now);
                }
            },
            MenuEvent::PointerLeft => {
                for menu in &chain {
                    update |= menu.feed(PopupInput::PointerLeft, now);
                }
            },
            MenuEvent::Key(key) => {
                if let Some(leaf) = chain.last() {
                    update |= leaf.feed(PopupInput::Key(key), now);
                }
            },
            MenuEvent::FocusLost => root.close(),
        }

        if !root.is_visible() {
            update |= Update::DRAW | Update::CLOSED;
        }
        update
    }

    /// Run dwell timers that are due at `now`.
    pub fn tick(&self, now: Instant) -> Update {
        let mut update = Update::empty();
        for menu in self.chain_root().open_chain() {
            if !menu.is_visible() {
                continue;
            }
            let due = menu.inner.borrow_mut().submenus.poll(now);
            match due {
                Some(DwellAction::Open(row)) => update |= menu.open_submenu_at(row, false),
                Some(DwellAction::CloseChild) => {
                    let child = menu.inner.borrow_mut().submenus.take_open();
                    if let Some((_, child)) = child {
                        child.close_tree();
                        update |= Update::DRAW;
                    }
                },
                None => {},
            }
        }
        update
    }

    /// Earliest pending dwell of the open chain. The host should call
    /// [ContextMenu::tick] no later than this.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.chain_root()
            .open_chain()
            .iter()
            .filter_map(|menu| menu.inner.borrow().submenus.deadline())
            .min()
    }

    fn contains(&self, point: Point) -> bool {
        self.inner.borrow().surface.contains(point)
    }

    fn hit_test(&self, point: Point) -> Option<usize> {
        self.inner.borrow().surface.hit_test(point)
    }

    fn feed(&self, input: PopupInput, now: Instant) -> Update {
        if !self.is_visible() {
            return Update::empty();
        }
        let has_parent = self.open_parent().is_some();
        let effects = {
            let mut node = self.inner.borrow_mut();
            let node = &mut *node;
            let rows = row_infos(node);
            let ctx = NavContext {
                has_parent,
                open_child: node.submenus.open_row(),
            };
            node.controller.handle(input, &rows, ctx)
        };
        self.apply(effects, now)
    }

    fn apply(&self, effects: Vec<Effect>, now: Instant) -> Update {
        let mut update = Update::empty();
        for effect in effects {
            if !self.is_visible() {
                break;
            }
            match effect {
                Effect::Repaint => update |= Update::DRAW,
                Effect::ScheduleOpen(row) => self.inner.borrow_mut().submenus.schedule_open(row, now),
                Effect::ScheduleCloseChild => self.inner.borrow_mut().submenus.schedule_close(now),
                Effect::CancelDwell => self.inner.borrow_mut().submenus.cancel_dwell(),
                Effect::OpenSubmenu { row, select_first } => update |= self.open_submenu_at(row, select_first),
                Effect::Trigger(row) => update |= self.trigger(row),
                Effect::CloseSelf => update |= self.close_self(),
                Effect::CloseChain => {
                    self.chain_root().close();
                    update |= Update::DRAW | Update::CLOSED;
                },
            }
        }
        update
    }

    /// Open the child of `row` next to this popup, closing any other child first.
    fn open_submenu_at(&self, row: usize, select_first: bool) -> Update {
        let (child, placement, already_open) = {
            let node = self.inner.borrow();
            let Some(id) = shown_item(&node, row) else {
                return Update::empty();
            };
            let Some(item) = node.model.get(id).filter(|item| item.is_selectable()) else {
                return Update::empty();
            };
            let Some(child) = item.submenu().cloned() else {
                return Update::empty();
            };
            let (Some(parent), Some(row_rect)) = (node.surface.frame(), node.surface.row_rect(row)) else {
                return Update::empty();
            };
            let already_open = node.submenus.open_child().is_some_and(|open| open.ptr_eq(&child));
            (child, Placement::Beside { parent, row: row_rect }, already_open)
        };

        if !already_open {
            let previous = {
                let mut node = self.inner.borrow_mut();
                node.submenus.cancel_dwell();
                node.submenus.take_open()
            };
            if let Some((_, previous)) = previous {
                previous.close_tree();
            }
            child.show_with(placement);
            self.inner.borrow_mut().submenus.set_open(row, child.clone());
        }

        if select_first {
            let mut node = child.inner.borrow_mut();
            let rows = row_infos(&node);
            node.controller.select_first(&rows);
        }
        Update::DRAW
    }

    fn trigger(&self, row: usize) -> Update {
        let (snapshot, callback, shared, checkable) = {
            let mut node = self.inner.borrow_mut();
            let node = &mut *node;
            let Some(id) = shown_item(node, row) else {
                return Update::empty();
            };
            let Some(item) = node.model.get(id).filter(|item| item.is_selectable()) else {
                return Update::empty();
            };
            if item.submenu().is_some() {
                return Update::empty();
            }
            let checkable = item.checkable;
            if checkable {
                node.model.update(id, |item| item.checked = !item.checked);
                node.surface.invalidate();
            }
            let Some(item) = node.model.get(id) else {
                return Update::empty();
            };
            if checkable {
                node.surface.patch_checked(row, item.checked);
            }
            (item.snapshot(), item.callback.clone(), node.shared.clone(), checkable)
        };

        log::debug!("item {} '{}' triggered", snapshot.id, snapshot.text);
        shared.dispatcher.emit(&snapshot.text, &snapshot);
        if let Some(callback) = callback {
            callback();
        }

        if checkable {
            Update::DRAW
        } else {
            self.chain_root().close();
            Update::DRAW | Update::CLOSED
        }
    }

    /// Close this popup and return the selection to the row it was opened from.
    fn close_self(&self) -> Update {
        match self.detach_from_parent() {
            Some((parent, row)) => {
                self.close_tree();
                let mut node = parent.inner.borrow_mut();
                let rows = row_infos(&node);
                node.controller.select(row, &rows);
                Update::DRAW
            },
            None => {
                self.close_tree();
                Update::DRAW | Update::CLOSED
            },
        }
    }
}
