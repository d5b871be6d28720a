// SPDX-License-Identifier: MIT OR Apache-2.0
use std::rc::Rc;

use fluent_menu_core::platform::{ContextMenuTarget, TargetId};
use fluent_menu_core::vg::kurbo::Point;

use super::ContextMenu;

impl ContextMenu {
    /// Open this menu on secondary clicks of `target`.
    ///
    /// The installed handler holds the menu weakly; dropping the menu leaves
    /// an inert handler behind.
    pub fn attach(&self, target: &dyn ContextMenuTarget) {
        let menu = Rc::downgrade(&self.inner);
        target.set_secondary_click_handler(Some(Rc::new(move |point: Point| {
            if let Some(inner) = menu.upgrade() {
                ContextMenu::from_inner(inner).show_at(point);
            }
        })));
        let id = target.target_id();
        if self.inner.borrow_mut().attached.insert(id) {
            log::debug!("attached to target {:?}", id);
        }
    }

    /// Remove the handler installed by [ContextMenu::attach].
    pub fn detach(&self, target: &dyn ContextMenuTarget) -> bool {
        let id = target.target_id();
        if !self.inner.borrow_mut().attached.shift_remove(&id) {
            return false;
        }
        target.set_secondary_click_handler(None);
        log::debug!("detached from target {:?}", id);
        true
    }

    /// Targets this menu is attached to, in attach order.
    pub fn attached_targets(&self) -> Vec<TargetId> {
        self.inner.borrow().attached.iter().copied().collect()
    }
}
