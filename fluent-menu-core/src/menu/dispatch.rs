// SPDX-License-Identifier: MIT OR Apache-2.0
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::menu::item::ItemSnapshot;

/// Subscriber to trigger notifications: item text and snapshot.
pub type TriggerListener = Rc<dyn Fn(&str, &ItemSnapshot)>;

/// Token returned by [TriggerDispatcher::subscribe].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The single notification channel of a menu tree.
///
/// Listeners may subscribe or unsubscribe from inside a notification; the
/// change applies to the next [TriggerDispatcher::emit].
#[derive(Default)]
pub struct TriggerDispatcher {
    listeners: RefCell<Vec<(SubscriptionId, TriggerListener)>>,
    next_id: Cell<u64>,
}

impl TriggerDispatcher {
    /// No subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener.
    pub fn subscribe(&self, listener: impl Fn(&str, &ItemSnapshot) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        listeners.len() != before
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Whether nobody listens.
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Notify every listener in subscription order.
    pub fn emit(&self, text: &str, item: &ItemSnapshot) {
        let listeners: Vec<TriggerListener> =
            self.listeners.borrow().iter().map(|(_, l)| l.clone()).collect();
        log::debug!("triggered '{}' ({} listeners)", text, listeners.len());
        for listener in listeners {
            listener(text, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::item::{ItemModel, NewItem};

    fn snapshot() -> ItemSnapshot {
        let mut model: ItemModel<()> = ItemModel::new();
        let id = model.push(NewItem::new("Copy"));
        model.get(id).unwrap().snapshot()
    }

    #[test]
    fn listeners_run_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let dispatcher = TriggerDispatcher::new();
        for tag in ["a", "b"] {
            let log = log.clone();
            dispatcher.subscribe(move |text, _| log.borrow_mut().push(format!("{tag}:{text}")));
        }
        dispatcher.emit("Copy", &snapshot());
        assert_eq!(*log.borrow(), vec!["a:Copy", "b:Copy"]);
    }

    #[test]
    fn unsubscribed_listeners_stay_quiet() {
        let hits = Rc::new(Cell::new(0));
        let dispatcher = TriggerDispatcher::new();
        let counter = hits.clone();
        let id = dispatcher.subscribe(move |_, _| counter.set(counter.get() + 1));
        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        dispatcher.emit("Copy", &snapshot());
        assert_eq!(hits.get(), 0);
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn listeners_may_subscribe_during_emit() {
        let dispatcher = Rc::new(TriggerDispatcher::new());
        let inner = dispatcher.clone();
        dispatcher.subscribe(move |_, _| {
            inner.subscribe(|_, _| {});
        });
        dispatcher.emit("Copy", &snapshot());
        assert_eq!(dispatcher.len(), 2);
    }
}
