//! Observer lists with RAII subscriptions.
//!
//! DESIGN
//! ======
//! Every stream this crate publishes (preference snapshots, loading state,
//! swipe events) is a [`Subscribers`] list. Subscribing hands back a
//! [`Subscription`]; dropping it removes the listener, so widget teardown
//! is deterministic instead of depending on when closures get collected.
//!
//! The runtime is the single-threaded browser event loop, so lists are
//! `Rc`/`RefCell` based. Listeners run after the list borrow is released,
//! which lets a listener subscribe, unsubscribe or call back into the
//! publisher without tripping a `RefCell` conflict. A publisher whose
//! listeners can trigger a newer value mid-pass uses
//! [`Subscribers::notify_while`] to abandon the stale pass.

#[cfg(test)]
#[path = "observe_test.rs"]
mod observe_test;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Listener<T> = Rc<dyn Fn(&T)>;

struct ListenerList<T> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Listener<T>)>>,
}

impl<T> ListenerList<T> {
    fn contains(&self, id: u64) -> bool {
        self.entries.borrow().iter().any(|(entry_id, _)| *entry_id == id)
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
    }
}

/// A list of listeners for values of type `T`.
pub struct Subscribers<T> {
    list: Rc<ListenerList<T>>,
}

impl<T: 'static> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Subscribers<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            list: Rc::new(ListenerList { next_id: Cell::new(0), entries: RefCell::new(Vec::new()) }),
        }
    }

    /// Register `listener`. It stays registered until the returned handle is dropped.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.list.next_id.get();
        self.list.next_id.set(id + 1);
        self.list.entries.borrow_mut().push((id, Rc::new(listener)));

        let list = Rc::downgrade(&self.list);
        Subscription::new(move || {
            if let Some(list) = list.upgrade() {
                list.remove(id);
            }
        })
    }

    /// Deliver `value` to every listener registered at call time.
    ///
    /// A listener removed by an earlier listener in the same pass is skipped.
    pub fn notify(&self, value: &T) {
        self.notify_while(value, || true);
    }

    /// Like [`Subscribers::notify`], but stops the pass as soon as
    /// `keep_going` returns `false`. Checked before each delivery.
    pub fn notify_while(&self, value: &T, keep_going: impl Fn() -> bool) {
        let listeners: Vec<(u64, Listener<T>)> = self
            .list
            .entries
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();
        for (id, listener) in listeners {
            if !keep_going() {
                return;
            }
            if self.list.contains(id) {
                listener(value);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.list.entries.borrow().len())
            .finish()
    }
}

/// Handle for a registered listener; dropping it runs the teardown.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self { teardown: Some(Box::new(teardown)) }
    }

    /// A handle with nothing to tear down.
    pub fn empty() -> Self {
        Self { teardown: None }
    }

    /// Combine several handles into one that tears all of them down.
    pub fn merge(subscriptions: Vec<Subscription>) -> Self {
        if subscriptions.is_empty() {
            return Self::empty();
        }
        Self::new(move || drop(subscriptions))
    }

    /// Keep the listener registered for the rest of the page lifetime.
    pub fn detach(mut self) {
        self.teardown = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.teardown.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}
