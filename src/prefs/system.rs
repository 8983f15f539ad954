//! System-level appearance signals (media features).

use std::cell::Cell;
use std::rc::Rc;

use super::state::SystemPreferences;
use crate::observe::{Subscribers, Subscription};

/// Current values of the color-scheme, reduced-motion and contrast features.
pub trait SystemSignals {
    fn current(&self) -> SystemPreferences;

    /// Call `on_change` whenever any feature flips, until the handle drops.
    fn watch(&self, on_change: Rc<dyn Fn()>) -> Subscription;
}

/// Signals set by hand. Used in tests and where no media queries exist.
#[derive(Debug, Default)]
pub struct ManualSignals {
    current: Cell<SystemPreferences>,
    listeners: Subscribers<()>,
}

impl ManualSignals {
    #[must_use]
    pub fn new(initial: SystemPreferences) -> Self {
        Self { current: Cell::new(initial), listeners: Subscribers::new() }
    }

    /// Replace all values and notify watchers if anything changed.
    pub fn set(&self, next: SystemPreferences) {
        if self.current.replace(next) != next {
            self.listeners.notify(&());
        }
    }

    pub fn set_prefers_dark(&self, prefers_dark: bool) {
        self.set(SystemPreferences { prefers_dark, ..self.current.get() });
    }

    pub fn set_prefers_reduced_motion(&self, prefers_reduced_motion: bool) {
        self.set(SystemPreferences { prefers_reduced_motion, ..self.current.get() });
    }

    pub fn set_prefers_high_contrast(&self, prefers_high_contrast: bool) {
        self.set(SystemPreferences { prefers_high_contrast, ..self.current.get() });
    }

    #[must_use]
    pub fn watchers(&self) -> usize {
        self.listeners.len()
    }
}

impl SystemSignals for ManualSignals {
    fn current(&self) -> SystemPreferences {
        self.current.get()
    }

    fn watch(&self, on_change: Rc<dyn Fn()>) -> Subscription {
        self.listeners.subscribe(move |()| on_change())
    }
}
