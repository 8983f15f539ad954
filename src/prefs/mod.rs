//! Preference resolver.
//!
//! DESIGN
//! ======
//! One resolver per page owns the user's theme and accessibility choices.
//! It has two inputs (setter calls from widgets, system media signals) and
//! one output: a [`PreferenceSnapshot`] stream plus document side effects.
//!
//! Every setter funnels through a single commit path: update memory, apply
//! document classes, persist, announce, then publish. System signal changes
//! take the same path minus persistence and announcement.
//!
//! `resolved_dark` and the effective contrast/motion flags are derived from
//! the stored state and the system signals at read time; they are never
//! persisted.

pub mod document;
pub mod notify;
pub mod state;
pub mod storage;
pub mod system;


use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, info};

use crate::config::{AdaptConfig, ThemeColors};
use crate::observe::{Subscribers, Subscription};

use document::DocumentSurface;
use notify::Notifier;
use state::{FontSize, PreferenceSnapshot, PreferenceState, ThemeMode};
use storage::{KeyValueStore, StorageKeys};
use system::SystemSignals;

/// Platform capabilities the resolver runs on.
pub struct PreferencePlatform {
    pub store: Rc<dyn KeyValueStore>,
    pub document: Rc<dyn DocumentSurface>,
    pub signals: Rc<dyn SystemSignals>,
    pub notifier: Option<Rc<dyn Notifier>>,
}

/// Which stored key a commit touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Persist {
    Theme,
    Accessibility,
    All,
}

/// Handle to the page's single preference resolver. Clones share state.
#[derive(Clone)]
pub struct PreferenceResolver {
    inner: Rc<ResolverInner>,
}

struct ResolverInner {
    keys: StorageKeys,
    colors: ThemeColors,
    platform: PreferencePlatform,
    state: Cell<PreferenceState>,
    published: Cell<PreferenceSnapshot>,
    /// Bumped on every publish; a delivery pass stops once it is outdated.
    generation: Cell<u64>,
    subscribers: Subscribers<PreferenceSnapshot>,
    system_watch: RefCell<Option<Subscription>>,
}

impl PreferenceResolver {
    /// Build from persisted storage, apply the result to the document, and
    /// start tracking system signals.
    #[must_use]
    pub fn new(config: &AdaptConfig, platform: PreferencePlatform) -> Self {
        let keys = StorageKeys::from_config(config);
        let initial = storage::load_preferences(platform.store.as_ref(), &keys);
        let snapshot = PreferenceSnapshot::derive(initial, platform.signals.current());
        document::apply_snapshot(platform.document.as_ref(), &snapshot, &config.theme_colors);
        info!(
            theme = %initial.theme_mode,
            resolved_dark = snapshot.resolved_dark,
            font_size = initial.font_size.label(),
            "preferences restored"
        );

        let inner = Rc::new(ResolverInner {
            keys,
            colors: config.theme_colors.clone(),
            platform,
            state: Cell::new(initial),
            published: Cell::new(snapshot),
            generation: Cell::new(0),
            subscribers: Subscribers::new(),
            system_watch: RefCell::new(None),
        });

        let weak: Weak<ResolverInner> = Rc::downgrade(&inner);
        let watch = inner.platform.signals.watch(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                PreferenceResolver { inner }.on_system_change();
            }
        }));
        *inner.system_watch.borrow_mut() = Some(watch);

        Self { inner }
    }

    /// Current state with derived values computed against the live system signals.
    #[must_use]
    pub fn snapshot(&self) -> PreferenceSnapshot {
        PreferenceSnapshot::derive(self.state(), self.inner.platform.signals.current())
    }

    #[must_use]
    pub fn state(&self) -> PreferenceState {
        self.inner.state.get()
    }

    #[must_use]
    pub fn resolved_dark(&self) -> bool {
        self.state().theme_mode.resolve(self.inner.platform.signals.current().prefers_dark)
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) {
        self.commit(|state| state.theme_mode = mode, Persist::Theme, || notify::theme_message(mode));
    }

    /// Flip the theme. From `Auto` this picks the explicit opposite of the
    /// system signal so the click always changes what the user sees.
    pub fn toggle_theme(&self) -> ThemeMode {
        let next = match self.state().theme_mode {
            ThemeMode::Auto if self.inner.platform.signals.current().prefers_dark => ThemeMode::Light,
            ThemeMode::Auto | ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        };
        self.set_theme_mode(next);
        next
    }

    pub fn set_font_size(&self, size: FontSize) {
        self.commit(|state| state.font_size = size, Persist::Accessibility, || notify::font_size_message(size));
    }

    pub fn increase_font_size(&self) -> FontSize {
        let next = self.state().font_size.larger();
        self.set_font_size(next);
        next
    }

    pub fn decrease_font_size(&self) -> FontSize {
        let next = self.state().font_size.smaller();
        self.set_font_size(next);
        next
    }

    pub fn toggle_high_contrast(&self, enabled: bool) {
        self.commit(|state| state.high_contrast = enabled, Persist::Accessibility, || {
            notify::toggle_message("High contrast", enabled)
        });
    }

    pub fn toggle_reduced_motion(&self, enabled: bool) {
        self.commit(|state| state.reduced_motion = enabled, Persist::Accessibility, || {
            notify::toggle_message("Reduced motion", enabled)
        });
    }

    pub fn toggle_animations(&self, enabled: bool) {
        self.commit(|state| state.animations_enabled = enabled, Persist::Accessibility, || {
            notify::toggle_message("Animations", enabled)
        });
    }

    pub fn toggle_keyboard_nav(&self, enabled: bool) {
        self.commit(|state| state.keyboard_nav_enhanced = enabled, Persist::Accessibility, || {
            notify::toggle_message("Enhanced keyboard navigation", enabled)
        });
    }

    pub fn toggle_focus_indicators(&self, enabled: bool) {
        self.commit(|state| state.focus_indicators_enhanced = enabled, Persist::Accessibility, || {
            notify::toggle_message("Enhanced focus indicators", enabled)
        });
    }

    /// Restore every preference to its default and persist both keys.
    pub fn reset(&self) {
        self.commit(|state| *state = PreferenceState::default(), Persist::All, || {
            "Preferences reset to defaults".to_owned()
        });
    }

    /// Register for every published snapshot change.
    pub fn subscribe(&self, listener: impl Fn(&PreferenceSnapshot) + 'static) -> Subscription {
        self.inner.subscribers.subscribe(listener)
    }

    fn commit(&self, mutate: impl FnOnce(&mut PreferenceState), persist: Persist, message: impl FnOnce() -> String) {
        let before = self.state();
        let mut next = before;
        mutate(&mut next);
        self.inner.state.set(next);

        let snapshot = self.snapshot();
        document::apply_snapshot(self.inner.platform.document.as_ref(), &snapshot, &self.inner.colors);

        let store = self.inner.platform.store.as_ref();
        let keys = &self.inner.keys;
        if matches!(persist, Persist::Theme | Persist::All) {
            storage::save_theme(store, keys, next.theme_mode);
        }
        if matches!(persist, Persist::Accessibility | Persist::All) {
            storage::save_accessibility(store, keys, &next.accessibility());
        }

        if next != before {
            let message = message();
            debug!(%message, "preference changed");
            if let Some(notifier) = &self.inner.platform.notifier {
                notifier.notify(&message);
            }
        }
        self.publish(snapshot);
    }

    fn on_system_change(&self) {
        let snapshot = self.snapshot();
        document::apply_snapshot(self.inner.platform.document.as_ref(), &snapshot, &self.inner.colors);
        debug!(resolved_dark = snapshot.resolved_dark, "system appearance changed");
        self.publish(snapshot);
    }

    /// Deliver `snapshot` unless it is already the published value.
    ///
    /// A listener that calls a setter publishes a newer snapshot from inside
    /// this pass; the nested pass reaches every listener, so the outer one
    /// stops rather than deliver the outdated value to the rest.
    fn publish(&self, snapshot: PreferenceSnapshot) {
        if self.inner.published.replace(snapshot) == snapshot {
            return;
        }
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        self.inner.subscribers.notify_while(&snapshot, || self.inner.generation.get() == generation);
    }
}

impl fmt::Debug for PreferenceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceResolver")
            .field("keys", &self.inner.keys)
            .field("state", &self.inner.state.get())
            .field("subscribers", &self.inner.subscribers)
            .finish_non_exhaustive()
    }
}
