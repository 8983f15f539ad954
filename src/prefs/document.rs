//! Document-level visual consequences of a preference snapshot.
//!
//! Everything is expressed as "force this class on/off" and "set this hint",
//! so re-applying the same snapshot leaves the document unchanged.

use std::cell::RefCell;
use std::collections::BTreeSet;

use super::state::{FontSize, PreferenceSnapshot};
use crate::config::ThemeColors;
use crate::consts::{
    CLASS_ANIMATIONS_ENABLED, CLASS_DARK_THEME, CLASS_FOCUS_INDICATORS, CLASS_HIGH_CONTRAST, CLASS_KEYBOARD_NAV,
    CLASS_LIGHT_THEME, CLASS_REDUCED_MOTION,
};

/// The root element and head hints the resolver writes to.
pub trait DocumentSurface {
    /// Add `class` to the root element when `present`, remove it otherwise.
    fn set_class(&self, class: &str, present: bool);

    /// Update the mobile browser chrome color hint.
    fn set_theme_color(&self, color: &str);
}

/// Recorded document state for tests and non-browser builds.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    classes: RefCell<BTreeSet<String>>,
    theme_color: RefCell<Option<String>>,
}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    /// Root classes, sorted.
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().iter().cloned().collect()
    }

    #[must_use]
    pub fn theme_color(&self) -> Option<String> {
        self.theme_color.borrow().clone()
    }
}

impl DocumentSurface for MemoryDocument {
    fn set_class(&self, class: &str, present: bool) {
        let mut classes = self.classes.borrow_mut();
        if present {
            classes.insert(class.to_owned());
        } else {
            classes.remove(class);
        }
    }

    fn set_theme_color(&self, color: &str) {
        *self.theme_color.borrow_mut() = Some(color.to_owned());
    }
}

/// Write every marker and hint implied by `snapshot`.
pub fn apply_snapshot(doc: &dyn DocumentSurface, snapshot: &PreferenceSnapshot, colors: &ThemeColors) {
    let state = &snapshot.state;

    doc.set_class(CLASS_DARK_THEME, snapshot.resolved_dark);
    doc.set_class(CLASS_LIGHT_THEME, !snapshot.resolved_dark);
    doc.set_theme_color(colors.for_theme(snapshot.resolved_dark));

    for size in FontSize::ALL {
        doc.set_class(size.class_name(), size == state.font_size);
    }

    doc.set_class(CLASS_HIGH_CONTRAST, snapshot.effective_high_contrast);
    doc.set_class(CLASS_REDUCED_MOTION, snapshot.effective_reduced_motion);
    doc.set_class(CLASS_ANIMATIONS_ENABLED, state.animations_enabled);
    doc.set_class(CLASS_KEYBOARD_NAV, state.keyboard_nav_enhanced);
    doc.set_class(CLASS_FOCUS_INDICATORS, state.focus_indicators_enhanced);
}
