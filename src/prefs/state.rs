//! Preference values, their stored shape, and the published snapshot.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// The user's explicit theme choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the system color-scheme signal.
    #[default]
    Auto,
}

impl ThemeMode {
    /// Stored representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }

    /// Parse a stored value. Surrounding whitespace and case are ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    /// Whether this mode renders dark given the system signal.
    #[must_use]
    pub fn resolve(self, system_prefers_dark: bool) -> bool {
        match self {
            Self::Light => false,
            Self::Dark => true,
            Self::Auto => system_prefers_dark,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root font size step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Root element class for this size.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Small => "font-size-small",
            Self::Medium => "font-size-medium",
            Self::Large => "font-size-large",
        }
    }

    /// One step larger, saturating at `Large`.
    #[must_use]
    pub fn larger(self) -> Self {
        match self {
            Self::Small => Self::Medium,
            Self::Medium | Self::Large => Self::Large,
        }
    }

    /// One step smaller, saturating at `Small`.
    #[must_use]
    pub fn smaller(self) -> Self {
        match self {
            Self::Large => Self::Medium,
            Self::Medium | Self::Small => Self::Small,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Everything the user can choose. Persisted verbatim.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreferenceState {
    pub theme_mode: ThemeMode,
    pub font_size: FontSize,
    pub high_contrast: bool,
    pub reduced_motion: bool,
    pub animations_enabled: bool,
    pub keyboard_nav_enhanced: bool,
    pub focus_indicators_enhanced: bool,
}

impl PreferenceState {
    /// The portion stored under the accessibility key.
    #[must_use]
    pub fn accessibility(&self) -> AccessibilityPrefs {
        AccessibilityPrefs {
            font_size: self.font_size,
            high_contrast: self.high_contrast,
            reduced_motion: self.reduced_motion,
            animations_enabled: self.animations_enabled,
            keyboard_nav_enhanced: self.keyboard_nav_enhanced,
            focus_indicators_enhanced: self.focus_indicators_enhanced,
        }
    }

    #[must_use]
    pub fn from_parts(theme_mode: ThemeMode, prefs: AccessibilityPrefs) -> Self {
        Self {
            theme_mode,
            font_size: prefs.font_size,
            high_contrast: prefs.high_contrast,
            reduced_motion: prefs.reduced_motion,
            animations_enabled: prefs.animations_enabled,
            keyboard_nav_enhanced: prefs.keyboard_nav_enhanced,
            focus_indicators_enhanced: prefs.focus_indicators_enhanced,
        }
    }
}

/// Stored JSON shape of the accessibility key. Missing fields take defaults.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessibilityPrefs {
    pub font_size: FontSize,
    pub high_contrast: bool,
    pub reduced_motion: bool,
    pub animations_enabled: bool,
    pub keyboard_nav_enhanced: bool,
    pub focus_indicators_enhanced: bool,
}

/// Current values of the platform media signals.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemPreferences {
    pub prefers_dark: bool,
    pub prefers_reduced_motion: bool,
    pub prefers_high_contrast: bool,
}

/// What subscribers receive: the stored state plus values derived at read time.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreferenceSnapshot {
    pub state: PreferenceState,
    pub resolved_dark: bool,
    pub effective_high_contrast: bool,
    pub effective_reduced_motion: bool,
}

impl PreferenceSnapshot {
    #[must_use]
    pub fn derive(state: PreferenceState, system: SystemPreferences) -> Self {
        Self {
            state,
            resolved_dark: state.theme_mode.resolve(system.prefers_dark),
            effective_high_contrast: state.high_contrast || system.prefers_high_contrast,
            effective_reduced_motion: state.reduced_motion || system.prefers_reduced_motion,
        }
    }
}
