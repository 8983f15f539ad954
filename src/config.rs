//! Adaptation layer configuration.
//!
//! Every knob has a default in [`crate::consts`]. In the browser the page
//! may embed a JSON document (see `browser::CONFIG_ELEMENT_ID`); any field it
//! omits keeps its default, so `{}` is a valid configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{
    ACCESSIBILITY_KEY_SUFFIX, COMPLETION_GRACE_MS, DEFAULT_NAMESPACE, RESOURCE_TIMEOUT_MS, SWIPE_ALLOWED_TIME_MS,
    SWIPE_MIN_VELOCITY, SWIPE_RESTRAINT_PX, SWIPE_THRESHOLD_PX, THEME_COLOR_DARK, THEME_COLOR_LIGHT, THEME_KEY_SUFFIX,
};
use crate::loader::resource::Resource;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse adaptation config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid adaptation config: {0}")]
    Invalid(String),
}

/// Top-level configuration shared by all three subsystems.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdaptConfig {
    /// Prefix for every durable storage key.
    pub namespace: String,
    pub gesture: GestureConfig,
    pub loader: LoaderConfig,
    pub theme_colors: ThemeColors,
}

impl Default for AdaptConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_owned(),
            gesture: GestureConfig::default(),
            loader: LoaderConfig::default(),
            theme_colors: ThemeColors::default(),
        }
    }
}

impl AdaptConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a subsystem misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::Invalid("namespace must not be empty".into()));
        }
        self.gesture.validate()?;
        self.loader.validate()
    }

    /// Storage key holding the theme mode.
    #[must_use]
    pub fn theme_key(&self) -> String {
        format!("{}-{THEME_KEY_SUFFIX}", self.namespace)
    }

    /// Storage key holding the accessibility JSON object.
    #[must_use]
    pub fn accessibility_key(&self) -> String {
        format!("{}-{ACCESSIBILITY_KEY_SUFFIX}", self.namespace)
    }
}

/// Swipe classification thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GestureConfig {
    /// Minimum travel in pixels.
    pub threshold: f64,
    /// Maximum drift on the non-dominant axis in pixels.
    pub restraint: f64,
    /// Maximum touch duration in milliseconds.
    pub allowed_time_ms: f64,
    /// Minimum speed in pixels per millisecond.
    pub min_velocity: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold: SWIPE_THRESHOLD_PX,
            restraint: SWIPE_RESTRAINT_PX,
            allowed_time_ms: SWIPE_ALLOWED_TIME_MS,
            min_velocity: SWIPE_MIN_VELOCITY,
        }
    }
}

impl GestureConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("gesture.threshold", self.threshold),
            ("gesture.restraint", self.restraint),
            ("gesture.allowedTimeMs", self.allowed_time_ms),
            ("gesture.minVelocity", self.min_velocity),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be a non-negative number, got {value}")));
            }
        }
        if self.allowed_time_ms == 0.0 {
            return Err(ConfigError::Invalid("gesture.allowedTimeMs must be positive".into()));
        }
        Ok(())
    }
}

/// Resource lists and time budgets for the progressive loader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    /// Needed for first meaningful render.
    pub critical: Vec<Resource>,
    /// Needed for full functionality only.
    pub secondary: Vec<Resource>,
    pub resource_timeout_ms: u64,
    pub completion_grace_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            critical: Vec::new(),
            secondary: Vec::new(),
            resource_timeout_ms: RESOURCE_TIMEOUT_MS,
            completion_grace_ms: COMPLETION_GRACE_MS,
        }
    }
}

impl LoaderConfig {
    #[must_use]
    pub fn resource_timeout(&self) -> Duration {
        Duration::from_millis(self.resource_timeout_ms)
    }

    #[must_use]
    pub fn completion_grace(&self) -> Duration {
        Duration::from_millis(self.completion_grace_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.resource_timeout_ms == 0 {
            return Err(ConfigError::Invalid("loader.resourceTimeoutMs must be positive".into()));
        }
        if let Some(empty) = self.critical.iter().chain(&self.secondary).find(|r| r.url.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("loader resource has an empty url ({:?})", empty.kind)));
        }
        Ok(())
    }
}

/// Mobile browser chrome colour per resolved theme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub light: String,
    pub dark: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self { light: THEME_COLOR_LIGHT.to_owned(), dark: THEME_COLOR_DARK.to_owned() }
    }
}

impl ThemeColors {
    #[must_use]
    pub fn for_theme(&self, dark: bool) -> &str {
        if dark { &self.dark } else { &self.light }
    }
}
