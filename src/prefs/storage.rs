//! Durable key/value persistence for preferences.
//!
//! Two namespaced keys: the theme mode as a bare string and the
//! accessibility settings as a JSON object. Reads are fallback-safe: a
//! missing, unreadable or malformed value yields the default for that key
//! and is never surfaced to the page.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::{debug, warn};

use super::state::{AccessibilityPrefs, PreferenceState, ThemeMode};
use crate::config::AdaptConfig;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("durable storage is unavailable")]
    Unavailable,
    #[error("storage rejected '{key}': {reason}")]
    Rejected { key: String, reason: String },
}

/// Origin-scoped string storage that survives reloads.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store for tests and non-browser builds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: RefCell::new(entries.into_iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect()),
        }
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// The two keys one resolver reads and writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageKeys {
    pub theme: String,
    pub accessibility: String,
}

impl StorageKeys {
    #[must_use]
    pub fn from_config(config: &AdaptConfig) -> Self {
        Self { theme: config.theme_key(), accessibility: config.accessibility_key() }
    }
}

/// Rebuild preferences from storage, defaulting anything missing or malformed.
pub fn load_preferences(store: &dyn KeyValueStore, keys: &StorageKeys) -> PreferenceState {
    let theme_mode = read(store, &keys.theme).map_or_else(ThemeMode::default, |raw| {
        ThemeMode::parse(&raw).unwrap_or_else(|| {
            debug!(key = %keys.theme, "discarding malformed theme preference");
            ThemeMode::default()
        })
    });

    let accessibility = read(store, &keys.accessibility).map_or_else(AccessibilityPrefs::default, |raw| {
        serde_json::from_str::<AccessibilityPrefs>(&raw).unwrap_or_else(|err| {
            warn!(key = %keys.accessibility, error = %err, "discarding malformed accessibility preferences");
            AccessibilityPrefs::default()
        })
    });

    PreferenceState::from_parts(theme_mode, accessibility)
}

pub fn save_theme(store: &dyn KeyValueStore, keys: &StorageKeys, mode: ThemeMode) {
    write(store, &keys.theme, mode.as_str());
}

pub fn save_accessibility(store: &dyn KeyValueStore, keys: &StorageKeys, prefs: &AccessibilityPrefs) {
    match serde_json::to_string(prefs) {
        Ok(raw) => write(store, &keys.accessibility, &raw),
        Err(err) => warn!(error = %err, "failed to encode accessibility preferences"),
    }
}

fn read(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "preference storage read failed; using defaults");
            None
        }
    }
}

fn write(store: &dyn KeyValueStore, key: &str, value: &str) {
    if let Err(err) = store.set(key, value) {
        warn!(key, error = %err, "preference storage write failed; change kept for this session only");
    }
}
