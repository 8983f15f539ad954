//! Confirmation messages for user-initiated preference changes.

use tracing::info;

use super::state::{FontSize, ThemeMode};

/// Sink for short user-facing confirmations (toast, live region).
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Notifier that only logs. Used when the page provides no sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!(message, "preference change");
    }
}

pub(crate) fn theme_message(mode: ThemeMode) -> String {
    match mode {
        ThemeMode::Auto => "Theme follows system setting".to_owned(),
        ThemeMode::Light | ThemeMode::Dark => format!("{} theme enabled", capitalize(mode.as_str())),
    }
}

pub(crate) fn font_size_message(size: FontSize) -> String {
    format!("Font size set to {}", size.label())
}

pub(crate) fn toggle_message(feature: &str, enabled: bool) -> String {
    format!("{feature} {}", if enabled { "enabled" } else { "disabled" })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}
