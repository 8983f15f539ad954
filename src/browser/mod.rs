//! Browser platform and page entry points (`hydrate` feature).
//!
//! SYSTEM CONTEXT
//! ==============
//! Implements every platform trait on top of `web-sys` and exposes `boot` /
//! `shutdown` to the page. `boot` reads an optional JSON config from
//! `<script type="application/json" id="adapt-config">`, restores
//! preferences, attaches touch listeners to the document and spawns the
//! progressive loader. The layer lives in a thread-local until `shutdown`.

pub mod document;
pub mod fetch;
pub mod media;
pub mod storage;
pub mod touch;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

use crate::config::AdaptConfig;
use crate::layer::{AdaptLayer, Platform};
use crate::observe::Subscription;
use crate::prefs::state::ThemeMode;

use document::{BrowserDocument, BrowserSkeleton, LiveRegionNotifier};
use fetch::{BrowserFetcher, GlooSleeper};
use media::MediaSignals;
use storage::LocalStore;

const CONFIG_ELEMENT_ID: &str = "adapt-config";

struct Active {
    layer: AdaptLayer,
    _touch: Subscription,
}

thread_local! {
    static ACTIVE: RefCell<Option<Active>> = const { RefCell::new(None) };
}

/// Best-effort text for a thrown JS value.
pub(crate) fn js_reason(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}

/// Add `handler` for `event` on `target`; the listener is removed when the
/// returned subscription drops.
pub(crate) fn listen(
    target: &EventTarget,
    event: &'static str,
    passive: bool,
    handler: impl FnMut(Event) + 'static,
) -> Result<Subscription, JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        closure.as_ref().unchecked_ref(),
        &options,
    )?;

    let target = target.clone();
    Ok(Subscription::new(move || {
        if let Err(err) = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            warn!(event, reason = %js_reason(&err), "failed to remove listener");
        }
    }))
}

/// The browser implementation of every platform capability.
#[must_use]
pub fn browser_platform() -> Platform {
    Platform {
        store: Rc::new(LocalStore::open()),
        document: Rc::new(BrowserDocument::new()),
        signals: Rc::new(MediaSignals::new()),
        notifier: Some(Rc::new(LiveRegionNotifier)),
        fetcher: Rc::new(BrowserFetcher),
        sleeper: Rc::new(GlooSleeper),
        placeholder: Rc::new(BrowserSkeleton),
    }
}

fn page_config() -> AdaptConfig {
    let raw = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|element| element.text_content());
    let Some(raw) = raw else {
        debug!("no page config; using defaults");
        return AdaptConfig::default();
    };
    AdaptConfig::from_json(&raw).unwrap_or_else(|err| {
        warn!(error = %err, "ignoring invalid page config; using defaults");
        AdaptConfig::default()
    })
}

/// Start the adaptation layer for this page. Later calls are no-ops.
#[wasm_bindgen]
pub fn boot() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        debug!("console logger already installed");
    }

    if ACTIVE.with(|active| active.borrow().is_some()) {
        debug!("adaptation layer already running");
        return;
    }

    let layer = AdaptLayer::new(page_config(), browser_platform());
    let touch = match web_sys::window().and_then(|window| window.document()) {
        Some(document) => touch::bind_touch(layer.gestures(), &document).unwrap_or_else(|err| {
            warn!(reason = %js_reason(&err), "touch listeners unavailable; swipes disabled");
            Subscription::empty()
        }),
        None => Subscription::empty(),
    };

    wasm_bindgen_futures::spawn_local({
        let loading = layer.start_loading();
        async move {
            let report = loading.await;
            debug!(degraded = report.degraded, "loader finished");
        }
    });

    ACTIVE.with(|active| *active.borrow_mut() = Some(Active { layer, _touch: touch }));
    info!("adaptation layer booted");
}

/// Detach listeners and release the layer.
#[wasm_bindgen]
pub fn shutdown() {
    let previous = ACTIVE.with(|active| active.borrow_mut().take());
    if previous.is_some() {
        info!("adaptation layer shut down");
    }
}

/// Run `f` against the booted layer, if any.
pub fn with_layer<R>(f: impl FnOnce(&AdaptLayer) -> R) -> Option<R> {
    let layer = ACTIVE.with(|active| active.borrow().as_ref().map(|active| active.layer.clone()))?;
    Some(f(&layer))
}

/// Page hook for a theme picker: `"light"`, `"dark"` or `"auto"`.
#[wasm_bindgen(js_name = setThemeMode)]
pub fn set_theme_mode(mode: &str) -> bool {
    let Some(mode) = ThemeMode::parse(mode) else {
        warn!(mode, "unknown theme mode");
        return false;
    };
    with_layer(|layer| layer.preferences().set_theme_mode(mode)).is_some()
}

/// Page hook for a theme toggle button. Returns the new mode.
#[wasm_bindgen(js_name = toggleTheme)]
pub fn toggle_theme() -> Option<String> {
    with_layer(|layer| layer.preferences().toggle_theme().as_str().to_owned())
}
