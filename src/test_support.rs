//! Shared fakes for unit tests across modules.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::LocalBoxFuture;

use crate::loader::resource::{LoadError, LoadFuture, PlaceholderHost, ResourceFetcher, Sleeper};
use crate::prefs::notify::Notifier;
use crate::prefs::storage::{KeyValueStore, StorageError};

/// Sleeper backed by tokio's clock so tests can run with paused time.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// How a scripted URL behaves.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Script {
    /// Resolve successfully after the delay.
    Ok(u64),
    /// Reject after the delay.
    Fail(u64),
    /// Never settle.
    Hang,
}

/// Fetcher whose per-URL behaviour is scripted; unknown URLs hang.
#[derive(Debug, Default)]
pub(crate) struct ScriptedFetcher {
    scripts: HashMap<String, Script>,
    pub(crate) calls: RefCell<Vec<(&'static str, String)>>,
}

impl ScriptedFetcher {
    pub(crate) fn new<'a>(scripts: impl IntoIterator<Item = (&'a str, Script)>) -> Self {
        Self {
            scripts: scripts.into_iter().map(|(url, script)| (url.to_owned(), script)).collect(),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn run(&self, path: &'static str, url: &str) -> LoadFuture {
        self.calls.borrow_mut().push((path, url.to_owned()));
        let script = self.scripts.get(url).copied().unwrap_or(Script::Hang);
        let url = url.to_owned();
        Box::pin(async move {
            match script {
                Script::Ok(delay) => {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    Ok(())
                }
                Script::Fail(delay) => {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    Err(LoadError::Failed { url, reason: "scripted failure".into() })
                }
                Script::Hang => futures::future::pending().await,
            }
        })
    }
}

impl ResourceFetcher for ScriptedFetcher {
    fn load_stylesheet(&self, url: &str) -> LoadFuture {
        self.run("stylesheet", url)
    }

    fn preload_script(&self, url: &str) -> LoadFuture {
        self.run("preload", url)
    }

    fn decode_image(&self, url: &str) -> LoadFuture {
        self.run("decode", url)
    }

    fn fetch(&self, url: &str) -> LoadFuture {
        self.run("fetch", url)
    }
}

/// Placeholder host that records skeleton injections.
#[derive(Debug, Default)]
pub(crate) struct RecordingPlaceholder {
    pub(crate) content_rendered: Cell<bool>,
    pub(crate) injected: Cell<u32>,
    pub(crate) removed: Cell<u32>,
}

impl RecordingPlaceholder {
    pub(crate) fn with_content(rendered: bool) -> Rc<Self> {
        let host = Self::default();
        host.content_rendered.set(rendered);
        Rc::new(host)
    }
}

impl PlaceholderHost for RecordingPlaceholder {
    fn has_content(&self) -> bool {
        self.content_rendered.get()
    }

    fn inject_skeleton(&self) -> bool {
        self.injected.set(self.injected.get() + 1);
        true
    }

    fn remove_skeleton(&self) {
        self.removed.set(self.removed.get() + 1);
    }
}

/// Notifier that keeps every message.
#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    pub(crate) messages: RefCell<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_owned());
    }
}

/// Store whose every operation fails.
#[derive(Debug, Default)]
pub(crate) struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Rejected { key: key.to_owned(), reason: "quota exceeded".into() })
    }
}

/// Thread-scoped `tracing` subscriber that counts WARN events.
#[derive(Debug, Default)]
pub(crate) struct WarnCounter {
    warnings: Arc<AtomicUsize>,
}

impl WarnCounter {
    pub(crate) fn handle(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.warnings)
    }
}

impl tracing::Subscriber for WarnCounter {
    fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &tracing::span::Attributes<'_>) -> tracing::span::Id {
        tracing::span::Id::from_u64(1)
    }

    fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}

    fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}

    fn event(&self, event: &tracing::Event<'_>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _span: &tracing::span::Id) {}

    fn exit(&self, _span: &tracing::span::Id) {}
}
