//! The adaptation layer: one resolver, one recognizer and one loader per page.
//!
//! The three subsystems share no state. The layer only owns them together
//! so a page can build, reach and tear down all of them as a unit.

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use std::future::Future;
use std::rc::Rc;

use tracing::info;

use crate::config::AdaptConfig;
use crate::gesture::GestureRecognizer;
use crate::loader::resource::{PlaceholderHost, ResourceFetcher, Sleeper};
use crate::loader::{LoadReport, LoaderPlatform, ProgressiveLoader};
use crate::prefs::document::DocumentSurface;
use crate::prefs::notify::Notifier;
use crate::prefs::storage::KeyValueStore;
use crate::prefs::system::SystemSignals;
use crate::prefs::{PreferencePlatform, PreferenceResolver};

/// Every platform capability the layer runs on.
pub struct Platform {
    pub store: Rc<dyn KeyValueStore>,
    pub document: Rc<dyn DocumentSurface>,
    pub signals: Rc<dyn SystemSignals>,
    pub notifier: Option<Rc<dyn Notifier>>,
    pub fetcher: Rc<dyn ResourceFetcher>,
    pub sleeper: Rc<dyn Sleeper>,
    pub placeholder: Rc<dyn PlaceholderHost>,
}

impl Platform {
    fn split(self) -> (PreferencePlatform, LoaderPlatform) {
        (
            PreferencePlatform {
                store: self.store,
                document: self.document,
                signals: self.signals,
                notifier: self.notifier,
            },
            LoaderPlatform { fetcher: self.fetcher, sleeper: self.sleeper, placeholder: self.placeholder },
        )
    }
}

/// Handle to the page's adaptation layer. Clones share every subsystem.
#[derive(Clone, Debug)]
pub struct AdaptLayer {
    config: Rc<AdaptConfig>,
    preferences: PreferenceResolver,
    gestures: GestureRecognizer,
    loader: ProgressiveLoader,
}

impl AdaptLayer {
    /// Build every subsystem. Preferences are restored and applied immediately;
    /// loading starts only when [`AdaptLayer::start_loading`] is polled.
    #[must_use]
    pub fn new(config: AdaptConfig, platform: Platform) -> Self {
        let (prefs_platform, loader_platform) = platform.split();
        let preferences = PreferenceResolver::new(&config, prefs_platform);
        let gestures = GestureRecognizer::new(config.gesture);
        let loader = ProgressiveLoader::new(config.loader.clone(), loader_platform);
        info!(namespace = %config.namespace, "adaptation layer ready");
        Self { config: Rc::new(config), preferences, gestures, loader }
    }

    #[must_use]
    pub fn config(&self) -> &AdaptConfig {
        &self.config
    }

    #[must_use]
    pub fn preferences(&self) -> &PreferenceResolver {
        &self.preferences
    }

    #[must_use]
    pub fn gestures(&self) -> &GestureRecognizer {
        &self.gestures
    }

    #[must_use]
    pub fn loader(&self) -> &ProgressiveLoader {
        &self.loader
    }

    /// The staged load as a detached future, ready for a local executor.
    pub fn start_loading(&self) -> impl Future<Output = LoadReport> + 'static {
        let loader = self.loader.clone();
        async move { loader.run().await }
    }
}
