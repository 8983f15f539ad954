use std::cell::RefCell;

use super::*;
use crate::gesture::geometry::Point;
use crate::loader::resource::Resource;
use crate::loader::state::LoadingStage;
use crate::loader::ResourceStatus;
use crate::prefs::document::MemoryDocument;
use crate::prefs::state::{SystemPreferences, ThemeMode};
use crate::prefs::storage::MemoryStore;
use crate::prefs::system::ManualSignals;
use crate::test_support::{RecordingNotifier, RecordingPlaceholder, Script, ScriptedFetcher, TokioSleeper};

fn layer(config: AdaptConfig, fetcher: ScriptedFetcher) -> (AdaptLayer, Rc<MemoryDocument>, Rc<MemoryStore>) {
    let document = Rc::new(MemoryDocument::new());
    let store = Rc::new(MemoryStore::new());
    let layer = AdaptLayer::new(
        config,
        Platform {
            store: store.clone(),
            document: document.clone(),
            signals: Rc::new(ManualSignals::new(SystemPreferences { prefers_dark: true, ..SystemPreferences::default() })),
            notifier: Some(Rc::new(RecordingNotifier::default())),
            fetcher: Rc::new(fetcher),
            sleeper: Rc::new(TokioSleeper),
            placeholder: RecordingPlaceholder::with_content(true),
        },
    );
    (layer, document, store)
}

fn config() -> AdaptConfig {
    let mut config = AdaptConfig { namespace: "bizco".into(), ..AdaptConfig::default() };
    config.loader.critical = vec![Resource::new("/css/main.css")];
    config.loader.secondary = vec![Resource::new("/img/hero.webp")];
    config
}

#[test]
fn construction_applies_preferences_before_loading() {
    let (layer, document, _store) = layer(config(), ScriptedFetcher::default());

    assert!(layer.preferences().resolved_dark(), "auto follows the dark system signal");
    assert!(document.has_class("dark-theme"));
    assert_eq!(layer.loader().state().stage, LoadingStage::Initial);
    assert_eq!(layer.config().namespace, "bizco");
}

#[test]
fn preferences_use_configured_namespace() {
    let (layer, _document, store) = layer(config(), ScriptedFetcher::default());
    layer.preferences().set_theme_mode(ThemeMode::Light);
    assert_eq!(store.raw("bizco-theme-preference").as_deref(), Some("light"));
}

#[test]
fn gestures_use_configured_thresholds() {
    let mut config = config();
    config.gesture.threshold = 200.0;
    let (layer, _document, _store) = layer(config, ScriptedFetcher::default());

    layer.gestures().on_touch_start(&[Point::new(0.0, 0.0)], None, 0.0);
    assert!(layer.gestures().on_touch_end(Point::new(150.0, 0.0), 100.0).is_none());
}

#[tokio::test(start_paused = true)]
async fn start_loading_drives_loader_to_completion() {
    let fetcher = ScriptedFetcher::new([("/css/main.css", Script::Ok(20)), ("/img/hero.webp", Script::Fail(30))]);
    let (layer, _document, _store) = layer(config(), fetcher);
    let stages = Rc::new(RefCell::new(Vec::new()));
    let sink = stages.clone();
    let _sub = layer.loader().subscribe(move |state| sink.borrow_mut().push(state.stage));

    let report = layer.start_loading().await;

    assert!(!report.degraded);
    assert_eq!(report.secondary.failed, 1);
    assert_eq!(layer.loader().status("/css/main.css"), Some(ResourceStatus::Ready));
    assert_eq!(layer.loader().unavailable(), vec!["/img/hero.webp".to_owned()]);
    assert!(!layer.loader().state().is_loading);
    assert_eq!(stages.borrow().last(), Some(&LoadingStage::Complete));
}
