use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::time::Instant;

use super::*;
use crate::loader::resource::{LoadError, NoPlaceholder};
use crate::test_support::{RecordingPlaceholder, Script, ScriptedFetcher, TokioSleeper, WarnCounter};

// =============================================================
// Helpers
// =============================================================

const TICK_SLACK_MS: u64 = 3;

fn config(critical: &[&str], secondary: &[&str]) -> LoaderConfig {
    LoaderConfig {
        critical: critical.iter().map(|url| Resource::new(*url)).collect(),
        secondary: secondary.iter().map(|url| Resource::new(*url)).collect(),
        ..LoaderConfig::default()
    }
}

fn loader_with(
    config: LoaderConfig,
    fetcher: ScriptedFetcher,
    placeholder: Rc<dyn PlaceholderHost>,
) -> (ProgressiveLoader, Rc<RefCell<Vec<LoadingState>>>, Subscription) {
    let loader = ProgressiveLoader::new(
        config,
        LoaderPlatform { fetcher: Rc::new(fetcher), sleeper: Rc::new(TokioSleeper), placeholder },
    );
    let history = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&history);
    let subscription = loader.subscribe(move |state| sink.borrow_mut().push(state.clone()));
    (loader, history, subscription)
}

fn assert_monotonic(history: &[LoadingState]) {
    for pair in history.windows(2) {
        assert!(pair[0].stage <= pair[1].stage, "stage regressed: {:?} -> {:?}", pair[0].stage, pair[1].stage);
        assert!(pair[0].progress <= pair[1].progress, "progress regressed: {} -> {}", pair[0].progress, pair[1].progress);
    }
}

// =============================================================
// settle
// =============================================================

#[tokio::test(start_paused = true)]
async fn load_with_timeout_reports_timeout() {
    let fetcher = ScriptedFetcher::new([("/slow.css", Script::Hang)]);
    let outcome = settle::load_with_timeout(
        &fetcher,
        &TokioSleeper,
        &Resource::new("/slow.css"),
        Duration::from_millis(250),
    )
    .await;
    assert_eq!(outcome, Err(LoadError::Timeout { url: "/slow.css".into(), after_ms: 250 }));
}

#[tokio::test(start_paused = true)]
async fn settle_all_waits_for_every_outcome_in_input_order() {
    let fetcher = ScriptedFetcher::new([("/a.css", Script::Ok(300)), ("/b.js", Script::Fail(10)), ("/c.png", Script::Ok(5))]);
    let resources = [Resource::new("/a.css"), Resource::new("/b.js"), Resource::new("/c.png")];

    let settled = settle::settle_all(&fetcher, &TokioSleeper, &resources, Duration::from_secs(1)).await;

    let urls: Vec<&str> = settled.iter().map(|s| s.resource.url.as_str()).collect();
    assert_eq!(urls, vec!["/a.css", "/b.js", "/c.png"]);
    assert!(settled[0].outcome.is_ok());
    assert!(settled[1].outcome.is_err());
    assert!(settled[2].outcome.is_ok());
    assert_eq!(SettleSummary::of(&settled), SettleSummary { loaded: 2, failed: 1 });
}

#[tokio::test(start_paused = true)]
async fn settle_all_runs_loads_concurrently() {
    let fetcher = ScriptedFetcher::new([("/a.css", Script::Ok(400)), ("/b.css", Script::Ok(400))]);
    let resources = [Resource::new("/a.css"), Resource::new("/b.css")];
    let started = Instant::now();

    settle::settle_all(&fetcher, &TokioSleeper, &resources, Duration::from_secs(5)).await;

    assert!(started.elapsed() < Duration::from_millis(800));
}

#[test]
fn summary_all_failed_needs_at_least_one_resource() {
    assert!(!SettleSummary::default().all_failed());
    assert!(SettleSummary { loaded: 0, failed: 2 }.all_failed());
    assert!(!SettleSummary { loaded: 1, failed: 2 }.all_failed());
    assert_eq!(SettleSummary { loaded: 1, failed: 2 }.total(), 3);
}

// =============================================================
// Stage machine
// =============================================================

#[tokio::test(start_paused = true)]
async fn run_walks_every_stage_in_order() {
    let fetcher = ScriptedFetcher::new([("/main.css", Script::Ok(20)), ("/carousel.js", Script::Ok(40))]);
    let (loader, history, _sub) = loader_with(config(&["/main.css"], &["/carousel.js"]), fetcher, Rc::new(NoPlaceholder));

    let report = loader.run().await;

    let steps: Vec<(LoadingStage, u8)> = history.borrow().iter().map(|s| (s.stage, s.progress)).collect();
    assert_eq!(
        steps,
        vec![
            (LoadingStage::Initial, 10),
            (LoadingStage::Critical, 40),
            (LoadingStage::Critical, 60),
            (LoadingStage::Secondary, 80),
            (LoadingStage::Complete, 100),
            (LoadingStage::Complete, 100),
        ]
    );
    let last = history.borrow().last().cloned().unwrap();
    assert!(!last.is_loading);
    assert_eq!(last.message, MESSAGE_READY);
    assert_eq!(report.critical, SettleSummary { loaded: 1, failed: 0 });
    assert_eq!(report.secondary, SettleSummary { loaded: 1, failed: 0 });
    assert!(!report.degraded);
}

#[tokio::test(start_paused = true)]
async fn is_loading_clears_only_after_grace() {
    let (loader, history, _sub) = loader_with(config(&[], &[]), ScriptedFetcher::default(), Rc::new(NoPlaceholder));
    let started = Instant::now();

    loader.run().await;

    assert!(started.elapsed() >= Duration::from_millis(500));
    let states = history.borrow();
    let complete_loading = states.iter().find(|s| s.stage == LoadingStage::Complete).unwrap();
    assert!(complete_loading.is_loading, "Complete is first published while still loading");
    assert!(!states.last().unwrap().is_loading);
}

#[tokio::test(start_paused = true)]
async fn mixed_outcomes_stay_monotonic() {
    let fetcher = ScriptedFetcher::new([
        ("/a.css", Script::Fail(30)),
        ("/b.png", Script::Ok(10)),
        ("/c.js", Script::Hang),
        ("/d.json", Script::Ok(1)),
        ("/e.css", Script::Fail(2)),
    ]);
    let (loader, history, _sub) =
        loader_with(config(&["/a.css", "/b.png", "/c.js"], &["/d.json", "/e.css"]), fetcher, Rc::new(NoPlaceholder));

    let report = loader.run().await;

    assert_monotonic(&history.borrow());
    assert_eq!(report.critical, SettleSummary { loaded: 1, failed: 2 });
    assert_eq!(report.secondary, SettleSummary { loaded: 1, failed: 1 });
    assert!(!report.degraded, "partial success is not degraded");
    assert_eq!(loader.state().stage, LoadingStage::Complete);
}

#[tokio::test(start_paused = true)]
async fn total_critical_failure_still_completes_within_budget() {
    let fetcher = ScriptedFetcher::new([("/main.css", Script::Hang), ("/hero.jpg", Script::Fail(100))]);
    let (loader, history, _sub) =
        loader_with(config(&["/main.css", "/hero.jpg"], &["/extra.js"]), fetcher, Rc::new(NoPlaceholder));
    let started = Instant::now();

    let report = loader.run().await;

    // Paused tokio time advances in whole millisecond ticks.
    assert!(started.elapsed() <= Duration::from_millis(5_000 + 5_000 + 500 + TICK_SLACK_MS));
    assert!(report.degraded);
    let state = loader.state();
    assert_eq!(state.stage, LoadingStage::Complete);
    assert_eq!(state.progress, 100);
    assert_eq!(state.message, MESSAGE_DEGRADED);
    assert!(!state.is_loading);
    assert_monotonic(&history.borrow());
}

#[tokio::test(start_paused = true)]
async fn empty_lists_complete_without_degrading() {
    let (loader, _history, _sub) = loader_with(config(&[], &[]), ScriptedFetcher::default(), Rc::new(NoPlaceholder));
    let report = loader.run().await;
    assert!(!report.degraded);
    assert_eq!(loader.state().message, MESSAGE_READY);
}

#[tokio::test(start_paused = true)]
async fn second_run_is_a_no_op() {
    let fetcher = ScriptedFetcher::new([("/main.css", Script::Ok(1))]);
    let (loader, history, _sub) = loader_with(config(&["/main.css"], &[]), fetcher, Rc::new(NoPlaceholder));

    let first = loader.run().await;
    let published = history.borrow().len();
    let second = loader.run().await;

    assert_eq!(first, second);
    assert_eq!(history.borrow().len(), published);
}

// =============================================================
// Skeleton placeholder
// =============================================================

#[tokio::test(start_paused = true)]
async fn skeleton_injected_when_page_is_empty_and_removed_on_finish() {
    let host = RecordingPlaceholder::with_content(false);
    let fetcher = ScriptedFetcher::new([("/main.css", Script::Ok(1))]);
    let (loader, _history, _sub) = loader_with(config(&["/main.css"], &[]), fetcher, host.clone());

    let report = loader.run().await;

    assert!(report.skeleton_shown);
    assert_eq!(host.injected.get(), 1);
    assert_eq!(host.removed.get(), 1);
}

#[tokio::test(start_paused = true)]
async fn skeleton_skipped_when_content_already_rendered() {
    let host = RecordingPlaceholder::with_content(true);
    let (loader, _history, _sub) = loader_with(config(&[], &[]), ScriptedFetcher::default(), host.clone());

    let report = loader.run().await;

    assert!(!report.skeleton_shown);
    assert_eq!(host.injected.get(), 0);
    assert_eq!(host.removed.get(), 0);
}

// =============================================================
// Readiness queries
// =============================================================

#[tokio::test(start_paused = true)]
async fn readiness_reflects_outcomes() {
    let fetcher = ScriptedFetcher::new([("/main.css", Script::Ok(1)), ("/hero.jpg", Script::Fail(1))]);
    let (loader, _history, _sub) = loader_with(config(&["/main.css", "/hero.jpg"], &[]), fetcher, Rc::new(NoPlaceholder));
    assert_eq!(loader.status("/main.css"), None);

    loader.run().await;

    assert!(loader.is_ready("/main.css"));
    assert_eq!(loader.status("/hero.jpg"), Some(ResourceStatus::Unavailable));
    assert_eq!(loader.unavailable(), vec!["/hero.jpg".to_owned()]);
    assert_eq!(loader.status("/unknown.css"), None);
}

#[tokio::test(start_paused = true)]
async fn ensure_loads_on_demand_without_touching_stage() {
    let fetcher = ScriptedFetcher::new([("/gallery/1.webp", Script::Ok(5))]);
    let (loader, history, _sub) = loader_with(config(&[], &[]), fetcher, Rc::new(NoPlaceholder));

    assert!(loader.ensure(&Resource::new("/gallery/1.webp")).await);

    assert!(loader.is_ready("/gallery/1.webp"));
    assert!(history.borrow().is_empty());
    assert_eq!(loader.state().stage, LoadingStage::Initial);
}

#[tokio::test(start_paused = true)]
async fn ensure_times_out_and_marks_unavailable() {
    let (loader, _history, _sub) = loader_with(config(&[], &[]), ScriptedFetcher::default(), Rc::new(NoPlaceholder));

    assert!(!loader.ensure(&Resource::new("/never.png")).await);
    assert_eq!(loader.status("/never.png"), Some(ResourceStatus::Unavailable));
}

#[tokio::test(start_paused = true)]
async fn ensure_failure_is_logged_and_listed() {
    let counter = WarnCounter::default();
    let warnings = counter.handle();
    let _guard = tracing::subscriber::set_default(counter);
    let fetcher = ScriptedFetcher::new([("/gallery/broken.webp", Script::Fail(5))]);
    let (loader, _history, _sub) = loader_with(config(&[], &[]), fetcher, Rc::new(NoPlaceholder));

    assert!(!loader.ensure(&Resource::new("/gallery/broken.webp")).await);

    assert_eq!(loader.unavailable(), vec!["/gallery/broken.webp".to_owned()]);
    assert_eq!(warnings.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn ensure_skips_fetch_when_already_ready() {
    let fetcher = Rc::new(ScriptedFetcher::new([("/main.css", Script::Ok(1))]));
    let loader = ProgressiveLoader::new(
        config(&["/main.css"], &[]),
        LoaderPlatform { fetcher: fetcher.clone(), sleeper: Rc::new(TokioSleeper), placeholder: Rc::new(NoPlaceholder) },
    );
    loader.run().await;
    let calls = fetcher.calls.borrow().len();

    assert!(loader.ensure(&Resource::new("/main.css")).await);
    assert_eq!(fetcher.calls.borrow().len(), calls);
}

#[test]
fn dropping_subscription_stops_updates() {
    let (loader, history, subscription) =
        loader_with(config(&[], &[]), ScriptedFetcher::default(), Rc::new(NoPlaceholder));
    drop(subscription);
    loader.advance(LoadingStage::Critical, 40, "x");
    assert!(history.borrow().is_empty());
}
