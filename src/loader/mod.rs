//! Progressive resource loader.
//!
//! DESIGN
//! ======
//! Staged, time-bounded loading: critical resources first, then a skeleton
//! if the page has nothing to show yet, then secondary resources. The
//! published [`LoadingState`] only ever moves forward:
//!
//! ```text
//! Initial(0) → Initial(10) → Critical(40) → Critical(60) → Secondary(80) → Complete(100)
//! ```
//!
//! ERROR HANDLING
//! ==============
//! A failed or timed-out resource is logged and marked unavailable; it
//! never aborts its siblings or stalls the stage. If every critical resource
//! fails the loader still completes, with a degraded message. Nothing here
//! returns an error to the page.

pub mod resource;
pub mod settle;
pub mod state;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::LoaderConfig;
use crate::consts::{
    MESSAGE_CRITICAL, MESSAGE_DEGRADED, MESSAGE_FINALIZING, MESSAGE_LAYOUT, MESSAGE_READY, MESSAGE_SECONDARY,
    PROGRESS_COMPLETE, PROGRESS_CRITICAL_READY, PROGRESS_CRITICAL_SETTLED, PROGRESS_SECONDARY_SETTLED,
    PROGRESS_STARTED,
};
use crate::observe::{Subscribers, Subscription};

use resource::{PlaceholderHost, Resource, ResourceFetcher, Sleeper};
use settle::{SettleSummary, Settled};
use state::{LoadingStage, LoadingState};

/// Readiness of one resource URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceStatus {
    /// Requested, not yet settled.
    Pending,
    Ready,
    /// Failed or timed out; the page should degrade gracefully.
    Unavailable,
}

/// What a completed run did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub critical: SettleSummary,
    pub secondary: SettleSummary,
    /// Every critical resource failed.
    pub degraded: bool,
    /// A skeleton was shown while critical content was missing.
    pub skeleton_shown: bool,
}

/// Platform capabilities the loader runs on.
pub struct LoaderPlatform {
    pub fetcher: Rc<dyn ResourceFetcher>,
    pub sleeper: Rc<dyn Sleeper>,
    pub placeholder: Rc<dyn PlaceholderHost>,
}

/// Handle to the page's single loader. Clones share state.
#[derive(Clone)]
pub struct ProgressiveLoader {
    inner: Rc<LoaderInner>,
}

struct LoaderInner {
    config: LoaderConfig,
    platform: LoaderPlatform,
    state: RefCell<LoadingState>,
    statuses: RefCell<HashMap<String, ResourceStatus>>,
    subscribers: Subscribers<LoadingState>,
    started: Cell<bool>,
    report: Cell<Option<LoadReport>>,
}

impl ProgressiveLoader {
    #[must_use]
    pub fn new(config: LoaderConfig, platform: LoaderPlatform) -> Self {
        Self {
            inner: Rc::new(LoaderInner {
                config,
                platform,
                state: RefCell::new(LoadingState::default()),
                statuses: RefCell::new(HashMap::new()),
                subscribers: Subscribers::new(),
                started: Cell::new(false),
                report: Cell::new(None),
            }),
        }
    }

    /// Drive the staged load to completion.
    ///
    /// Only the first call does any work. Later calls return the finished
    /// report, or an empty one while the first run is still in flight.
    pub async fn run(&self) -> LoadReport {
        if self.inner.started.replace(true) {
            return self.inner.report.get().unwrap_or_default();
        }

        let config = &self.inner.config;
        let platform = &self.inner.platform;
        info!(
            critical = config.critical.len(),
            secondary = config.secondary.len(),
            timeout_ms = config.resource_timeout_ms,
            "progressive load started"
        );
        self.mark_pending(config.critical.iter().chain(&config.secondary));

        self.advance(LoadingStage::Initial, PROGRESS_STARTED, MESSAGE_CRITICAL);
        let critical = SettleSummary::of(&self.settle_stage("critical", &config.critical).await);

        self.advance(LoadingStage::Critical, PROGRESS_CRITICAL_SETTLED, MESSAGE_LAYOUT);
        let skeleton_shown = !platform.placeholder.has_content() && platform.placeholder.inject_skeleton();
        if skeleton_shown {
            debug!("skeleton injected while page content is missing");
        }
        self.advance(LoadingStage::Critical, PROGRESS_CRITICAL_READY, MESSAGE_SECONDARY);

        let secondary = SettleSummary::of(&self.settle_stage("secondary", &config.secondary).await);
        self.advance(LoadingStage::Secondary, PROGRESS_SECONDARY_SETTLED, MESSAGE_FINALIZING);

        let degraded = critical.all_failed();
        let message = if degraded { MESSAGE_DEGRADED } else { MESSAGE_READY };
        self.advance(LoadingStage::Complete, PROGRESS_COMPLETE, message);

        platform.sleeper.sleep(config.completion_grace()).await;
        if skeleton_shown {
            platform.placeholder.remove_skeleton();
        }
        self.finish();

        let report = LoadReport { critical, secondary, degraded, skeleton_shown };
        if degraded {
            warn!(failed = critical.failed, "every critical resource failed; page loaded degraded");
        }
        info!(
            critical_loaded = critical.loaded,
            critical_failed = critical.failed,
            secondary_loaded = secondary.loaded,
            secondary_failed = secondary.failed,
            "progressive load complete"
        );
        self.inner.report.set(Some(report));
        report
    }

    /// Load a resource outside the staged lists, such as a lazily shown image.
    ///
    /// Bounded by the same per-resource timeout; returns whether it is ready.
    /// The stage machine is not affected.
    pub async fn ensure(&self, resource: &Resource) -> bool {
        if self.is_ready(&resource.url) {
            return true;
        }
        self.mark_pending(std::iter::once(resource));
        let platform = &self.inner.platform;
        let outcome = settle::load_with_timeout(
            platform.fetcher.as_ref(),
            platform.sleeper.as_ref(),
            resource,
            self.inner.config.resource_timeout(),
        )
        .await;
        if let Err(err) = &outcome {
            warn!(url = %resource.url, error = %err, "on-demand resource unavailable");
        }
        self.record(&Settled { resource: resource.clone(), outcome });
        self.is_ready(&resource.url)
    }

    /// Current loading state.
    #[must_use]
    pub fn state(&self) -> LoadingState {
        self.inner.state.borrow().clone()
    }

    /// Register for every stage/progress change.
    pub fn subscribe(&self, listener: impl Fn(&LoadingState) + 'static) -> Subscription {
        self.inner.subscribers.subscribe(listener)
    }

    #[must_use]
    pub fn status(&self, url: &str) -> Option<ResourceStatus> {
        self.inner.statuses.borrow().get(url).copied()
    }

    #[must_use]
    pub fn is_ready(&self, url: &str) -> bool {
        self.status(url) == Some(ResourceStatus::Ready)
    }

    /// URLs that failed or timed out, sorted.
    #[must_use]
    pub fn unavailable(&self) -> Vec<String> {
        let mut urls: Vec<String> = self
            .inner
            .statuses
            .borrow()
            .iter()
            .filter(|(_, status)| **status == ResourceStatus::Unavailable)
            .map(|(url, _)| url.clone())
            .collect();
        urls.sort();
        urls
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    async fn settle_stage(&self, stage: &'static str, resources: &[Resource]) -> Vec<Settled> {
        let platform = &self.inner.platform;
        let settled = settle::settle_all(
            platform.fetcher.as_ref(),
            platform.sleeper.as_ref(),
            resources,
            self.inner.config.resource_timeout(),
        )
        .await;
        for entry in &settled {
            if let Err(err) = &entry.outcome {
                warn!(stage, url = %entry.resource.url, error = %err, "resource unavailable; continuing");
            }
            self.record(entry);
        }
        settled
    }

    fn mark_pending<'a>(&self, resources: impl Iterator<Item = &'a Resource>) {
        let mut statuses = self.inner.statuses.borrow_mut();
        for resource in resources {
            statuses.entry(resource.url.clone()).or_insert(ResourceStatus::Pending);
        }
    }

    fn record(&self, settled: &Settled) {
        let status = if settled.outcome.is_ok() { ResourceStatus::Ready } else { ResourceStatus::Unavailable };
        let mut statuses = self.inner.statuses.borrow_mut();
        let entry = statuses.entry(settled.resource.url.clone()).or_insert(status);
        // A URL listed twice stays ready if any attempt succeeded.
        if *entry != ResourceStatus::Ready {
            *entry = status;
        }
    }

    fn advance(&self, stage: LoadingStage, progress: u8, message: &str) {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            if !state.advance(stage, progress, message) {
                return;
            }
            state.clone()
        };
        debug!(stage = ?snapshot.stage, progress = snapshot.progress, "loading state advanced");
        self.inner.subscribers.notify(&snapshot);
    }

    fn finish(&self) {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            if !state.finish() {
                return;
            }
            state.clone()
        };
        self.inner.subscribers.notify(&snapshot);
    }
}

impl fmt::Debug for ProgressiveLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressiveLoader")
            .field("state", &*self.inner.state.borrow())
            .field("started", &self.inner.started.get())
            .field("subscribers", &self.inner.subscribers)
            .finish_non_exhaustive()
    }
}
