//! Time-bounded loads and the settle-all join.
//!
//! Unlike a fail-fast join, [`settle_all`] waits for every load to either
//! finish or hit its deadline and reports each outcome separately.

use std::time::Duration;

use futures::future::{self, Either};

use super::resource::{LoadError, Resource, ResourceFetcher, Sleeper};

/// Outcome of one resource load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settled {
    pub resource: Resource,
    pub outcome: Result<(), LoadError>,
}

/// Loaded/failed counts for one stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettleSummary {
    pub loaded: usize,
    pub failed: usize,
}

impl SettleSummary {
    #[must_use]
    pub fn of(settled: &[Settled]) -> Self {
        let loaded = settled.iter().filter(|s| s.outcome.is_ok()).count();
        Self { loaded, failed: settled.len() - loaded }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.loaded + self.failed
    }

    /// There was at least one resource and none of them loaded.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.failed > 0 && self.loaded == 0
    }
}

/// Race one load against `timeout`.
pub async fn load_with_timeout(
    fetcher: &dyn ResourceFetcher,
    sleeper: &dyn Sleeper,
    resource: &Resource,
    timeout: Duration,
) -> Result<(), LoadError> {
    let load = fetcher.load(resource);
    let deadline = sleeper.sleep(timeout);
    match future::select(load, deadline).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right(((), _)) => Err(LoadError::Timeout {
            url: resource.url.clone(),
            after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

/// Load every resource concurrently and wait until all have settled.
///
/// Results keep the input order; completion order among the loads is unspecified.
pub async fn settle_all(
    fetcher: &dyn ResourceFetcher,
    sleeper: &dyn Sleeper,
    resources: &[Resource],
    timeout: Duration,
) -> Vec<Settled> {
    let loads = resources.iter().map(|resource| async move {
        let outcome = load_with_timeout(fetcher, sleeper, resource, timeout).await;
        Settled { resource: resource.clone(), outcome }
    });
    future::join_all(loads).await
}
