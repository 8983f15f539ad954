//! Resource descriptors and the platform seams the loader runs on.
//!
//! The orchestration in [`super::ProgressiveLoader`] never looks at a
//! resource's kind; it calls [`ResourceFetcher::load`], which dispatches to
//! the kind-specific path. Every path honours the same contract: resolve
//! `Ok(())` when the resource is usable, `Err(LoadError)` otherwise.

#[cfg(test)]
#[path = "resource_test.rs"]
mod resource_test;

use std::time::Duration;

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

/// How a resource is brought in by the browser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Loaded through a `<link rel="stylesheet">`.
    Stylesheet,
    /// Warmed through a `<link rel="preload" as="script">` hint.
    Script,
    /// Probed through an image decode.
    Image,
    /// Anything else; fetched generically.
    Other,
}

impl ResourceKind {
    /// Infer the kind from a URL's extension, ignoring query and fragment.
    #[must_use]
    pub fn infer(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file = path.rsplit('/').next().unwrap_or(path);
        let Some((_, ext)) = file.rsplit_once('.') else {
            return Self::Other;
        };
        match ext.to_ascii_lowercase().as_str() {
            "css" => Self::Stylesheet,
            "js" | "mjs" => Self::Script,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "avif" | "svg" => Self::Image,
            _ => Self::Other,
        }
    }
}

/// A page resource the loader brings in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ResourceSpec")]
pub struct Resource {
    pub url: String,
    pub kind: ResourceKind,
}

impl Resource {
    /// A resource whose kind is inferred from `url`.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = ResourceKind::infer(&url);
        Self { url, kind }
    }

    pub fn with_kind(url: impl Into<String>, kind: ResourceKind) -> Self {
        Self { url: url.into(), kind }
    }
}

/// Accepted JSON shapes: a bare URL string or `{url, kind?}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ResourceSpec {
    Url(String),
    Full { url: String, kind: Option<ResourceKind> },
}

impl From<ResourceSpec> for Resource {
    fn from(shape: ResourceSpec) -> Self {
        match shape {
            ResourceSpec::Url(url) | ResourceSpec::Full { url, kind: None } => Self::new(url),
            ResourceSpec::Full { url, kind: Some(kind) } => Self::with_kind(url, kind),
        }
    }
}

/// Why a single resource did not become available.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("timed out loading {url} after {after_ms}ms")]
    Timeout { url: String, after_ms: u64 },
    #[error("failed to load {url}: {reason}")]
    Failed { url: String, reason: String },
    #[error("no platform support for loading {url}")]
    Unsupported { url: String },
}

impl LoadError {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url, .. } | Self::Failed { url, .. } | Self::Unsupported { url } => url,
        }
    }
}

pub type LoadFuture = LocalBoxFuture<'static, Result<(), LoadError>>;

/// Platform capability for bringing a resource in.
pub trait ResourceFetcher {
    fn load_stylesheet(&self, url: &str) -> LoadFuture;

    fn preload_script(&self, url: &str) -> LoadFuture;

    fn decode_image(&self, url: &str) -> LoadFuture;

    fn fetch(&self, url: &str) -> LoadFuture;

    /// Dispatch on the resource kind.
    fn load(&self, resource: &Resource) -> LoadFuture {
        match resource.kind {
            ResourceKind::Stylesheet => self.load_stylesheet(&resource.url),
            ResourceKind::Script => self.preload_script(&resource.url),
            ResourceKind::Image => self.decode_image(&resource.url),
            ResourceKind::Other => self.fetch(&resource.url),
        }
    }
}

/// Timer capability; the only source of time the loader uses.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// The page surface that can show a loading skeleton.
pub trait PlaceholderHost {
    /// Whether the page already shows real content.
    fn has_content(&self) -> bool;

    /// Insert the skeleton. Returns `true` if one is now present.
    fn inject_skeleton(&self) -> bool;

    fn remove_skeleton(&self);
}

/// Host used outside the browser: always reports content, never injects.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPlaceholder;

impl PlaceholderHost for NoPlaceholder {
    fn has_content(&self) -> bool {
        true
    }

    fn inject_skeleton(&self) -> bool {
        false
    }

    fn remove_skeleton(&self) {}
}
