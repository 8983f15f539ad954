//! Client adaptation layer for the marketing site.
//!
//! Lets every page adapt at runtime to user accessibility preferences,
//! touch input and resource readiness, independently of page content. The
//! crate compiles to WebAssembly for the browser; all decision logic is
//! platform-agnostic and runs natively under test against in-memory
//! platform implementations.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`prefs`] | Theme and accessibility preferences, persistence, document markers |
//! | [`gesture`] | Touch sequence state machine and swipe classification |
//! | [`loader`] | Staged, time-bounded resource loading and readiness queries |
//! | [`layer`] | One page's set of subsystems and the platform bundle they run on |
//! | [`context`] | Leptos signals mirroring the published streams |
//! | [`observe`] | Listener lists with RAII subscriptions |
//! | [`config`] | Page configuration and validation |
//! | [`consts`] | Shared thresholds, timings, messages and marker names |
//! | `browser` | `web-sys` platform and `boot`/`shutdown` (feature `hydrate`) |

pub mod config;
pub mod consts;
pub mod context;
pub mod gesture;
pub mod layer;
pub mod loader;
pub mod observe;
pub mod prefs;

#[cfg(feature = "hydrate")]
pub mod browser;

#[cfg(test)]
mod test_support;
