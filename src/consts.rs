//! Shared defaults and document marker names for the adaptation layer.

// ── Gesture ─────────────────────────────────────────────────────

/// Minimum travel, in CSS pixels, for a touch to count as a swipe.
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;

/// Maximum drift, in CSS pixels, allowed on the non-dominant axis.
pub const SWIPE_RESTRAINT_PX: f64 = 100.0;

/// Longest touch, in milliseconds, that can still be a swipe.
pub const SWIPE_ALLOWED_TIME_MS: f64 = 300.0;

/// Minimum average speed in pixels per millisecond.
pub const SWIPE_MIN_VELOCITY: f64 = 0.5;

/// Floor applied to the measured duration so velocity stays finite.
pub const SWIPE_MIN_DURATION_MS: f64 = 1.0;

// ── Loader ──────────────────────────────────────────────────────

/// Per-resource load budget.
pub const RESOURCE_TIMEOUT_MS: u64 = 5_000;

/// Delay between reaching `Complete` and clearing `is_loading`.
pub const COMPLETION_GRACE_MS: u64 = 500;

pub const PROGRESS_STARTED: u8 = 10;
pub const PROGRESS_CRITICAL_SETTLED: u8 = 40;
pub const PROGRESS_CRITICAL_READY: u8 = 60;
pub const PROGRESS_SECONDARY_SETTLED: u8 = 80;
pub const PROGRESS_COMPLETE: u8 = 100;

pub const MESSAGE_PREPARING: &str = "Preparing page";
pub const MESSAGE_CRITICAL: &str = "Loading essential resources";
pub const MESSAGE_LAYOUT: &str = "Preparing layout";
pub const MESSAGE_SECONDARY: &str = "Loading additional content";
pub const MESSAGE_FINALIZING: &str = "Finalizing";
pub const MESSAGE_READY: &str = "Ready";
pub const MESSAGE_DEGRADED: &str = "Loaded with errors";

// ── Preferences ─────────────────────────────────────────────────

/// Storage namespace used when the page does not configure one.
pub const DEFAULT_NAMESPACE: &str = "site";

pub const THEME_KEY_SUFFIX: &str = "theme-preference";
pub const ACCESSIBILITY_KEY_SUFFIX: &str = "accessibility-preferences";

/// `<meta name="theme-color">` content for each resolved theme.
pub const THEME_COLOR_LIGHT: &str = "#ffffff";
pub const THEME_COLOR_DARK: &str = "#121212";

// ── Document markers ────────────────────────────────────────────

pub const CLASS_DARK_THEME: &str = "dark-theme";
pub const CLASS_LIGHT_THEME: &str = "light-theme";
pub const CLASS_HIGH_CONTRAST: &str = "high-contrast";
pub const CLASS_REDUCED_MOTION: &str = "reduced-motion";
pub const CLASS_ANIMATIONS_ENABLED: &str = "animations-enabled";
pub const CLASS_KEYBOARD_NAV: &str = "enhanced-keyboard-nav";
pub const CLASS_FOCUS_INDICATORS: &str = "enhanced-focus-indicators";
