//! Swipe classification.
//!
//! Pure function of start point, end point and elapsed time. Checks run in
//! a fixed order (duration, distance, velocity, straightness) and the first
//! failure decides the [`Rejection`].

#[cfg(test)]
#[path = "swipe_test.rs"]
mod swipe_test;

use std::fmt;

use super::geometry::Point;
use crate::config::GestureConfig;
use crate::consts::SWIPE_MIN_DURATION_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed, qualifying swipe.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeEvent {
    pub direction: SwipeDirection,
    /// Straight-line travel in pixels.
    pub distance: f64,
    /// Pixels per millisecond.
    pub velocity: f64,
    pub duration_ms: f64,
    /// Identifier of the element the touch started on, when known.
    pub origin_target: Option<String>,
    pub start: Point,
    pub end: Point,
}

/// Why a touch sequence was not a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooLong,
    TooShort,
    TooSlow,
    /// The non-dominant axis moved more than the restraint.
    Drifted,
}

/// Classify a single-finger touch from `start` to `end` over `elapsed_ms`.
pub fn classify(
    start: Point,
    end: Point,
    elapsed_ms: f64,
    origin_target: Option<String>,
    config: &GestureConfig,
) -> Result<SwipeEvent, Rejection> {
    let duration_ms = elapsed_ms.max(SWIPE_MIN_DURATION_MS);
    if duration_ms > config.allowed_time_ms {
        return Err(Rejection::TooLong);
    }

    let (dx, dy) = start.delta_to(end);
    let distance = dx.hypot(dy);
    if distance < config.threshold {
        return Err(Rejection::TooShort);
    }

    let velocity = distance / duration_ms;
    if velocity < config.min_velocity {
        return Err(Rejection::TooSlow);
    }

    let direction = if dx.abs() >= dy.abs() {
        if dy.abs() > config.restraint {
            return Err(Rejection::Drifted);
        }
        if dx < 0.0 { SwipeDirection::Left } else { SwipeDirection::Right }
    } else {
        if dx.abs() > config.restraint {
            return Err(Rejection::Drifted);
        }
        if dy < 0.0 { SwipeDirection::Up } else { SwipeDirection::Down }
    };

    Ok(SwipeEvent { direction, distance, velocity, duration_ms, origin_target, start, end })
}
