//! Gesture recognizer: touch sequences in, swipe events out.
//!
//! DESIGN
//! ======
//! A two-state machine per touch sequence:
//!
//! ```text
//! Idle --single-finger start--> Tracking --end--> classify --> Idle
//!                               Tracking --multi-touch start / cancel--> Idle
//! ```
//!
//! Only qualifying swipes are published. Taps, drags and multi-touch are
//! ordinary input and produce nothing.

pub mod geometry;
pub mod swipe;


use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::GestureConfig;
use crate::observe::{Subscribers, Subscription};

use geometry::{Point, Region};
use swipe::{SwipeDirection, SwipeEvent};

/// Where the current touch sequence is.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Tracking {
        start: Point,
        target: Option<String>,
        started_ms: f64,
    },
}

/// Handle to a recognizer. Clones share state and subscribers.
#[derive(Clone)]
pub struct GestureRecognizer {
    inner: Rc<RecognizerInner>,
}

struct RecognizerInner {
    config: GestureConfig,
    phase: RefCell<Phase>,
    subscribers: Subscribers<SwipeEvent>,
}

impl GestureRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            inner: Rc::new(RecognizerInner {
                config,
                phase: RefCell::new(Phase::Idle),
                subscribers: Subscribers::new(),
            }),
        }
    }

    /// Feed a touch-start. `touches` is every point currently on the surface.
    pub fn on_touch_start(&self, touches: &[Point], target: Option<String>, time_ms: f64) {
        let mut phase = self.inner.phase.borrow_mut();
        match touches {
            [start] => {
                trace!(x = start.x, y = start.y, "touch tracking started");
                *phase = Phase::Tracking { start: *start, target, started_ms: time_ms };
            }
            [] => {}
            _ => {
                if matches!(*phase, Phase::Tracking { .. }) {
                    trace!(touches = touches.len(), "multi-touch; sequence aborted");
                }
                *phase = Phase::Idle;
            }
        }
    }

    /// Feed a touch-end. Returns the published event, if the sequence was a swipe.
    pub fn on_touch_end(&self, end: Point, time_ms: f64) -> Option<SwipeEvent> {
        let Phase::Tracking { start, target, started_ms } = self.inner.phase.replace(Phase::Idle) else {
            return None;
        };

        match swipe::classify(start, end, time_ms - started_ms, target, &self.inner.config) {
            Ok(event) => {
                debug!(
                    direction = %event.direction,
                    distance = event.distance,
                    velocity = event.velocity,
                    "swipe recognized"
                );
                self.inner.subscribers.notify(&event);
                Some(event)
            }
            Err(reason) => {
                trace!(?reason, "touch sequence was not a swipe");
                None
            }
        }
    }

    /// The platform interrupted the sequence.
    pub fn on_touch_cancel(&self) {
        *self.inner.phase.borrow_mut() = Phase::Idle;
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.phase.borrow().clone()
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        matches!(*self.inner.phase.borrow(), Phase::Tracking { .. })
    }

    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.inner.config
    }

    /// Register for every recognized swipe.
    pub fn subscribe(&self, listener: impl Fn(&SwipeEvent) + 'static) -> Subscription {
        self.inner.subscribers.subscribe(listener)
    }

    /// Register for swipes that start inside `region`.
    ///
    /// The region is asked at delivery time, so element-backed regions see
    /// the element's current bounds.
    pub fn subscribe_within(
        &self,
        region: impl Region + 'static,
        listener: impl Fn(&SwipeEvent) + 'static,
    ) -> Subscription {
        self.subscribe(move |event| {
            if region.contains(event.start) {
                listener(event);
            }
        })
    }

    /// Register for swipes in one direction only.
    pub fn subscribe_direction(
        &self,
        direction: SwipeDirection,
        listener: impl Fn(&SwipeEvent) + 'static,
    ) -> Subscription {
        self.subscribe(move |event| {
            if event.direction == direction {
                listener(event);
            }
        })
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl fmt::Debug for GestureRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("config", &self.inner.config)
            .field("phase", &*self.inner.phase.borrow())
            .field("subscribers", &self.inner.subscribers)
            .finish()
    }
}
