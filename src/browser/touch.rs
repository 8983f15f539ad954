//! Touch event wiring for the gesture recognizer.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, EventTarget, TouchEvent, TouchList};

use super::listen;
use crate::gesture::GestureRecognizer;
use crate::gesture::geometry::{Point, Rect, Region};
use crate::observe::Subscription;

/// Attach passive touch listeners on `target` that feed `recognizer`.
pub fn bind_touch(recognizer: &GestureRecognizer, target: &EventTarget) -> Result<Subscription, JsValue> {
    let on_start = recognizer.clone();
    let start = listen(target, "touchstart", true, move |event: Event| {
        if let Some(touch) = event.dyn_ref::<TouchEvent>() {
            let points = points(&touch.touches());
            on_start.on_touch_start(&points, origin_id(&event), event.time_stamp());
        }
    })?;

    let on_end = recognizer.clone();
    let end = listen(target, "touchend", true, move |event: Event| {
        let Some(touch) = event.dyn_ref::<TouchEvent>() else {
            return;
        };
        match points(&touch.changed_touches()).first() {
            Some(point) => {
                on_end.on_touch_end(*point, event.time_stamp());
            }
            None => on_end.on_touch_cancel(),
        }
    })?;

    let on_cancel = recognizer.clone();
    let cancel = listen(target, "touchcancel", true, move |_| on_cancel.on_touch_cancel())?;

    Ok(Subscription::merge(vec![start, end, cancel]))
}

fn points(list: &TouchList) -> Vec<Point> {
    (0..list.length())
        .filter_map(|index| list.get(index))
        .map(|touch| Point::new(f64::from(touch.client_x()), f64::from(touch.client_y())))
        .collect()
}

fn origin_id(event: &Event) -> Option<String> {
    let Ok(element) = event.target()?.dyn_into::<Element>() else {
        return None;
    };
    let id = element.id();
    if id.is_empty() { None } else { Some(id) }
}

/// A region that follows an element's current viewport bounds.
#[derive(Debug, Clone)]
pub struct ElementRegion {
    element: Element,
}

impl ElementRegion {
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl Region for ElementRegion {
    fn contains(&self, point: Point) -> bool {
        let bounds = self.element.get_bounding_client_rect();
        Rect::new(bounds.left(), bounds.top(), bounds.width(), bounds.height()).contains(point)
    }
}
