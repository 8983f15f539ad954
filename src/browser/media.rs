//! System appearance signals from `matchMedia`.

use std::rc::Rc;

use tracing::{debug, warn};
use web_sys::MediaQueryList;

use super::{js_reason, listen};
use crate::observe::Subscription;
use crate::prefs::state::SystemPreferences;
use crate::prefs::system::SystemSignals;

const PREFERS_DARK: &str = "(prefers-color-scheme: dark)";
const PREFERS_REDUCED_MOTION: &str = "(prefers-reduced-motion: reduce)";
const PREFERS_HIGH_CONTRAST: &str = "(prefers-contrast: more)";

/// Live media query lists for the three tracked features.
#[derive(Debug, Default)]
pub struct MediaSignals {
    dark: Option<MediaQueryList>,
    reduced_motion: Option<MediaQueryList>,
    high_contrast: Option<MediaQueryList>,
}

impl MediaSignals {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dark: query(PREFERS_DARK),
            reduced_motion: query(PREFERS_REDUCED_MOTION),
            high_contrast: query(PREFERS_HIGH_CONTRAST),
        }
    }
}

fn query(feature: &str) -> Option<MediaQueryList> {
    let window = web_sys::window()?;
    match window.match_media(feature) {
        Ok(list) => list,
        Err(err) => {
            warn!(feature, reason = %js_reason(&err), "media query unsupported");
            None
        }
    }
}

fn matches(list: Option<&MediaQueryList>) -> bool {
    list.is_some_and(MediaQueryList::matches)
}

impl SystemSignals for MediaSignals {
    fn current(&self) -> SystemPreferences {
        SystemPreferences {
            prefers_dark: matches(self.dark.as_ref()),
            prefers_reduced_motion: matches(self.reduced_motion.as_ref()),
            prefers_high_contrast: matches(self.high_contrast.as_ref()),
        }
    }

    fn watch(&self, on_change: Rc<dyn Fn()>) -> Subscription {
        let mut subscriptions = Vec::new();
        for list in [&self.dark, &self.reduced_motion, &self.high_contrast].into_iter().flatten() {
            let on_change = Rc::clone(&on_change);
            match listen(list, "change", false, move |_| on_change()) {
                Ok(subscription) => subscriptions.push(subscription),
                Err(err) => warn!(media = %list.media(), reason = %js_reason(&err), "cannot watch media query"),
            }
        }
        debug!(watched = subscriptions.len(), "system appearance signals attached");
        Subscription::merge(subscriptions)
    }
}
