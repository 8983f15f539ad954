//! Leptos bridge: exposes the layer's published streams as signals.
//!
//! Widgets read `AdaptSignals` from context and write back only through the
//! resolver setters on [`AdaptSignals::layer`]. The backing subscriptions
//! live in the current reactive owner and are dropped with it.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use leptos::prelude::*;
use leptos::reactive::owner::{LocalStorage, StoredValue};

use crate::gesture::swipe::SwipeEvent;
use crate::layer::AdaptLayer;
use crate::loader::state::LoadingState;
use crate::observe::Subscription;
use crate::prefs::state::PreferenceSnapshot;

/// Reactive view of one [`AdaptLayer`].
#[derive(Clone, Copy)]
pub struct AdaptSignals {
    pub preferences: RwSignal<PreferenceSnapshot>,
    pub loading: RwSignal<LoadingState>,
    /// Most recent recognized swipe.
    pub last_swipe: RwSignal<Option<SwipeEvent>>,
    layer: StoredValue<AdaptLayer, LocalStorage>,
    subscriptions: StoredValue<Subscription, LocalStorage>,
}

impl AdaptSignals {
    /// The layer behind these signals, while the owning scope is alive.
    #[must_use]
    pub fn layer(&self) -> Option<AdaptLayer> {
        self.layer.try_with_value(Clone::clone)
    }

    /// Whether the backing subscriptions are still attached.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.subscriptions.try_with_value(Subscription::is_active).unwrap_or(false)
    }
}

/// Mirror `layer` into signals and provide them as context.
pub fn provide_adapt_context(layer: &AdaptLayer) -> AdaptSignals {
    let preferences = RwSignal::new(layer.preferences().snapshot());
    let loading = RwSignal::new(layer.loader().state());
    let last_swipe = RwSignal::new(None::<SwipeEvent>);

    let subscriptions = Subscription::merge(vec![
        layer.preferences().subscribe(move |snapshot| preferences.set(*snapshot)),
        layer.loader().subscribe(move |state| loading.set(state.clone())),
        layer.gestures().subscribe(move |event| last_swipe.set(Some(event.clone()))),
    ]);

    let signals = AdaptSignals {
        preferences,
        loading,
        last_swipe,
        layer: StoredValue::new_local(layer.clone()),
        subscriptions: StoredValue::new_local(subscriptions),
    };
    provide_context(signals);
    signals
}

/// Signals provided by an ancestor, if any.
#[must_use]
pub fn use_adapt_signals() -> Option<AdaptSignals> {
    use_context::<AdaptSignals>()
}
