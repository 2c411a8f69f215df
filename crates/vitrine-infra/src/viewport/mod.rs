// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A simulated vertical viewport.
//!
//! Elements are placed at a vertical offset with a height; the viewport has a
//! scroll position and a height. Every subscription is re-evaluated when the
//! viewport moves, and an entry is emitted whenever its intersection state
//! flips, plus once right after `observe`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use vitrine_core::viewport::{
    ElementHandle, IntersectionEntry, IntersectionSink, ObserverConfig, SubscriptionHandle,
    ViewportObserver,
};

#[derive(Debug, Clone, Copy)]
struct Placement {
    top: f32,
    height: f32,
}

#[derive(Debug)]
struct Subscription {
    element: ElementHandle,
    config: ObserverConfig,
    sink: IntersectionSink,
    last: Option<bool>,
}

#[derive(Debug, Default)]
struct ViewportState {
    scroll_top: f32,
    height: f32,
    placements: HashMap<ElementHandle, Placement>,
    subscriptions: BTreeMap<SubscriptionHandle, Subscription>,
    next_subscription: u64,
    emitted: usize,
}

impl ViewportState {
    fn measure(&self, element: ElementHandle, config: &ObserverConfig) -> (bool, f32) {
        let Some(placement) = self.placements.get(&element) else {
            return (false, 0.0);
        };
        let root_top = self.scroll_top - config.root_margin_px;
        let root_bottom = self.scroll_top + self.height + config.root_margin_px;
        let bottom = placement.top + placement.height;
        let overlap = (bottom.min(root_bottom) - placement.top.max(root_top)).max(0.0);
        let ratio = if placement.height > 0.0 {
            (overlap / placement.height).min(1.0)
        } else {
            0.0
        };
        let intersecting = if config.threshold > 0.0 {
            ratio >= config.threshold
        } else {
            overlap > 0.0
        };
        (intersecting, ratio)
    }

    fn evaluate(&mut self, handle: SubscriptionHandle) {
        let Some(subscription) = self.subscriptions.get(&handle) else {
            return;
        };
        let (is_intersecting, ratio) = self.measure(subscription.element, &subscription.config);
        if subscription.last == Some(is_intersecting) {
            return;
        }
        let entry = IntersectionEntry {
            subscription: handle,
            is_intersecting,
            ratio,
        };
        let delivered = subscription.sink.send(entry).is_ok();
        if let Some(subscription) = self.subscriptions.get_mut(&handle) {
            subscription.last = Some(is_intersecting);
        }
        if delivered {
            self.emitted += 1;
        } else {
            log::trace!("SimulatedViewport: Sink for {handle} is closed.");
        }
    }

    fn evaluate_all(&mut self) {
        let handles: Vec<_> = self.subscriptions.keys().copied().collect();
        for handle in handles {
            self.evaluate(handle);
        }
    }
}

/// A shared handle to a simulated viewport.
///
/// Clones observe and move the same viewport: the gallery keeps one as its
/// observer while the driver keeps another to scroll.
#[derive(Debug, Clone, Default)]
pub struct SimulatedViewport {
    state: Arc<Mutex<ViewportState>>,
}

impl SimulatedViewport {
    /// A viewport `height` pixels tall, scrolled to the top.
    pub fn new(height: f32) -> Self {
        let viewport = Self::default();
        viewport.lock().height = height;
        viewport
    }

    fn lock(&self) -> MutexGuard<'_, ViewportState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Positions (or moves) `element`.
    pub fn place(&self, element: ElementHandle, top: f32, height: f32) {
        let mut state = self.lock();
        state.placements.insert(element, Placement { top, height });
        let affected: Vec<_> = state
            .subscriptions
            .iter()
            .filter(|(_, s)| s.element == element)
            .map(|(handle, _)| *handle)
            .collect();
        for handle in affected {
            state.evaluate(handle);
        }
    }

    /// Scrolls to `scroll_top` pixels and reports every flip.
    pub fn scroll_to(&self, scroll_top: f32) {
        let mut state = self.lock();
        state.scroll_top = scroll_top.max(0.0);
        state.evaluate_all();
    }

    /// Resizes the viewport and reports every flip.
    pub fn resize(&self, height: f32) {
        let mut state = self.lock();
        state.height = height;
        state.evaluate_all();
    }

    /// Current scroll position.
    pub fn scroll_top(&self) -> f32 {
        self.lock().scroll_top
    }

    /// Viewport height.
    pub fn height(&self) -> f32 {
        self.lock().height
    }

    /// Live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.lock().subscriptions.len()
    }

    /// Entries delivered so far.
    pub fn emitted(&self) -> usize {
        self.lock().emitted
    }
}

impl ViewportObserver for SimulatedViewport {
    fn observe(
        &mut self,
        element: ElementHandle,
        config: ObserverConfig,
        sink: IntersectionSink,
    ) -> SubscriptionHandle {
        let mut state = self.lock();
        state.next_subscription += 1;
        let handle = SubscriptionHandle(state.next_subscription);
        state.subscriptions.insert(
            handle,
            Subscription {
                element,
                config,
                sink,
                last: None,
            },
        );
        state.evaluate(handle);
        handle
    }

    fn unobserve(&mut self, subscription: SubscriptionHandle) {
        self.lock().subscriptions.remove(&subscription);
    }
}
