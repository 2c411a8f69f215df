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

//! Dual-zone visibility with unload hysteresis.

use super::agent::ViewerTimer;
use std::time::Duration;
use vitrine_core::schedule::{TaskHandle, TimerQueue};
use vitrine_core::viewport::{
    ElementHandle, IntersectionEntry, IntersectionSink, ObserverConfig, SubscriptionHandle,
    ViewportObserver,
};

/// Which of the two observations an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// The viewport expanded by the preload margin.
    Preload,
    /// The bare viewport with the strict threshold.
    Strict,
}

/// The effect of a preload-zone entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadTransition {
    /// The instance just entered the zone: start loading.
    Entered,
    /// The instance left the zone: an unload is now pending.
    ExitScheduled,
    /// Nothing observable changed (including re-entry that cancelled a pending unload).
    Unchanged,
}

/// Tracks both zones for one instance.
///
/// `in_preload_zone` only turns false when the unload timer fires while the
/// element is still outside the zone. Re-entering cancels the pending unload.
#[derive(Debug, Default)]
pub struct VisibilityTracker {
    preload_subscription: Option<SubscriptionHandle>,
    strict_subscription: Option<SubscriptionHandle>,
    in_preload_zone: bool,
    preload_intersecting: bool,
    strictly_visible: bool,
    pending_unload: Option<TaskHandle>,
}

impl VisibilityTracker {
    /// Creates a tracker that observes nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts both observations of `element`.
    pub fn observe<O: ViewportObserver + ?Sized>(
        &mut self,
        observer: &mut O,
        element: ElementHandle,
        sink: &IntersectionSink,
        preload_margin_px: f32,
        strict_threshold: f32,
    ) {
        self.preload_subscription = Some(observer.observe(
            element,
            ObserverConfig::preload(preload_margin_px),
            sink.clone(),
        ));
        self.strict_subscription = Some(observer.observe(
            element,
            ObserverConfig::strict(strict_threshold),
            sink.clone(),
        ));
    }

    /// Stops both observations.
    pub fn unobserve<O: ViewportObserver + ?Sized>(&mut self, observer: &mut O) {
        for subscription in [
            self.preload_subscription.take(),
            self.strict_subscription.take(),
        ]
        .into_iter()
        .flatten()
        {
            observer.unobserve(subscription);
        }
    }

    /// The zone `subscription` reports on, if it is one of ours.
    pub fn zone_of(&self, subscription: SubscriptionHandle) -> Option<Zone> {
        if self.preload_subscription == Some(subscription) {
            Some(Zone::Preload)
        } else if self.strict_subscription == Some(subscription) {
            Some(Zone::Strict)
        } else {
            None
        }
    }

    /// Both subscriptions, preload first.
    pub fn subscriptions(&self) -> impl Iterator<Item = SubscriptionHandle> + '_ {
        self.preload_subscription
            .iter()
            .chain(self.strict_subscription.iter())
            .copied()
    }

    /// Whether the instance counts as inside the preload zone.
    pub fn in_preload_zone(&self) -> bool {
        self.in_preload_zone
    }

    /// Whether the strict observation currently reports the element as visible.
    pub fn is_strictly_visible(&self) -> bool {
        self.strictly_visible
    }

    /// Whether an unload is waiting for its delay.
    pub fn unload_pending(&self) -> bool {
        self.pending_unload.is_some()
    }

    /// Applies a preload-zone entry.
    pub fn on_preload_entry(
        &mut self,
        entry: &IntersectionEntry,
        timers: &mut TimerQueue<ViewerTimer>,
        now: Duration,
        unload_delay: Duration,
    ) -> PreloadTransition {
        self.preload_intersecting = entry.is_intersecting;

        if entry.is_intersecting {
            if let Some(handle) = self.pending_unload.take() {
                timers.cancel(handle);
            }
            if self.in_preload_zone {
                return PreloadTransition::Unchanged;
            }
            self.in_preload_zone = true;
            return PreloadTransition::Entered;
        }

        if !self.in_preload_zone || self.pending_unload.is_some() {
            return PreloadTransition::Unchanged;
        }
        self.pending_unload = Some(timers.schedule(now, unload_delay, ViewerTimer::Unload));
        PreloadTransition::ExitScheduled
    }

    /// Applies a strict-zone entry. Returns `true` if the flag changed.
    ///
    /// The observer applies the threshold, so `is_intersecting` is taken as is.
    pub fn on_strict_entry(&mut self, entry: &IntersectionEntry) -> bool {
        let changed = self.strictly_visible != entry.is_intersecting;
        self.strictly_visible = entry.is_intersecting;
        changed
    }

    /// Handles a fired unload timer. Returns `true` if the instance left the zone.
    pub fn on_unload_timer(&mut self, handle: TaskHandle) -> bool {
        if self.pending_unload != Some(handle) {
            return false;
        }
        self.pending_unload = None;
        if self.preload_intersecting || !self.in_preload_zone {
            return false;
        }
        self.in_preload_zone = false;
        true
    }
}
