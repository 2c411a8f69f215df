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

//! The viewport observation capability.
//!
//! The gallery never measures layout itself. It asks a [`ViewportObserver`] to
//! watch an element with a given margin and threshold, and receives
//! [`IntersectionEntry`] values on a channel whenever the observed intersection
//! state changes. Any platform primitive that can report "is this element
//! intersecting the (expanded) viewport, and by how much" can implement it.

use std::fmt;

/// Opaque identity of an observable container element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub u64);

/// Identity of one `observe` registration, returned so it can be revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(pub u64);

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// How an element should be observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverConfig {
    /// Vertical margin, in pixels, by which the viewport is grown before testing.
    pub root_margin_px: f32,
    /// Fraction of the element (0.0 to 1.0) that must be inside the (grown)
    /// viewport for the element to count as intersecting.
    pub threshold: f32,
}

impl ObserverConfig {
    /// A generous zone that reports any overlap with the grown viewport.
    pub fn preload(margin_px: f32) -> Self {
        Self {
            root_margin_px: margin_px,
            threshold: 0.0,
        }
    }

    /// A tight zone that requires `threshold` of the element to be on screen.
    pub fn strict(threshold: f32) -> Self {
        Self {
            root_margin_px: 0.0,
            threshold,
        }
    }
}

/// A single intersection change delivered by an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// The registration this entry belongs to.
    pub subscription: SubscriptionHandle,
    /// Whether the element satisfies the registration's threshold.
    pub is_intersecting: bool,
    /// Visible fraction of the element inside the grown viewport.
    pub ratio: f32,
}

/// The channel end an observer delivers entries into.
pub type IntersectionSink = flume::Sender<IntersectionEntry>;

/// A platform viewport-visibility primitive.
///
/// Implementations must deliver one entry right after `observe` describing the
/// initial state, then one entry each time `is_intersecting` flips. Entries for
/// a revoked subscription must not be delivered after `unobserve` returns.
pub trait ViewportObserver {
    /// Starts observing `element`, delivering entries into `sink`.
    fn observe(
        &mut self,
        element: ElementHandle,
        config: ObserverConfig,
        sink: IntersectionSink,
    ) -> SubscriptionHandle;

    /// Stops a registration. Unknown handles are ignored.
    fn unobserve(&mut self, subscription: SubscriptionHandle);
}
