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

//! Pointer interaction with delayed release.

use super::agent::ViewerTimer;
use std::time::Duration;
use vitrine_core::schedule::{TaskHandle, TimerQueue};

/// `is_interacting` turns on at pointer-down and off a delay after pointer-up.
#[derive(Debug, Default)]
pub struct InteractionTracker {
    interacting: bool,
    pending_release: Option<TaskHandle>,
}

impl InteractionTracker {
    /// Creates an idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the user is interacting, or released less than the delay ago.
    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    /// Marks the instance as interacting and cancels any pending release.
    pub fn pointer_down(&mut self, timers: &mut TimerQueue<ViewerTimer>) {
        if let Some(handle) = self.pending_release.take() {
            timers.cancel(handle);
        }
        self.interacting = true;
    }

    /// Schedules the release. A pointer-up without a preceding pointer-down is ignored.
    pub fn pointer_up(
        &mut self,
        timers: &mut TimerQueue<ViewerTimer>,
        now: Duration,
        release_delay: Duration,
    ) {
        if !self.interacting {
            return;
        }
        if let Some(handle) = self.pending_release.take() {
            timers.cancel(handle);
        }
        self.pending_release =
            Some(timers.schedule(now, release_delay, ViewerTimer::InteractionRelease));
    }

    /// Handles a fired release timer. Returns `true` if interaction ended.
    pub fn on_release_timer(&mut self, handle: TaskHandle) -> bool {
        if self.pending_release != Some(handle) {
            return false;
        }
        self.pending_release = None;
        self.interacting = false;
        true
    }
}
