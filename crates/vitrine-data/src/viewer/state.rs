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

use serde::{Deserialize, Serialize};
use vitrine_core::InstanceId;

/// Where an instance is in its load lifecycle.
///
/// A fallback attempt goes through `Loading` a second time; whether the current
/// load is the fallback is tracked by [`ViewerInstanceState::using_fallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A load is in flight.
    Loading,
    /// A scene is available.
    Loaded,
    /// The last load failed.
    Error,
}

/// Everything one mounted instance knows about itself.
///
/// Created on mount, dropped on unmount, never shared with another instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerInstanceState {
    /// Owning instance.
    pub id: InstanceId,
    /// Load lifecycle.
    pub load_state: LoadState,
    /// Whether the container is within the preload margin (with unload hysteresis).
    pub in_preload_zone: bool,
    /// Whether enough of the container is on screen for full quality.
    pub is_strictly_visible: bool,
    /// Whether the pointer is down, or was released less than the release delay ago.
    pub is_interacting: bool,
    /// Whether the current load targets the substitute asset.
    pub using_fallback: bool,
    /// Whether the substitute asset failed too. Terminal.
    pub fallback_failed: bool,
}

impl ViewerInstanceState {
    /// The state of a freshly mounted instance.
    pub fn new(id: InstanceId) -> Self {
        Self {
            id,
            load_state: LoadState::Idle,
            in_preload_zone: false,
            is_strictly_visible: false,
            is_interacting: false,
            using_fallback: false,
            fallback_failed: false,
        }
    }

    /// Returns `true` once both the model and its substitute failed.
    pub fn is_unavailable(&self) -> bool {
        self.fallback_failed
    }
}
