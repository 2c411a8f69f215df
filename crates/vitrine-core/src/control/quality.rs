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

//! Render-quality profile types.

use super::RenderBudget;
use serde::{Deserialize, Serialize};

/// How the renderer paces frames for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameMode {
    /// Redraw every frame.
    Continuous,
    /// Redraw only when something invalidates the view.
    OnDemand,
}

/// The device-pixel-ratio range the renderer may pick from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionScaleRange {
    /// Lowest allowed scale.
    pub low: f32,
    /// Highest allowed scale.
    pub high: f32,
}

impl ResolutionScaleRange {
    /// Creates a range from its bounds.
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// `[1, 2]`, used at full detail.
    pub const FULL: Self = Self::new(1.0, 2.0);

    /// `[0.5, 1.5]`, used whenever detail is lowered.
    pub const REDUCED: Self = Self::new(0.5, 1.5);
}

/// The per-evaluation render settings of one instance.
///
/// Profiles are derived, never stored: they are recomputed from the current
/// [`QualityInputs`] every time the renderer asks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityProfile {
    /// Frame pacing.
    pub frame_mode: FrameMode,
    /// Allowed resolution scale.
    pub resolution_scale_range: ResolutionScaleRange,
    /// Whether automatic spin is active.
    pub rotation_enabled: bool,
}

/// Everything the quality scheduler looks at for one instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityInputs {
    /// The strict-visibility flag.
    pub is_strictly_visible: bool,
    /// Whether the user is interacting (or recently released).
    pub is_interacting: bool,
    /// The instance's "lower detail when idle" preference.
    pub lower_detail_when_idle: bool,
    /// The instance's "auto rotate" preference.
    pub requested_auto_rotate: bool,
    /// The list-level constraint issued by the scroll budget controller.
    pub budget: RenderBudget,
}
