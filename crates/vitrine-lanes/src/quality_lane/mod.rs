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

//! Quality evaluation.
//!
//! Profiles are pure functions of [`QualityInputs`]; nothing is cached between
//! evaluations.

use vitrine_core::{
    control::{FrameMode, QualityInputs, QualityProfile, RenderBudget, ResolutionScaleRange},
    lane::{Lane, LaneKind},
};

/// Maps an instance's visibility, interaction and budget to render settings.
///
/// With an unrestricted (or granted) budget:
/// - frames are drawn on demand only when the instance is neither strictly
///   visible nor interacted with, and idle lowering is enabled;
/// - the reduced resolution range applies whenever idle lowering is enabled
///   and the user is not interacting;
/// - rotation requires the auto-rotate preference and strict visibility.
///
/// A [`RenderBudget::Restricted`] instance renders on demand at reduced
/// resolution without rotation, whatever its own flags say.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityScheduler {
    full: ResolutionScaleRange,
    reduced: ResolutionScaleRange,
}

impl Default for QualityScheduler {
    fn default() -> Self {
        Self::new(ResolutionScaleRange::FULL, ResolutionScaleRange::REDUCED)
    }
}

impl QualityScheduler {
    /// Creates a scheduler with the given resolution ranges.
    pub fn new(full: ResolutionScaleRange, reduced: ResolutionScaleRange) -> Self {
        Self { full, reduced }
    }

    /// Computes the profile for one instance.
    pub fn evaluate(&self, inputs: &QualityInputs) -> QualityProfile {
        if inputs.budget == RenderBudget::Restricted {
            log::trace!(
                "QualityScheduler: Restricted budget overrides visible={} interacting={}.",
                inputs.is_strictly_visible,
                inputs.is_interacting
            );
            return QualityProfile {
                frame_mode: FrameMode::OnDemand,
                resolution_scale_range: self.reduced,
                rotation_enabled: false,
            };
        }

        let idle_lowering = inputs.lower_detail_when_idle && !inputs.is_interacting;
        let frame_mode = if idle_lowering && !inputs.is_strictly_visible {
            FrameMode::OnDemand
        } else {
            FrameMode::Continuous
        };

        QualityProfile {
            frame_mode,
            resolution_scale_range: if idle_lowering {
                self.reduced
            } else {
                self.full
            },
            rotation_enabled: inputs.requested_auto_rotate && inputs.is_strictly_visible,
        }
    }
}

impl Lane for QualityScheduler {
    fn strategy_name(&self) -> &'static str {
        "QualityScheduler"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Quality
    }
}
