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

//! A renderer that draws nothing and remembers everything.

use std::collections::HashMap;
use vitrine_core::control::FrameMode;
use vitrine_core::renderer::{Presentation, RenderRequest, Renderer};
use vitrine_core::InstanceId;

/// What was last submitted for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedFrame {
    /// Frame pacing of the last request.
    pub frame_mode: FrameMode,
    /// Whether a scene (rather than a placeholder or a card) was drawn.
    pub has_scene: bool,
    /// Whether the unavailable card was drawn.
    pub unavailable: bool,
}

/// Records requests per instance. An instance holds a renderer from its first
/// submit until it is released.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    active: HashMap<InstanceId, SubmittedFrame>,
    submits: u64,
    releases: u64,
}

impl HeadlessRenderer {
    /// Creates an empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last request of `instance`, if it holds a renderer.
    pub fn last_frame(&self, instance: InstanceId) -> Option<SubmittedFrame> {
        self.active.get(&instance).copied()
    }

    /// Instances currently holding a renderer.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Active instances whose last request was `Continuous`.
    pub fn continuous_count(&self) -> usize {
        self.active
            .values()
            .filter(|frame| frame.frame_mode == FrameMode::Continuous)
            .count()
    }

    /// Active instances showing a decoded scene.
    pub fn scene_count(&self) -> usize {
        self.active.values().filter(|frame| frame.has_scene).count()
    }

    /// Total submits received.
    pub fn submits(&self) -> u64 {
        self.submits
    }

    /// Total releases received.
    pub fn releases(&self) -> u64 {
        self.releases
    }
}

impl Renderer for HeadlessRenderer {
    fn submit(&mut self, instance: InstanceId, request: &RenderRequest) {
        self.submits += 1;
        let frame = SubmittedFrame {
            frame_mode: request.quality.frame_mode,
            has_scene: request.presentation.scene().is_some(),
            unavailable: matches!(request.presentation, Presentation::Unavailable),
        };
        if self.active.insert(instance, frame).is_none() {
            log::trace!("HeadlessRenderer: {instance} acquired a renderer.");
        }
    }

    fn release(&mut self, instance: InstanceId) {
        if self.active.remove(&instance).is_some() {
            self.releases += 1;
            log::trace!("HeadlessRenderer: {instance} released its renderer.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::control::{QualityProfile, ResolutionScaleRange};
    use vitrine_core::renderer::{BackgroundGradient, LightingProfile, ModelTransform};

    fn request(frame_mode: FrameMode) -> RenderRequest {
        let tags = ["water"];
        RenderRequest {
            presentation: Presentation::Placeholder,
            quality: QualityProfile {
                frame_mode,
                resolution_scale_range: ResolutionScaleRange::FULL,
                rotation_enabled: false,
            },
            lighting: LightingProfile::for_types(&tags, false),
            background: BackgroundGradient::for_types(&tags),
            transform: ModelTransform::default(),
            container_height: 300.0,
        }
    }

    #[test]
    fn counts_follow_submits_and_releases() {
        let mut renderer = HeadlessRenderer::new();
        renderer.submit(InstanceId(1), &request(FrameMode::Continuous));
        renderer.submit(InstanceId(2), &request(FrameMode::OnDemand));
        renderer.submit(InstanceId(1), &request(FrameMode::OnDemand));
        assert_eq!(renderer.continuous_count(), 0);
        assert_eq!(renderer.active_count(), 2);

        renderer.release(InstanceId(2));
        renderer.release(InstanceId(2));
        assert_eq!(renderer.releases(), 1);
        assert_eq!(renderer.submits(), 3);
        assert_eq!(renderer.last_frame(InstanceId(2)), None);
        assert!(!renderer.last_frame(InstanceId(1)).unwrap().has_scene);
    }
}
