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

//! The outbound contract with the renderer collaborator.
//!
//! The gallery does not draw anything. Each frame it hands every mounted
//! instance's [`RenderRequest`] to a [`Renderer`], which owns the GPU side.

pub mod lighting;

pub use lighting::{BackgroundGradient, LightingProfile, Rgb8};

use crate::asset::AssetHandle;
use crate::control::QualityProfile;
use crate::scene::SceneGraph;
use crate::InstanceId;

/// Spin applied to the model itself, in radians per second.
pub const MODEL_SPIN_SPEED: f32 = 0.5;

/// Orbit-camera auto-rotate speed passed to the renderer's camera controls.
pub const CAMERA_AUTO_ROTATE_SPEED: f32 = 1.0;

/// Placement of the model inside its stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    /// Uniform scale.
    pub scale: f32,
    /// Offset from the stage origin.
    pub position: [f32; 3],
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            position: [0.0; 3],
        }
    }
}

/// What the instance's container should show.
#[derive(Debug, Clone)]
pub enum Presentation {
    /// Inside the preload zone but not loaded yet: a lightweight placeholder.
    Placeholder,
    /// A decoded scene ready to draw.
    Scene(AssetHandle<SceneGraph>),
    /// Both the model and its substitute failed: a static "unavailable" card.
    Unavailable,
}

impl Presentation {
    /// The scene to draw, if any.
    pub fn scene(&self) -> Option<&AssetHandle<SceneGraph>> {
        match self {
            Presentation::Scene(scene) => Some(scene),
            _ => None,
        }
    }
}

/// Everything the renderer needs to draw one instance for one frame.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// What to show.
    pub presentation: Presentation,
    /// Frame pacing, resolution and rotation for this frame.
    pub quality: QualityProfile,
    /// Lights derived from the instance's type tags.
    pub lighting: LightingProfile,
    /// Stage background derived from the instance's type tags.
    pub background: BackgroundGradient,
    /// Model placement.
    pub transform: ModelTransform,
    /// Container height in pixels.
    pub container_height: f32,
}

/// The renderer collaborator.
pub trait Renderer {
    /// Draws (or schedules drawing of) one instance.
    fn submit(&mut self, instance: InstanceId, request: &RenderRequest);

    /// Drops every GPU resource held for `instance`.
    fn release(&mut self, instance: InstanceId);
}
