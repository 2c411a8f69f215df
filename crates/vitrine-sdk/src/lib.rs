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

//! The public-facing API of Vitrine.
//!
//! A [`Gallery`] owns every mounted instance, the shared asset loader and the
//! scroll budget, and advances them all from one cooperative loop: feed it
//! scroll and pointer events, call [`Gallery::tick`] with the current time, then
//! [`Gallery::frame`] with a renderer.

pub mod catalog;
pub mod gallery;
pub mod layout;

pub use catalog::{Catalog, CatalogEntry, SpeciesRecord, Variant, VariantTable};
pub use gallery::{FrameStats, Gallery, TickStats};
pub use layout::ListLayout;

pub mod prelude {
    //! The types most gallery drivers need.
    pub use crate::{Catalog, CatalogEntry, Gallery, ListLayout, SpeciesRecord, VariantTable};
    pub use vitrine_agents::{ViewerProps, ViewerSettings};
    pub use vitrine_core::asset::{AssetPath, AssetSource};
    pub use vitrine_core::control::{FrameMode, RenderBudget};
    pub use vitrine_core::renderer::Renderer;
    pub use vitrine_core::viewport::{ElementHandle, ViewportObserver};
    pub use vitrine_core::renderer::LightingProfile;
    pub use vitrine_core::{GalleryConfig, InstanceId, Stopwatch};
    pub use vitrine_infra::{FileSystemSource, HeadlessRenderer, SimulatedViewport, SyntheticSceneSource};
}
