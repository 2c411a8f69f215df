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

//! # Vitrine Infra
//!
//! Concrete implementations of the contracts in `vitrine-core`:
//! - [`asset`]: byte sources (a directory on disk, or generated GLB models).
//! - [`viewport`]: a simulated vertical viewport that reports intersections.
//! - [`renderer`]: a headless renderer that records what it was asked to draw.

#![warn(missing_docs)]

pub mod asset;
pub mod renderer;
pub mod viewport;

pub use asset::{FileSystemSource, SyntheticSceneSource};
pub use renderer::{HeadlessRenderer, SubmittedFrame};
pub use viewport::SimulatedViewport;
