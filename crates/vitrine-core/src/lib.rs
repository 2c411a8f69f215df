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

//! # Vitrine Core
//!
//! Foundational crate containing traits, core types, and interface contracts
//! shared by every layer of the gallery: asset identities, decoded scene data,
//! the viewport observation capability, virtual-time timers, and the quality
//! and budget vocabulary exchanged between agents and the renderer.

#![warn(missing_docs)]

pub mod asset;
pub mod config;
pub mod control;
pub mod event;
pub mod instance;
pub mod lane;
pub mod renderer;
pub mod scene;
pub mod schedule;
pub mod telemetry;
pub mod utils;
pub mod viewport;

pub use config::GalleryConfig;
pub use instance::{InstanceId, Liveness};
pub use utils::timer::Stopwatch;
