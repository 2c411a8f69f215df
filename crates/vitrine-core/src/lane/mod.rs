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

//! # Lane Abstraction
//!
//! A **lane** is a swappable processing strategy an agent delegates hot-path
//! work to: decoding fetched bytes, or turning an instance's flags into a
//! quality profile. Lanes hold no per-instance state.
//!
//! Domain traits extend [`Lane`] with their execution method, e.g.
//! `AssetLoaderLane<A>: Lane` in `vitrine-lanes`.

use std::fmt;

/// Broad classification of a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Turns fetched bytes into a decoded asset.
    Asset,
    /// Derives render settings from instance state.
    Quality,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneKind::Asset => write!(f, "Asset"),
            LaneKind::Quality => write!(f, "Quality"),
        }
    }
}

/// The interface shared by every lane.
pub trait Lane: Send + Sync {
    /// A short, stable name for logs, e.g. `"GltfScene"`.
    fn strategy_name(&self) -> &'static str;

    /// The lane's classification.
    fn lane_kind(&self) -> LaneKind;
}
