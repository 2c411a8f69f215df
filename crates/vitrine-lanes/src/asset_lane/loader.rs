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

use std::error::Error;
use vitrine_core::{asset::Asset, lane::Lane};

/// Decodes raw bytes into an asset of type `A`.
///
/// Implementations run on decode workers, so they must be `Send + Sync` and
/// must not touch shared state: the agent owns caching and bookkeeping.
pub trait AssetLoaderLane<A: Asset>: Lane {
    /// Parses `bytes` into an `A`.
    fn load(&self, bytes: &[u8]) -> Result<A, Box<dyn Error + Send + Sync>>;
}
