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

use super::{AssetPath, LoadError};

/// A provider of raw asset bytes, addressed by normalized path.
///
/// This is the "fetch" half of a load. Implementations live in `vitrine-infra`
/// (filesystem, synthetic) and may block: the loader always calls them from an
/// executor job, never from the evaluation path.
pub trait AssetSource: Send + Sync {
    /// Fetches the bytes stored at `path`.
    ///
    /// The loader passes paths already stripped of their leading separator
    /// (see [`AssetPath::normalized`]), so they resolve relative to the source root.
    fn fetch(&self, path: &AssetPath) -> Result<Vec<u8>, LoadError>;
}
