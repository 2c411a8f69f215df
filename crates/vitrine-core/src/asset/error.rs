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

use super::AssetPath;
use std::time::Duration;
use thiserror::Error;

/// Why a single asset load did not produce a decoded asset.
///
/// Load errors never travel past the instance that requested the load: the
/// fallback controller consumes them and the gallery only logs them.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// The source could not provide the bytes for the path.
    #[error("failed to fetch '{path}': {message}")]
    Fetch {
        /// The path that was requested.
        path: AssetPath,
        /// The underlying I/O or transport message.
        message: String,
    },
    /// The bytes were fetched but could not be decoded.
    #[error("failed to decode '{path}': {message}")]
    Decode {
        /// The path that was requested.
        path: AssetPath,
        /// The decoder's description of the failure.
        message: String,
    },
    /// No completion arrived within the configured load timeout.
    #[error("load of '{path}' timed out after {after:?}")]
    TimedOut {
        /// The path that was requested.
        path: AssetPath,
        /// The timeout that elapsed.
        after: Duration,
    },
}

impl LoadError {
    /// The path whose load failed.
    pub fn path(&self) -> &AssetPath {
        match self {
            LoadError::Fetch { path, .. }
            | LoadError::Decode { path, .. }
            | LoadError::TimedOut { path, .. } => path,
        }
    }
}
