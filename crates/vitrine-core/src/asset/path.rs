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

use serde::{Deserialize, Serialize};
use std::fmt;

/// The directory, relative to the asset base, that holds every model file.
pub const MODEL_DIRECTORY: &str = "glbs";

/// The species id reserved for the substitute model shown when a load fails.
pub const FALLBACK_MODEL_ID: u32 = 0;

/// The location of a model asset, also used verbatim as its cache key.
///
/// Paths follow the `{base}/glbs/{id:04}[-{variant}].glb` convention. The cache
/// is keyed by the path exactly as the list supplied it; only the fetch goes
/// through [`AssetPath::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetPath(String);

impl AssetPath {
    /// Wraps a raw path string.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Builds the conventional path for a species model.
    ///
    /// ```
    /// use vitrine_core::asset::AssetPath;
    ///
    /// assert_eq!(AssetPath::for_species("", 25, None).as_str(), "/glbs/0025.glb");
    /// assert_eq!(
    ///     AssetPath::for_species("/static/", 521, Some("F")).as_str(),
    ///     "/static/glbs/0521-F.glb"
    /// );
    /// ```
    pub fn for_species(base: &str, id: u32, variant: Option<&str>) -> Self {
        let base = base.trim_end_matches('/');
        match variant {
            Some(variant) => Self(format!("{base}/{MODEL_DIRECTORY}/{id:04}-{variant}.glb")),
            None => Self(format!("{base}/{MODEL_DIRECTORY}/{id:04}.glb")),
        }
    }

    /// The fixed substitute model path under `base`.
    pub fn fallback(base: &str) -> Self {
        Self::for_species(base, FALLBACK_MODEL_ID, None)
    }

    /// Returns the path exactly as supplied.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path used for fetching: a single leading separator is stripped
    /// so the fetch resolves relative to the source root.
    pub fn normalized(&self) -> &str {
        self.0.strip_prefix('/').unwrap_or(&self.0)
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AssetPath {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_one_leading_separator() {
        assert_eq!(AssetPath::new("/glbs/0001.glb").normalized(), "glbs/0001.glb");
        assert_eq!(AssetPath::new("glbs/0001.glb").normalized(), "glbs/0001.glb");
        assert_eq!(AssetPath::new("//x.glb").normalized(), "/x.glb");
    }

    #[test]
    fn ids_are_zero_padded_to_four_digits() {
        assert_eq!(AssetPath::for_species("", 1, None).as_str(), "/glbs/0001.glb");
        assert_eq!(AssetPath::for_species("", 1025, None).as_str(), "/glbs/1025.glb");
        assert_eq!(
            AssetPath::for_species("", 916, Some("M")).as_str(),
            "/glbs/0916-M.glb"
        );
    }

    #[test]
    fn fallback_is_species_zero() {
        assert_eq!(AssetPath::fallback("").as_str(), "/glbs/0000.glb");
        assert_eq!(AssetPath::fallback("/base").as_str(), "/base/glbs/0000.glb");
    }
}
