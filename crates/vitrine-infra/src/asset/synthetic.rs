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

//! Generates small GLB models on request.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use vitrine_core::asset::{AssetPath, AssetSource, LoadError};
use vitrine_lanes::GlbWriter;

/// Answers every path with a generated flat polygon, except the ones marked as
/// failing.
///
/// The polygon's side count is derived from the path, so different models
/// decode to different vertex counts.
#[derive(Debug, Default)]
pub struct SyntheticSceneSource {
    failing: HashSet<String>,
    fetches: AtomicUsize,
}

impl SyntheticSceneSource {
    /// A source where every path succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `path` fail to fetch. Leading separators are ignored.
    pub fn with_failing(mut self, path: &AssetPath) -> Self {
        self.failing.insert(path.normalized().to_string());
        self
    }

    /// Number of fetches served so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    fn polygon(path: &str) -> GlbWriter {
        let hash = path
            .bytes()
            .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
        let sides = 3 + hash % 6;
        let mut positions = vec![[0.0, 0.0, 0.0]];
        for i in 0..sides {
            let angle = i as f32 / sides as f32 * std::f32::consts::TAU;
            positions.push([angle.cos(), angle.sin(), 0.0]);
        }
        let mut indices = Vec::with_capacity(sides * 3);
        for i in 0..sides as u32 {
            indices.extend_from_slice(&[0, 1 + i, 1 + (i + 1) % sides as u32]);
        }
        GlbWriter::new(path, positions, indices)
    }
}

impl AssetSource for SyntheticSceneSource {
    fn fetch(&self, path: &AssetPath) -> Result<Vec<u8>, LoadError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let key = path.normalized();
        if self.failing.contains(key) {
            return Err(LoadError::Fetch {
                path: path.clone(),
                message: "404 Not Found".into(),
            });
        }
        Ok(Self::polygon(key).to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_models_are_glb() {
        let source = SyntheticSceneSource::new();
        let bytes = source.fetch(&AssetPath::new("glbs/0001.glb")).unwrap();
        assert_eq!(&bytes[..4], b"glTF");
        assert_eq!(source.fetch_count(), 1);
    }

    #[test]
    fn failing_paths_ignore_the_leading_separator() {
        let source = SyntheticSceneSource::new().with_failing(&AssetPath::new("/glbs/0007.glb"));
        assert!(source.fetch(&AssetPath::new("glbs/0007.glb")).is_err());
        assert!(source.fetch(&AssetPath::new("glbs/0008.glb")).is_ok());
        assert_eq!(source.fetch_count(), 2);
    }
}
