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

//! Binary glTF (and self-contained glTF JSON) scene decoding.

use super::AssetLoaderLane;
use base64::Engine;
use std::error::Error;
use vitrine_core::{
    lane::{Lane, LaneKind},
    scene::{Bounds, NodeTransform, SceneGraph, SceneMesh, SceneNode, ScenePrimitive},
};

type DecodeResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

const DATA_URI_PREFIXES: [&str; 2] = [
    "data:application/octet-stream;base64,",
    "data:application/gltf-buffer;base64,",
];

/// Decodes a GLB (or a glTF document with only embedded buffers) into a
/// [`SceneGraph`].
///
/// Buffers must come from the GLB BIN chunk or a base64 data URI. Models are
/// fetched as a single file, so external buffer URIs are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfSceneLane;

impl GltfSceneLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    fn load_buffers(&self, gltf: &gltf::Gltf) -> DecodeResult<Vec<Vec<u8>>> {
        let mut buffers = Vec::new();
        for buffer in gltf.buffers() {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => gltf
                    .blob
                    .as_deref()
                    .map(<[u8]>::to_vec)
                    .ok_or("GLB file references the binary chunk but it is missing")?,
                gltf::buffer::Source::Uri(uri) => self.decode_data_uri(uri)?,
            };
            if data.len() < buffer.length() {
                return Err(format!(
                    "buffer {} holds {} bytes but declares {}",
                    buffer.index(),
                    data.len(),
                    buffer.length()
                )
                .into());
            }
            buffers.push(data);
        }
        Ok(buffers)
    }

    fn decode_data_uri(&self, uri: &str) -> DecodeResult<Vec<u8>> {
        if !uri.starts_with("data:") {
            return Err(format!("external buffer '{uri}' is not supported").into());
        }
        let payload = DATA_URI_PREFIXES
            .iter()
            .find_map(|prefix| uri.strip_prefix(prefix))
            .ok_or_else(|| format!("unsupported data URI: {uri}"))?;
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(Into::into)
    }

    fn decode_mesh(&self, mesh: gltf::Mesh<'_>, buffers: &[Vec<u8>]) -> DecodeResult<SceneMesh> {
        let mut primitives = Vec::new();
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or_else(|| {
                    format!(
                        "mesh {} has a primitive without positions",
                        mesh.name().unwrap_or("<unnamed>")
                    )
                })?
                .collect();
            let indices = reader
                .read_indices()
                .map(|indices| indices.into_u32().collect());
            let bounds = bounds_of(&positions).ok_or("primitive has no vertices")?;
            primitives.push(ScenePrimitive {
                positions,
                indices,
                bounds,
            });
        }
        Ok(SceneMesh {
            name: mesh.name().map(str::to_string),
            primitives,
        })
    }
}

fn bounds_of(positions: &[[f32; 3]]) -> Option<Bounds> {
    let (first, rest) = positions.split_first()?;
    let start = Bounds::from_min_max(*first, *first);
    Some(
        rest.iter()
            .fold(start, |acc, p| acc.union(&Bounds::from_min_max(*p, *p))),
    )
}

impl AssetLoaderLane<SceneGraph> for GltfSceneLane {
    fn load(&self, bytes: &[u8]) -> DecodeResult<SceneGraph> {
        let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| format!("invalid glTF: {e}"))?;
        let buffers = self.load_buffers(&gltf)?;

        let meshes = gltf
            .meshes()
            .map(|mesh| self.decode_mesh(mesh, &buffers))
            .collect::<DecodeResult<Vec<_>>>()?;

        let nodes: Vec<SceneNode> = gltf
            .nodes()
            .map(|node| {
                let (translation, rotation, scale) = node.transform().decomposed();
                SceneNode {
                    name: node.name().map(str::to_string),
                    mesh: node.mesh().map(|mesh| mesh.index()),
                    children: node.children().map(|child| child.index()).collect(),
                    transform: NodeTransform {
                        translation,
                        rotation,
                        scale,
                    },
                }
            })
            .collect();

        let roots = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
            Some(scene) => scene.nodes().map(|node| node.index()).collect(),
            None => {
                let mut is_child = vec![false; nodes.len()];
                for child in nodes.iter().flat_map(|node| node.children.iter()) {
                    if let Some(flag) = is_child.get_mut(*child) {
                        *flag = true;
                    }
                }
                (0..nodes.len()).filter(|index| !is_child[*index]).collect()
            }
        };

        let bounds = meshes
            .iter()
            .flat_map(|mesh| mesh.primitives.iter())
            .map(|primitive| primitive.bounds)
            .reduce(|acc, b| acc.union(&b));

        Ok(SceneGraph {
            nodes,
            roots,
            meshes,
            bounds,
        })
    }
}

impl Lane for GltfSceneLane {
    fn strategy_name(&self) -> &'static str {
        "GltfScene"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Asset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_lane::GlbWriter;

    #[test]
    fn decodes_embedded_bin_chunk() {
        let bytes = GlbWriter::triangle("0001").to_bytes();
        let scene = GltfSceneLane::new().load(&bytes).expect("valid GLB");

        assert_eq!(scene.nodes.len(), 1);
        assert_eq!(scene.roots, vec![0]);
        assert_eq!(scene.nodes[0].name.as_deref(), Some("0001"));
        assert_eq!(scene.nodes[0].mesh, Some(0));
        assert_eq!(scene.vertex_count(), 3);
        assert_eq!(scene.meshes[0].primitives[0].indices, Some(vec![0, 1, 2]));

        let bounds = scene.bounds.expect("geometry has bounds");
        assert_eq!(bounds.min, [0.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [1.0, 1.0, 0.0]);
    }

    #[test]
    fn decodes_base64_data_uri_buffers() {
        let bytes = GlbWriter::new(
            "quad",
            vec![[-1.0, -1.0, 0.0], [1.0, -1.0, 0.0], [1.0, 1.0, 0.0], [-1.0, 1.0, 0.0]],
            vec![0, 1, 2, 0, 2, 3],
        )
        .with_data_uri()
        .to_bytes();
        let scene = GltfSceneLane::new().load(&bytes).expect("valid GLB");
        assert_eq!(scene.vertex_count(), 4);
        assert_eq!(scene.primitive_count(), 1);
        assert_eq!(scene.bounds.unwrap().extent(), [2.0, 2.0, 0.0]);
    }

    #[test]
    fn reports_its_identity_for_agent_logs() {
        let lane = GltfSceneLane::new();
        assert_eq!(lane.strategy_name(), "GltfScene");
        assert_eq!(lane.lane_kind(), LaneKind::Asset);
        assert_eq!(
            format!("{} {} lane", lane.strategy_name(), lane.lane_kind()),
            "GltfScene Asset lane"
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = GltfSceneLane::new().load(b"definitely not a model").unwrap_err();
        assert!(err.to_string().contains("invalid glTF"));
    }

    #[test]
    fn rejects_external_buffers() {
        let json = r#"{
            "asset": {"version": "2.0"},
            "buffers": [{"byteLength": 12, "uri": "geometry.bin"}]
        }"#;
        let err = GltfSceneLane::new().load(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("external buffer"));
    }
}
