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

//! A minimal binary glTF encoder for single-mesh scenes.
//!
//! Used by synthetic asset sources and by tests that need real GLB bytes
//! without shipping model files.

use base64::Engine;
use serde_json::{json, Value};

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

const COMPONENT_F32: u32 = 5126;
const COMPONENT_U32: u32 = 5125;
const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Builds a GLB containing one node with one single-primitive mesh.
#[derive(Debug, Clone)]
pub struct GlbWriter {
    name: String,
    positions: Vec<[f32; 3]>,
    indices: Vec<u32>,
    data_uri: bool,
}

impl GlbWriter {
    /// A mesh with the given geometry. `positions` must not be empty.
    pub fn new(name: impl Into<String>, positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            positions,
            indices,
            data_uri: false,
        }
    }

    /// A unit right triangle in the XY plane.
    pub fn triangle(name: impl Into<String>) -> Self {
        Self::new(
            name,
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2],
        )
    }

    /// Stores the geometry as a base64 data URI instead of the BIN chunk.
    pub fn with_data_uri(mut self) -> Self {
        self.data_uri = true;
        self
    }

    fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for position in &self.positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(position[axis]);
                max[axis] = max[axis].max(position[axis]);
            }
        }
        (min, max)
    }

    fn document(&self, bin_len: usize, index_offset: usize, bin: &[u8]) -> Value {
        let (min, max) = self.bounds();
        let mut buffer = json!({ "byteLength": bin_len });
        if self.data_uri {
            let encoded = base64::engine::general_purpose::STANDARD.encode(bin);
            buffer["uri"] = json!(format!("data:application/octet-stream;base64,{encoded}"));
        }

        let mut buffer_views = vec![json!({
            "buffer": 0,
            "byteOffset": 0,
            "byteLength": index_offset,
            "target": TARGET_ARRAY_BUFFER,
        })];
        let mut accessors = vec![json!({
            "bufferView": 0,
            "componentType": COMPONENT_F32,
            "count": self.positions.len(),
            "type": "VEC3",
            "min": min,
            "max": max,
        })];
        let mut primitive = json!({ "attributes": { "POSITION": 0 } });

        if !self.indices.is_empty() {
            buffer_views.push(json!({
                "buffer": 0,
                "byteOffset": index_offset,
                "byteLength": bin_len - index_offset,
                "target": TARGET_ELEMENT_ARRAY_BUFFER,
            }));
            accessors.push(json!({
                "bufferView": 1,
                "componentType": COMPONENT_U32,
                "count": self.indices.len(),
                "type": "SCALAR",
            }));
            primitive["indices"] = json!(1);
        }

        json!({
            "asset": { "version": "2.0", "generator": "vitrine" },
            "scene": 0,
            "scenes": [{ "nodes": [0] }],
            "nodes": [{ "name": self.name, "mesh": 0 }],
            "meshes": [{ "name": self.name, "primitives": [primitive] }],
            "buffers": [buffer],
            "bufferViews": buffer_views,
            "accessors": accessors,
        })
    }

    /// Encodes the scene.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bin = Vec::with_capacity(self.positions.len() * 12 + self.indices.len() * 4);
        for position in &self.positions {
            for component in position {
                bin.extend_from_slice(&component.to_le_bytes());
            }
        }
        let index_offset = bin.len();
        for index in &self.indices {
            bin.extend_from_slice(&index.to_le_bytes());
        }

        let mut json_chunk = self
            .document(bin.len(), index_offset, &bin)
            .to_string()
            .into_bytes();
        pad_to_four(&mut json_chunk, b' ');

        let embed_bin = !self.data_uri;
        if embed_bin {
            pad_to_four(&mut bin, 0);
        }

        let mut total = 12 + 8 + json_chunk.len();
        if embed_bin {
            total += 8 + bin.len();
        }

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        out.extend_from_slice(&GLB_VERSION.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json_chunk.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(&json_chunk);
        if embed_bin {
            out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
            out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
            out.extend_from_slice(&bin);
        }
        out
    }
}

fn pad_to_four(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_declares_total_length() {
        let bytes = GlbWriter::triangle("tri").to_bytes();
        assert_eq!(&bytes[0..4], b"glTF");
        assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 2);
        let declared = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        assert_eq!(declared as usize, bytes.len());
        assert_eq!(bytes.len() % 4, 0);
    }
}
