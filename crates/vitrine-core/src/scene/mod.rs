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

//! The decoded, renderer-ready representation of a model file.
//!
//! A [`SceneGraph`] is produced once per path by the decode lane and then shared,
//! read-only, by every instance that displays the model. Nothing in it is ever
//! mutated after decode.

use crate::asset::Asset;

/// An axis-aligned bounding box in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// The minimum corner.
    pub min: [f32; 3],
    /// The maximum corner.
    pub max: [f32; 3],
}

impl Bounds {
    /// Creates bounds from two corners.
    pub fn from_min_max(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// Returns the smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut min = self.min;
        let mut max = self.max;
        for axis in 0..3 {
            min[axis] = min[axis].min(other.min[axis]);
            max[axis] = max[axis].max(other.max[axis]);
        }
        Bounds { min, max }
    }

    /// The center point of the box.
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    /// The length of the box along each axis.
    pub fn extent(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// A node transform in translation/rotation/scale form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    /// Translation along x, y, z.
    pub translation: [f32; 3],
    /// Rotation quaternion as x, y, z, w.
    pub rotation: [f32; 4],
    /// Non-uniform scale.
    pub scale: [f32; 3],
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
        }
    }
}

/// A node of the scene hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// The optional authoring name.
    pub name: Option<String>,
    /// Index into [`SceneGraph::meshes`], if the node carries geometry.
    pub mesh: Option<usize>,
    /// Indices of child nodes in [`SceneGraph::nodes`].
    pub children: Vec<usize>,
    /// The local transform relative to the parent.
    pub transform: NodeTransform,
}

/// A single drawable primitive of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePrimitive {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Optional triangle indices.
    pub indices: Option<Vec<u32>>,
    /// Bounds declared by the position accessor.
    pub bounds: Bounds,
}

/// A named collection of primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMesh {
    /// The optional authoring name.
    pub name: Option<String>,
    /// The primitives making up the mesh.
    pub primitives: Vec<ScenePrimitive>,
}

/// A fully decoded model, ready to hand to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    /// Every node in the document, in document order.
    pub nodes: Vec<SceneNode>,
    /// Root node indices of the default scene.
    pub roots: Vec<usize>,
    /// Every mesh in the document, in document order.
    pub meshes: Vec<SceneMesh>,
    /// Union of all primitive bounds, if the document has geometry.
    pub bounds: Option<Bounds>,
}

impl SceneGraph {
    /// Total number of vertices across every primitive.
    pub fn vertex_count(&self) -> usize {
        self.meshes
            .iter()
            .flat_map(|mesh| mesh.primitives.iter())
            .map(|primitive| primitive.positions.len())
            .sum()
    }

    /// Total number of primitives across every mesh.
    pub fn primitive_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.primitives.len()).sum()
    }
}

impl Asset for SceneGraph {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_union_covers_both_boxes() {
        let a = Bounds::from_min_max([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = Bounds::from_min_max([-1.0, 0.5, 0.0], [0.5, 2.0, 3.0]);
        let u = a.union(&b);
        assert_eq!(u.min, [-1.0, 0.0, 0.0]);
        assert_eq!(u.max, [1.0, 2.0, 3.0]);
        assert_eq!(u.extent(), [2.0, 2.0, 3.0]);
        assert_eq!(u.center(), [0.0, 1.0, 1.5]);
    }
}
