//! # Procedural Geometry Generation
//!
//! Generators for the primitive shapes the sandbox can place without any
//! model file. All shapes are Y-up, centered on the origin in X and Z, and
//! rest on `y = 0` so a placed object sits on the ground it was dropped on.
//!
//! ## Supported Primitives
//!
//! - **Cube**: unit cube
//! - **Sphere**: UV sphere with configurable resolution
//! - **Cylinder**: capped cylinder along the Y axis
//! - **Plane**: flat XZ plane facing +Y (ground and highlight tiles)
//!
//! ```rust
//! use gridscape::gfx::geometry::{generate_cube, PrimitiveShape};
//!
//! let cube = generate_cube();
//! assert_eq!(cube.triangle_count(), 12);
//! let sphere = PrimitiveShape::Sphere.generate();
//! assert!(sphere.vertex_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Geometry ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z), one per position
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Interleaves positions and normals into the renderer's vertex format.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for empty geometry.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut min, mut max), p| {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
            (min, max)
        }))
    }

    /// Rescales and recenters the geometry so it fits in a unit footprint
    /// centered on the origin with its lowest point at `y = 0`.
    ///
    /// Imported models come in arbitrary units; one grid cell is one unit.
    pub fn fit_to_unit_cell(&mut self) {
        let Some((min, max)) = self.bounds() else {
            return;
        };
        let footprint = (max[0] - min[0]).max(max[2] - min[2]).max(max[1] - min[1]);
        let scale = if footprint > f32::EPSILON { 1.0 / footprint } else { 1.0 };
        let center_x = (min[0] + max[0]) * 0.5;
        let center_z = (min[2] + max[2]) * 0.5;

        for p in &mut self.positions {
            p[0] = (p[0] - center_x) * scale;
            p[1] = (p[1] - min[1]) * scale;
            p[2] = (p[2] - center_z) * scale;
        }
    }

    /// Smooth per-vertex normals averaged from the faces touching each vertex.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![[0.0f32; 3]; self.positions.len()];

        for triangle in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
            let (Some(v0), Some(v1), Some(v2)) = (
                self.positions.get(i0),
                self.positions.get(i1),
                self.positions.get(i2),
            ) else {
                continue;
            };
            let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
            let face = [
                edge1[1] * edge2[2] - edge1[2] * edge2[1],
                edge1[2] * edge2[0] - edge1[0] * edge2[2],
                edge1[0] * edge2[1] - edge1[1] * edge2[0],
            ];
            for index in [i0, i1, i2] {
                for axis in 0..3 {
                    normals[index][axis] += face[axis];
                }
            }
        }

        for n in &mut normals {
            let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            *n = if length > 0.0 {
                [n[0] / length, n[1] / length, n[2] / length]
            } else {
                [0.0, 1.0, 0.0]
            };
        }

        self.normals = normals;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_to_unit_cell_rests_on_ground() {
        let mut geometry = GeometryData {
            positions: vec![[10.0, 5.0, 10.0], [14.0, 9.0, 12.0], [12.0, 7.0, 14.0]],
            normals: vec![[0.0, 1.0, 0.0]; 3],
            indices: vec![0, 1, 2],
        };
        geometry.fit_to_unit_cell();
        let (min, max) = geometry.bounds().unwrap();
        assert!(min[1].abs() < 1e-6);
        assert!((max[0] - min[0]) <= 1.0 + 1e-6);
        assert!(((min[0] + max[0]) * 0.5).abs() < 1e-6);
        assert!(((min[2] + max[2]) * 0.5).abs() < 1e-6);
    }

    #[test]
    fn computed_normals_face_up_for_ccw_floor_triangle() {
        let mut geometry = GeometryData {
            positions: vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]],
            normals: Vec::new(),
            indices: vec![0, 1, 2],
        };
        geometry.compute_normals();
        assert_eq!(geometry.normals.len(), 3);
        assert!((geometry.normals[0][1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_geometry_has_no_bounds() {
        assert!(GeometryData::new().bounds().is_none());
        assert!(GeometryData::new().is_empty());
    }
}
