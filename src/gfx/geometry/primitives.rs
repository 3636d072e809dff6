//! # Primitive Shape Generation
//!
//! Shapes are generated with outward-facing counter-clockwise winding and
//! per-face (cube, caps) or smooth (sphere, cylinder side) normals.

use super::GeometryData;
use serde::Deserialize;
use std::f32::consts::{PI, TAU};

/// Primitive shapes the sandbox can build without a model file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveShape {
    Cube,
    Sphere,
    Cylinder,
    Plane,
}

impl PrimitiveShape {
    /// Shapes offered as placement templates, in key order.
    pub const PLACEABLE: [PrimitiveShape; 3] = [
        PrimitiveShape::Cube,
        PrimitiveShape::Sphere,
        PrimitiveShape::Cylinder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveShape::Cube => "cube",
            PrimitiveShape::Sphere => "sphere",
            PrimitiveShape::Cylinder => "cylinder",
            PrimitiveShape::Plane => "plane",
        }
    }

    /// Generates the shape at a size that fills one grid cell.
    pub fn generate(self) -> GeometryData {
        match self {
            PrimitiveShape::Cube => generate_cube(),
            PrimitiveShape::Sphere => generate_sphere(24, 16),
            PrimitiveShape::Cylinder => generate_cylinder(0.4, 1.0, 24),
            PrimitiveShape::Plane => generate_plane(1.0, 1.0, 1, 1),
        }
    }
}

/// Unit cube spanning -0.5..0.5 in X and Z and 0..1 in Y.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    // (normal, u, v) with u x v = normal so corners wind counter-clockwise.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let center = [0.0, 0.5, 0.0];

    for (normal, u, v) in faces {
        let base = data.positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = [
                center[0] + 0.5 * (normal[0] + su * u[0] + sv * v[0]),
                center[1] + 0.5 * (normal[1] + su * u[1] + sv * v[1]),
                center[2] + 0.5 * (normal[2] + su * u[2] + sv * v[2]),
            ];
            data.positions.push(corner);
            data.normals.push(normal);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// UV sphere of radius 0.5 resting on the ground.
///
/// # Arguments
/// * `longitude_segments` - Number of segments around the Y axis (min 3)
/// * `latitude_segments` - Number of segments from pole to pole (min 2)
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);
    let radius = 0.5;

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        for long in 0..=long_segs {
            let phi = long as f32 * TAU / long_segs as f32;
            let normal = [theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()];
            data.positions.push([
                normal[0] * radius,
                normal[1] * radius + radius,
                normal[2] * radius,
            ]);
            data.normals.push(normal);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;
            data.indices
                .extend_from_slice(&[first, first + 1, second, second, first + 1, second + 1]);
        }
    }

    data
}

/// Capped cylinder standing on the ground, axis along +Y.
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let segs = segments.max(3);

    // Side: bottom/top pairs with radial normals.
    for i in 0..=segs {
        let angle = i as f32 * TAU / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        data.positions.push([radius * cos_a, 0.0, radius * sin_a]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.positions.push([radius * cos_a, height, radius * sin_a]);
        data.normals.push([cos_a, 0.0, sin_a]);
    }
    for i in 0..segs {
        let bottom = i * 2;
        let top = bottom + 1;
        let bottom_next = bottom + 2;
        let top_next = bottom + 3;
        data.indices
            .extend_from_slice(&[bottom, top, bottom_next, top, top_next, bottom_next]);
    }

    // Caps get their own rings so their normals stay flat.
    for (y, normal_y) in [(0.0, -1.0), (height, 1.0)] {
        let center = data.positions.len() as u32;
        data.positions.push([0.0, y, 0.0]);
        data.normals.push([0.0, normal_y, 0.0]);
        for i in 0..=segs {
            let angle = i as f32 * TAU / segs as f32;
            let (sin_a, cos_a) = angle.sin_cos();
            data.positions.push([radius * cos_a, y, radius * sin_a]);
            data.normals.push([0.0, normal_y, 0.0]);
        }
        for i in 0..segs {
            let current = center + 1 + i;
            let next = current + 1;
            if normal_y > 0.0 {
                data.indices.extend_from_slice(&[center, next, current]);
            } else {
                data.indices.extend_from_slice(&[center, current, next]);
            }
        }
    }

    data
}

/// Flat plane in XZ facing +Y, centered on the origin.
///
/// # Arguments
/// * `width` - Extent along X
/// * `depth` - Extent along Z
/// * `width_segments` / `depth_segments` - Subdivisions (min 1)
pub fn generate_plane(width: f32, depth: f32, width_segments: u32, depth_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    let w_segs = width_segments.max(1);
    let d_segs = depth_segments.max(1);

    for z in 0..=d_segs {
        let pos_z = (z as f32 / d_segs as f32 - 0.5) * depth;
        for x in 0..=w_segs {
            let pos_x = (x as f32 / w_segs as f32 - 0.5) * width;
            data.positions.push([pos_x, 0.0, pos_z]);
            data.normals.push([0.0, 1.0, 0.0]);
        }
    }

    for z in 0..d_segs {
        for x in 0..w_segs {
            let i = z * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;
            data.indices
                .extend_from_slice(&[i, next_row, i + 1, next_row, next_row + 1, i + 1]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every triangle's geometric normal should agree with its vertex normals.
    fn assert_outward_winding(data: &GeometryData) {
        for triangle in data.indices.chunks_exact(3) {
            let [a, b, c] = [
                data.positions[triangle[0] as usize],
                data.positions[triangle[1] as usize],
                data.positions[triangle[2] as usize],
            ];
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let face = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let n = data.normals[triangle[0] as usize];
            let dot = face[0] * n[0] + face[1] * n[1] + face[2] * n[2];
            // Degenerate pole triangles of the sphere have zero area.
            assert!(dot >= -1e-6, "triangle {triangle:?} winds inward");
        }
    }

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        let (min, max) = cube.bounds().unwrap();
        assert_eq!(min, [-0.5, 0.0, -0.5]);
        assert_eq!(max, [0.5, 1.0, 0.5]);
        assert_outward_winding(&cube);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(8, 6);
        assert_eq!(sphere.vertex_count(), 9 * 7);
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2);
        assert_eq!(sphere.normals.len(), sphere.positions.len());
        assert_outward_winding(&sphere);
    }

    #[test]
    fn test_cylinder_generation() {
        let cylinder = generate_cylinder(0.5, 2.0, 6);
        // side pairs + two capped rings with centers
        assert_eq!(cylinder.vertex_count(), 7 * 2 + 2 * (1 + 7));
        assert_eq!(cylinder.triangle_count(), 6 * 2 + 6 * 2);
        let (min, max) = cylinder.bounds().unwrap();
        assert_eq!(min[1], 0.0);
        assert_eq!(max[1], 2.0);
        assert_outward_winding(&cylinder);
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertex_count(), 9);
        assert_eq!(plane.indices.len(), 24);
        assert!(plane.positions.iter().all(|p| p[1] == 0.0));
        assert_outward_winding(&plane);
    }
}
