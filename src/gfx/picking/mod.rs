//! # Ray Picking
//!
//! Converts pointer positions into world-space rays and intersects them with
//! colliders. The placement grid only ever casts against the ground plane.
//!
//! ## How it works
//!
//! 1. **Pointer to NDC**: pixel coordinates map to -1..1 with Y flipped
//! 2. **NDC to Ray**: the near and far points are unprojected with the
//!    inverse view-projection matrix
//! 3. **Ray casting**: every target is tested and hits are returned nearest first
//!
//! A miss is not an error: [`cast_ray`] simply returns no intersections.

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::gfx::camera::camera_utils::Camera;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// A point where a ray met a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Vector3<f32>,
    /// Distance from the ray origin
    pub distance: f32,
}

/// Something a ray can hit.
pub trait Collider {
    /// Distance along the ray to the nearest hit in front of its origin.
    fn intersect_ray(&self, ray: &Ray) -> Option<f32>;
}

/// Horizontal plane at `height`, optionally limited to a square footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub height: f32,
    /// Half the side length of the plane around the origin; `None` is infinite.
    pub half_extent: Option<f32>,
}

impl GroundPlane {
    pub fn new(height: f32, half_extent: Option<f32>) -> Self {
        Self {
            height,
            half_extent,
        }
    }

    /// Half-open on the far edges, so every accepted point snaps to a cell
    /// that lies on the plane.
    pub fn contains_xz(&self, point: Vector3<f32>) -> bool {
        self.half_extent.map_or(true, |extent| {
            (-extent..extent).contains(&point.x) && (-extent..extent).contains(&point.z)
        })
    }
}

impl Collider for GroundPlane {
    fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        if ray.direction.y.abs() <= f32::EPSILON {
            return None;
        }
        let t = (self.height - ray.origin.y) / ray.direction.y;
        if t < 0.0 {
            return None;
        }
        self.contains_xz(ray.point_at(t)).then_some(t)
    }
}

/// Converts pixel coordinates to normalized device coordinates (-1 to 1).
///
/// Returns `None` for a degenerate viewport.
pub fn screen_to_ndc(screen: (f32, f32), viewport: (f32, f32)) -> Option<(f32, f32)> {
    let (width, height) = viewport;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let ndc_x = (2.0 * screen.0) / width - 1.0;
    let ndc_y = 1.0 - (2.0 * screen.1) / height; // Flip Y axis
    Some((ndc_x, ndc_y))
}

fn inverse_view_projection(camera: &impl Camera) -> Option<Matrix4<f32>> {
    (camera.projection_matrix() * camera.view_matrix()).invert()
}

/// Convert screen coordinates to a world-space ray
pub fn screen_to_ray(screen: (f32, f32), viewport: (f32, f32), camera: &impl Camera) -> Option<Ray> {
    let (ndc_x, ndc_y) = screen_to_ndc(screen, viewport)?;
    let inv_view_proj = inverse_view_projection(camera)?;

    let unproject = |z: f32| {
        let world = inv_view_proj * Vector4::new(ndc_x, ndc_y, z, 1.0);
        world.truncate() / world.w
    };
    let near = unproject(-1.0);
    let far = unproject(1.0);

    let direction = far - near;
    if direction.magnitude2() <= f32::EPSILON {
        return None;
    }
    Some(Ray::new(near, direction))
}

/// Casts a ray through `screen` against every target.
///
/// Hits are sorted nearest first; an empty list means the ray missed.
pub fn cast_ray(
    screen: (f32, f32),
    viewport: (f32, f32),
    camera: &impl Camera,
    targets: &[&dyn Collider],
) -> Vec<Intersection> {
    let Some(ray) = screen_to_ray(screen, viewport, camera) else {
        return Vec::new();
    };

    let mut hits: Vec<Intersection> = targets
        .iter()
        .filter_map(|target| target.intersect_ray(&ray))
        .map(|distance| Intersection {
            point: ray.point_at(distance),
            distance,
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Projects a world point to pixel coordinates.
///
/// Returns `None` for points behind the camera or a degenerate viewport.
pub fn world_to_screen(point: Vector3<f32>, viewport: (f32, f32), camera: &impl Camera) -> Option<(f32, f32)> {
    let (width, height) = viewport;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let clip = camera.projection_matrix() * camera.view_matrix() * point.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    Some(((ndc_x + 1.0) * 0.5 * width, (1.0 - ndc_y) * 0.5 * height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::orbit_camera::OrbitCamera;

    const VIEWPORT: (f32, f32) = (800.0, 600.0);

    fn camera() -> OrbitCamera {
        OrbitCamera::new(12.0, 0.9, 0.4, Vector3::new(0.0, 0.0, 0.0), 800.0 / 600.0)
    }

    #[test]
    fn ndc_corners_and_center() {
        assert_eq!(screen_to_ndc((0.0, 0.0), VIEWPORT), Some((-1.0, 1.0)));
        assert_eq!(screen_to_ndc((400.0, 300.0), VIEWPORT), Some((0.0, 0.0)));
        assert_eq!(screen_to_ndc((800.0, 600.0), VIEWPORT), Some((1.0, -1.0)));
        assert_eq!(screen_to_ndc((1.0, 1.0), (0.0, 600.0)), None);
    }

    #[test]
    fn center_ray_points_at_target() {
        let camera = camera();
        let ray = screen_to_ray((400.0, 300.0), VIEWPORT, &camera).unwrap();
        let to_target = (camera.target - camera.eye).normalize();
        assert!(ray.direction.dot(to_target) > 0.9999);
    }

    #[test]
    fn ground_hit_round_trips_through_projection() {
        let camera = camera();
        let plane = GroundPlane::new(0.0, None);
        let world = Vector3::new(2.3, 0.0, -1.7);

        let screen = world_to_screen(world, VIEWPORT, &camera).unwrap();
        let hits = cast_ray(screen, VIEWPORT, &camera, &[&plane]);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point - world).magnitude() < 1e-2, "{:?}", hits[0]);
    }

    #[test]
    fn upward_ray_misses_ground() {
        // Shallow pitch: the top edge of the screen looks above the horizon.
        let camera = OrbitCamera::new(10.0, 0.2, 0.0, Vector3::new(0.0, 0.0, 0.0), 800.0 / 600.0);
        let plane = GroundPlane::new(0.0, None);
        assert!(cast_ray((400.0, 0.0), VIEWPORT, &camera, &[&plane]).is_empty());
    }

    #[test]
    fn finite_plane_rejects_hits_outside_extent() {
        let plane = GroundPlane::new(0.0, Some(5.0));
        let inside = Ray::new(Vector3::new(1.0, 10.0, 1.0), Vector3::new(0.0, -1.0, 0.0));
        let outside = Ray::new(Vector3::new(6.0, 10.0, 1.0), Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(plane.intersect_ray(&inside), Some(10.0));
        assert_eq!(plane.intersect_ray(&outside), None);
    }

    #[test]
    fn far_edges_of_finite_plane_are_excluded() {
        let plane = GroundPlane::new(0.0, Some(5.0));
        assert!(plane.contains_xz(Vector3::new(-5.0, 0.0, -5.0)));
        assert!(plane.contains_xz(Vector3::new(4.999, 0.0, 0.0)));
        assert!(!plane.contains_xz(Vector3::new(5.0, 0.0, 0.0)));
        assert!(!plane.contains_xz(Vector3::new(0.0, 0.0, 5.0)));

        let edge = Ray::new(Vector3::new(5.0, 10.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(plane.intersect_ray(&edge), None);
    }

    #[test]
    fn hits_are_sorted_nearest_first() {
        let camera = camera();
        let ground = GroundPlane::new(0.0, None);
        let shelf = GroundPlane::new(1.0, None);

        let screen = world_to_screen(Vector3::new(0.5, 0.5, 0.5), VIEWPORT, &camera).unwrap();
        let hits = cast_ray(screen, VIEWPORT, &camera, &[&ground, &shelf]);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].distance < hits[1].distance);
        assert!((hits[0].point.y - 1.0).abs() < 1e-3);
        assert!(hits[1].point.y.abs() < 1e-3);
    }
}
