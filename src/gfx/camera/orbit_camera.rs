use super::camera_utils::Camera;
use cgmath::*;

/// Camera orbiting a target point on a Y-up sphere.
///
/// `pitch` is the elevation above the ground plane, so positive values look
/// down onto the grid.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    home: (f32, f32, f32),
}

impl Camera for OrbitCamera {
    fn eye(&self) -> Vector3<f32> {
        self.eye
    }

    fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(Point3::from_vec(self.eye), Point3::from_vec(self.target), self.up)
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Recomputed by `update()`.
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            home: (distance, pitch, yaw),
        };
        camera.update();
        camera
    }

    /// Returns to the distance, pitch and yaw the camera was created with,
    /// looking at the origin again.
    pub fn reset_to_default(&mut self) {
        let (distance, pitch, yaw) = self.home;
        self.distance = distance;
        self.pitch = pitch;
        self.yaw = yaw;
        self.target = Vector3::zero();
        self.update();
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.1)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw.rem_euclid(std::f32::consts::TAU);
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Slides eye and target together across the ground plane.
    ///
    /// `delta.0` moves along the camera's right vector, `delta.1` along its
    /// forward vector projected onto the ground.
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = self.target - self.eye;
        let flat_forward = Vector3::new(forward.x, 0.0, forward.z);
        if flat_forward.magnitude2() <= f32::EPSILON {
            return;
        }
        let flat_forward = flat_forward.normalize();
        let right = flat_forward.cross(self.up).normalize();

        let pan_scale = self.distance * 0.1;
        self.target += (right * delta.0 + flat_forward * delta.1) * pan_scale;
        self.update();
    }

    /// Updates the camera after changing `distance`, `pitch`, `yaw` or `target`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    /// Keeps the previous aspect ratio for minimized or zero-width windows.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(1.5),
            max_distance: Some(120.0),
            // Stay above the ground and short of straight down, where `up` degenerates.
            min_pitch: 0.05,
            max_pitch: std::f32::consts::FRAC_PI_2 - 0.05,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::picking::{cast_ray, GroundPlane};

    #[test]
    fn eye_sits_above_target_for_positive_pitch() {
        let camera = OrbitCamera::new(10.0, 0.5, 0.0, Vector3::zero(), 1.0);
        assert!(camera.eye.y > 0.0);
        assert!((camera.eye.magnitude() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped_to_bounds() {
        let mut camera = OrbitCamera::new(10.0, 0.5, 0.0, Vector3::zero(), 1.0);
        camera.add_pitch(10.0);
        assert_eq!(camera.pitch, camera.bounds.max_pitch);
        camera.add_pitch(-20.0);
        assert_eq!(camera.pitch, camera.bounds.min_pitch);
    }

    #[test]
    fn pan_moves_target_on_ground_plane() {
        let mut camera = OrbitCamera::new(10.0, 0.8, 0.3, Vector3::zero(), 1.0);
        camera.pan((1.0, 0.5));
        assert_eq!(camera.target.y, 0.0);
        assert!(camera.target.magnitude() > 0.0);
        camera.reset_to_default();
        assert_eq!(camera.target, Vector3::zero());
        assert_eq!(camera.pitch, 0.8);
    }

    #[test]
    fn zero_sized_resize_keeps_picking_usable() {
        let mut camera = OrbitCamera::new(12.0, 0.9, 0.4, Vector3::zero(), 800.0 / 600.0);
        camera.resize_projection(0, 600);
        camera.resize_projection(800, 0);
        assert_eq!(camera.aspect, 800.0 / 600.0);

        let plane = GroundPlane::new(0.0, None);
        let hits = cast_ray((10.0, 590.0), (800.0, 600.0), &camera, &[&plane]);
        assert_eq!(hits.len(), 1);
    }
}
