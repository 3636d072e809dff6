use cgmath::{Matrix4, SquareMatrix, Vector3};
use winit::event::{DeviceEvent, WindowEvent};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Anything that can look at the scene.
///
/// `projection_matrix` uses the OpenGL clip convention (depth in -1..1) so the
/// picking code can unproject with it directly; the GPU correction is applied
/// only in [`Camera::build_view_projection_matrix`].
pub trait Camera {
    fn eye(&self) -> Vector3<f32>;
    fn view_matrix(&self) -> Matrix4<f32>;
    fn projection_matrix(&self) -> Matrix4<f32>;

    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.projection_matrix() * self.view_matrix()
    }
}

pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    /// Mouse buttons, wheel and modifier keys.
    pub fn process_window_event(&mut self, event: &WindowEvent) {
        self.controller
            .process_window_event(event, &mut self.camera);
    }

    /// Raw mouse motion, used while a drag is active.
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        self.controller
            .process_device_event(event, &mut self.camera);
    }

    /// Get the view projection matrix from the camera
    pub fn get_view_proj_matrix(&self) -> Matrix4<f32> {
        self.camera.build_view_projection_matrix()
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],

    /// Inverse of `view_proj`, used by the sky pass to rebuild view rays.
    pub inv_view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
            inv_view_proj: Matrix4::identity().into(),
        }
    }
}

impl CameraUniform {
    pub fn from_camera(camera: &impl Camera) -> Self {
        let eye = camera.eye();
        let view_proj = camera.build_view_projection_matrix();
        let inv_view_proj = view_proj.invert().unwrap_or_else(Matrix4::identity);
        Self {
            view_position: [eye.x, eye.y, eye.z, 1.0],
            view_proj: view_proj.into(),
            inv_view_proj: inv_view_proj.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_inverse_undoes_view_projection() {
        let camera = OrbitCamera::new(10.0, 0.6, 0.3, Vector3::new(0.0, 0.0, 0.0), 1.5);
        let uniform = CameraUniform::from_camera(&camera);
        let product = Matrix4::from(uniform.view_proj) * Matrix4::from(uniform.inv_view_proj);
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        let product: [[f32; 4]; 4] = product.into();
        for (row, expected) in product.iter().zip(identity.iter()) {
            for (a, b) in row.iter().zip(expected.iter()) {
                assert!((a - b).abs() < 1e-4, "{product:?}");
            }
        }
        assert_eq!(uniform.view_position[3], 1.0);
    }
}
