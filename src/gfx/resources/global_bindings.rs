//! Global uniform bindings for camera, light, sky and fog
//!
//! Everything shared by every draw in a frame lives in one uniform buffer
//! bound to slot 0 of both the sky and the mesh pipelines.

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// Global uniform buffer content structure
///
/// MUST match the Globals struct in scene.wgsl exactly. Every member is a
/// vec4 or mat4 so no implicit padding is needed.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    inv_view_proj: [[f32; 4]; 4],
    /// xyz: direction the light travels, w: intensity
    light_direction: [f32; 4],
    /// rgb: light color, a: ambient term
    light_color: [f32; 4],
    sky_zenith: [f32; 4],
    sky_horizon: [f32; 4],
    fog_color: [f32; 4],
    /// x: fog start distance, y: fog end distance
    fog_range: [f32; 4],
}

/// Directional sun light
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    pub direction: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    pub ambient: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [-0.4, -1.0, -0.3],
            color: [1.0, 0.97, 0.9],
            intensity: 1.0,
            ambient: 0.25,
        }
    }
}

/// Gradient sky drawn behind the scene and the distance fog blending into it
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Environment {
    pub light: LightConfig,
    pub sky_zenith: [f32; 3],
    pub sky_horizon: [f32; 3],
    pub fog_start: f32,
    pub fog_end: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            light: LightConfig::default(),
            sky_zenith: [0.18, 0.36, 0.72],
            sky_horizon: [0.72, 0.82, 0.92],
            fog_start: 25.0,
            fog_end: 80.0,
        }
    }
}

impl GlobalUniform {
    pub fn new(camera: &CameraUniform, environment: &Environment) -> Self {
        let light = &environment.light;
        let [dx, dy, dz] = light.direction;
        let length = (dx * dx + dy * dy + dz * dz).sqrt().max(f32::EPSILON);
        let [zr, zg, zb] = environment.sky_zenith;
        let [hr, hg, hb] = environment.sky_horizon;

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            inv_view_proj: camera.inv_view_proj,
            light_direction: [dx / length, dy / length, dz / length, light.intensity],
            light_color: [light.color[0], light.color[1], light.color[2], light.ambient],
            sky_zenith: [zr, zg, zb, 1.0],
            sky_horizon: [hr, hg, hb, 1.0],
            // Fog fades toward the horizon color so distant ground meets the sky.
            fog_color: [hr, hg, hb, 1.0],
            fog_range: [environment.fog_start, environment.fog_end.max(environment.fog_start + 0.01), 0.0, 0.0],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Bind group layout and bind group for the global uniforms
pub struct GlobalBindings {
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[binding_types::uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self { layout, bind_group }
    }

    /// Used when creating render pipelines that need access to global uniforms.
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_direction_is_normalized() {
        let environment = Environment {
            light: LightConfig {
                direction: [0.0, -3.0, 4.0],
                ..LightConfig::default()
            },
            ..Environment::default()
        };
        let uniform = GlobalUniform::new(&CameraUniform::default(), &environment);
        assert!((uniform.light_direction[1] + 0.6).abs() < 1e-6);
        assert!((uniform.light_direction[2] - 0.8).abs() < 1e-6);
        assert_eq!(uniform.light_direction[3], environment.light.intensity);
    }

    #[test]
    fn uniform_size_is_vec4_aligned() {
        assert_eq!(std::mem::size_of::<GlobalUniform>() % 16, 0);
    }
}
