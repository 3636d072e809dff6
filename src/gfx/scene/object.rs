use std::sync::{Arc, OnceLock};

use cgmath::{Matrix4, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    gfx::{
        geometry::GeometryData,
        resources::material::{MaterialDescriptor, MaterialUniform},
    },
    wgpu_utils::UniformBuffer,
};

use super::vertex::Vertex3D;

/// Geometry shared between an object and every clone made from it.
///
/// Vertex and index buffers are uploaded the first time the mesh is drawn
/// and reused by all objects holding the same `Arc<Mesh>`.
pub struct Mesh {
    geometry: GeometryData,
    buffers: OnceLock<MeshBuffers>,
}

pub struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl Mesh {
    pub fn new(geometry: GeometryData) -> Self {
        Self {
            geometry,
            buffers: OnceLock::new(),
        }
    }

    pub fn geometry(&self) -> &GeometryData {
        &self.geometry
    }

    /// Returns the GPU buffers, uploading them on first use.
    pub fn buffers(&self, device: &wgpu::Device) -> &MeshBuffers {
        self.buffers.get_or_init(|| {
            let vertices: Vec<Vertex3D> = self.geometry.to_vertices();
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&self.geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            MeshBuffers {
                vertex_buffer,
                index_buffer,
                index_count: self.geometry.indices.len() as u32,
            }
        })
    }
}

/// Per-object uniform: model transform plus material parameters.
///
/// MUST match the ObjectUniform struct in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub material: MaterialUniform,
}

// Per-object uniform buffer and the bind group pointing at it
pub struct ObjectGpuResources {
    pub uniform_buffer: UniformBuffer<ObjectUniform>,
    pub bind_group: wgpu::BindGroup,
}

/// A renderable in the scene graph.
///
/// Objects start detached: only objects added to the scene are drawn. Clones
/// share the same [`Mesh`].
pub struct Object {
    pub name: String,
    pub mesh: Arc<Mesh>,
    pub material: MaterialDescriptor,
    pub position: Vector3<f32>,
    /// Replaces the material color when set (the placement highlight uses this).
    pub color_override: Option<[f32; 4]>,
    pub in_scene: bool,
    pub(crate) gpu_resources: Option<ObjectGpuResources>, // None until first drawn
}

impl Object {
    pub fn new(name: &str, mesh: Arc<Mesh>, material: MaterialDescriptor) -> Self {
        Self {
            name: name.to_owned(),
            mesh,
            material,
            position: Vector3::new(0.0, 0.0, 0.0),
            color_override: None,
            in_scene: false,
            gpu_resources: None,
        }
    }

    /// Copies everything except GPU state. The copy starts detached.
    pub fn duplicate(&self, name: String) -> Self {
        Self {
            name,
            mesh: Arc::clone(&self.mesh),
            material: self.material.clone(),
            position: self.position,
            color_override: self.color_override,
            in_scene: false,
            gpu_resources: None,
        }
    }

    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
    }

    pub fn uniform(&self) -> ObjectUniform {
        ObjectUniform {
            model: self.transform().into(),
            material: self.material.to_uniform(self.color_override),
        }
    }

    /// Creates the uniform buffer on first use and writes it when it changed.
    pub fn sync_gpu_resources(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) {
        let uniform = self.uniform();

        let resources = self.gpu_resources.get_or_insert_with(|| {
            let uniform_buffer = UniformBuffer::with_label(device, "Object Uniform Buffer");
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Object Bind Group"),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.binding_resource(),
                }],
            });
            ObjectGpuResources {
                uniform_buffer,
                bind_group,
            }
        });

        resources.uniform_buffer.update_content(queue, uniform);
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|res| &res.bind_group)
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, buffers: &'a MeshBuffers);
    fn draw_object(&mut self, object: &'a Object, device: &wgpu::Device);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, buffers: &'b MeshBuffers) {
        self.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
        self.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..buffers.index_count, 0, 0..1);
    }

    fn draw_object(&mut self, object: &'b Object, device: &wgpu::Device) {
        // Skip drawing until the object's uniforms exist
        let Some(bind_group) = object.bind_group() else {
            return;
        };
        if object.mesh.geometry().is_empty() {
            return;
        }
        self.set_bind_group(1, bind_group, &[]);
        self.draw_mesh(object.mesh.buffers(device));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;
    use crate::gfx::resources::material::BasicMaterial;

    #[test]
    fn duplicate_shares_mesh_and_starts_detached() {
        let mesh = Arc::new(Mesh::new(generate_cube()));
        let mut original = Object::new("crate", mesh, BasicMaterial::new([1.0, 0.0, 0.0]).into());
        original.in_scene = true;
        original.position = Vector3::new(2.5, 0.0, 1.5);

        let copy = original.duplicate("crate#2".to_owned());
        assert!(Arc::ptr_eq(&original.mesh, &copy.mesh));
        assert!(!copy.in_scene);
        assert_eq!(copy.position, original.position);
        assert!(copy.gpu_resources.is_none());
    }

    #[test]
    fn uniform_carries_translation_and_override() {
        let mesh = Arc::new(Mesh::new(generate_cube()));
        let mut object = Object::new("tile", mesh, BasicMaterial::new([1.0, 1.0, 1.0]).into());
        object.position = Vector3::new(0.5, 0.0, -3.5);
        object.color_override = Some([1.0, 0.0, 0.0, 1.0]);

        let uniform = object.uniform();
        assert_eq!(uniform.model[3], [0.5, 0.0, -3.5, 1.0]);
        assert_eq!(uniform.material.base_color, [1.0, 0.0, 0.0, 1.0]);
    }
}
