// src/wgpu_utils/uniform_buffer.rs
use std::marker::PhantomData;

/// Typed uniform buffer that only writes when its content changed.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    last_written: Option<Vec<u8>>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Allocates the buffer, labelled after `Content`.
    pub fn new(device: &wgpu::Device) -> Self {
        let type_name = std::any::type_name::<Content>();
        let short_name = type_name.rsplit("::").next().unwrap_or(type_name);
        Self::with_label(device, &format!("Uniform {short_name}"))
    }

    pub fn with_label(device: &wgpu::Device, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            content_type: PhantomData,
            last_written: None,
        }
    }

    /// Queues a write of `content`. Returns false when it matched the last write.
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) -> bool {
        let bytes = bytemuck::bytes_of(&content);
        if self.last_written.as_deref() == Some(bytes) {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
        self.last_written = Some(bytes.to_vec());
        true
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}
