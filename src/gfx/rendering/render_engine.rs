//! WGPU-based rendering engine for the sandbox
//!
//! Draws a gradient sky at the far plane, then every object currently added
//! to the scene, then an optional UI overlay.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use wgpu::{Device, TextureFormat};

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        resources::{
            global_bindings::{GlobalBindings, GlobalUBO, GlobalUniform},
            texture_resource::DepthTexture,
        },
        scene::{object::DrawObject, scene::Scene},
    },
    wgpu_utils::binding_types,
};

use super::pipeline_manager::{DepthConfig, PipelineConfig, PipelineManager};

const SHADER: &str = "scene";
const SKY_PIPELINE: &str = "Sky";
const MESH_PIPELINE: &str = "Mesh";

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: DepthTexture,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: wgpu::BindGroupLayout,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Fails if no adapter or device is available or a pipeline cannot be built.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = DepthTexture::new(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[binding_types::uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader(SHADER, include_str!("scene.wgsl"));

        pipeline_manager.register_pipeline(
            SKY_PIPELINE,
            PipelineConfig::new(SHADER, format)
                .with_label("SKY")
                .with_entry_points("vs_sky", "fs_sky")
                .with_bind_group_layouts(vec![global_bindings.layout().clone()])
                .with_depth(DepthConfig::background(DepthTexture::FORMAT))
                .with_cull_mode(None)
                .with_no_vertex_buffers(),
        );

        pipeline_manager.register_pipeline(
            MESH_PIPELINE,
            PipelineConfig::new(SHADER, format)
                .with_label("MESH")
                .with_bind_group_layouts(vec![
                    global_bindings.layout().clone(),
                    object_layout.clone(),
                ])
                .with_depth(DepthConfig::opaque(DepthTexture::FORMAT)),
        );

        pipeline_manager
            .create_all_pipelines()
            .map_err(|errors| anyhow!(errors.join("; ")))?;

        Ok(RenderEngine {
            device: device_handle,
            config,
            format,
            surface,
            queue: queue_handle,
            depth_texture,
            pipeline_manager,
            global_bindings,
            global_ubo,
            object_layout,
        })
    }

    /// Uploads global and per-object uniforms for the next frame.
    ///
    /// Per-object buffers are created the first time an object is visible and
    /// rewritten only when its transform or color changed.
    pub fn sync_scene(&mut self, scene: &mut Scene, camera_uniform: &CameraUniform) {
        self.global_ubo.update_content(
            &self.queue,
            GlobalUniform::new(camera_uniform, &scene.environment),
        );

        for object in scene.visible_objects_mut() {
            object.sync_gpu_resources(&self.device, &self.queue, &self.object_layout);
        }
    }

    /// Renders a frame with an optional UI overlay
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>) -> anyhow::Result<()>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out waiting for the surface texture, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to get surface texture"),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(SKY_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.draw(0..3, 0..1);
            }

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(MESH_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                for (_, object) in scene.visible_objects() {
                    render_pass.draw_object(object, &self.device);
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the surface and recreates the depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = DepthTexture::new(&self.device, &self.config, "depth_texture");
    }

    /// Returns current surface dimensions
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
