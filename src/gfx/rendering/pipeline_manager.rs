//! Render pipeline management for wgpu
//!
//! Pipelines are registered by name with a [`PipelineConfig`] and built
//! together once the shaders are loaded.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Depth test settings for a pipeline
#[derive(Debug, Clone, Copy)]
pub struct DepthConfig {
    pub format: TextureFormat,
    pub write_enabled: bool,
    pub compare: CompareFunction,
}

impl DepthConfig {
    /// Regular opaque geometry: test and write.
    pub fn opaque(format: TextureFormat) -> Self {
        Self {
            format,
            write_enabled: true,
            compare: CompareFunction::Less,
        }
    }

    /// Background drawn at the far plane: test only.
    pub fn background(format: TextureFormat) -> Self {
        Self {
            format,
            write_enabled: false,
            compare: CompareFunction::LessEqual,
        }
    }
}

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub cull_mode: Option<Face>,
    pub depth: Option<DepthConfig>,
    pub color_format: TextureFormat,
    /// Fullscreen passes generate their vertices from the vertex index.
    pub no_vertex_buffers: bool,
}

impl PipelineConfig {
    pub fn new(shader: &str, color_format: TextureFormat) -> Self {
        Self {
            label: shader.to_string(),
            shader: shader.to_string(),
            vertex_entry: "vs_main".to_string(),
            fragment_entry: "fs_main".to_string(),
            bind_group_layouts: Vec::new(),
            cull_mode: Some(Face::Back),
            depth: None,
            color_format,
            no_vertex_buffers: false,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_entry_points(mut self, vertex: &str, fragment: &str) -> Self {
        self.vertex_entry = vertex.to_owned();
        self.fragment_entry = fragment.to_owned();
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_depth(mut self, depth: DepthConfig) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_no_vertex_buffers(mut self) -> Self {
        self.no_vertex_buffers = true;
        self
    }
}

/// Owns shader modules and the pipelines built from them
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
        }
    }

    pub fn load_shader(&mut self, name: &str, source: &str) {
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(name.to_string(), shader_module);
    }

    /// Registers a pipeline; it is built by [`PipelineManager::create_all_pipelines`].
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        self.pipeline_configs.insert(name.to_string(), config);
    }

    /// Builds every registered pipeline that does not exist yet.
    pub fn create_all_pipelines(&mut self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let pending: Vec<(String, PipelineConfig)> = self
            .pipeline_configs
            .iter()
            .filter(|(name, _)| !self.pipelines.contains_key(*name))
            .map(|(name, config)| (name.clone(), config.clone()))
            .collect();

        for (name, config) in pending {
            match self.create_pipeline_from_config(&name, &config) {
                Ok(pipeline) => {
                    log::debug!("Created pipeline '{}'", name);
                    self.pipelines.insert(name, pipeline);
                }
                Err(e) => errors.push(format!("Pipeline '{}': {}", name, e)),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn get_pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        self.pipelines.get(name)
    }

    fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, String> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| format!("Shader '{}' not found", config.shader))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let vertex_buffers: &[VertexBufferLayout] = if config.no_vertex_buffers {
            &[]
        } else {
            &[Vertex3D::desc()]
        };

        let depth_stencil = config.depth.map(|depth| DepthStencilState {
            format: depth.format,
            depth_write_enabled: depth.write_enabled,
            depth_compare: depth.compare,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let color_targets = [Some(ColorTargetState {
            format: config.color_format,
            blend: Some(BlendState::REPLACE),
            write_mask: ColorWrites::ALL,
        })];

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some(&config.vertex_entry),
                    buffers: vertex_buffers,
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: shader,
                    entry_point: Some(&config.fragment_entry),
                    targets: &color_targets,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Ok(pipeline)
    }

    /// Lists all registered pipeline names
    pub fn list_pipelines(&self) -> Vec<&String> {
        self.pipeline_configs.keys().collect()
    }
}
