use anyhow::Context;
use cgmath::Vector3;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::{SandboxConfig, GROUND_MATERIAL, TEMPLATE_MATERIAL},
    error::Result,
    gfx::{
        camera::{
            camera_controller::CameraController,
            camera_utils::{CameraManager, CameraUniform},
            orbit_camera::OrbitCamera,
        },
        geometry::{generate_plane, PrimitiveShape},
        picking::GroundPlane,
        rendering::RenderEngine,
        resources::MaterialDescriptor,
        scene::{ModelLoader, ObjLoader, Scene, SceneGraph},
    },
    input::{self, InputSender, InputSubscription},
    placement::{PlacementController, PlacementSettings, Template},
    ui::{placement_panel, PlacementStatus, UiManager},
};

/// Builds the ground, the templates and the placement controller.
///
/// The fallback primitive is the first template, followed by the other
/// placeable primitives. A configured model is loaded with `loader` and put
/// in front of them; if it fails to load the failure is logged and the
/// fallback stays active.
pub fn populate_scene(
    config: &SandboxConfig,
    scene: &mut Scene,
    loader: &impl ModelLoader,
    subscription: InputSubscription,
    viewport: (u32, u32),
) -> Result<PlacementController> {
    let grid = &config.grid;

    let ground = scene.create_mesh_from_record(
        "ground",
        generate_plane(grid.extent, grid.extent, 1, 1),
        &config.material(GROUND_MATERIAL),
    )?;
    scene.set_position(ground, Vector3::new(0.0, grid.ground_height, 0.0))?;
    scene.add_to_scene(ground)?;

    let template_material = MaterialDescriptor::from_record(&config.material(TEMPLATE_MATERIAL))?;
    let fallback = config.placement.fallback;
    let shapes = std::iter::once(fallback)
        .chain(PrimitiveShape::PLACEABLE.into_iter().filter(|shape| *shape != fallback));
    let templates = shapes
        .map(|shape| Template::create(&mut *scene, shape.name(), shape.generate(), template_material.clone()))
        .collect();

    let [fr, fg, fb] = config.placement.free_color;
    let [or, og, ob] = config.placement.occupied_color;
    let settings = PlacementSettings {
        ground: GroundPlane::new(grid.ground_height, Some(grid.extent * 0.5)),
        free_color: [fr, fg, fb, 1.0],
        occupied_color: [or, og, ob, 1.0],
    };

    let mut controller =
        PlacementController::new(&mut *scene, settings, templates, subscription, viewport)?;

    if let Some(path) = config.placement.model_path.as_deref() {
        match loader.load_model(path) {
            Ok(model) => {
                let template = Template::create(&mut *scene, &model.name, model.geometry, model.material);
                controller.set_model_template(template);
            }
            Err(e) => {
                log::warn!("{}; using the {} template instead", e, fallback.name());
            }
        }
    }

    Ok(controller)
}

pub struct GridscapeApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: SandboxConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    camera: CameraManager,
    input: InputSender,
    subscription: Option<InputSubscription>,
    controller: Option<PlacementController>,
    fatal: Option<anyhow::Error>,
}

impl GridscapeApp {
    /// Create a sandbox application from a configuration
    pub fn new(config: SandboxConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        let camera = OrbitCamera::new(
            config.camera.distance,
            config.camera.pitch,
            config.camera.yaw,
            Vector3::new(0.0, 0.0, 0.0),
            config.window.width.max(1) as f32 / config.window.height.max(1) as f32,
        );
        let controller = CameraController::new(config.camera.rotate_speed, config.camera.zoom_speed);
        let (input, subscription) = input::channel();

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene: Scene::new(),
                camera: CameraManager::new(camera, controller),
                input,
                subscription: Some(subscription),
                controller: None,
                fatal: None,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("Event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("Event loop terminated with an error")?;

        match self.app_state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_config = &self.config.window;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(window_config.title.clone())
                    .with_inner_size(PhysicalSize::new(window_config.width, window_config.height)),
            )
            .context("Failed to create window")?;
        let window_handle = Arc::new(window);

        let (width, height) = window_handle.inner_size().into();
        self.camera.camera.resize_projection(width, height);

        let renderer = pollster::block_on(RenderEngine::new(window_handle.clone(), width, height))
            .context("Failed to initialize the render engine")?;

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );

        let subscription = self
            .subscription
            .take()
            .context("Scene was already populated")?;
        let controller = populate_scene(
            &self.config,
            &mut self.scene,
            &ObjLoader::default(),
            subscription,
            (width, height),
        )
        .context("Failed to build the scene")?;

        log::info!(
            "Scene ready: {} objects, {} templates",
            self.scene.object_count(),
            controller.templates().len()
        );

        self.controller = Some(controller);
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.window = Some(window_handle);
        Ok(())
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.initialize(event_loop) {
            log::error!("{:#}", e);
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // The overlay gets first pick; whatever it captures stops here.
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_input(window, window_id, &event) {
                window.request_redraw();
                return;
            }
        }

        self.camera.process_window_event(&event);
        self.input.forward_window_event(&event);

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera.camera.resize_projection(width, height);
                render_engine.resize(width, height);
            }
            WindowEvent::RedrawRequested => {
                let status = match self.controller.as_mut() {
                    Some(controller) => {
                        if let Err(e) = controller.pump(&mut self.scene, &self.camera.camera) {
                            log::error!("Placement failed: {}", e);
                        }
                        Some(PlacementStatus::capture(controller, &self.scene))
                    }
                    None => None,
                };

                let camera_uniform = CameraUniform::from_camera(&self.camera.camera);
                render_engine.sync_scene(&mut self.scene, &camera_uniform);

                let result = match (self.ui_manager.as_mut(), status) {
                    (Some(ui_manager), Some(status)) => {
                        let window = window.clone();
                        render_engine.render_frame(
                            &self.scene,
                            Some(|device: &wgpu::Device,
                                  queue: &wgpu::Queue,
                                  encoder: &mut wgpu::CommandEncoder,
                                  color_attachment: &wgpu::TextureView| {
                                ui_manager.draw(device, queue, encoder, &window, color_attachment, |ui| {
                                    placement_panel(ui, &status);
                                });
                            }),
                        )
                    }
                    _ => render_engine.render_frame(
                        &self.scene,
                        None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
                    ),
                };

                if let Err(e) = result {
                    log::error!("{:#}", e);
                    self.fatal = Some(e);
                    event_loop.exit();
                }
            }
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self
            .ui_manager
            .as_ref()
            .is_some_and(|ui_manager| ui_manager.wants_input())
        {
            return;
        }

        self.camera.process_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
