//! End-to-end placement scenarios driven through the input channel, the way
//! the app drives them: events are queued, then pumped once per frame.

use cgmath::Vector3;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use winit::keyboard::KeyCode;

use gridscape::{
    app::populate_scene,
    config::SandboxConfig,
    gfx::{
        geometry::PrimitiveShape,
        picking::world_to_screen,
        resources::{classify, MaterialDescriptor, MaterialKind},
        scene::{ObjLoader, Scene, SceneGraph},
        OrbitCamera,
    },
    input::{channel, InputEvent, InputSender},
    placement::{
        GridCell, PlacementController, PlacementOutcome, PlacementSettings, PlacementState,
        Template,
    },
    SandboxError,
};

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

fn camera() -> OrbitCamera {
    OrbitCamera::new(12.0, 0.9, 0.4, Vector3::new(0.0, 0.0, 0.0), WIDTH / HEIGHT)
}

fn pointer_over(camera: &OrbitCamera, x: f32, z: f32) -> InputEvent {
    let (sx, sy) = world_to_screen(Vector3::new(x, 0.0, z), (WIDTH, HEIGHT), camera)
        .expect("point in front of the camera");
    InputEvent::PointerMoved { x: sx, y: sy }
}

struct Sandbox {
    scene: Scene,
    controller: PlacementController,
    input: InputSender,
    camera: OrbitCamera,
}

impl Sandbox {
    fn new() -> Self {
        let mut scene = Scene::new();
        let templates = PrimitiveShape::PLACEABLE
            .iter()
            .map(|shape| {
                Template::create(&mut scene, shape.name(), shape.generate(), MaterialDescriptor::default())
            })
            .collect();
        let (input, subscription) = channel();
        let controller = PlacementController::new(
            &mut scene,
            PlacementSettings::default(),
            templates,
            subscription,
            (WIDTH as u32, HEIGHT as u32),
        )
        .unwrap();

        Self {
            scene,
            controller,
            input,
            camera: camera(),
        }
    }

    fn send(&self, event: InputEvent) {
        assert!(self.input.send(event));
    }

    fn frame(&mut self) -> Vec<PlacementOutcome> {
        self.controller.pump(&mut self.scene, &self.camera).unwrap()
    }

    fn highlight_color(&self) -> Option<[f32; 4]> {
        self.scene
            .object(self.controller.highlight())
            .and_then(|object| object.color_override)
    }
}

#[test]
fn snapping_lands_on_cell_centers() {
    let cell = GridCell::snap(Vector3::new(2.3, 0.0, 4.9), 0.0);
    assert_eq!(cell, GridCell { x: 2.5, y: 0.0, z: 4.5 });
}

#[test]
fn hover_click_then_click_again_on_same_cell() {
    let mut sandbox = Sandbox::new();

    sandbox.send(pointer_over(&sandbox.camera, 0.3, 0.7));
    assert!(sandbox.frame().is_empty());
    assert_eq!(sandbox.controller.highlight_cell(), GridCell { x: 0.5, y: 0.0, z: 0.5 });
    assert!(!sandbox.controller.is_highlight_occupied());
    assert_eq!(sandbox.highlight_color(), Some(WHITE));

    sandbox.send(InputEvent::Click);
    let outcomes = sandbox.frame();
    let [PlacementOutcome::Placed { handle, .. }] = outcomes[..] else {
        panic!("expected one placement, got {:?}", outcomes);
    };
    assert_eq!(sandbox.scene.position(handle), Some(Vector3::new(0.5, 0.0, 0.5)));
    assert!(sandbox.scene.is_in_scene(handle));
    assert_eq!(sandbox.controller.occupancy().len(), 1);

    // Same screen position again: the hover now reports the cell as taken.
    sandbox.send(pointer_over(&sandbox.camera, 0.3, 0.7));
    sandbox.send(InputEvent::Click);
    let outcomes = sandbox.frame();
    assert!(matches!(outcomes[..], [PlacementOutcome::Occupied { .. }]));
    assert!(sandbox.controller.is_highlight_occupied());
    assert_eq!(sandbox.highlight_color(), Some(RED));
    assert_eq!(sandbox.controller.occupancy().len(), 1);
}

#[test]
fn distinct_cells_both_accept_placements() {
    let mut sandbox = Sandbox::new();

    sandbox.send(pointer_over(&sandbox.camera, 1.2, -2.6));
    sandbox.send(InputEvent::Click);
    sandbox.send(pointer_over(&sandbox.camera, -3.4, 2.1));
    sandbox.send(InputEvent::Click);
    let outcomes = sandbox.frame();

    let cells: Vec<GridCell> = outcomes
        .iter()
        .map(|outcome| match outcome {
            PlacementOutcome::Placed { cell, .. } => *cell,
            other => panic!("expected a placement, got {:?}", other),
        })
        .collect();
    assert_eq!(
        cells,
        vec![
            GridCell { x: 1.5, y: 0.0, z: -2.5 },
            GridCell { x: -3.5, y: 0.0, z: 2.5 },
        ]
    );
    assert_eq!(sandbox.controller.occupancy().len(), 2);
    // Ground is not part of this sandbox: highlight plus two clones.
    assert_eq!(sandbox.scene.visible_objects().count(), 3);
}

#[test]
fn pointer_above_the_horizon_changes_nothing() {
    let mut sandbox = Sandbox::new();
    sandbox.send(pointer_over(&sandbox.camera, 2.2, 2.2));
    sandbox.frame();
    let cell = sandbox.controller.highlight_cell();
    let color = sandbox.highlight_color();

    // A nearly level camera sees sky along the top edge of the screen.
    sandbox.camera = OrbitCamera::new(10.0, 0.2, 0.0, Vector3::new(0.0, 0.0, 0.0), WIDTH / HEIGHT);
    sandbox.send(InputEvent::PointerMoved { x: WIDTH / 2.0, y: 0.0 });
    sandbox.frame();

    assert_eq!(sandbox.controller.highlight_cell(), cell);
    assert_eq!(sandbox.highlight_color(), color);
    assert_eq!(
        sandbox.scene.position(sandbox.controller.highlight()),
        Some(cell.world_position())
    );
}

#[test]
fn click_before_any_hover_uses_origin_cell() {
    let mut sandbox = Sandbox::new();
    assert_eq!(sandbox.controller.state(), PlacementState::Idle);

    sandbox.send(InputEvent::Click);
    let outcomes = sandbox.frame();
    let [PlacementOutcome::Placed { cell, handle }] = outcomes[..] else {
        panic!("expected one placement, got {:?}", outcomes);
    };
    assert_eq!(cell, GridCell::origin(0.0));
    assert_eq!(sandbox.scene.position(handle), Some(Vector3::new(0.5, 0.0, 0.5)));
}

#[test]
fn number_keys_select_the_cloned_template() {
    let mut sandbox = Sandbox::new();
    sandbox.send(InputEvent::KeyDown(KeyCode::Digit2));
    sandbox.send(InputEvent::Click);
    let outcomes = sandbox.frame();

    let [PlacementOutcome::Placed { handle, .. }] = outcomes[..] else {
        panic!("expected one placement, got {:?}", outcomes);
    };
    let placed = sandbox.scene.object(handle).unwrap();
    assert!(placed.name.starts_with("sphere"), "{}", placed.name);
    assert_eq!(sandbox.controller.active_template().unwrap().name, "sphere");
}

#[test]
fn resize_keeps_picking_consistent() {
    let mut sandbox = Sandbox::new();
    sandbox.send(InputEvent::Resized { width: 1600, height: 1200 });
    sandbox.frame();

    sandbox.camera.resize_projection(1600, 1200);
    let (sx, sy) = world_to_screen(Vector3::new(-1.7, 0.0, -0.2), (1600.0, 1200.0), &sandbox.camera).unwrap();
    sandbox.send(InputEvent::PointerMoved { x: sx, y: sy });
    sandbox.frame();
    assert_eq!(sandbox.controller.highlight_cell(), GridCell { x: -1.5, y: 0.0, z: -0.5 });
}

#[test]
fn missing_model_falls_back_to_primitive() {
    let config = SandboxConfig::default()
        .with_fallback(PrimitiveShape::Sphere)
        .with_model_path("/definitely/not/here/chair.obj");
    let mut scene = Scene::new();
    let (_input, subscription) = channel();

    let controller =
        populate_scene(&config, &mut scene, &ObjLoader::default(), subscription, (800, 600)).unwrap();

    let names: Vec<&str> = controller.templates().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["sphere", "cube", "cylinder"]);
    assert_eq!(controller.active_template().unwrap().name, "sphere");
    // Ground and highlight are the only attached objects.
    assert_eq!(scene.visible_objects().count(), 2);
}

#[test]
fn loaded_model_becomes_active_template() {
    let dir = std::env::temp_dir().join(format!("gridscape-scenarios-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("wedge.obj");
    std::fs::write(
        &path,
        "o wedge\nv 0 0 0\nv 0 0 2\nv 2 0 0\nv 0 2 0\nf 1 2 3\nf 1 4 2\nf 1 3 4\nf 2 4 3\n",
    )
    .unwrap();

    let config = SandboxConfig::default().with_model_path(&path);
    let mut scene = Scene::new();
    let (input, subscription) = channel();
    let mut controller =
        populate_scene(&config, &mut scene, &ObjLoader::default(), subscription, (800, 600)).unwrap();

    assert_eq!(controller.active_template().unwrap().name, "wedge");
    assert_eq!(controller.templates().len(), 4);

    input.send(InputEvent::Click);
    let outcomes = controller.pump(&mut scene, &camera()).unwrap();
    let [PlacementOutcome::Placed { handle, .. }] = outcomes[..] else {
        panic!("expected one placement, got {:?}", outcomes);
    };
    assert!(scene.object(handle).unwrap().name.starts_with("wedge"));
}

#[test]
fn unknown_ground_material_is_reported() {
    let mut ground = toml::Table::new();
    ground.insert("color".into(), "#ffffff".into());
    let config = SandboxConfig::default().with_material("ground", ground);
    let mut scene = Scene::new();
    let (_input, subscription) = channel();

    let result = populate_scene(&config, &mut scene, &ObjLoader::default(), subscription, (800, 600));
    match result {
        Err(SandboxError::UnknownMaterialKind { fields }) => assert_eq!(fields, vec!["color"]),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("ground with only a color must not classify"),
    }
    assert_eq!(scene.object_count(), 0);
}

#[test]
fn classification_depends_only_on_field_names() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut basic = vec!["color", "isFogAffected"];
    let mut standard = vec!["normalMap", "roughness", "metalness", "color", "isFogAffected"];

    for _ in 0..16 {
        basic.shuffle(&mut rng);
        standard.shuffle(&mut rng);
        assert_eq!(classify(&basic).unwrap(), MaterialKind::Basic);
        assert_eq!(classify(&standard).unwrap(), MaterialKind::Standard);
    }

    assert!(matches!(
        classify(["color"]),
        Err(SandboxError::UnknownMaterialKind { .. })
    ));
}
