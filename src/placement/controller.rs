use winit::keyboard::KeyCode;

use crate::{
    error::Result,
    gfx::{
        camera::camera_utils::Camera,
        geometry::{generate_plane, GeometryData},
        picking::{cast_ray, GroundPlane},
        resources::material::{BasicMaterial, MaterialDescriptor},
        scene::{ObjectHandle, SceneGraph},
    },
    input::{InputEvent, InputSubscription},
};

use super::{grid::GridCell, occupancy::OccupancySet};

/// Keeps the highlight tile from z-fighting with the ground.
const HIGHLIGHT_LIFT: f32 = 0.01;

/// Whether the pointer has produced a ground hit yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    /// No ray has hit the ground; the highlight sits on the origin cell.
    Idle,
    /// The highlight follows the last ground hit.
    Highlighting,
}

/// Result of a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementOutcome {
    /// A clone of the active template now stands in `cell`.
    Placed { handle: ObjectHandle, cell: GridCell },
    /// The highlighted cell was already taken; nothing changed.
    Occupied { cell: GridCell },
    /// There is no template to clone.
    NoTemplate,
}

/// A prototype object cloned on placement. Never attached to the scene itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub handle: ObjectHandle,
}

impl Template {
    /// Creates the detached prototype in `scene`.
    pub fn create<S: SceneGraph>(
        scene: &mut S,
        name: &str,
        geometry: GeometryData,
        material: MaterialDescriptor,
    ) -> Self {
        let handle = scene.create_mesh(name, geometry, material);
        Self {
            name: name.to_owned(),
            handle,
        }
    }
}

/// Ground and colors the controller works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSettings {
    pub ground: GroundPlane,
    pub free_color: [f32; 4],
    pub occupied_color: [f32; 4],
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            ground: GroundPlane::new(0.0, None),
            free_color: [1.0, 1.0, 1.0, 1.0],
            occupied_color: [1.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Grid placement state machine.
///
/// Pointer moves cast a ray against the ground plane, snap the hit to a
/// cell, move the highlight there and recompute whether the cell is taken.
/// A click acts on whatever the last pointer move computed: a free cell gets
/// a clone of the active template, an occupied one is left alone. After a
/// placement the highlighted cell is known to be occupied, so the highlight
/// turns to the occupied color straight away.
pub struct PlacementController {
    state: PlacementState,
    settings: PlacementSettings,
    highlight: ObjectHandle,
    highlight_cell: GridCell,
    highlight_occupied: bool,
    occupancy: OccupancySet,
    templates: Vec<Template>,
    active_template: usize,
    viewport: (f32, f32),
    subscription: InputSubscription,
}

impl PlacementController {
    /// Creates the highlight tile in `scene` and starts out `Idle`.
    pub fn new<S: SceneGraph>(
        scene: &mut S,
        settings: PlacementSettings,
        templates: Vec<Template>,
        subscription: InputSubscription,
        viewport: (u32, u32),
    ) -> Result<Self> {
        let mut tile = generate_plane(1.0, 1.0, 1, 1);
        for position in &mut tile.positions {
            position[1] += HIGHLIGHT_LIFT;
        }
        let highlight = scene.create_mesh(
            "highlight",
            tile,
            BasicMaterial::new([1.0, 1.0, 1.0]).with_fog(false).into(),
        );

        let highlight_cell = GridCell::origin(settings.ground.height);
        scene.set_position(highlight, highlight_cell.world_position())?;
        scene.set_color(highlight, settings.free_color)?;
        scene.add_to_scene(highlight)?;

        if templates.is_empty() {
            log::warn!("Placement controller created without templates; clicks will do nothing");
        }

        Ok(Self {
            state: PlacementState::Idle,
            settings,
            highlight,
            highlight_cell,
            highlight_occupied: false,
            occupancy: OccupancySet::new(),
            templates,
            active_template: 0,
            viewport: (viewport.0 as f32, viewport.1 as f32),
            subscription,
        })
    }

    /// Handles every queued input event in arrival order.
    ///
    /// Returns the outcome of each click that was handled.
    pub fn pump<S: SceneGraph>(
        &mut self,
        scene: &mut S,
        camera: &impl Camera,
    ) -> Result<Vec<PlacementOutcome>> {
        let mut outcomes = Vec::new();
        while let Some(event) = self.subscription.try_next() {
            match event {
                InputEvent::PointerMoved { x, y } => {
                    self.on_pointer_move(scene, camera, x, y)?;
                }
                InputEvent::Click => outcomes.push(self.on_click(scene)?),
                InputEvent::KeyDown(key) => {
                    self.on_key_down(key);
                }
                InputEvent::Resized { width, height } => self.on_resize(width, height),
            }
        }
        Ok(outcomes)
    }

    /// Moves the highlight to the cell under the pointer.
    ///
    /// Returns `false` and changes nothing when the ray misses the ground.
    pub fn on_pointer_move<S: SceneGraph>(
        &mut self,
        scene: &mut S,
        camera: &impl Camera,
        x: f32,
        y: f32,
    ) -> Result<bool> {
        let hits = cast_ray((x, y), self.viewport, camera, &[&self.settings.ground]);
        let Some(hit) = hits.first() else {
            return Ok(false);
        };

        let cell = GridCell::snap(hit.point, self.settings.ground.height);
        let occupied = self.occupancy.is_occupied(&cell);

        if cell != self.highlight_cell || self.state == PlacementState::Idle {
            log::debug!("Highlight moved to {} (occupied: {})", cell, occupied);
        }

        scene.set_position(self.highlight, cell.world_position())?;
        scene.set_color(self.highlight, self.highlight_color(occupied))?;

        self.highlight_cell = cell;
        self.highlight_occupied = occupied;
        self.state = PlacementState::Highlighting;
        Ok(true)
    }

    /// Places a clone of the active template in the highlighted cell.
    pub fn on_click<S: SceneGraph>(&mut self, scene: &mut S) -> Result<PlacementOutcome> {
        let cell = self.highlight_cell;
        if self.highlight_occupied {
            log::debug!("Cell {} is occupied, nothing placed", cell);
            return Ok(PlacementOutcome::Occupied { cell });
        }
        let Some(template) = self.templates.get(self.active_template) else {
            return Ok(PlacementOutcome::NoTemplate);
        };

        let handle = scene.clone_object(template.handle)?;
        scene.set_position(handle, cell.world_position())?;
        self.highlight_occupied = true;
        scene.set_color(self.highlight, self.settings.occupied_color)?;

        // The clone stays detached unless the occupancy set takes it.
        if !self.occupancy.insert(handle, cell) {
            log::warn!("Cell {} was already taken; highlight flag was stale", cell);
            return Ok(PlacementOutcome::Occupied { cell });
        }
        scene.add_to_scene(handle)?;

        log::info!(
            "Placed '{}' at {} ({} placed)",
            template.name,
            cell,
            self.occupancy.len()
        );
        Ok(PlacementOutcome::Placed { handle, cell })
    }

    /// Digit keys 1-9 pick the active template. Returns `true` if it changed.
    pub fn on_key_down(&mut self, key: KeyCode) -> bool {
        let Some(index) = template_index(key) else {
            return false;
        };
        if index >= self.templates.len() || index == self.active_template {
            return false;
        }
        self.active_template = index;
        log::info!("Active template: {}", self.templates[index].name);
        true
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width as f32, height as f32);
    }

    /// Puts a freshly loaded model in front of the template list and makes it active.
    pub fn set_model_template(&mut self, template: Template) {
        log::info!("Model template '{}' is now active", template.name);
        self.templates.insert(0, template);
        self.active_template = 0;
    }

    fn highlight_color(&self, occupied: bool) -> [f32; 4] {
        if occupied {
            self.settings.occupied_color
        } else {
            self.settings.free_color
        }
    }

    pub fn state(&self) -> PlacementState {
        self.state
    }

    pub fn highlight(&self) -> ObjectHandle {
        self.highlight
    }

    pub fn highlight_cell(&self) -> GridCell {
        self.highlight_cell
    }

    pub fn is_highlight_occupied(&self) -> bool {
        self.highlight_occupied
    }

    pub fn occupancy(&self) -> &OccupancySet {
        &self.occupancy
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn active_template(&self) -> Option<&Template> {
        self.templates.get(self.active_template)
    }

    pub fn active_template_index(&self) -> usize {
        self.active_template
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }
}

fn template_index(key: KeyCode) -> Option<usize> {
    let index = match key {
        KeyCode::Digit1 | KeyCode::Numpad1 => 0,
        KeyCode::Digit2 | KeyCode::Numpad2 => 1,
        KeyCode::Digit3 | KeyCode::Numpad3 => 2,
        KeyCode::Digit4 | KeyCode::Numpad4 => 3,
        KeyCode::Digit5 | KeyCode::Numpad5 => 4,
        KeyCode::Digit6 | KeyCode::Numpad6 => 5,
        KeyCode::Digit7 | KeyCode::Numpad7 => 6,
        KeyCode::Digit8 | KeyCode::Numpad8 => 7,
        KeyCode::Digit9 | KeyCode::Numpad9 => 8,
        _ => return None,
    };
    Some(index)
}
