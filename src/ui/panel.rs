// src/ui/panel.rs
//! Placement status overlay

use crate::{
    gfx::scene::{Scene, SceneStatistics},
    placement::{GridCell, PlacementController, PlacementState},
};

/// Per-frame snapshot of what the overlay shows.
///
/// Captured before the UI callback runs so the panel never borrows the
/// controller or the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementStatus {
    pub state: PlacementState,
    pub hovered: GridCell,
    pub occupied: bool,
    pub placed: usize,
    /// Most recent placements first, at most [`RECENT_PLACEMENTS`].
    pub recent: Vec<GridCell>,
    pub templates: Vec<String>,
    pub active_template: usize,
    pub stats: SceneStatistics,
}

impl PlacementStatus {
    pub fn capture(controller: &PlacementController, scene: &Scene) -> Self {
        Self {
            state: controller.state(),
            hovered: controller.highlight_cell(),
            occupied: controller.is_highlight_occupied(),
            placed: controller.occupancy().len(),
            recent: controller
                .occupancy()
                .iter()
                .rev()
                .take(RECENT_PLACEMENTS)
                .map(|entry| entry.cell)
                .collect(),
            templates: controller
                .templates()
                .iter()
                .map(|template| template.name.clone())
                .collect(),
            active_template: controller.active_template_index(),
            stats: scene.get_statistics(),
        }
    }

    /// Short description of the hovered cell, e.g. `(2.5, 0.0, 4.5) free`.
    pub fn cell_label(&self) -> String {
        let flag = if self.occupied { "occupied" } else { "free" };
        match self.state {
            PlacementState::Idle => format!("{} {} (no hit yet)", self.hovered, flag),
            PlacementState::Highlighting => format!("{} {}", self.hovered, flag),
        }
    }
}

pub const RECENT_PLACEMENTS: usize = 5;

const FREE_TEXT: [f32; 4] = [0.8, 0.95, 0.8, 1.0];
const OCCUPIED_TEXT: [f32; 4] = [1.0, 0.45, 0.4, 1.0];
const ACTIVE_TEXT: [f32; 4] = [1.0, 0.85, 0.3, 1.0];

/// Small window in the top-left corner with the hovered cell, the template
/// list and scene counters.
pub fn placement_panel(ui: &imgui::Ui, status: &PlacementStatus) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    ui.window("Placement")
        .size([300.0, 0.0], imgui::Condition::FirstUseEver)
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .collapsible(true)
        .resizable(false)
        .build(|| {
            let color = if status.occupied { OCCUPIED_TEXT } else { FREE_TEXT };
            ui.text("Cell");
            ui.same_line();
            ui.text_colored(color, status.cell_label());
            ui.text(format!("Placed: {}", status.placed));
            for cell in &status.recent {
                ui.text_disabled(format!("  {}", cell));
            }

            ui.separator();
            ui.text("Templates");
            for (index, name) in status.templates.iter().enumerate() {
                let line = format!("[{}] {}", index + 1, name);
                if index == status.active_template {
                    ui.text_colored(ACTIVE_TEXT, line);
                } else {
                    ui.text_disabled(line);
                }
            }

            ui.separator();
            ui.text(format!(
                "Objects: {} ({} visible)",
                status.stats.object_count, status.stats.visible_count
            ));
            ui.text(format!("Triangles: {}", status.stats.total_triangles));
            ui.text_disabled("LMB place | RMB orbit | MMB pan | wheel zoom");
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::PrimitiveShape;
    use crate::gfx::resources::MaterialDescriptor;
    use crate::input::channel;
    use crate::placement::{PlacementSettings, Template};

    #[test]
    fn status_reflects_controller_after_placement() {
        let mut scene = Scene::new();
        let templates = vec![Template::create(
            &mut scene,
            "cube",
            PrimitiveShape::Cube.generate(),
            MaterialDescriptor::default(),
        )];
        let (_sender, subscription) = channel();
        let mut controller = PlacementController::new(
            &mut scene,
            PlacementSettings::default(),
            templates,
            subscription,
            (800, 600),
        )
        .unwrap();

        let before = PlacementStatus::capture(&controller, &scene);
        assert_eq!(before.state, PlacementState::Idle);
        assert_eq!(before.cell_label(), "(0.5, 0.0, 0.5) free (no hit yet)");
        assert!(before.recent.is_empty());

        controller.on_click(&mut scene).unwrap();
        let after = PlacementStatus::capture(&controller, &scene);
        assert!(after.occupied);
        assert_eq!(after.placed, 1);
        assert_eq!(after.recent, vec![GridCell::origin(0.0)]);
        assert_eq!(after.templates, vec!["cube".to_string()]);
        // Highlight plus the placed clone.
        assert_eq!(after.stats.visible_count, 2);
    }
}
