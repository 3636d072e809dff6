use std::fmt;

use cgmath::Vector3;

/// Center of a one-unit ground cell.
///
/// Cell centers sit on half-integer X/Z coordinates; `y` is the ground height
/// the cell was snapped on. Snapping produces exact values, so cells compare
/// with plain equality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl GridCell {
    /// Cell containing `point`, at the given ground height.
    pub fn snap(point: Vector3<f32>, ground_height: f32) -> Self {
        Self {
            x: point.x.floor() + 0.5,
            y: ground_height,
            z: point.z.floor() + 0.5,
        }
    }

    /// The cell highlighted before the pointer has ever hit the ground.
    pub fn origin(ground_height: f32) -> Self {
        Self {
            x: 0.5,
            y: ground_height,
            z: 0.5,
        }
    }

    /// Same column of the grid, ignoring height.
    pub fn same_xz(&self, other: &GridCell) -> bool {
        self.x == other.x && self.z == other.z
    }

    pub fn world_position(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}
