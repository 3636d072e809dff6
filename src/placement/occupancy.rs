use crate::gfx::scene::ObjectHandle;

use super::grid::GridCell;

/// A placed object and the cell it occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OccupiedCell {
    pub handle: ObjectHandle,
    pub cell: GridCell,
}

/// Cells holding a placed object, in placement order.
///
/// Membership is exact X/Z equality. Lookups scan linearly, which is fine at
/// the sizes a hand-placed grid reaches.
#[derive(Debug, Default, Clone)]
pub struct OccupancySet {
    entries: Vec<OccupiedCell>,
}

impl OccupancySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self, cell: &GridCell) -> bool {
        self.entries.iter().any(|entry| entry.cell.same_xz(cell))
    }

    /// Records `handle` in `cell`. Refuses (returns `false`) if the cell is taken.
    pub fn insert(&mut self, handle: ObjectHandle, cell: GridCell) -> bool {
        if self.is_occupied(&cell) {
            return false;
        }
        self.entries.push(OccupiedCell { handle, cell });
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &OccupiedCell> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn second_insert_into_same_cell_is_refused() {
        let mut set = OccupancySet::new();
        let cell = GridCell::snap(Vector3::new(3.2, 0.0, 1.1), 0.0);
        assert!(set.insert(ObjectHandle(1), cell));
        assert!(!set.insert(ObjectHandle(2), GridCell::snap(Vector3::new(3.9, 0.0, 1.8), 0.0)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().map(|entry| entry.handle), Some(ObjectHandle(1)));
    }

    #[test]
    fn neighbouring_cells_are_independent() {
        let mut set = OccupancySet::new();
        assert!(set.is_empty());
        assert!(set.insert(ObjectHandle(1), GridCell::origin(0.0)));
        assert!(!set.is_occupied(&GridCell::snap(Vector3::new(1.5, 0.0, 0.5), 0.0)));
        assert!(set.insert(ObjectHandle(2), GridCell::snap(Vector3::new(1.5, 0.0, 0.5), 0.0)));
        assert_eq!(
            set.iter().map(|entry| entry.handle).collect::<Vec<_>>(),
            vec![ObjectHandle(1), ObjectHandle(2)]
        );
    }
}
