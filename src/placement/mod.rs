//! Grid placement
//!
//! Snaps ground hits to one-unit cells, tracks which cells hold an object and
//! drives the highlight tile and placement clicks.

pub mod controller;
pub mod grid;
pub mod occupancy;

pub use controller::{
    PlacementController, PlacementOutcome, PlacementSettings, PlacementState, Template,
};
pub use grid::GridCell;
pub use occupancy::{OccupancySet, OccupiedCell};
