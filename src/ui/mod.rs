//! # User Interface Module
//!
//! Dear ImGui overlay drawn on top of the scene.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture
//! - [`placement_panel`] - Hovered cell, template list and scene counters
//!
//! Events the overlay captures (pointer over a panel, focused text field) do
//! not reach the camera or the placement controller.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{placement_panel, PlacementStatus};
