// src/lib.rs
//! Gridscape
//!
//! A 3D scene sandbox built on wgpu and winit. Primitive meshes and OBJ models
//! are arranged on a ground grid: the mouse ray is intersected with the ground
//! plane, the hit is snapped to a grid cell, and clicking places a clone of the
//! active template object in that cell unless it is already occupied.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod placement;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::GridscapeApp;
pub use config::SandboxConfig;
pub use error::SandboxError;

/// Creates a sandbox application with the default configuration
pub fn default() -> anyhow::Result<GridscapeApp> {
    GridscapeApp::new(SandboxConfig::default())
}
