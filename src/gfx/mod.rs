//! # Graphics Module
//!
//! Everything between the placement core and the GPU: the orbit camera, ray
//! picking against the ground plane, procedural geometry, the CPU-side scene
//! graph, material descriptors and the wgpu render engine.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Orbit camera with mouse controls
//! - **Geometry** ([`geometry`]) - Cube, sphere, cylinder and plane generators
//! - **Picking** ([`picking`]) - Screen-space rays and plane intersection
//! - **Scene Management** ([`scene`]) - Object handles, cloning and model loading
//! - **Resource Management** ([`resources`]) - Materials and global uniforms
//! - **Rendering Pipeline** ([`rendering`]) - Sky pass and lit/unlit mesh pass
//!
//! The scene is plain data and can be built and queried without a GPU; the
//! [`RenderEngine`] uploads whatever it needs lazily when a frame is drawn.

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
