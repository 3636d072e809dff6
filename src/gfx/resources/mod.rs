// src/gfx/resources/mod.rs
//! GPU-facing resource descriptions
//!
//! Material descriptors (and the classifier that builds them from untyped
//! records) plus the global uniforms shared by every draw.

pub mod global_bindings;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{Environment, GlobalBindings, GlobalUBO, GlobalUniform, LightConfig};
pub use material::{
    classify, BasicMaterial, MaterialDescriptor, MaterialKind, MaterialUniform, StandardMaterial,
};
pub use texture_resource::DepthTexture;
