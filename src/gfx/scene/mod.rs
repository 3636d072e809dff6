//! # Scene Management Module
//!
//! The CPU-side scene graph. Objects are created detached, cloned, moved,
//! recolored and attached through the [`SceneGraph`] contract; the render
//! engine draws whatever is attached.
//!
//! ## Key Components
//!
//! - [`Scene`] - Object storage keyed by [`ObjectHandle`], plus the environment
//! - [`Object`] - A shared [`Mesh`], a material descriptor and a position
//! - [`ObjLoader`] - OBJ/MTL import through `tobj`
//! - [`Vertex3D`] - GPU vertex layout
//!
//! ```rust
//! use gridscape::gfx::geometry::generate_cube;
//! use gridscape::gfx::resources::MaterialDescriptor;
//! use gridscape::gfx::scene::{Scene, SceneGraph};
//!
//! let mut scene = Scene::new();
//! let template = scene.create_mesh("cube", generate_cube(), MaterialDescriptor::default());
//! let placed = scene.clone_object(template).unwrap();
//! scene.add_to_scene(placed).unwrap();
//! assert_eq!(scene.visible_objects().count(), 1);
//! ```

pub mod loader;
pub mod object;
pub mod scene;
pub mod vertex;

use cgmath::Vector3;

use crate::{
    error::Result,
    gfx::{geometry::GeometryData, resources::material::MaterialDescriptor},
};

// Re-export main types
pub use loader::{LoadedModel, ModelLoader, ObjLoader};
pub use object::{DrawObject, Mesh, Object, ObjectUniform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;

/// Non-owning reference to an object in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectHandle(pub u64);

/// The operations the placement core needs from a scene.
pub trait SceneGraph {
    /// Creates a detached object from geometry and a typed material.
    fn create_mesh(
        &mut self,
        name: &str,
        geometry: GeometryData,
        material: MaterialDescriptor,
    ) -> ObjectHandle;

    /// Classifies an untyped material record and creates the object with it.
    ///
    /// Nothing is created when the record matches no material kind.
    fn create_mesh_from_record(
        &mut self,
        name: &str,
        geometry: GeometryData,
        record: &toml::Table,
    ) -> Result<ObjectHandle> {
        let material = MaterialDescriptor::from_record(record)?;
        Ok(self.create_mesh(name, geometry, material))
    }

    /// Creates a detached copy sharing the original's mesh.
    fn clone_object(&mut self, handle: ObjectHandle) -> Result<ObjectHandle>;

    fn set_position(&mut self, handle: ObjectHandle, position: Vector3<f32>) -> Result<()>;

    /// Overrides the object's material color.
    fn set_color(&mut self, handle: ObjectHandle, rgba: [f32; 4]) -> Result<()>;

    fn add_to_scene(&mut self, handle: ObjectHandle) -> Result<()>;

    fn remove_from_scene(&mut self, handle: ObjectHandle) -> Result<()>;

    fn position(&self, handle: ObjectHandle) -> Option<Vector3<f32>>;

    fn contains(&self, handle: ObjectHandle) -> bool;

    fn is_in_scene(&self, handle: ObjectHandle) -> bool;
}
