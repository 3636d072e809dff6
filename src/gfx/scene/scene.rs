use std::collections::BTreeMap;
use std::sync::Arc;

use cgmath::Vector3;

use crate::{
    error::{Result, SandboxError},
    gfx::{
        geometry::GeometryData,
        resources::{global_bindings::Environment, material::MaterialDescriptor},
    },
};

use super::{
    object::{Mesh, Object},
    ObjectHandle, SceneGraph,
};

/// Main scene containing every object, attached or not, plus the environment
///
/// Handles are issued in increasing order and never reused, so iterating the
/// scene visits objects in creation order.
pub struct Scene {
    objects: BTreeMap<ObjectHandle, Object>,
    next_id: u64,
    pub environment: Environment,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            next_id: 1,
            environment: Environment::default(),
        }
    }

    pub fn object(&self, handle: ObjectHandle) -> Option<&Object> {
        self.objects.get(&handle)
    }

    fn object_mut(&mut self, handle: ObjectHandle) -> Result<&mut Object> {
        self.objects
            .get_mut(&handle)
            .ok_or(SandboxError::UnknownObject(handle))
    }

    /// Objects currently added to the scene, in creation order.
    pub fn visible_objects(&self) -> impl Iterator<Item = (ObjectHandle, &Object)> {
        self.objects
            .iter()
            .filter(|(_, object)| object.in_scene)
            .map(|(handle, object)| (*handle, object))
    }

    pub fn visible_objects_mut(&mut self) -> impl Iterator<Item = &mut Object> {
        self.objects.values_mut().filter(|object| object.in_scene)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn insert_object(&mut self, object: Object) -> ObjectHandle {
        let handle = ObjectHandle(self.next_id);
        self.next_id += 1;
        self.objects.insert(handle, object);
        handle
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics {
            object_count: self.objects.len(),
            ..SceneStatistics::default()
        };

        for (_, object) in self.visible_objects() {
            let geometry = object.mesh.geometry();
            stats.visible_count += 1;
            stats.total_triangles += geometry.triangle_count();
            stats.total_vertices += geometry.vertex_count();
        }

        stats
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.values().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

impl SceneGraph for Scene {
    fn create_mesh(
        &mut self,
        name: &str,
        geometry: GeometryData,
        material: MaterialDescriptor,
    ) -> ObjectHandle {
        let name = self.ensure_unique_name(name);
        let object = Object::new(&name, Arc::new(Mesh::new(geometry)), material);
        log::debug!("Created mesh '{}' ({:?})", name, object.material.kind());
        self.insert_object(object)
    }

    fn clone_object(&mut self, handle: ObjectHandle) -> Result<ObjectHandle> {
        let original = self
            .objects
            .get(&handle)
            .ok_or(SandboxError::UnknownObject(handle))?;
        let copy = original.duplicate(format!("{}#{}", original.name, self.next_id));
        Ok(self.insert_object(copy))
    }

    fn set_position(&mut self, handle: ObjectHandle, position: Vector3<f32>) -> Result<()> {
        self.object_mut(handle)?.position = position;
        Ok(())
    }

    fn set_color(&mut self, handle: ObjectHandle, rgba: [f32; 4]) -> Result<()> {
        self.object_mut(handle)?.color_override = Some(rgba);
        Ok(())
    }

    fn add_to_scene(&mut self, handle: ObjectHandle) -> Result<()> {
        self.object_mut(handle)?.in_scene = true;
        Ok(())
    }

    fn remove_from_scene(&mut self, handle: ObjectHandle) -> Result<()> {
        self.object_mut(handle)?.in_scene = false;
        Ok(())
    }

    fn position(&self, handle: ObjectHandle) -> Option<Vector3<f32>> {
        self.objects.get(&handle).map(|object| object.position)
    }

    fn contains(&self, handle: ObjectHandle) -> bool {
        self.objects.contains_key(&handle)
    }

    fn is_in_scene(&self, handle: ObjectHandle) -> bool {
        self.objects.get(&handle).is_some_and(|object| object.in_scene)
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub visible_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}
