//! Model import
//!
//! OBJ parsing is delegated to `tobj`. All sub-meshes of a file are merged
//! into one [`GeometryData`]; the MTL material of the first sub-mesh becomes
//! the model's material, built through the same record classifier the config
//! file uses.

use std::path::Path;

use toml::Value;

use crate::{
    error::{Result, SandboxError},
    gfx::{
        geometry::GeometryData,
        resources::material::{field, MaterialDescriptor},
    },
};

/// Geometry and material read from a model file.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub name: String,
    pub geometry: GeometryData,
    pub material: MaterialDescriptor,
}

/// Anything that can turn a path into a model.
pub trait ModelLoader {
    fn load_model(&self, path: &Path) -> Result<LoadedModel>;
}

/// Wavefront OBJ loader.
#[derive(Debug, Clone, Copy)]
pub struct ObjLoader {
    /// Rescale the model so it fits one grid cell and rests on the ground.
    pub fit_to_unit_cell: bool,
}

impl Default for ObjLoader {
    fn default() -> Self {
        Self {
            fit_to_unit_cell: true,
        }
    }
}

impl ModelLoader for ObjLoader {
    fn load_model(&self, path: &Path) -> Result<LoadedModel> {
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| SandboxError::ModelLoadFailure {
            path: path.to_path_buf(),
            source,
        })?;

        let materials = materials.unwrap_or_else(|err| {
            log::warn!("No usable MTL for {}: {err}, using default material", path.display());
            Vec::new()
        });

        let mut geometry = GeometryData::new();
        let mut has_all_normals = true;

        for model in &models {
            let mesh = &model.mesh;
            let base = geometry.positions.len() as u32;

            geometry
                .positions
                .extend(mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]));
            if mesh.normals.len() == mesh.positions.len() {
                geometry
                    .normals
                    .extend(mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]));
            } else {
                has_all_normals = false;
            }
            geometry.indices.extend(mesh.indices.iter().map(|i| i + base));
        }

        if geometry.is_empty() {
            return Err(SandboxError::EmptyModel {
                path: path.to_path_buf(),
            });
        }

        // Use normals from OBJ if every sub-mesh has them, otherwise calculate them
        if !has_all_normals {
            log::debug!("{} has missing normals, computing smooth normals", path.display());
            geometry.compute_normals();
        }
        if self.fit_to_unit_cell {
            geometry.fit_to_unit_cell();
        }

        let material = match models
            .first()
            .and_then(|model| model.mesh.material_id)
            .and_then(|id| materials.get(id))
        {
            Some(mtl) => MaterialDescriptor::from_record(&material_record(mtl))?,
            None => MaterialDescriptor::default(),
        };

        let name = models
            .iter()
            .map(|model| model.name.as_str())
            .find(|name| !name.is_empty())
            .map(str::to_owned)
            .or_else(|| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "model".to_owned());

        log::info!(
            "Loaded model '{}' from {} ({} vertices, {} triangles, {:?} material)",
            name,
            path.display(),
            geometry.vertex_count(),
            geometry.triangle_count(),
            material.kind()
        );

        Ok(LoadedModel {
            name,
            geometry,
            material,
        })
    }
}

/// Expresses an MTL material as an untyped record.
///
/// Illumination model 0 ("color on, ambient off") maps to the unlit shape;
/// everything else maps to the lit shape.
fn material_record(mtl: &tobj::Material) -> toml::Table {
    let mut record = toml::Table::new();
    let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);

    record.insert(
        field::COLOR.to_owned(),
        Value::Array(diffuse.iter().map(|c| Value::Float(f64::from(*c))).collect()),
    );
    record.insert(field::FOG.to_owned(), Value::Boolean(true));

    if mtl.illumination_model != Some(0) {
        // Convert shininess to roughness
        let roughness = 1.0 - (mtl.shininess.unwrap_or(32.0) / 128.0).clamp(0.0, 1.0);
        record.insert(
            field::NORMAL_MAP.to_owned(),
            Value::String(mtl.normal_texture.clone().unwrap_or_default()),
        );
        record.insert(field::ROUGHNESS.to_owned(), Value::Float(f64::from(roughness)));
        record.insert(field::METALNESS.to_owned(), Value::Float(0.0));
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::material::MaterialKind;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gridscape-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let result = ObjLoader::default().load_model(Path::new("/definitely/not/here.obj"));
        assert!(matches!(result, Err(SandboxError::ModelLoadFailure { .. })));
    }

    #[test]
    fn triangle_without_normals_gets_computed_normals() {
        let path = write_temp(
            "triangle.obj",
            "o tri\nv 0 0 0\nv 0 0 2\nv 2 0 0\nf 1 2 3\n",
        );
        let model = ObjLoader::default().load_model(&path).unwrap();

        assert_eq!(model.name, "tri");
        assert_eq!(model.geometry.triangle_count(), 1);
        assert_eq!(model.geometry.normals.len(), 3);
        assert!((model.geometry.normals[0][1] - 1.0).abs() < 1e-5);
        assert_eq!(model.material.kind(), MaterialKind::Standard);

        let (min, max) = model.geometry.bounds().unwrap();
        assert!((max[0] - min[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn file_without_faces_is_empty() {
        let path = write_temp("points.obj", "v 0 0 0\nv 1 0 0\n");
        assert!(matches!(
            ObjLoader::default().load_model(&path),
            Err(SandboxError::EmptyModel { .. })
        ));
    }

    #[test]
    fn unlit_mtl_becomes_basic_material() {
        let mut mtl = tobj::Material::default();
        mtl.diffuse = Some([0.2, 0.4, 0.6]);
        mtl.illumination_model = Some(0);
        let material = MaterialDescriptor::from_record(&material_record(&mtl)).unwrap();
        assert_eq!(material.kind(), MaterialKind::Basic);
        assert!((material.color()[1] - 0.4).abs() < 1e-6);

        mtl.illumination_model = Some(2);
        mtl.shininess = Some(64.0);
        let MaterialDescriptor::Standard(lit) =
            MaterialDescriptor::from_record(&material_record(&mtl)).unwrap()
        else {
            panic!("expected a standard material");
        };
        assert!((lit.roughness - 0.5).abs() < 1e-6);
    }
}
