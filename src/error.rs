//! Error types shared by the sandbox library.

use std::path::PathBuf;

use crate::gfx::scene::ObjectHandle;

/// Errors raised by material classification, model loading and scene access.
///
/// A ray that misses the ground plane is not an error; picking reports it as
/// an empty hit list.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// The field-name set of an untyped material record matches no template.
    #[error("unknown material kind for fields [{}]", fields.join(", "))]
    UnknownMaterialKind { fields: Vec<String> },

    /// A material record has the right shape but a value could not be read.
    #[error("invalid material field '{field}': {reason}")]
    InvalidMaterialField { field: String, reason: String },

    /// The model file could not be read or parsed.
    #[error("failed to load model {}: {source}", path.display())]
    ModelLoadFailure {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    /// The model parsed but contained no triangles.
    #[error("model {} contains no geometry", path.display())]
    EmptyModel { path: PathBuf },

    /// The handle does not refer to an object in this scene.
    #[error("no scene object with handle {0:?}")]
    UnknownObject(ObjectHandle),
}

pub type Result<T> = std::result::Result<T, SandboxError>;
