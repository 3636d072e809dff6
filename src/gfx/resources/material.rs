//! Material descriptors and record classification
//!
//! Typed code works with [`MaterialDescriptor`], a tagged enum. Untyped
//! material records (TOML tables from the config file, or records built from
//! OBJ/MTL data) are classified by the set of field names they carry and then
//! converted, so shape inference only ever happens at that boundary.
//!
//! Two templates exist, checked in priority order:
//!
//! | Kind       | Required fields                                               | Optional   |
//! |------------|---------------------------------------------------------------|------------|
//! | `Basic`    | `color`, `isFogAffected`                                      | `envMap`   |
//! | `Standard` | `normalMap`, `roughness`, `metalness`, `color`, `isFogAffected` | none     |
//!
//! `Standard` requires `roughness`, which `Basic` does not allow, so no field
//! set can match both templates.

use std::collections::BTreeSet;

use toml::Value;

use crate::error::{Result, SandboxError};

/// Field names understood in untyped material records.
pub mod field {
    pub const COLOR: &str = "color";
    pub const FOG: &str = "isFogAffected";
    pub const ENV_MAP: &str = "envMap";
    pub const NORMAL_MAP: &str = "normalMap";
    pub const ROUGHNESS: &str = "roughness";
    pub const METALNESS: &str = "metalness";
}

/// The material kinds a record can be classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    /// Unlit surface color, optionally tinted by an environment map.
    Basic,
    /// Lit surface with roughness and metalness.
    Standard,
}

struct Template {
    kind: MaterialKind,
    required: &'static [&'static str],
    optional: &'static [&'static str],
}

impl Template {
    fn matches(&self, fields: &BTreeSet<&str>) -> bool {
        self.required.iter().all(|name| fields.contains(name))
            && fields
                .iter()
                .all(|name| self.required.contains(name) || self.optional.contains(name))
    }
}

// Priority order: the first matching template wins.
const TEMPLATES: [Template; 2] = [
    Template {
        kind: MaterialKind::Basic,
        required: &[field::COLOR, field::FOG],
        optional: &[field::ENV_MAP],
    },
    Template {
        kind: MaterialKind::Standard,
        required: &[
            field::NORMAL_MAP,
            field::ROUGHNESS,
            field::METALNESS,
            field::COLOR,
            field::FOG,
        ],
        optional: &[],
    },
];

/// Determines the material kind of a record from its field names alone.
///
/// Order and duplicates in `fields` are irrelevant; values are never looked
/// at. A set that matches no template yields
/// [`SandboxError::UnknownMaterialKind`] carrying the sorted field names.
pub fn classify<I, S>(fields: I) -> Result<MaterialKind>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let owned: BTreeSet<String> = fields
        .into_iter()
        .map(|name| name.as_ref().to_owned())
        .collect();
    let names: BTreeSet<&str> = owned.iter().map(String::as_str).collect();

    TEMPLATES
        .iter()
        .find(|template| template.matches(&names))
        .map(|template| template.kind)
        .ok_or_else(|| SandboxError::UnknownMaterialKind {
            fields: owned.into_iter().collect(),
        })
}

/// Surface-only material: drawn with its flat color, no lighting.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicMaterial {
    pub color: [f32; 3],
    pub fog: bool,
    /// Environment map name. Kept as metadata; the sky tint stands in for it.
    pub env_map: Option<String>,
}

impl BasicMaterial {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            color,
            fog: true,
            env_map: None,
        }
    }

    pub fn with_fog(mut self, fog: bool) -> Self {
        self.fog = fog;
        self
    }

    pub fn with_env_map(mut self, env_map: &str) -> Self {
        self.env_map = Some(env_map.to_owned());
        self
    }
}

/// Lit material with roughness and metalness.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    pub color: [f32; 3],
    pub fog: bool,
    /// Normal map name. Kept as metadata; shading uses vertex normals.
    pub normal_map: String,
    pub roughness: f32,
    pub metalness: f32,
}

impl StandardMaterial {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            color,
            fog: true,
            normal_map: String::new(),
            roughness: 0.5,
            metalness: 0.0,
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    pub fn with_fog(mut self, fog: bool) -> Self {
        self.fog = fog;
        self
    }
}

/// A typed material, one variant per [`MaterialKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialDescriptor {
    Basic(BasicMaterial),
    Standard(StandardMaterial),
}

impl Default for MaterialDescriptor {
    fn default() -> Self {
        MaterialDescriptor::Standard(StandardMaterial::new([0.8, 0.8, 0.8]))
    }
}

impl From<BasicMaterial> for MaterialDescriptor {
    fn from(material: BasicMaterial) -> Self {
        MaterialDescriptor::Basic(material)
    }
}

impl From<StandardMaterial> for MaterialDescriptor {
    fn from(material: StandardMaterial) -> Self {
        MaterialDescriptor::Standard(material)
    }
}

impl MaterialDescriptor {
    /// Classifies an untyped record and reads its values into the matching variant.
    pub fn from_record(record: &toml::Table) -> Result<Self> {
        let kind = classify(record.keys())?;
        let color = parse_color(required(record, field::COLOR)?)?;
        let fog = parse_bool(field::FOG, required(record, field::FOG)?)?;

        Ok(match kind {
            MaterialKind::Basic => MaterialDescriptor::Basic(BasicMaterial {
                color,
                fog,
                env_map: record
                    .get(field::ENV_MAP)
                    .map(|value| parse_string(field::ENV_MAP, value))
                    .transpose()?,
            }),
            MaterialKind::Standard => MaterialDescriptor::Standard(StandardMaterial {
                color,
                fog,
                normal_map: parse_string(field::NORMAL_MAP, required(record, field::NORMAL_MAP)?)?,
                roughness: parse_unit_float(field::ROUGHNESS, required(record, field::ROUGHNESS)?)?,
                metalness: parse_unit_float(field::METALNESS, required(record, field::METALNESS)?)?,
            }),
        })
    }

    pub fn kind(&self) -> MaterialKind {
        match self {
            MaterialDescriptor::Basic(_) => MaterialKind::Basic,
            MaterialDescriptor::Standard(_) => MaterialKind::Standard,
        }
    }

    pub fn color(&self) -> [f32; 3] {
        match self {
            MaterialDescriptor::Basic(material) => material.color,
            MaterialDescriptor::Standard(material) => material.color,
        }
    }

    pub fn is_fog_affected(&self) -> bool {
        match self {
            MaterialDescriptor::Basic(material) => material.fog,
            MaterialDescriptor::Standard(material) => material.fog,
        }
    }

    /// GPU layout of this material, with an optional per-object color override.
    pub fn to_uniform(&self, color_override: Option<[f32; 4]>) -> MaterialUniform {
        let [r, g, b] = self.color();
        let base_color = color_override.unwrap_or([r, g, b, 1.0]);
        let fog = if self.is_fog_affected() { 1.0 } else { 0.0 };

        let params = match self {
            MaterialDescriptor::Basic(material) => {
                let env = if material.env_map.is_some() { 1.0 } else { 0.0 };
                [0.0, 0.0, fog, env]
            }
            MaterialDescriptor::Standard(material) => [material.roughness, material.metalness, fog, 0.0],
        };

        MaterialUniform {
            base_color,
            params,
            lit: [
                if self.kind() == MaterialKind::Standard { 1.0 } else { 0.0 },
                0.0,
                0.0,
                0.0,
            ],
        }
    }
}

/// GPU uniform data for materials
///
/// `params` is `(roughness, metalness, fog, env)`; `lit.x` selects the lit path.
/// MUST match the MaterialUniform struct in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub params: [f32; 4],
    pub lit: [f32; 4],
}

fn required<'a>(record: &'a toml::Table, name: &str) -> Result<&'a Value> {
    record.get(name).ok_or_else(|| invalid(name, "missing"))
}

fn invalid(field: &str, reason: impl Into<String>) -> SandboxError {
    SandboxError::InvalidMaterialField {
        field: field.to_owned(),
        reason: reason.into(),
    }
}

fn parse_bool(name: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| invalid(name, format!("expected a boolean, found {}", value.type_str())))
}

fn parse_string(name: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| invalid(name, format!("expected a string, found {}", value.type_str())))
}

fn parse_number(name: &str, value: &Value) -> Result<f32> {
    match value {
        Value::Float(number) => Ok(*number as f32),
        Value::Integer(number) => Ok(*number as f32),
        other => Err(invalid(name, format!("expected a number, found {}", other.type_str()))),
    }
}

fn parse_unit_float(name: &str, value: &Value) -> Result<f32> {
    parse_number(name, value).map(|number| number.clamp(0.0, 1.0))
}

/// Reads `"#rrggbb"`, an integer `0xRRGGBB`, or an `[r, g, b]` array in 0..1.
pub fn parse_color(value: &Value) -> Result<[f32; 3]> {
    match value {
        Value::String(text) => {
            let hex = text.strip_prefix('#').unwrap_or(text);
            if hex.len() != 6 {
                return Err(invalid(field::COLOR, format!("'{text}' is not #rrggbb")));
            }
            u32::from_str_radix(hex, 16)
                .map(rgb_from_hex)
                .map_err(|err| invalid(field::COLOR, format!("'{text}': {err}")))
        }
        Value::Integer(packed) if (0..=0xFF_FFFF).contains(packed) => Ok(rgb_from_hex(*packed as u32)),
        Value::Integer(packed) => Err(invalid(
            field::COLOR,
            format!("{packed:#x} is outside 0x000000..=0xFFFFFF"),
        )),
        Value::Array(channels) if channels.len() == 3 => {
            let mut rgb = [0.0; 3];
            for (slot, channel) in rgb.iter_mut().zip(channels) {
                *slot = parse_number(field::COLOR, channel)?.clamp(0.0, 1.0);
            }
            Ok(rgb)
        }
        other => Err(invalid(
            field::COLOR,
            format!("expected \"#rrggbb\", 0xRRGGBB or [r, g, b], found {}", other.type_str()),
        )),
    }
}

fn rgb_from_hex(packed: u32) -> [f32; 3] {
    [
        ((packed >> 16) & 0xFF) as f32 / 255.0,
        ((packed >> 8) & 0xFF) as f32 / 255.0,
        (packed & 0xFF) as f32 / 255.0,
    ]
}
