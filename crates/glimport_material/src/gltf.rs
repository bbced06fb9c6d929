// SPDX-License-Identifier: MIT OR Apache-2.0
//! glTF material records.
//!
//! Only the parts of a glTF document that material import reads are
//! modeled here. Everything else in the JSON is ignored.

use crate::error::ImportError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// The `KHR_texture_transform` extension name
pub const TEXTURE_TRANSFORM: &str = "KHR_texture_transform";
/// The `KHR_materials_emissive_strength` extension name
pub const EMISSIVE_STRENGTH: &str = "KHR_materials_emissive_strength";

/// Slice of a glTF document needed to import its materials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GltfDocument {
    /// Materials, indexed by glTF material index
    pub materials: Vec<GltfMaterial>,
    /// Meshes, used to find materials drawn with vertex colors
    pub meshes: Vec<GltfMesh>,
}

impl GltfDocument {
    /// Parse the JSON form of a glTF document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether any primitive using the material carries a `COLOR_0` attribute
    pub fn uses_vertex_color(&self, material_index: usize) -> bool {
        self.meshes
            .iter()
            .flat_map(|mesh| mesh.primitives.iter())
            .any(|prim| prim.material == Some(material_index) && prim.attributes.contains_key("COLOR_0"))
    }
}

/// A glTF mesh
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GltfMesh {
    /// Mesh name
    pub name: Option<String>,
    /// Primitives
    pub primitives: Vec<GltfPrimitive>,
}

/// A glTF mesh primitive
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GltfPrimitive {
    /// Vertex attributes by semantic
    pub attributes: HashMap<String, usize>,
    /// Material index
    pub material: Option<usize>,
}

/// Alpha blending mode of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlphaMode {
    /// Alpha is ignored
    #[default]
    Opaque,
    /// Alpha is compared against `alphaCutoff`
    Mask,
    /// Alpha blends with the background
    Blend,
}

/// A glTF material
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GltfMaterial {
    /// Material name
    pub name: Option<String>,
    /// Metallic-roughness parameters
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    /// Tangent space normal map (`scale` is the strength)
    pub normal_texture: Option<TextureInfo>,
    /// Ambient occlusion map (`strength` is unused by the node graph)
    pub occlusion_texture: Option<TextureInfo>,
    /// Emissive map
    pub emissive_texture: Option<TextureInfo>,
    /// Emissive color
    pub emissive_factor: Option<[f32; 3]>,
    /// Alpha mode
    pub alpha_mode: AlphaMode,
    /// Alpha cutoff for [`AlphaMode::Mask`]
    pub alpha_cutoff: Option<f32>,
    /// Whether back faces are rendered
    pub double_sided: bool,
    /// Extension objects keyed by extension name
    pub extensions: Map<String, Value>,
}

impl GltfMaterial {
    /// Display name, falling back to the material index
    pub fn display_name(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("Material.{index:03}"))
    }

    /// Emissive color, black when absent
    pub fn emissive_factor(&self) -> [f32; 3] {
        self.emissive_factor.unwrap_or([0.0, 0.0, 0.0])
    }
}

/// Metallic-roughness parameters of a material
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PbrMetallicRoughness {
    /// Base color factor
    pub base_color_factor: Option<[f32; 4]>,
    /// Base color texture
    pub base_color_texture: Option<TextureInfo>,
    /// Metalness factor
    pub metallic_factor: Option<f32>,
    /// Roughness factor
    pub roughness_factor: Option<f32>,
    /// Metallic (B) and roughness (G) texture
    pub metallic_roughness_texture: Option<TextureInfo>,
}

/// Reference to a glTF texture plus the UV set it is sampled with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureInfo {
    /// Texture index
    pub index: usize,
    /// UV set
    #[serde(default)]
    pub tex_coord: u32,
    /// Normal map strength
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    /// Occlusion strength
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
    /// Extension objects
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
}

impl TextureInfo {
    /// Texture reference with default UV set and no extensions
    pub fn new(index: usize) -> Self {
        Self {
            index,
            tex_coord: 0,
            scale: None,
            strength: None,
            extensions: Map::new(),
        }
    }

    /// Decode a raw texture dict
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// `KHR_texture_transform` of this reference, if any
    pub fn transform(&self) -> Result<Option<TextureTransform>, ImportError> {
        self.extensions
            .get(TEXTURE_TRANSFORM)
            .map(|value| {
                TextureTransform::deserialize(value).map_err(|source| ImportError::InvalidExtension {
                    key: TEXTURE_TRANSFORM.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// UV set actually sampled, honoring a transform's `texCoord` override
    pub fn uv_index(&self) -> Result<u32, ImportError> {
        Ok(self
            .transform()?
            .and_then(|t| t.tex_coord)
            .unwrap_or(self.tex_coord))
    }
}

/// `KHR_texture_transform` parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextureTransform {
    /// UV offset
    pub offset: [f32; 2],
    /// Rotation in radians, counter-clockwise
    pub rotation: f32,
    /// UV scale
    pub scale: [f32; 2],
    /// UV set override
    pub tex_coord: Option<u32>,
}

impl Default for TextureTransform {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0],
            rotation: 0.0,
            scale: [1.0, 1.0],
            tex_coord: None,
        }
    }
}

impl TextureTransform {
    /// Mapping node `(location, rotation, scale)` for this transform.
    ///
    /// glTF UVs have their origin at the top left; the node editor's at the
    /// bottom left, so the V axis is mirrored around the rotated scale.
    pub fn to_mapping(&self) -> ([f32; 3], [f32; 3], [f32; 3]) {
        let [offset_x, offset_y] = self.offset;
        let [scale_x, scale_y] = self.scale;
        let (sin, cos) = self.rotation.sin_cos();
        let location = [
            offset_x - scale_y * sin,
            1.0 - offset_y - scale_y * cos,
            0.0,
        ];
        (location, [0.0, 0.0, self.rotation], [scale_x, scale_y, 1.0])
    }
}

/// Name of the UV map attribute for a glTF UV set
pub fn uv_map_name(uv_index: u32) -> String {
    if uv_index == 0 {
        "UVMap".to_string()
    } else {
        format!("UVMap.{uv_index:03}")
    }
}

/// Key/value view of one material extension object
#[derive(Debug, Clone, Default)]
pub struct ExtensionDict {
    values: Map<String, Value>,
}

impl ExtensionDict {
    /// Wrap an extension object
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Whether the key holds a value; `null` counts as absent
    pub fn contains(&self, key: &str) -> bool {
        self.present(key).is_some()
    }

    fn present(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|value| !value.is_null())
    }

    /// Scalar value, `default` when absent or not a number
    pub fn f32_or(&self, key: &str, default: f32) -> f32 {
        match self.values.get(key) {
            None => default,
            Some(value) => value.as_f64().map_or_else(
                || {
                    tracing::warn!("Ignoring non-numeric '{}': {}", key, value);
                    default
                },
                |v| v as f32,
            ),
        }
    }

    /// Three component vector, `default` when absent or malformed
    pub fn vec3_or(&self, key: &str, default: [f32; 3]) -> [f32; 3] {
        self.array_or(key, default)
    }

    /// Four component vector, `default` when absent or malformed
    pub fn vec4_or(&self, key: &str, default: [f32; 4]) -> [f32; 4] {
        self.array_or(key, default)
    }

    fn array_or<const N: usize>(&self, key: &str, default: [f32; N]) -> [f32; N] {
        let Some(value) = self.values.get(key) else {
            return default;
        };
        match Vec::<f32>::deserialize(value).map(<[f32; N]>::try_from) {
            Ok(Ok(array)) => array,
            _ => {
                tracing::warn!("Ignoring malformed '{}': expected {} numbers, got {}", key, N, value);
                default
            }
        }
    }

    /// Texture reference stored under `key`, `None` when absent or `null`
    pub fn texture_info(&self, key: &str) -> Result<Option<TextureInfo>, ImportError> {
        self.present(key)
            .map(|value| {
                TextureInfo::from_value(value).map_err(|source| ImportError::InvalidExtension {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }
}
