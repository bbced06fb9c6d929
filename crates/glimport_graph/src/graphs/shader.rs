// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader node types used by imported materials.
//!
//! Socket names follow the node editor the graphs are written for, so an
//! importer can address sockets the same way an artist would read them.

use crate::node::{
    BlendType, ColorSpace, MathOperation, NodeCategory, NodeRegistry, NodeSettings, NodeType,
};
use crate::port::{Port, PortType, PortValue};

/// Principled BSDF
pub const BSDF_PRINCIPLED: &str = "bsdf_principled";
/// Material output
pub const OUTPUT_MATERIAL: &str = "output_material";
/// Scalar math
pub const MATH: &str = "math";
/// Color mix
pub const MIX_RGB: &str = "mix_rgb";
/// Image texture
pub const TEX_IMAGE: &str = "tex_image";
/// UV map attribute
pub const UV_MAP: &str = "uv_map";
/// Vector mapping (texture transforms)
pub const MAPPING: &str = "mapping";
/// Tangent space normal map
pub const NORMAL_MAP: &str = "normal_map";
/// RGB channel split
pub const SEPARATE_COLOR: &str = "separate_color";
/// Vertex color attribute
pub const VERTEX_COLOR: &str = "vertex_color";
/// Shared glTF settings group (occlusion, thickness, ...)
pub const GLTF_SETTINGS: &str = "gltf_settings";

/// Name of the node group behind [`GLTF_SETTINGS`]
pub const GLTF_SETTINGS_GROUP: &str = "glTF Material Output";

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Create the shader node registry with all node types the importer emits
pub fn create_shader_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Shader & Output
    // ========================================================================

    registry.register(NodeType {
        id: BSDF_PRINCIPLED.to_string(),
        name: "Principled BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Physically based surface shader".to_string(),
        inputs: vec![
            Port::input("Base Color", PortType::Color).with_default(PortValue::Color([0.8, 0.8, 0.8, 1.0])),
            Port::input("Metallic", PortType::Float).with_default(PortValue::Float(0.0)),
            Port::input("Roughness", PortType::Float).with_default(PortValue::Float(0.5)),
            Port::input("IOR", PortType::Float).with_default(PortValue::Float(1.5)),
            Port::input("Alpha", PortType::Float).with_default(PortValue::Float(1.0)),
            Port::input("Normal", PortType::Vector),
            Port::input("Specular IOR Level", PortType::Float).with_default(PortValue::Float(0.5)),
            Port::input("Specular Tint", PortType::Color).with_default(PortValue::Color(WHITE)),
            Port::input("Emission Color", PortType::Color).with_default(PortValue::Color(WHITE)),
            Port::input("Emission Strength", PortType::Float).with_default(PortValue::Float(0.0)),
        ],
        outputs: vec![Port::output("BSDF", PortType::Shader)],
        settings: NodeSettings::None,
    });

    registry.register(NodeType {
        id: OUTPUT_MATERIAL.to_string(),
        name: "Material Output".to_string(),
        category: NodeCategory::Output,
        description: "Final material output".to_string(),
        inputs: vec![
            Port::input("Surface", PortType::Shader),
            Port::input("Volume", PortType::Shader),
            Port::input("Displacement", PortType::Vector),
        ],
        outputs: vec![],
        settings: NodeSettings::None,
    });

    // ========================================================================
    // Math
    // ========================================================================

    registry.register(NodeType {
        id: MATH.to_string(),
        name: "Math".to_string(),
        category: NodeCategory::Math,
        description: "Scalar arithmetic".to_string(),
        inputs: vec![
            Port::input("Value", PortType::Float).with_default(PortValue::Float(0.5)),
            Port::input("Value", PortType::Float).with_default(PortValue::Float(0.5)),
        ],
        outputs: vec![Port::output("Value", PortType::Float)],
        settings: NodeSettings::Math {
            operation: MathOperation::Add,
            use_clamp: false,
        },
    });

    registry.register(NodeType {
        id: MIX_RGB.to_string(),
        name: "Mix".to_string(),
        category: NodeCategory::Math,
        description: "Blend two colors".to_string(),
        inputs: vec![
            Port::input("Fac", PortType::Float).with_default(PortValue::Float(0.5)),
            Port::input("Color1", PortType::Color).with_default(PortValue::Color([0.5, 0.5, 0.5, 1.0])),
            Port::input("Color2", PortType::Color).with_default(PortValue::Color([0.5, 0.5, 0.5, 1.0])),
        ],
        outputs: vec![Port::output("Color", PortType::Color)],
        settings: NodeSettings::MixRgb {
            blend: BlendType::Mix,
            use_clamp: false,
        },
    });

    registry.register(NodeType {
        id: SEPARATE_COLOR.to_string(),
        name: "Separate Color".to_string(),
        category: NodeCategory::Math,
        description: "Split a color into channels".to_string(),
        inputs: vec![Port::input("Color", PortType::Color).with_default(PortValue::Color(WHITE))],
        outputs: vec![
            Port::output("Red", PortType::Float),
            Port::output("Green", PortType::Float),
            Port::output("Blue", PortType::Float),
        ],
        settings: NodeSettings::None,
    });

    // ========================================================================
    // Texture & Input
    // ========================================================================

    registry.register(NodeType {
        id: TEX_IMAGE.to_string(),
        name: "Image Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Sample an image".to_string(),
        inputs: vec![Port::input("Vector", PortType::Vector)],
        outputs: vec![
            Port::output("Color", PortType::Color),
            Port::output("Alpha", PortType::Float),
        ],
        settings: NodeSettings::Image {
            texture: None,
            color_space: ColorSpace::Srgb,
        },
    });

    registry.register(NodeType {
        id: UV_MAP.to_string(),
        name: "UV Map".to_string(),
        category: NodeCategory::Input,
        description: "Named UV coordinates".to_string(),
        inputs: vec![],
        outputs: vec![Port::output("UV", PortType::Vector)],
        settings: NodeSettings::UvMap {
            uv_map: "UVMap".to_string(),
        },
    });

    registry.register(NodeType {
        id: VERTEX_COLOR.to_string(),
        name: "Color Attribute".to_string(),
        category: NodeCategory::Input,
        description: "Per-vertex color".to_string(),
        inputs: vec![],
        outputs: vec![
            Port::output("Color", PortType::Color),
            Port::output("Alpha", PortType::Float),
        ],
        settings: NodeSettings::None,
    });

    // ========================================================================
    // Vector
    // ========================================================================

    registry.register(NodeType {
        id: MAPPING.to_string(),
        name: "Mapping".to_string(),
        category: NodeCategory::Vector,
        description: "Translate, rotate and scale coordinates".to_string(),
        inputs: vec![
            Port::input("Vector", PortType::Vector),
            Port::input("Location", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
            Port::input("Rotation", PortType::Vector).with_default(PortValue::Vector([0.0, 0.0, 0.0])),
            Port::input("Scale", PortType::Vector).with_default(PortValue::Vector([1.0, 1.0, 1.0])),
        ],
        outputs: vec![Port::output("Vector", PortType::Vector)],
        settings: NodeSettings::None,
    });

    registry.register(NodeType {
        id: NORMAL_MAP.to_string(),
        name: "Normal Map".to_string(),
        category: NodeCategory::Vector,
        description: "Decode a tangent space normal map".to_string(),
        inputs: vec![
            Port::input("Strength", PortType::Float).with_default(PortValue::Float(1.0)),
            Port::input("Color", PortType::Color).with_default(PortValue::Color([0.5, 0.5, 1.0, 1.0])),
        ],
        outputs: vec![Port::output("Normal", PortType::Vector)],
        settings: NodeSettings::NormalMap { uv_map: None },
    });

    // ========================================================================
    // Groups
    // ========================================================================

    registry.register(NodeType {
        id: GLTF_SETTINGS.to_string(),
        name: GLTF_SETTINGS_GROUP.to_string(),
        category: NodeCategory::Group,
        description: "glTF values with no principled BSDF counterpart".to_string(),
        inputs: vec![
            Port::input("Occlusion", PortType::Float).with_default(PortValue::Float(1.0)),
            Port::input("Thickness", PortType::Float).with_default(PortValue::Float(0.0)),
            Port::input("Specular", PortType::Float).with_default(PortValue::Float(1.0)),
            Port::input("Specular Color", PortType::Color).with_default(PortValue::Color(WHITE)),
        ],
        outputs: vec![],
        settings: NodeSettings::Group {
            name: GLTF_SETTINGS_GROUP.to_string(),
        },
    });

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_contains_all_importer_types() {
        let registry = create_shader_registry();
        for id in [
            BSDF_PRINCIPLED,
            OUTPUT_MATERIAL,
            MATH,
            MIX_RGB,
            TEX_IMAGE,
            UV_MAP,
            MAPPING,
            NORMAL_MAP,
            SEPARATE_COLOR,
            VERTEX_COLOR,
            GLTF_SETTINGS,
        ] {
            assert!(registry.get(id).is_some(), "missing node type {id}");
        }
        assert_eq!(registry.types().count(), 11);
    }

    #[test]
    fn test_bsdf_exposes_importer_sockets() {
        let registry = create_shader_registry();
        let bsdf = registry.create_node(BSDF_PRINCIPLED).unwrap();
        for name in [
            "Base Color",
            "Alpha",
            "Roughness",
            "IOR",
            "Normal",
            "Specular Tint",
            "Emission Color",
            "Emission Strength",
        ] {
            assert!(bsdf.input_named(name).is_some(), "missing socket {name}");
        }
    }

    #[test]
    fn test_texture_types_by_category() {
        let registry = create_shader_registry();
        let textures: Vec<_> = registry.types_in_category(NodeCategory::Texture).collect();
        assert_eq!(textures.len(), 1);
        assert_eq!(textures[0].id, TEX_IMAGE);
    }
}
