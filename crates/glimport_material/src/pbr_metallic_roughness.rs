// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sub-graphs for the core glTF material inputs.
//!
//! Base color, emission, normal and occlusion are wired the same way by
//! every workflow, so they live here and take the destination sockets as
//! arguments.

use crate::error::ImportError;
use crate::gltf::{uv_map_name, AlphaMode, EMISSIVE_STRENGTH};
use crate::helper::MaterialHelper;
use crate::material_utils::color_factor_and_texture;
use crate::pbr_specular_glossiness::EXTENSION_NAME as SPECULAR_GLOSSINESS;
use crate::texture::{texture, TextureNode};
use glimport_graph::graphs::shader::{GLTF_SETTINGS, MATH, MIX_RGB, NORMAL_MAP, SEPARATE_COLOR, VERTEX_COLOR};
use glimport_graph::node::{BlendType, MathOperation, NodeSettings};
use glimport_graph::{NodeId, PortValue, SocketRef};

/// Create the shared settings node.
///
/// Call through [`MaterialHelper::settings_node`], which guarantees a
/// single instance per material.
pub fn make_settings_node(mh: &mut MaterialHelper) -> Result<NodeId, ImportError> {
    let mut node = mh.create_node(GLTF_SETTINGS)?.with_position(10.0, 425.0);
    node.width = Some(240.0);
    let id = mh.add(node);
    tracing::debug!("Created settings node for '{}'", mh.graph.name);
    Ok(id)
}

/// Destination of [`base_color`]
#[derive(Debug, Clone, Copy)]
pub struct BaseColorTarget {
    /// Read `diffuseFactor`/`diffuseTexture` from the specular-glossiness extension
    pub is_diffuse: bool,
    /// Block anchor
    pub location: [f32; 2],
    /// Color destination
    pub color_socket: SocketRef,
    /// Alpha destination, ignored for opaque materials
    pub alpha_socket: Option<SocketRef>,
}

/// Wire base color: `factor * texture * vertex color`.
pub fn base_color(mh: &mut MaterialHelper, target: BaseColorTarget) -> Result<(), ImportError> {
    let [mut x, y] = target.location;

    let (factor, base_texture) = if target.is_diffuse {
        let ext = mh.get_ext(SPECULAR_GLOSSINESS);
        (
            ext.vec4_or("diffuseFactor", [1.0; 4]),
            ext.texture_info("diffuseTexture")?,
        )
    } else {
        let pbr = mh.material.pbr_metallic_roughness.as_ref();
        (
            pbr.and_then(|p| p.base_color_factor).unwrap_or([1.0; 4]),
            pbr.and_then(|p| p.base_color_texture.clone()),
        )
    };

    let color_socket = target.color_socket;
    let alpha_socket = match mh.material.alpha_mode {
        AlphaMode::Opaque => None,
        AlphaMode::Mask | AlphaMode::Blend => target.alpha_socket,
    };
    let [r, g, b, a] = factor;

    if base_texture.is_none() && !mh.vertex_color {
        mh.set_default(color_socket, PortValue::Color([r, g, b, 1.0]))?;
        if let Some(alpha) = alpha_socket {
            mh.set_default(alpha, PortValue::Float(a))?;
        }
        return Ok(());
    }

    let mut color_socket = color_socket;
    let mut alpha_socket = alpha_socket;

    let needs_color_factor = [r, g, b] != [1.0, 1.0, 1.0];
    let needs_alpha_factor = a != 1.0 && alpha_socket.is_some();
    if needs_color_factor {
        let node = mh
            .create_node(MIX_RGB)?
            .with_label("Color Factor")
            .with_position(x - 140.0, y)
            .with_settings(NodeSettings::MixRgb { blend: BlendType::Multiply, use_clamp: false });
        let mix = mh.add(node);
        mh.link(mh.graph.output(mix, "Color")?, color_socket)?;
        mh.set_default(mh.graph.input(mix, "Fac")?, PortValue::Float(1.0))?;
        mh.set_default(mh.graph.input(mix, "Color2")?, PortValue::Color([r, g, b, 1.0]))?;
        color_socket = mh.graph.input(mix, "Color1")?;
    }
    if let (true, Some(alpha)) = (needs_alpha_factor, alpha_socket) {
        let node = mh
            .create_node(MATH)?
            .with_label("Alpha Factor")
            .with_position(x - 140.0, y - 200.0)
            .with_settings(NodeSettings::Math { operation: MathOperation::Multiply, use_clamp: false });
        let math = mh.add(node);
        mh.link(mh.graph.output_at(math, 0)?, alpha)?;
        mh.set_default(mh.graph.input_at(math, 1)?, PortValue::Float(a))?;
        alpha_socket = Some(mh.graph.input_at(math, 0)?);
    }
    if needs_color_factor || needs_alpha_factor {
        x -= 200.0;
    }

    // Where the texture and vertex color outputs land
    let (mut texture_color, mut texture_alpha) = (color_socket, alpha_socket);
    let (mut vcolor_color, mut vcolor_alpha) = (color_socket, alpha_socket);

    if base_texture.is_some() && mh.vertex_color {
        let node = mh
            .create_node(MIX_RGB)?
            .with_position(x - 140.0, y)
            .with_settings(NodeSettings::MixRgb { blend: BlendType::Multiply, use_clamp: false });
        let mix = mh.add(node);
        mh.link(mh.graph.output(mix, "Color")?, color_socket)?;
        mh.set_default(mh.graph.input(mix, "Fac")?, PortValue::Float(1.0))?;
        texture_color = mh.graph.input(mix, "Color1")?;
        vcolor_color = mh.graph.input(mix, "Color2")?;

        if let Some(alpha) = alpha_socket {
            let node = mh
                .create_node(MATH)?
                .with_position(x - 140.0, y - 200.0)
                .with_settings(NodeSettings::Math { operation: MathOperation::Multiply, use_clamp: false });
            let math = mh.add(node);
            mh.link(mh.graph.output_at(math, 0)?, alpha)?;
            texture_alpha = Some(mh.graph.input_at(math, 0)?);
            vcolor_alpha = Some(mh.graph.input_at(math, 1)?);
        }
        x -= 200.0;
    }

    if mh.vertex_color {
        let node = mh.create_node(VERTEX_COLOR)?.with_position(x - 250.0, y - 240.0);
        let vcolor = mh.add(node);
        mh.link(mh.graph.output(vcolor, "Color")?, vcolor_color)?;
        if let Some(alpha) = vcolor_alpha {
            mh.link(mh.graph.output(vcolor, "Alpha")?, alpha)?;
        }
    }

    if let Some(tex_info) = &base_texture {
        let label = if target.is_diffuse { "DIFFUSE" } else { "BASE COLOR" };
        texture(
            mh,
            TextureNode {
                tex_info,
                location: [x, y],
                label,
                color_socket: Some(texture_color),
                alpha_socket: texture_alpha,
                is_data: false,
            },
        )?;
    }

    Ok(())
}

/// Wire emission color and strength.
///
/// Grey emissive factors over a texture are folded into the strength so
/// that no multiply node is needed.
pub fn emission(
    mh: &mut MaterialHelper,
    location: [f32; 2],
    color_socket: SocketRef,
    strength_socket: SocketRef,
) -> Result<(), ImportError> {
    if !mh.needs_emissive() {
        return Ok(());
    }

    let material = mh.material;
    let mut factor = material.emissive_factor();
    let strength = mh.get_ext(EMISSIVE_STRENGTH).f32_or("emissiveStrength", 1.0);
    let emissive_texture = material.emissive_texture.as_ref();

    if emissive_texture.is_some() && factor[0] == factor[1] && factor[1] == factor[2] {
        mh.set_default(strength_socket, PortValue::Float(factor[0] * strength))?;
        factor = [1.0, 1.0, 1.0];
    } else {
        mh.set_default(strength_socket, PortValue::Float(strength))?;
    }

    color_factor_and_texture(mh, location, "Emissive", color_socket, factor, emissive_texture)
}

/// Wire the normal map, if any.
pub fn normal(mh: &mut MaterialHelper, location: [f32; 2], normal_socket: SocketRef) -> Result<(), ImportError> {
    let material = mh.material;
    let Some(tex_info) = material.normal_texture.as_ref() else {
        return Ok(());
    };
    let [x, y] = location;

    let uv_index = tex_info.uv_index()?;
    let node = mh
        .create_node(NORMAL_MAP)?
        .with_position(x - 150.0, y - 40.0)
        .with_settings(NodeSettings::NormalMap { uv_map: Some(uv_map_name(uv_index)) });
    let normal_map = mh.add(node);
    mh.set_default(
        mh.graph.input(normal_map, "Strength")?,
        PortValue::Float(tex_info.scale.unwrap_or(1.0)),
    )?;
    mh.link(mh.graph.output(normal_map, "Normal")?, normal_socket)?;

    let color = mh.graph.input(normal_map, "Color")?;
    texture(
        mh,
        TextureNode {
            tex_info,
            location: [x - 200.0, y],
            label: "NORMALMAP",
            color_socket: Some(color),
            alpha_socket: None,
            is_data: true,
        },
    )?;
    Ok(())
}

/// Wire the occlusion map's red channel, if any.
pub fn occlusion(mh: &mut MaterialHelper, location: [f32; 2], occlusion_socket: SocketRef) -> Result<(), ImportError> {
    let material = mh.material;
    let Some(tex_info) = material.occlusion_texture.as_ref() else {
        return Ok(());
    };
    let [x, y] = location;

    let node = mh.create_node(SEPARATE_COLOR)?.with_position(x - 150.0, y - 75.0);
    let separate = mh.add(node);
    mh.link(mh.graph.output(separate, "Red")?, occlusion_socket)?;

    let color = mh.graph.input(separate, "Color")?;
    texture(
        mh,
        TextureNode {
            tex_info,
            location: [x - 200.0, y],
            label: "OCCLUSION",
            color_socket: Some(color),
            alpha_socket: None,
            is_data: true,
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsdf::{BsdfInput, PrincipledBsdf};
    use crate::gltf::GltfMaterial;
    use crate::settings::LayoutConfig;
    use glimport_graph::evaluation::{ShaderEvaluator, TextureSamples};
    use glimport_graph::graphs::shader::TEX_IMAGE;
    use serde_json::json;

    fn material(value: serde_json::Value) -> GltfMaterial {
        serde_json::from_value(value).unwrap()
    }

    fn with_bsdf<'a>(mat: &'a GltfMaterial, vertex_color: bool) -> (MaterialHelper<'a>, PrincipledBsdf) {
        let mut mh = MaterialHelper::new(mat, "Test", vertex_color, LayoutConfig::default());
        let bsdf = PrincipledBsdf::create(&mut mh, [10.0, 300.0]).unwrap();
        (mh, bsdf)
    }

    fn target(mh: &MaterialHelper, bsdf: PrincipledBsdf) -> BaseColorTarget {
        BaseColorTarget {
            is_diffuse: true,
            location: [-200.0, 0.0],
            color_socket: bsdf.input(&mh.graph, BsdfInput::BaseColor).unwrap(),
            alpha_socket: Some(bsdf.input(&mh.graph, BsdfInput::Alpha).unwrap()),
        }
    }

    #[test]
    fn test_diffuse_factor_without_texture() {
        let mat = material(json!({
            "alphaMode": "BLEND",
            "extensions": { "KHR_materials_pbrSpecularGlossiness": { "diffuseFactor": [0.5, 0.25, 1.0, 0.5] } }
        }));
        let (mut mh, bsdf) = with_bsdf(&mat, false);
        let t = target(&mh, bsdf);
        base_color(&mut mh, t).unwrap();

        assert_eq!(mh.graph.node_count(), 1);
        assert_eq!(mh.graph.default_value(t.color_socket), Some(PortValue::Color([0.5, 0.25, 1.0, 1.0])));
        assert_eq!(mh.graph.default_value(t.alpha_socket.unwrap()), Some(PortValue::Float(0.5)));
    }

    #[test]
    fn test_opaque_material_leaves_alpha_alone() {
        let mat = material(json!({
            "extensions": { "KHR_materials_pbrSpecularGlossiness": {
                "diffuseFactor": [1.0, 1.0, 1.0, 0.5],
                "diffuseTexture": { "index": 0 }
            } }
        }));
        let (mut mh, bsdf) = with_bsdf(&mat, false);
        let t = target(&mh, bsdf);
        base_color(&mut mh, t).unwrap();

        let alpha = t.alpha_socket.unwrap();
        assert!(!mh.graph.is_connected(alpha));
        assert_eq!(mh.graph.default_value(alpha), Some(PortValue::Float(1.0)));
        assert_eq!(mh.graph.nodes_of_type(MATH).count(), 0);
        assert_eq!(mh.graph.nodes_of_type(TEX_IMAGE).next().unwrap().display_name(), "DIFFUSE");
    }

    #[test]
    fn test_texture_factor_and_vertex_color_multiply() {
        let mat = material(json!({
            "alphaMode": "BLEND",
            "extensions": { "KHR_materials_pbrSpecularGlossiness": {
                "diffuseFactor": [0.5, 0.5, 0.5, 0.5],
                "diffuseTexture": { "index": 1 }
            } }
        }));
        let (mut mh, bsdf) = with_bsdf(&mat, true);
        let t = target(&mh, bsdf);
        base_color(&mut mh, t).unwrap();

        let mut evaluator = ShaderEvaluator::new(TextureSamples::from([(1, [1.0, 0.5, 0.5, 0.5])]));
        evaluator.vertex_color = [0.5, 1.0, 1.0, 1.0];
        assert_eq!(
            evaluator.value_at(&mh.graph, t.color_socket).unwrap(),
            PortValue::Color([0.25, 0.25, 0.25, 1.0])
        );
        assert_eq!(
            evaluator.value_at(&mh.graph, t.alpha_socket.unwrap()).unwrap(),
            PortValue::Float(0.25)
        );
    }

    #[test]
    fn test_metallic_roughness_base_color() {
        let mat = material(json!({
            "pbrMetallicRoughness": { "baseColorFactor": [0.25, 0.5, 0.75, 1.0] }
        }));
        let (mut mh, bsdf) = with_bsdf(&mat, false);
        let mut t = target(&mh, bsdf);
        t.is_diffuse = false;
        base_color(&mut mh, t).unwrap();
        assert_eq!(mh.graph.default_value(t.color_socket), Some(PortValue::Color([0.25, 0.5, 0.75, 1.0])));
    }

    #[test]
    fn test_no_emission_leaves_sockets_alone() {
        let mat = material(json!({}));
        let (mut mh, bsdf) = with_bsdf(&mat, false);
        let color = bsdf.input(&mh.graph, BsdfInput::EmissionColor).unwrap();
        let strength = bsdf.input(&mh.graph, BsdfInput::EmissionStrength).unwrap();
        emission(&mut mh, [0.0, 0.0], color, strength).unwrap();
        assert_eq!(mh.graph.default_value(strength), Some(PortValue::Float(0.0)));
    }

    #[test]
    fn test_emission_factor_and_strength() {
        let mat = material(json!({
            "emissiveFactor": [1.0, 0.5, 0.0],
            "extensions": { "KHR_materials_emissive_strength": { "emissiveStrength": 4.0 } }
        }));
        let (mut mh, bsdf) = with_bsdf(&mat, false);
        let color = bsdf.input(&mh.graph, BsdfInput::EmissionColor).unwrap();
        let strength = bsdf.input(&mh.graph, BsdfInput::EmissionStrength).unwrap();
        emission(&mut mh, [0.0, 0.0], color, strength).unwrap();
        assert_eq!(mh.graph.default_value(color), Some(PortValue::Color([1.0, 0.5, 0.0, 1.0])));
        assert_eq!(mh.graph.default_value(strength), Some(PortValue::Float(4.0)));
    }

    #[test]
    fn test_grey_emission_folds_into_strength() {
        let mat = material(json!({
            "emissiveFactor": [0.5, 0.5, 0.5],
            "emissiveTexture": { "index": 0 }
        }));
        let (mut mh, bsdf) = with_bsdf(&mat, false);
        let color = bsdf.input(&mh.graph, BsdfInput::EmissionColor).unwrap();
        let strength = bsdf.input(&mh.graph, BsdfInput::EmissionStrength).unwrap();
        emission(&mut mh, [0.0, 0.0], color, strength).unwrap();
        assert_eq!(mh.graph.default_value(strength), Some(PortValue::Float(0.5)));
        assert_eq!(mh.graph.nodes_of_type(MIX_RGB).count(), 0);
        assert!(mh.graph.is_connected(color));
    }

    #[test]
    fn test_normal_map_strength_and_uv() {
        let mat = material(json!({ "normalTexture": { "index": 5, "scale": 0.5, "texCoord": 1 } }));
        let (mut mh, bsdf) = with_bsdf(&mat, false);
        let socket = bsdf.input(&mh.graph, BsdfInput::Normal).unwrap();
        normal(&mut mh, [-200.0, 0.0], socket).unwrap();

        let node = mh.graph.nodes_of_type(NORMAL_MAP).next().unwrap();
        assert_eq!(node.settings, NodeSettings::NormalMap { uv_map: Some("UVMap.001".to_string()) });
        let strength = mh.graph.input(node.id, "Strength").unwrap();
        assert_eq!(mh.graph.default_value(strength), Some(PortValue::Float(0.5)));
        assert_eq!(mh.graph.link_source(socket).map(|s| s.node), Some(node.id));
    }

    #[test]
    fn test_occlusion_uses_red_channel() {
        let mat = material(json!({ "occlusionTexture": { "index": 3 } }));
        let mut mh = MaterialHelper::new(&mat, "Test", false, LayoutConfig::default());
        let settings = mh.settings_node().unwrap();
        let socket = mh.graph.input(settings, "Occlusion").unwrap();
        occlusion(&mut mh, [-200.0, 0.0], socket).unwrap();

        let evaluator = ShaderEvaluator::new(TextureSamples::from([(3, [0.25, 0.5, 0.75, 1.0])]));
        assert_eq!(evaluator.value_at(&mh.graph, socket).unwrap(), PortValue::Float(0.25));
    }

    #[test]
    fn test_missing_textures_are_noops() {
        let mat = material(json!({}));
        let (mut mh, bsdf) = with_bsdf(&mat, false);
        let socket = bsdf.input(&mh.graph, BsdfInput::Normal).unwrap();
        normal(&mut mh, [0.0, 0.0], socket).unwrap();
        occlusion(&mut mh, [0.0, 0.0], socket).unwrap();
        assert_eq!(mh.graph.node_count(), 1);
    }
}
