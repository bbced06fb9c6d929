// SPDX-License-Identifier: MIT OR Apache-2.0
//! Builders shared by the material workflows.

use crate::error::ImportError;
use crate::gltf::TextureInfo;
use crate::helper::MaterialHelper;
use crate::texture::{texture, TextureNode};
use glimport_graph::graphs::shader::MIX_RGB;
use glimport_graph::node::{BlendType, NodeSettings};
use glimport_graph::{PortValue, SocketRef};

/// Drive a color socket with `factor * texture`.
///
/// Without a texture the factor becomes the socket's value. A white factor
/// links the texture straight in; any other factor goes through a multiply
/// mix node.
pub fn color_factor_and_texture(
    mh: &mut MaterialHelper,
    location: [f32; 2],
    label: &str,
    socket: SocketRef,
    factor: [f32; 3],
    tex_info: Option<&TextureInfo>,
) -> Result<(), ImportError> {
    let [mut x, y] = location;

    let Some(tex_info) = tex_info else {
        let [r, g, b] = factor;
        return mh.set_default(socket, PortValue::Color([r, g, b, 1.0]));
    };

    let mut socket = socket;
    if factor != [1.0, 1.0, 1.0] {
        let [r, g, b] = factor;
        let node = mh
            .create_node(MIX_RGB)?
            .with_label(format!("{label} Factor"))
            .with_position(x - 140.0, y)
            .with_settings(NodeSettings::MixRgb {
                blend: BlendType::Multiply,
                use_clamp: false,
            });
        let mix = mh.add(node);
        let out = mh.graph.output(mix, "Color")?;
        mh.link(out, socket)?;
        mh.set_default(mh.graph.input(mix, "Fac")?, PortValue::Float(1.0))?;
        mh.set_default(mh.graph.input(mix, "Color2")?, PortValue::Color([r, g, b, 1.0]))?;
        socket = mh.graph.input(mix, "Color1")?;
        x -= 200.0;
    }

    let label = label.to_uppercase();
    texture(
        mh,
        TextureNode {
            tex_info,
            location: [x, y],
            label: &label,
            color_socket: Some(socket),
            alpha_socket: None,
            is_data: false,
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gltf::GltfMaterial;
    use crate::settings::LayoutConfig;
    use glimport_graph::evaluation::{ShaderEvaluator, TextureSamples};
    use glimport_graph::graphs::shader::{BSDF_PRINCIPLED, TEX_IMAGE};

    fn setup(mat: &GltfMaterial) -> (MaterialHelper<'_>, SocketRef) {
        let mut mh = MaterialHelper::new(mat, "Test", false, LayoutConfig::default());
        let bsdf = mh.create_node(BSDF_PRINCIPLED).unwrap();
        let bsdf = mh.add(bsdf);
        let socket = mh.graph.input(bsdf, "Specular Tint").unwrap();
        (mh, socket)
    }

    #[test]
    fn test_factor_only_sets_default() {
        let mat = GltfMaterial::default();
        let (mut mh, socket) = setup(&mat);
        color_factor_and_texture(&mut mh, [0.0, 0.0], "Specular Color", socket, [0.5, 0.25, 1.0], None).unwrap();
        assert_eq!(mh.graph.node_count(), 1);
        assert_eq!(mh.graph.default_value(socket), Some(PortValue::Color([0.5, 0.25, 1.0, 1.0])));
    }

    #[test]
    fn test_white_factor_links_texture_directly() {
        let mat = GltfMaterial::default();
        let (mut mh, socket) = setup(&mat);
        let info = TextureInfo::new(0);
        color_factor_and_texture(&mut mh, [0.0, 0.0], "Specular Color", socket, [1.0; 3], Some(&info)).unwrap();

        assert_eq!(mh.graph.nodes_of_type(MIX_RGB).count(), 0);
        let tex = mh.graph.nodes_of_type(TEX_IMAGE).next().unwrap();
        assert_eq!(tex.display_name(), "SPECULAR COLOR");
        assert_eq!(mh.graph.link_source(socket).map(|s| s.node), Some(tex.id));
    }

    #[test]
    fn test_tinted_factor_multiplies_texture() {
        let mat = GltfMaterial::default();
        let (mut mh, socket) = setup(&mat);
        let info = TextureInfo::new(2);
        color_factor_and_texture(&mut mh, [0.0, 0.0], "Specular Color", socket, [0.5, 0.5, 0.5], Some(&info)).unwrap();

        assert_eq!(mh.graph.nodes_of_type(MIX_RGB).count(), 1);
        let evaluator = ShaderEvaluator::new(TextureSamples::from([(2, [0.5, 1.0, 0.0, 1.0])]));
        let value = evaluator.value_at(&mh.graph, socket).unwrap();
        assert_eq!(value, PortValue::Color([0.25, 0.5, 0.0, 1.0]));
    }
}
