// SPDX-License-Identifier: MIT OR Apache-2.0
//! `KHR_materials_pbrSpecularGlossiness` import.
//!
//! The extension's diffuse, specular and glossiness inputs map onto a
//! principled BSDF as follows:
//! - diffuse drives `Base Color` and `Alpha`
//! - specular drives `Specular Tint`, with `IOR` pushed high so the
//!   Fresnel term does not tint it again
//! - glossiness becomes `Roughness = 1 - glossinessFactor * texture.a`
//!
//! Each input's sub-graph is laid out in a block left of the BSDF; see
//! [`calc_locations`].

use crate::bsdf::{BsdfInput, PrincipledBsdf};
use crate::error::ImportError;
use crate::gltf::{ExtensionDict, TextureInfo};
use crate::helper::MaterialHelper;
use crate::material_utils::color_factor_and_texture;
use crate::pbr_metallic_roughness::{base_color, emission, normal, occlusion, BaseColorTarget};
use crate::texture::{texture, TextureNode};
use glimport_graph::graphs::shader::MATH;
use glimport_graph::node::{MathOperation, NodeSettings};
use glimport_graph::{PortValue, SocketRef};

/// Extension name
pub const EXTENSION_NAME: &str = "KHR_materials_pbrSpecularGlossiness";

/// IOR given to the BSDF so the specular tint is used as F0 unchanged.
///
/// F0 is the tint scaled by `((1 - ior) / (1 + ior))^2`, which is about 1
/// at this value.
pub const SPECULAR_IOR: f32 = 1000.0;

/// One group of nodes feeding one BSDF input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    /// Occlusion into the settings node
    Occlusion,
    /// Diffuse color and alpha
    Diffuse,
    /// Glossiness into roughness
    Glossiness,
    /// Normal map
    Normal,
    /// Specular tint
    Specular,
    /// Emission
    Emission,
}

impl Block {
    /// Blocks in top-to-bottom layout order
    pub const ALL: [Block; 6] = [
        Block::Occlusion,
        Block::Diffuse,
        Block::Glossiness,
        Block::Normal,
        Block::Specular,
        Block::Emission,
    ];

    /// Lowercase block name
    pub fn name(self) -> &'static str {
        match self {
            Self::Occlusion => "occlusion",
            Self::Diffuse => "diffuse",
            Self::Glossiness => "glossiness",
            Self::Normal => "normal",
            Self::Specular => "specular",
            Self::Emission => "emission",
        }
    }

    /// Whether the block produces nodes and so takes vertical space
    pub fn is_active(self, mh: &MaterialHelper, ext: &ExtensionDict) -> bool {
        match self {
            Self::Occlusion => mh.material.occlusion_texture.is_some(),
            Self::Diffuse => ext.contains("diffuseTexture") || mh.vertex_color,
            Self::Glossiness | Self::Specular => ext.contains("specularGlossinessTexture"),
            Self::Normal => mh.material.normal_texture.is_some(),
            Self::Emission => mh.needs_emissive(),
        }
    }
}

/// Anchor of every block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Locations {
    positions: [[f32; 2]; 6],
}

impl Locations {
    /// Anchor of one block
    pub fn get(&self, block: Block) -> [f32; 2] {
        self.positions[block as usize]
    }

    /// All anchors in layout order
    pub fn iter(&self) -> impl Iterator<Item = (Block, [f32; 2])> + '_ {
        Block::ALL.iter().map(|&block| (block, self.get(block)))
    }
}

/// Calculate where each block of the node graph is placed.
///
/// Blocks are stacked top to bottom on one column; inactive blocks take no
/// space and share their anchor with the next block. The stack is then
/// shifted so it is roughly centered on `y = 0`.
pub fn calc_locations(mh: &MaterialHelper, ext: &ExtensionDict) -> Locations {
    let layout = &mh.layout;
    let x = layout.column_x;
    let mut y = 0.0;
    let mut positions = [[0.0; 2]; 6];

    for block in Block::ALL {
        positions[block as usize] = [x, y];
        if block.is_active(mh, ext) {
            y -= layout.block_height;
        }
    }

    let total_height = -y;
    let y_offset = if total_height > 0.0 {
        total_height / 2.0 - layout.center_offset
    } else {
        0.0
    };
    for position in &mut positions {
        position[1] += y_offset;
    }

    Locations { positions }
}

/// Where glossiness comes from
#[derive(Debug, Clone, PartialEq)]
pub enum GlossinessSource {
    /// No texture: glossiness is the factor
    Constant(f32),
    /// Texture alpha with a factor of exactly 1
    Texture(TextureInfo),
    /// Texture alpha scaled by a factor
    Scaled {
        /// Glossiness texture
        texture: TextureInfo,
        /// `glossinessFactor`
        factor: f32,
    },
}

impl GlossinessSource {
    /// Read `glossinessFactor` and `specularGlossinessTexture`
    pub fn from_ext(ext: &ExtensionDict) -> Result<Self, ImportError> {
        let factor = ext.f32_or("glossinessFactor", 1.0);
        Ok(match ext.texture_info("specularGlossinessTexture")? {
            None => Self::Constant(factor),
            Some(texture) if factor == 1.0 => Self::Texture(texture),
            Some(texture) => Self::Scaled { texture, factor },
        })
    }
}

/// Wire `roughness = 1 - glossinessFactor * specularGlossinessTexture.a`.
pub fn glossiness(
    mh: &mut MaterialHelper,
    ext: &ExtensionDict,
    location: [f32; 2],
    roughness_socket: SocketRef,
) -> Result<(), ImportError> {
    let source = GlossinessSource::from_ext(ext)?;
    connect_roughness(mh, &source, location, roughness_socket)
}

/// Drive a roughness socket from a glossiness source.
///
/// Constants are folded into the socket value. Textures go through a
/// clamped `1 - x` node, preceded by a clamped multiply when scaled.
pub fn connect_roughness(
    mh: &mut MaterialHelper,
    source: &GlossinessSource,
    location: [f32; 2],
    roughness_socket: SocketRef,
) -> Result<(), ImportError> {
    let [x, y] = location;

    let (tex_info, factor) = match source {
        GlossinessSource::Constant(factor) => {
            let roughness = (1.0 - factor).clamp(0.0, 1.0);
            return mh.set_default(roughness_socket, PortValue::Float(roughness));
        }
        GlossinessSource::Texture(texture) => (texture, None),
        GlossinessSource::Scaled { texture, factor } => (texture, Some(*factor)),
    };

    let node = mh
        .create_node(MATH)?
        .with_label("1 - Glossiness")
        .with_position(x - 140.0, y - 50.0)
        .with_settings(NodeSettings::Math {
            operation: MathOperation::Subtract,
            use_clamp: true,
        });
    let subtract = mh.add(node);
    mh.set_default(mh.graph.input_at(subtract, 0)?, PortValue::Float(1.0))?;
    mh.link(mh.graph.output_at(subtract, 0)?, roughness_socket)?;
    let mut glossiness_socket = mh.graph.input_at(subtract, 1)?;

    let texture_x = match factor {
        Some(factor) => {
            let node = mh
                .create_node(MATH)?
                .with_label("Glossiness Factor")
                .with_position(x - 340.0, y)
                .with_settings(NodeSettings::Math {
                    operation: MathOperation::Multiply,
                    use_clamp: true,
                });
            let multiply = mh.add(node);
            mh.set_default(mh.graph.input_at(multiply, 1)?, PortValue::Float(factor))?;
            mh.link(mh.graph.output_at(multiply, 0)?, glossiness_socket)?;
            glossiness_socket = mh.graph.input_at(multiply, 0)?;
            x - 540.0
        }
        None => x - 340.0,
    };

    texture(
        mh,
        TextureNode {
            tex_info,
            location: [texture_x, y],
            label: "SPECULAR GLOSSINESS",
            color_socket: None,
            alpha_socket: Some(glossiness_socket),
            is_data: true,
        },
    )?;
    Ok(())
}

/// Build the node tree of a specular-glossiness material.
pub fn pbr_specular_glossiness(mh: &mut MaterialHelper) -> Result<(), ImportError> {
    let ext = mh.get_ext(EXTENSION_NAME);

    let bsdf = PrincipledBsdf::create(mh, [10.0, 300.0])?;
    bsdf.connect_output(mh, [300.0, 300.0])?;

    let locs = calc_locations(mh, &ext);

    let target = BaseColorTarget {
        is_diffuse: true,
        location: locs.get(Block::Diffuse),
        color_socket: bsdf.input(&mh.graph, BsdfInput::BaseColor)?,
        alpha_socket: Some(bsdf.input(&mh.graph, BsdfInput::Alpha)?),
    };
    base_color(mh, target)?;

    let color = bsdf.input(&mh.graph, BsdfInput::EmissionColor)?;
    let strength = bsdf.input(&mh.graph, BsdfInput::EmissionStrength)?;
    emission(mh, locs.get(Block::Emission), color, strength)?;

    let normal_socket = bsdf.input(&mh.graph, BsdfInput::Normal)?;
    normal(mh, locs.get(Block::Normal), normal_socket)?;

    if mh.material.occlusion_texture.is_some() {
        let settings = mh.settings_node()?;
        let occlusion_socket = mh.graph.input(settings, "Occlusion")?;
        occlusion(mh, locs.get(Block::Occlusion), occlusion_socket)?;
    }

    let ior = bsdf.input(&mh.graph, BsdfInput::Ior)?;
    mh.set_default(ior, PortValue::Float(SPECULAR_IOR))?;

    let specular_factor = ext.vec3_or("specularFactor", [1.0, 1.0, 1.0]);
    let specular_texture = ext.texture_info("specularGlossinessTexture")?;
    let tint = bsdf.input(&mh.graph, BsdfInput::SpecularTint)?;
    color_factor_and_texture(
        mh,
        locs.get(Block::Specular),
        "Specular Color",
        tint,
        specular_factor,
        specular_texture.as_ref(),
    )?;

    let roughness = bsdf.input(&mh.graph, BsdfInput::Roughness)?;
    glossiness(mh, &ext, locs.get(Block::Glossiness), roughness)?;

    tracing::debug!(
        "Built specular-glossiness graph '{}' ({} nodes, {} links)",
        mh.graph.name,
        mh.graph.node_count(),
        mh.graph.connection_count()
    );
    Ok(())
}
