// SPDX-License-Identifier: MIT OR Apache-2.0
//! Image texture nodes.

use crate::error::ImportError;
use crate::gltf::{uv_map_name, TextureInfo};
use crate::helper::MaterialHelper;
use glimport_graph::graphs::shader::{MAPPING, TEX_IMAGE, UV_MAP};
use glimport_graph::node::{ColorSpace, NodeSettings};
use glimport_graph::{NodeId, PortValue, SocketRef};

/// Width of an image texture node
pub const TEXTURE_NODE_WIDTH: f32 = 240.0;

/// Request for one image texture node
#[derive(Debug, Clone)]
pub struct TextureNode<'t> {
    /// Texture to sample
    pub tex_info: &'t TextureInfo,
    /// Right edge of the texture node
    pub location: [f32; 2],
    /// Frame label
    pub label: &'t str,
    /// Destination of the color output
    pub color_socket: Option<SocketRef>,
    /// Destination of the alpha output
    pub alpha_socket: Option<SocketRef>,
    /// Sample as linear data instead of color
    pub is_data: bool,
}

/// Create an image texture node and its UV inputs.
///
/// The node ends at `location`: it is placed one node width to the left so
/// that callers can anchor it directly left of the socket it feeds. UV map
/// and mapping nodes are only added when the texture samples a secondary UV
/// set or carries `KHR_texture_transform`.
pub fn texture(mh: &mut MaterialHelper, request: TextureNode) -> Result<NodeId, ImportError> {
    let [x, y] = request.location;
    let x = x - TEXTURE_NODE_WIDTH;

    let color_space = if request.is_data { ColorSpace::NonColor } else { ColorSpace::Srgb };
    let node = mh
        .create_node(TEX_IMAGE)?
        .with_position(x, y)
        .with_label(request.label)
        .with_settings(NodeSettings::Image {
            texture: Some(request.tex_info.index),
            color_space,
        });
    let tex = mh.add(node);

    if let Some(socket) = request.color_socket {
        let color = mh.graph.output(tex, "Color")?;
        mh.link(color, socket)?;
    }
    if let Some(socket) = request.alpha_socket {
        let alpha = mh.graph.output(tex, "Alpha")?;
        mh.link(alpha, socket)?;
    }

    let transform = request.tex_info.transform()?;
    let uv_index = request.tex_info.uv_index()?;
    if uv_index == 0 && transform.is_none() {
        return Ok(tex);
    }

    let mut x = x - 200.0;
    let mut uv_socket = mh.graph.input(tex, "Vector")?;

    if let Some(transform) = transform {
        let node = mh.create_node(MAPPING)?.with_position(x, y - 40.0);
        let mapping = mh.add(node);
        let (location, rotation, scale) = transform.to_mapping();
        mh.set_default(mh.graph.input(mapping, "Location")?, PortValue::Vector(location))?;
        mh.set_default(mh.graph.input(mapping, "Rotation")?, PortValue::Vector(rotation))?;
        mh.set_default(mh.graph.input(mapping, "Scale")?, PortValue::Vector(scale))?;

        let out = mh.graph.output(mapping, "Vector")?;
        mh.link(out, uv_socket)?;
        uv_socket = mh.graph.input(mapping, "Vector")?;
        x -= 200.0;
    }

    let node = mh
        .create_node(UV_MAP)?
        .with_position(x, y - 70.0)
        .with_settings(NodeSettings::UvMap { uv_map: uv_map_name(uv_index) });
    let uv = mh.add(node);
    let out = mh.graph.output(uv, "UV")?;
    mh.link(out, uv_socket)?;

    Ok(tex)
}
