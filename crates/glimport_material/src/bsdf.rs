// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed access to the principled BSDF node.

use crate::error::ImportError;
use crate::helper::MaterialHelper;
use glimport_graph::graphs::shader::{BSDF_PRINCIPLED, OUTPUT_MATERIAL};
use glimport_graph::{Graph, GraphError, NodeId, SocketRef};

/// Inputs of the principled BSDF written by the importer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BsdfInput {
    /// Diffuse / base color
    BaseColor,
    /// Opacity
    Alpha,
    /// Metalness
    Metallic,
    /// Roughness
    Roughness,
    /// Index of refraction
    Ior,
    /// Tangent space normal
    Normal,
    /// Specular color
    SpecularTint,
    /// Emission color
    EmissionColor,
    /// Emission multiplier
    EmissionStrength,
}

impl BsdfInput {
    /// Socket name on the node
    pub fn socket_name(self) -> &'static str {
        match self {
            Self::BaseColor => "Base Color",
            Self::Alpha => "Alpha",
            Self::Metallic => "Metallic",
            Self::Roughness => "Roughness",
            Self::Ior => "IOR",
            Self::Normal => "Normal",
            Self::SpecularTint => "Specular Tint",
            Self::EmissionColor => "Emission Color",
            Self::EmissionStrength => "Emission Strength",
        }
    }
}

/// Handle to a principled BSDF node in a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrincipledBsdf {
    /// Node ID
    pub node: NodeId,
}

impl PrincipledBsdf {
    /// Add a principled BSDF at `location`
    pub fn create(mh: &mut MaterialHelper, location: [f32; 2]) -> Result<Self, ImportError> {
        let node = mh.create_node(BSDF_PRINCIPLED)?.with_position(location[0], location[1]);
        Ok(Self { node: mh.add(node) })
    }

    /// Add a material output at `location` fed by this BSDF
    pub fn connect_output(&self, mh: &mut MaterialHelper, location: [f32; 2]) -> Result<NodeId, ImportError> {
        let out = mh.create_node(OUTPUT_MATERIAL)?.with_position(location[0], location[1]);
        let out = mh.add(out);
        let from = mh.graph.output_at(self.node, 0)?;
        let to = mh.graph.input_at(out, 0)?;
        mh.link(from, to)?;
        Ok(out)
    }

    /// Socket for one of the importer's inputs
    pub fn input(&self, graph: &Graph, input: BsdfInput) -> Result<SocketRef, GraphError> {
        graph.input(self.node, input.socket_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gltf::GltfMaterial;
    use crate::settings::LayoutConfig;

    #[test]
    fn test_every_input_resolves() {
        let mat = GltfMaterial::default();
        let mut mh = MaterialHelper::new(&mat, "Test", false, LayoutConfig::default());
        let bsdf = PrincipledBsdf::create(&mut mh, [10.0, 300.0]).unwrap();
        for input in [
            BsdfInput::BaseColor,
            BsdfInput::Alpha,
            BsdfInput::Metallic,
            BsdfInput::Roughness,
            BsdfInput::Ior,
            BsdfInput::Normal,
            BsdfInput::SpecularTint,
            BsdfInput::EmissionColor,
            BsdfInput::EmissionStrength,
        ] {
            assert!(bsdf.input(&mh.graph, input).is_ok(), "{input:?}");
        }
    }

    #[test]
    fn test_output_is_linked() {
        let mat = GltfMaterial::default();
        let mut mh = MaterialHelper::new(&mat, "Test", false, LayoutConfig::default());
        let bsdf = PrincipledBsdf::create(&mut mh, [10.0, 300.0]).unwrap();
        let out = bsdf.connect_output(&mut mh, [300.0, 300.0]).unwrap();
        let surface = mh.graph.input(out, "Surface").unwrap();
        assert_eq!(mh.graph.link_source(surface).map(|s| s.node), Some(bsdf.node));
    }
}
