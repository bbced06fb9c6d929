// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-material import context.

use crate::error::ImportError;
use crate::gltf::{ExtensionDict, GltfMaterial};
use crate::pbr_metallic_roughness::make_settings_node;
use crate::settings::LayoutConfig;
use glimport_graph::graphs::shader::create_shader_registry;
use glimport_graph::node::NodeRegistry;
use glimport_graph::{Graph, Node, NodeId, PortValue, SocketRef};

/// State shared by the builders while one material is imported.
///
/// Owns the node graph under construction. Created per material and
/// consumed by [`MaterialHelper::finish`].
pub struct MaterialHelper<'a> {
    /// Graph under construction
    pub graph: Graph,
    /// Source material
    pub material: &'a GltfMaterial,
    /// Whether meshes using this material carry vertex colors
    pub vertex_color: bool,
    /// Block placement
    pub layout: LayoutConfig,
    registry: NodeRegistry,
    settings_node: Option<NodeId>,
}

impl<'a> MaterialHelper<'a> {
    /// Create a helper for one material
    pub fn new(material: &'a GltfMaterial, name: impl Into<String>, vertex_color: bool, layout: LayoutConfig) -> Self {
        Self {
            graph: Graph::new(name),
            material,
            vertex_color,
            layout,
            registry: create_shader_registry(),
            settings_node: None,
        }
    }

    /// Extension object by name, empty when the material does not use it
    pub fn get_ext(&self, name: &str) -> ExtensionDict {
        match self.material.extensions.get(name) {
            Some(serde_json::Value::Object(map)) => ExtensionDict::new(map.clone()),
            Some(other) => {
                tracing::warn!("Extension {} is not an object: {}", name, other);
                ExtensionDict::default()
            }
            None => ExtensionDict::default(),
        }
    }

    /// Whether the material declares an extension
    pub fn has_ext(&self, name: &str) -> bool {
        self.material.extensions.contains_key(name)
    }

    /// Whether the emission inputs need wiring
    pub fn needs_emissive(&self) -> bool {
        self.material.emissive_texture.is_some() || self.material.emissive_factor() != [0.0, 0.0, 0.0]
    }

    /// Instantiate a node type without adding it to the graph
    pub fn create_node(&self, type_id: &str) -> Result<Node, ImportError> {
        self.registry
            .create_node(type_id)
            .ok_or_else(|| ImportError::UnknownNodeType(type_id.to_string()))
    }

    /// Add a node to the graph
    pub fn add(&mut self, node: Node) -> NodeId {
        self.graph.add_node(node)
    }

    /// Link an output socket to an input socket
    pub fn link(&mut self, from: SocketRef, to: SocketRef) -> Result<(), ImportError> {
        self.graph.link(from, to)?;
        Ok(())
    }

    /// Set the value of an unconnected input
    pub fn set_default(&mut self, socket: SocketRef, value: PortValue) -> Result<(), ImportError> {
        self.graph.set_default(socket, value)?;
        Ok(())
    }

    /// Shared settings node of this material, created on first use
    pub fn settings_node(&mut self) -> Result<NodeId, ImportError> {
        if let Some(id) = self.settings_node {
            return Ok(id);
        }
        let id = make_settings_node(self)?;
        self.settings_node = Some(id);
        Ok(id)
    }

    /// Finish the import and hand out the graph
    pub fn finish(self) -> Graph {
        self.graph
    }
}
