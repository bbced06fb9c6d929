// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader node definitions.

use crate::port::{Port, PortId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Attribute inputs (UV maps, vertex colors)
    Input,
    /// Material outputs
    Output,
    /// BSDFs
    Shader,
    /// Math and color mixing
    Math,
    /// Image sampling
    Texture,
    /// Vector operations (mapping, normal maps)
    Vector,
    /// Node groups
    Group,
}

/// Arithmetic performed by a `math` node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MathOperation {
    /// `a + b`
    #[default]
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
}

impl MathOperation {
    /// Apply the operation to two scalars
    pub fn apply(self, a: f32, b: f32) -> f32 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
        }
    }
}

/// Blend mode of a `mix_rgb` node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BlendType {
    /// Linear interpolation between the two colors
    #[default]
    Mix,
    /// Component-wise product
    Multiply,
}

/// How an image's texels are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorSpace {
    /// Color data, decoded from sRGB
    #[default]
    Srgb,
    /// Linear data (normals, roughness, occlusion)
    NonColor,
}

/// Per-type node properties that are not sockets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum NodeSettings {
    /// No extra properties
    #[default]
    None,
    /// Scalar math
    Math {
        /// Operation
        operation: MathOperation,
        /// Clamp the result to `[0, 1]`
        use_clamp: bool,
    },
    /// Color mixing
    MixRgb {
        /// Blend mode
        blend: BlendType,
        /// Clamp the result to `[0, 1]`
        use_clamp: bool,
    },
    /// Image sampling
    Image {
        /// Index of the glTF texture sampled by this node
        texture: Option<usize>,
        /// How the texels are decoded
        color_space: ColorSpace,
    },
    /// UV map attribute lookup
    UvMap {
        /// Attribute name
        uv_map: String,
    },
    /// Tangent space normal map
    NormalMap {
        /// UV map used for tangents, `None` for the active one
        uv_map: Option<String>,
    },
    /// Instance of a node group
    Group {
        /// Group name
        name: String,
    },
}

/// Node type definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeType {
    /// Unique type identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Default input ports
    pub inputs: Vec<Port>,
    /// Default output ports
    pub outputs: Vec<Port>,
    /// Properties given to new instances
    pub settings: NodeSettings,
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node type ID
    pub node_type: String,
    /// Display name
    pub name: String,
    /// Frame label shown instead of the name, if set
    pub label: Option<String>,
    /// Position in the node editor
    pub position: [f32; 2],
    /// Width override in editor units
    pub width: Option<f32>,
    /// Input ports
    pub inputs: Vec<Port>,
    /// Output ports
    pub outputs: Vec<Port>,
    /// Type-specific properties
    pub settings: NodeSettings,
}

impl Node {
    /// Create a new node from a type definition
    pub fn new(node_type: &NodeType) -> Self {
        Self {
            id: NodeId::new(),
            node_type: node_type.id.clone(),
            name: node_type.name.clone(),
            label: None,
            position: [0.0, 0.0],
            width: None,
            inputs: node_type.inputs.iter().map(Port::instantiate).collect(),
            outputs: node_type.outputs.iter().map(Port::instantiate).collect(),
            settings: node_type.settings.clone(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set the frame label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Replace the type-specific properties
    pub fn with_settings(mut self, settings: NodeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Get an input port by index
    pub fn input(&self, index: usize) -> Option<&Port> {
        self.inputs.get(index)
    }

    /// Get an output port by index
    pub fn output(&self, index: usize) -> Option<&Port> {
        self.outputs.get(index)
    }

    /// Get the first input port with the given name
    pub fn input_named(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Get the first output port with the given name
    pub fn output_named(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Get a port by ID
    pub fn port(&self, port_id: &PortId) -> Option<&Port> {
        self.ports().find(|p| p.id == *port_id)
    }

    /// Get a mutable port by ID
    pub fn port_mut(&mut self, port_id: &PortId) -> Option<&mut Port> {
        self.inputs.iter_mut().chain(self.outputs.iter_mut()).find(|p| p.id == *port_id)
    }

    /// Get all ports
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Text shown in the node header
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Registry of available node types
pub struct NodeRegistry {
    /// Registered node types by ID
    types: indexmap::IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: indexmap::IndexMap::new(),
        }
    }

    /// Register a node type
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &NodeType> {
        self.types.values()
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeType> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Create a node from a type ID
    pub fn create_node(&self, type_id: &str) -> Option<Node> {
        self.get(type_id).map(Node::new)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortType;

    fn math_type() -> NodeType {
        NodeType {
            id: "math".to_string(),
            name: "Math".to_string(),
            category: NodeCategory::Math,
            description: "Scalar math".to_string(),
            inputs: vec![
                Port::input("Value", PortType::Float),
                Port::input("Value", PortType::Float),
            ],
            outputs: vec![Port::output("Value", PortType::Float)],
            settings: NodeSettings::Math { operation: MathOperation::Add, use_clamp: false },
        }
    }

    #[test]
    fn test_instances_get_fresh_port_ids() {
        let node_type = math_type();
        let a = Node::new(&node_type);
        let b = Node::new(&node_type);
        assert_ne!(a.id, b.id);
        assert_ne!(a.inputs[0].id, b.inputs[0].id);
        assert_ne!(a.inputs[0].id, node_type.inputs[0].id);
    }

    #[test]
    fn test_duplicate_socket_names_resolve_by_index() {
        let node = Node::new(&math_type());
        assert_eq!(node.input_named("Value").map(|p| p.id), Some(node.inputs[0].id));
        assert!(node.input(1).is_some());
        assert!(node.input(2).is_none());
    }

    #[test]
    fn test_display_name_prefers_label() {
        let node = Node::new(&math_type());
        assert_eq!(node.display_name(), "Math");
        let node = node.with_label("1 - Glossiness");
        assert_eq!(node.display_name(), "1 - Glossiness");
    }

    #[test]
    fn test_math_operations() {
        assert_eq!(MathOperation::Subtract.apply(1.0, 0.25), 0.75);
        assert_eq!(MathOperation::Multiply.apply(0.5, 0.5), 0.25);
        assert_eq!(MathOperation::Add.apply(0.5, 0.25), 0.75);
    }
}
