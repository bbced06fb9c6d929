// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sockets on shader nodes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortId(pub Uuid);

impl PortId {
    /// Create a new random port ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input socket
    Input,
    /// Output socket
    Output,
}

/// Data type carried by a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortType {
    /// Scalar value
    Float,
    /// 3D vector (normals, UV coordinates)
    Vector,
    /// RGBA color
    Color,
    /// Closure produced by a BSDF
    Shader,
}

impl PortType {
    /// Check if this type can feed a socket of another type.
    ///
    /// Shader sockets only connect to shader sockets; the data types
    /// convert implicitly between each other the way a shader compiler
    /// promotes scalars and colors.
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        match (self, other) {
            (Self::Shader, Self::Shader) => true,
            (Self::Shader, _) | (_, Self::Shader) => false,
            _ => true,
        }
    }
}

/// A socket on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// Unique port ID
    pub id: PortId,
    /// Socket name as shown in the node editor
    pub name: String,
    /// Port direction
    pub direction: PortDirection,
    /// Data type
    pub port_type: PortType,
    /// Value used when nothing is linked (inputs only)
    pub default_value: Option<PortValue>,
    /// Whether multiple connections are allowed
    pub multi_connect: bool,
}

impl Port {
    /// Create a new input port
    pub fn input(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Input,
            port_type,
            default_value: None,
            multi_connect: false,
        }
    }

    /// Create a new output port
    pub fn output(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Output,
            port_type,
            default_value: None,
            multi_connect: true, // Outputs can fan out
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: PortValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Copy of this port with a fresh ID, used when instantiating a node type
    pub fn instantiate(&self) -> Self {
        Self {
            id: PortId::new(),
            ..self.clone()
        }
    }

    /// Check if a connection to another port is valid
    pub fn can_connect(&self, other: &Port) -> bool {
        if self.direction == other.direction {
            return false;
        }

        self.port_type.can_connect_to(&other.port_type)
    }
}

/// Value stored on an unconnected input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PortValue {
    /// Scalar
    Float(f32),
    /// 3D vector
    Vector([f32; 3]),
    /// RGBA color
    Color([f32; 4]),
}

impl PortValue {
    /// Scalar view of the value; colors average their RGB channels
    pub fn as_float(&self) -> f32 {
        match *self {
            Self::Float(v) => v,
            Self::Vector([x, y, z]) => (x + y + z) / 3.0,
            Self::Color([r, g, b, _]) => (r + g + b) / 3.0,
        }
    }

    /// Color view of the value; scalars broadcast to grey
    pub fn as_color(&self) -> [f32; 4] {
        match *self {
            Self::Float(v) => [v, v, v, 1.0],
            Self::Vector([x, y, z]) => [x, y, z, 1.0],
            Self::Color(c) => c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_sockets_only_connect_to_shaders() {
        assert!(PortType::Shader.can_connect_to(&PortType::Shader));
        assert!(!PortType::Shader.can_connect_to(&PortType::Float));
        assert!(!PortType::Color.can_connect_to(&PortType::Shader));
        assert!(PortType::Color.can_connect_to(&PortType::Float));
    }

    #[test]
    fn test_connection_requires_opposite_directions() {
        let a = Port::output("Value", PortType::Float);
        let b = Port::input("Value", PortType::Float);
        let c = Port::input("Other", PortType::Float);
        assert!(a.can_connect(&b));
        assert!(!b.can_connect(&c));
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(PortValue::Float(0.25).as_color(), [0.25, 0.25, 0.25, 1.0]);
        assert_eq!(PortValue::Color([0.25, 0.5, 0.75, 0.5]).as_float(), 0.5);
    }
}
