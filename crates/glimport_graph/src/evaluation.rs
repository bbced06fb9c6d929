// SPDX-License-Identifier: MIT OR Apache-2.0
//! Constant folding of shader graphs.
//!
//! Evaluates the scalar and color values flowing through a graph for one
//! set of texture samples. This is how importer output is checked against
//! the closed-form material equations without a renderer.

use crate::connection::SocketRef;
use crate::graph::Graph;
use crate::graphs::shader::{SEPARATE_COLOR, VERTEX_COLOR};
use crate::node::{BlendType, Node, NodeId, NodeSettings};
use crate::port::{PortId, PortValue};
use std::collections::HashMap;

/// Result of evaluating a node
#[derive(Debug, Clone)]
pub struct NodeOutput {
    /// Output values by port ID
    pub values: HashMap<PortId, PortValue>,
}

impl NodeOutput {
    /// Create a new empty output
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set an output value
    pub fn set(&mut self, port_id: PortId, value: PortValue) {
        self.values.insert(port_id, value);
    }

    /// Get an output value
    pub fn get(&self, port_id: &PortId) -> Option<&PortValue> {
        self.values.get(port_id)
    }
}

impl Default for NodeOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Context for graph evaluation
pub struct EvaluationContext<'a> {
    /// The graph being evaluated
    pub graph: &'a Graph,
    /// Cached node outputs
    outputs: HashMap<NodeId, NodeOutput>,
    /// Evaluation order
    order: Vec<NodeId>,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context
    pub fn new(graph: &'a Graph) -> Result<Self, EvaluationError> {
        let order = graph.topological_order()
            .map_err(|_| EvaluationError::CycleDetected)?;

        Ok(Self {
            graph,
            outputs: HashMap::new(),
            order,
        })
    }

    /// Value computed upstream of a linked input
    pub fn get_input(&self, socket: SocketRef) -> Option<&PortValue> {
        let connection = self.graph.connections_to(socket).next()?;
        self.outputs.get(&connection.from.node)?.get(&connection.from.port)
    }

    /// Value stored on an input
    pub fn get_default(&self, socket: SocketRef) -> Option<&PortValue> {
        self.graph.node(socket.node)?.port(&socket.port)?.default_value.as_ref()
    }

    /// Linked value if the input is linked, its stored value otherwise
    pub fn get_input_or_default(&self, socket: SocketRef) -> Option<&PortValue> {
        if self.graph.is_connected(socket) {
            return self.get_input(socket);
        }
        self.get_default(socket)
    }

    /// Value arriving at an input socket
    pub fn value_at(&self, socket: SocketRef) -> Option<PortValue> {
        self.get_input_or_default(socket).copied()
    }

    /// Set the output for a node
    pub fn set_output(&mut self, node_id: NodeId, output: NodeOutput) {
        self.outputs.insert(node_id, output);
    }

    /// Get all outputs
    pub fn outputs(&self) -> &HashMap<NodeId, NodeOutput> {
        &self.outputs
    }

    /// Evaluate every node in dependency order
    pub fn run(&mut self, evaluator: &dyn NodeEvaluator) -> Result<(), EvaluationError> {
        for node_id in self.order.clone() {
            let output = evaluator.evaluate(node_id, self)?;
            self.set_output(node_id, output);
        }
        Ok(())
    }
}

/// Trait for evaluating nodes
pub trait NodeEvaluator {
    /// Evaluate a node and produce outputs
    fn evaluate(&self, node_id: NodeId, ctx: &mut EvaluationContext) -> Result<NodeOutput, EvaluationError>;
}

/// Texel values returned by image nodes, keyed by glTF texture index
pub type TextureSamples = HashMap<usize, [f32; 4]>;

/// Evaluates the math, mix and texture nodes emitted by the importer
#[derive(Debug, Clone)]
pub struct ShaderEvaluator {
    /// Sample returned by each image node
    pub samples: TextureSamples,
    /// Value of the vertex color attribute
    pub vertex_color: [f32; 4],
}

impl ShaderEvaluator {
    /// Create an evaluator with the given texture samples
    pub fn new(samples: TextureSamples) -> Self {
        Self {
            samples,
            vertex_color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Evaluate `graph` and return the value arriving at `socket`
    pub fn value_at(&self, graph: &Graph, socket: SocketRef) -> Result<PortValue, EvaluationError> {
        let mut ctx = EvaluationContext::new(graph)?;
        ctx.run(self)?;
        ctx.value_at(socket).ok_or(EvaluationError::MissingInput(socket.port))
    }
}

fn input_value(ctx: &EvaluationContext, node_id: NodeId, index: usize) -> Result<PortValue, EvaluationError> {
    let node = ctx.graph.node(node_id).ok_or(EvaluationError::NodeNotFound(node_id))?;
    let port = node.input(index).ok_or(EvaluationError::TypeMismatch)?;
    ctx.get_input_or_default(SocketRef::new(node_id, port.id))
        .copied()
        .ok_or(EvaluationError::MissingInput(port.id))
}

fn output_port(node: &Node, index: usize) -> Result<PortId, EvaluationError> {
    node.output(index).map(|p| p.id).ok_or(EvaluationError::TypeMismatch)
}

fn clamp_color(c: [f32; 4]) -> [f32; 4] {
    c.map(|v| v.clamp(0.0, 1.0))
}

impl NodeEvaluator for ShaderEvaluator {
    fn evaluate(&self, node_id: NodeId, ctx: &mut EvaluationContext) -> Result<NodeOutput, EvaluationError> {
        let node = ctx.graph.node(node_id).ok_or(EvaluationError::NodeNotFound(node_id))?;
        let mut output = NodeOutput::new();

        match &node.settings {
            NodeSettings::Math { operation, use_clamp } => {
                let a = input_value(ctx, node_id, 0)?.as_float();
                let b = input_value(ctx, node_id, 1)?.as_float();
                let mut value = operation.apply(a, b);
                if *use_clamp {
                    value = value.clamp(0.0, 1.0);
                }
                output.set(output_port(node, 0)?, PortValue::Float(value));
            }
            NodeSettings::MixRgb { blend, use_clamp } => {
                let fac = input_value(ctx, node_id, 0)?.as_float();
                let c1 = input_value(ctx, node_id, 1)?.as_color();
                let c2 = input_value(ctx, node_id, 2)?.as_color();
                let mut color = c1;
                for i in 0..3 {
                    color[i] = match blend {
                        BlendType::Mix => c1[i] + (c2[i] - c1[i]) * fac,
                        BlendType::Multiply => c1[i] * (1.0 - fac + fac * c2[i]),
                    };
                }
                if *use_clamp {
                    color = clamp_color(color);
                }
                output.set(output_port(node, 0)?, PortValue::Color(color));
            }
            NodeSettings::Image { texture, .. } => {
                let index = texture
                    .ok_or_else(|| EvaluationError::Custom("image node without texture".to_string()))?;
                let sample = *self.samples.get(&index).ok_or(EvaluationError::MissingSample(index))?;
                let [r, g, b, a] = sample;
                output.set(output_port(node, 0)?, PortValue::Color([r, g, b, 1.0]));
                output.set(output_port(node, 1)?, PortValue::Float(a));
            }
            _ if node.node_type == SEPARATE_COLOR => {
                let color = input_value(ctx, node_id, 0)?.as_color();
                for (port, channel) in node.outputs.iter().zip(color) {
                    output.set(port.id, PortValue::Float(channel));
                }
            }
            _ if node.node_type == VERTEX_COLOR => {
                output.set(output_port(node, 0)?, PortValue::Color(self.vertex_color));
                output.set(output_port(node, 1)?, PortValue::Float(self.vertex_color[3]));
            }
            // Shaders, outputs and coordinate nodes carry no foldable value
            _ => {}
        }

        Ok(output)
    }
}

/// Error during evaluation
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// Graph contains a cycle
    #[error("Graph contains a cycle")]
    CycleDetected,

    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Missing required input
    #[error("Missing required input: {0:?}")]
    MissingInput(PortId),

    /// No sample was provided for a texture
    #[error("No sample for texture {0}")]
    MissingSample(usize),

    /// Type mismatch
    #[error("Type mismatch")]
    TypeMismatch,

    /// Custom error
    #[error("{0}")]
    Custom(String),
}
