// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.

use crate::connection::{Connection, ConnectionId, SocketRef};
use crate::node::{Node, NodeId};
use crate::port::{PortDirection, PortId, PortValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A shader node graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name, usually the material name
    pub name: String,
    /// Nodes in creation order
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections.retain(|_, c| !c.involves_node(node_id));
        self.nodes.shift_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all nodes of one type
    pub fn nodes_of_type<'a>(&'a self, type_id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.values().filter(move |n| n.node_type == type_id)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up an input socket by name.
    ///
    /// Unknown names are a configuration error: the caller asked for a
    /// socket the node type does not have.
    pub fn input(&self, node_id: NodeId, name: &str) -> Result<SocketRef, GraphError> {
        let node = self.node(node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        node.input_named(name)
            .map(|p| SocketRef::new(node_id, p.id))
            .ok_or_else(|| GraphError::UnknownSocket {
                node: node.node_type.clone(),
                socket: name.to_string(),
            })
    }

    /// Look up an input socket by position
    pub fn input_at(&self, node_id: NodeId, index: usize) -> Result<SocketRef, GraphError> {
        let node = self.node(node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        node.input(index)
            .map(|p| SocketRef::new(node_id, p.id))
            .ok_or_else(|| GraphError::UnknownSocket {
                node: node.node_type.clone(),
                socket: format!("input #{index}"),
            })
    }

    /// Look up an output socket by name
    pub fn output(&self, node_id: NodeId, name: &str) -> Result<SocketRef, GraphError> {
        let node = self.node(node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        node.output_named(name)
            .map(|p| SocketRef::new(node_id, p.id))
            .ok_or_else(|| GraphError::UnknownSocket {
                node: node.node_type.clone(),
                socket: name.to_string(),
            })
    }

    /// Look up an output socket by position
    pub fn output_at(&self, node_id: NodeId, index: usize) -> Result<SocketRef, GraphError> {
        let node = self.node(node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        node.output(index)
            .map(|p| SocketRef::new(node_id, p.id))
            .ok_or_else(|| GraphError::UnknownSocket {
                node: node.node_type.clone(),
                socket: format!("output #{index}"),
            })
    }

    /// Link an output socket to an input socket.
    ///
    /// Inputs accept a single link; outputs fan out freely.
    pub fn link(&mut self, from: SocketRef, to: SocketRef) -> Result<ConnectionId, ConnectionError> {
        if from.node == to.node {
            return Err(ConnectionError::SelfLoop);
        }

        let source = self.nodes.get(&from.node)
            .ok_or(ConnectionError::NodeNotFound(from.node))?
            .port(&from.port)
            .ok_or(ConnectionError::PortNotFound(from.port))?;
        let target = self.nodes.get(&to.node)
            .ok_or(ConnectionError::NodeNotFound(to.node))?
            .port(&to.port)
            .ok_or(ConnectionError::PortNotFound(to.port))?;

        if source.direction != PortDirection::Output || !source.can_connect(target) {
            return Err(ConnectionError::IncompatiblePorts);
        }
        if !target.multi_connect && self.is_connected(to) {
            return Err(ConnectionError::PortAlreadyConnected(to.port));
        }

        let connection = Connection::new(from, to);
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Links leaving an output socket
    pub fn connections_from(&self, socket: SocketRef) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.from == socket)
    }

    /// Links arriving at an input socket
    pub fn connections_to(&self, socket: SocketRef) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.to == socket)
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether anything is linked into the given input
    pub fn is_connected(&self, socket: SocketRef) -> bool {
        self.connections_to(socket).next().is_some()
    }

    /// Source socket feeding the given input, if linked
    pub fn link_source(&self, socket: SocketRef) -> Option<SocketRef> {
        self.connections_to(socket).next().map(|c| c.from)
    }

    /// Set the value of an unconnected input.
    ///
    /// Fails on linked inputs: a default there would never be read.
    pub fn set_default(&mut self, socket: SocketRef, value: PortValue) -> Result<(), GraphError> {
        if self.is_connected(socket) {
            return Err(GraphError::SocketConnected(socket.port));
        }
        let node = self.nodes.get_mut(&socket.node)
            .ok_or(GraphError::NodeNotFound(socket.node))?;
        let port = node.port_mut(&socket.port)
            .ok_or(GraphError::PortNotFound(socket.port))?;
        if port.direction != PortDirection::Input {
            return Err(GraphError::NotAnInput(socket.port));
        }
        port.default_value = Some(value);
        Ok(())
    }

    /// Value stored on an input, ignoring links
    pub fn default_value(&self, socket: SocketRef) -> Option<PortValue> {
        self.node(socket.node)?.port(&socket.port)?.default_value
    }

    /// Get nodes in topological order (for evaluation)
    pub fn topological_order(&self) -> Result<Vec<NodeId>, CycleError> {
        let mut visited = std::collections::HashSet::new();
        let mut temp_mark = std::collections::HashSet::new();
        let mut order = Vec::new();

        for node_id in self.nodes.keys() {
            if !visited.contains(node_id) {
                self.visit(*node_id, &mut visited, &mut temp_mark, &mut order)?;
            }
        }

        Ok(order)
    }

    fn visit(
        &self,
        node_id: NodeId,
        visited: &mut std::collections::HashSet<NodeId>,
        temp_mark: &mut std::collections::HashSet<NodeId>,
        order: &mut Vec<NodeId>,
    ) -> Result<(), CycleError> {
        if temp_mark.contains(&node_id) {
            return Err(CycleError);
        }
        if visited.contains(&node_id) {
            return Ok(());
        }

        temp_mark.insert(node_id);

        // Dependencies first
        for connection in self.connections_for_node(node_id) {
            if connection.to.node == node_id {
                self.visit(connection.from.node, visited, temp_mark, order)?;
            }
        }

        temp_mark.remove(&node_id);
        visited.insert(node_id);
        order.push(node_id);

        Ok(())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Material")
    }
}

/// Error when creating a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortId),

    /// Incompatible port types or directions
    #[error("Incompatible port types")]
    IncompatiblePorts,

    /// Port is already connected
    #[error("Port already connected: {0:?}")]
    PortAlreadyConnected(PortId),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,
}

/// Error raised by socket lookups and default-value edits
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The node type has no socket with that name
    #[error("Node type '{node}' has no socket '{socket}'")]
    UnknownSocket {
        /// Node type ID
        node: String,
        /// Requested socket
        socket: String,
    },

    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortId),

    /// Default values only apply to inputs
    #[error("Port is not an input: {0:?}")]
    NotAnInput(PortId),

    /// Default set on a linked input
    #[error("Socket is already connected: {0:?}")]
    SocketConnected(PortId),

    /// Linking failed
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Error when graph contains a cycle
#[derive(Debug, thiserror::Error)]
#[error("Graph contains a cycle")]
pub struct CycleError;
