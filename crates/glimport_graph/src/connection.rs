// SPDX-License-Identifier: MIT OR Apache-2.0
//! Links between sockets.

use crate::node::NodeId;
use crate::port::PortId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one socket on one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketRef {
    /// Owning node
    pub node: NodeId,
    /// Socket on that node
    pub port: PortId,
}

impl SocketRef {
    /// Create a socket handle
    pub fn new(node: NodeId, port: PortId) -> Self {
        Self { node, port }
    }
}

/// A link from an output socket to an input socket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Output socket the value comes from
    pub from: SocketRef,
    /// Input socket the value goes to
    pub to: SocketRef,
}

impl Connection {
    /// Create a new link
    pub fn new(from: SocketRef, to: SocketRef) -> Self {
        Self { id: ConnectionId::new(), from, to }
    }

    /// Whether either end sits on `node_id`
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from.node == node_id || self.to.node == node_id
    }
}
