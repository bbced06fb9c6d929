// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shader node graph model for imported materials.
//!
//! This crate stands in for the node editor of the host application:
//! - Typed input/output sockets with default values
//! - Links validated so every input is fed at most once
//! - A registry of the shader node types the importer emits
//! - Constant folding for checking graphs against material equations
//! - Serialization support

pub mod node;
pub mod port;
pub mod connection;
pub mod graph;
pub mod evaluation;
pub mod graphs;

pub use node::{Node, NodeId, NodeType, NodeSettings};
pub use port::{Port, PortId, PortType, PortDirection, PortValue};
pub use connection::{Connection, ConnectionId, SocketRef};
pub use graph::{Graph, GraphError, ConnectionError};
