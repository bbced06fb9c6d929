// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised while importing a material.

use glimport_graph::{ConnectionError, GraphError};

/// Error during material import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Socket lookup or default assignment failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Linking two sockets failed
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The shader registry has no such node type
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// An extension value could not be decoded
    #[error("Invalid value for '{key}': {source}")]
    InvalidExtension {
        /// Offending key
        key: String,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// No importer handles this material
    #[error("Material '{0}' does not use a supported workflow")]
    UnsupportedWorkflow(String),
}
