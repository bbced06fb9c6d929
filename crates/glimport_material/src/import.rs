// SPDX-License-Identifier: MIT OR Apache-2.0
//! Material import entry points.

use crate::error::ImportError;
use crate::gltf::{GltfDocument, GltfMaterial};
use crate::helper::MaterialHelper;
use crate::pbr_specular_glossiness::{self, pbr_specular_glossiness};
use crate::settings::ImportSettings;
use glimport_graph::Graph;

/// Import one material into a new node graph
pub fn import_material(
    material: &GltfMaterial,
    name: &str,
    vertex_color: bool,
    settings: &ImportSettings,
) -> Result<Graph, ImportError> {
    let mut mh = MaterialHelper::new(material, name, vertex_color, settings.layout);

    if mh.has_ext(pbr_specular_glossiness::EXTENSION_NAME) {
        pbr_specular_glossiness(&mut mh)?;
    } else {
        return Err(ImportError::UnsupportedWorkflow(name.to_string()));
    }

    Ok(mh.finish())
}

/// Outcome of importing one material of a document
#[derive(Debug)]
pub struct ImportedMaterial {
    /// glTF material index
    pub index: usize,
    /// Display name
    pub name: String,
    /// Graph, or why the material was skipped
    pub result: Result<Graph, ImportError>,
}

/// Import every material of a document.
///
/// A failing material does not stop the others; each outcome is returned
/// in document order.
pub fn import_document(document: &GltfDocument, settings: &ImportSettings) -> Vec<ImportedMaterial> {
    document
        .materials
        .iter()
        .enumerate()
        .map(|(index, material)| {
            let name = material.display_name(index);
            let vertex_color = document.uses_vertex_color(index);
            let result = import_material(material, &name, vertex_color, settings);
            match &result {
                Ok(graph) => tracing::info!("Imported material '{}' ({} nodes)", name, graph.node_count()),
                Err(e) => tracing::warn!("Skipping material '{}': {}", name, e),
            }
            ImportedMaterial { index, name, result }
        })
        .collect()
}
