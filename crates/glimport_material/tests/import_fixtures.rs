// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end imports of glTF documents.

use glimport_graph::evaluation::{ShaderEvaluator, TextureSamples};
use glimport_graph::graphs::shader::{
    BSDF_PRINCIPLED, GLTF_SETTINGS, MATH, NORMAL_MAP, OUTPUT_MATERIAL, SEPARATE_COLOR, TEX_IMAGE, VERTEX_COLOR,
};
use glimport_graph::{Graph, NodeId, PortValue};
use glimport_material::{import_document, GltfDocument, ImportError, ImportSettings};

const FULL_DOCUMENT: &str = r#"{
    "asset": { "version": "2.0" },
    "materials": [
        {
            "name": "Painted Metal",
            "normalTexture": { "index": 2, "scale": 0.5 },
            "occlusionTexture": { "index": 3 },
            "emissiveTexture": { "index": 4 },
            "emissiveFactor": [1.0, 1.0, 1.0],
            "extensions": {
                "KHR_materials_pbrSpecularGlossiness": {
                    "diffuseTexture": { "index": 0 },
                    "specularGlossinessTexture": { "index": 1 },
                    "glossinessFactor": 0.5
                }
            }
        },
        {
            "name": "Metal Rough",
            "pbrMetallicRoughness": { "metallicFactor": 1.0 }
        }
    ],
    "meshes": [
        {
            "name": "Crate",
            "primitives": [
                { "attributes": { "POSITION": 0, "COLOR_0": 1 }, "material": 0 }
            ]
        }
    ]
}"#;

fn samples() -> TextureSamples {
    TextureSamples::from([
        (0, [0.5, 0.5, 0.5, 1.0]),
        (1, [0.25, 0.5, 0.75, 0.5]),
        (2, [0.5, 0.5, 1.0, 1.0]),
        (3, [0.75, 0.0, 0.0, 1.0]),
        (4, [1.0, 0.5, 0.0, 1.0]),
    ])
}

fn single(graph: &Graph, type_id: &str) -> NodeId {
    let mut nodes = graph.nodes_of_type(type_id);
    let node = nodes.next().unwrap_or_else(|| panic!("no {type_id} node"));
    assert!(nodes.next().is_none(), "more than one {type_id} node");
    node.id
}

fn import_full() -> Graph {
    let document = GltfDocument::from_json(FULL_DOCUMENT).unwrap();
    let mut imported = import_document(&document, &ImportSettings::default());
    imported.remove(0).result.unwrap()
}

#[test]
fn test_full_material_structure() {
    let graph = import_full();
    assert_eq!(graph.name, "Painted Metal");

    single(&graph, BSDF_PRINCIPLED);
    single(&graph, OUTPUT_MATERIAL);
    single(&graph, GLTF_SETTINGS);
    single(&graph, NORMAL_MAP);
    single(&graph, SEPARATE_COLOR);
    single(&graph, VERTEX_COLOR);
    assert_eq!(graph.nodes_of_type(TEX_IMAGE).count(), 5);
    assert_eq!(graph.nodes_of_type(MATH).count(), 2);
    assert!(graph.topological_order().is_ok());
}

#[test]
fn test_full_material_values() {
    let graph = import_full();
    let bsdf = single(&graph, BSDF_PRINCIPLED);
    let evaluator = ShaderEvaluator::new(samples());

    let ior = graph.input(bsdf, "IOR").unwrap();
    assert_eq!(graph.default_value(ior), Some(PortValue::Float(1000.0)));

    let roughness = graph.input(bsdf, "Roughness").unwrap();
    assert_eq!(evaluator.value_at(&graph, roughness).unwrap(), PortValue::Float(0.75));

    let tint = graph.input(bsdf, "Specular Tint").unwrap();
    assert_eq!(
        evaluator.value_at(&graph, tint).unwrap(),
        PortValue::Color([0.25, 0.5, 0.75, 1.0])
    );

    let settings = single(&graph, GLTF_SETTINGS);
    let occlusion = graph.input(settings, "Occlusion").unwrap();
    assert_eq!(evaluator.value_at(&graph, occlusion).unwrap(), PortValue::Float(0.75));

    let normal = graph.input(bsdf, "Normal").unwrap();
    assert_eq!(graph.link_source(normal).map(|s| s.node), Some(single(&graph, NORMAL_MAP)));
}

#[test]
fn test_unsupported_material_is_skipped() {
    let document = GltfDocument::from_json(FULL_DOCUMENT).unwrap();
    let imported = import_document(&document, &ImportSettings::default());
    assert_eq!(imported.len(), 2);
    assert!(imported[0].result.is_ok());
    assert!(matches!(imported[1].result, Err(ImportError::UnsupportedWorkflow(_))));
}

#[test]
fn test_graph_ron_round_trip() {
    let graph = import_full();
    let text = ron::to_string(&graph).unwrap();
    let restored: Graph = ron::from_str(&text).unwrap();

    assert_eq!(restored.node_count(), graph.node_count());
    assert_eq!(restored.connection_count(), graph.connection_count());
    let bsdf = single(&restored, BSDF_PRINCIPLED);
    let roughness = restored.input(bsdf, "Roughness").unwrap();
    let evaluator = ShaderEvaluator::new(samples());
    assert_eq!(evaluator.value_at(&restored, roughness).unwrap(), PortValue::Float(0.75));
}

#[test]
fn test_malformed_texture_reference_fails() {
    let document = GltfDocument::from_json(
        r#"{
            "materials": [{
                "extensions": {
                    "KHR_materials_pbrSpecularGlossiness": { "diffuseTexture": { "index": "zero" } }
                }
            }]
        }"#,
    )
    .unwrap();
    let imported = import_document(&document, &ImportSettings::default());
    assert!(matches!(imported[0].result, Err(ImportError::InvalidExtension { .. })));
}
