// SPDX-License-Identifier: MIT OR Apache-2.0
//! glTF material import into shader node graphs.
//!
//! Materials using `KHR_materials_pbrSpecularGlossiness` are rebuilt as a
//! principled BSDF plus the texture and math nodes that reproduce the
//! extension's diffuse, specular and glossiness inputs.
//!
//! ## Architecture
//!
//! - [`helper::MaterialHelper`] owns the graph of one material
//! - [`texture`], [`material_utils`] and [`pbr_metallic_roughness`] hold the
//!   sub-graph builders shared by workflows
//! - [`pbr_specular_glossiness`] lays out and wires the specular-glossiness
//!   workflow

pub mod bsdf;
pub mod error;
pub mod gltf;
pub mod helper;
pub mod import;
pub mod material_utils;
pub mod pbr_metallic_roughness;
pub mod pbr_specular_glossiness;
pub mod settings;
pub mod texture;

pub use error::ImportError;
pub use gltf::{ExtensionDict, GltfDocument, GltfMaterial, TextureInfo};
pub use helper::MaterialHelper;
pub use import::{import_document, import_material, ImportedMaterial};
pub use settings::{ImportSettings, LayoutConfig};
