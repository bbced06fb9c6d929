// SPDX-License-Identifier: MIT OR Apache-2.0
//! Import settings.
//!
//! Settings are stored as RON. Every field has a default, so an empty or
//! partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Conventional settings file name
pub const SETTINGS_FILE_NAME: &str = "glimport.ron";

/// Placement of the texture blocks left of the shader node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// X coordinate shared by every block anchor
    pub column_x: f32,
    /// Vertical space taken by one active block
    pub block_height: f32,
    /// Upward nudge applied after centering the stack on y = 0
    pub center_offset: f32,
}

impl LayoutConfig {
    /// Reason the layout cannot stack blocks, if any
    pub fn check(&self) -> Option<String> {
        let values = [self.column_x, self.block_height, self.center_offset];
        if values.iter().any(|v| !v.is_finite()) {
            return Some(format!("Layout values must be finite: {self:?}"));
        }
        if self.block_height <= 0.0 {
            return Some(format!("Layout block_height must be positive, got {}", self.block_height));
        }
        None
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_x: -200.0,
            block_height: 460.0,
            center_offset: 20.0,
        }
    }
}

/// Settings for a material import run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Format version
    pub version: u32,
    /// Node layout
    pub layout: LayoutConfig,
    /// Extension of written graph files
    pub output_extension: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            layout: LayoutConfig::default(),
            output_extension: "ron".to_string(),
        }
    }
}

impl ImportSettings {
    /// Parse settings from RON text
    pub fn from_ron(content: &str) -> std::io::Result<Self> {
        let settings: ImportSettings = ron::from_str(content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Settings version {} is newer than supported version {}",
                    settings.version, SETTINGS_FORMAT_VERSION
                ),
            ));
        }

        if let Some(reason) = settings.layout.check() {
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, reason));
        }

        Ok(settings)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Serialize settings to RON
    pub fn to_ron(&self) -> std::io::Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        ron::ser::to_string_pretty(self, config).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_ron()?)
    }
}
