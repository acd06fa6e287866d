//! Client configuration with TOML preset support.
//!
//! Atlas catalog, materials, colormap and exploded-view settings are
//! consolidated here. Options serialize to/from TOML so deployments can ship
//! presets alongside the binary.

mod atlas;
mod colormap;
mod explode;
mod materials;

use std::path::Path;

pub use atlas::{AtlasEntry, AtlasOptions};
pub use colormap::ColormapOptions;
pub use explode::{ExplodeOptions, MirrorAxis};
pub use materials::MaterialOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::UrchinError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[explode]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Atlas catalog and bootstrap behavior.
    pub atlas: AtlasOptions,
    /// Known materials.
    pub materials: MaterialOptions,
    /// Initial colormap.
    pub colormap: ColormapOptions,
    /// Exploded-view parameters.
    pub explode: ExplodeOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, UrchinError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| UrchinError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), UrchinError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| UrchinError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(UrchinError::from)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
