use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One catalog entry mapping an API atlas name to an internal atlas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct AtlasEntry {
    /// Name used by the server (e.g. `ccf25`).
    pub api_name: String,
    /// Internal atlas name handed to the provider.
    pub atlas_name: String,
    /// Whether the atlas can be loaded in web builds.
    pub web: bool,
}

impl AtlasEntry {
    fn new(api_name: &str, atlas_name: &str, web: bool) -> Self {
        Self {
            api_name: api_name.to_owned(),
            atlas_name: atlas_name.to_owned(),
            web,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Atlas", inline)]
#[serde(default)]
/// Atlas catalog and bootstrap behavior.
pub struct AtlasOptions {
    /// Show the atlas default structures right after the bootstrap.
    #[schemars(title = "Load Default Areas")]
    pub load_defaults: bool,
    /// Atlases the server may request.
    #[schemars(skip)]
    pub catalog: Vec<AtlasEntry>,
}

impl AtlasOptions {
    /// Catalog entry for an API name.
    #[must_use]
    pub fn lookup(&self, api_name: &str) -> Option<&AtlasEntry> {
        self.catalog.iter().find(|e| e.api_name == api_name)
    }
}

impl Default for AtlasOptions {
    fn default() -> Self {
        Self {
            load_defaults: false,
            catalog: vec![
                AtlasEntry::new("ccf25", "allen_mouse_25um", true),
                AtlasEntry::new("ccf10", "allen_mouse_10um", false),
                AtlasEntry::new("waxholm39", "whs_sd_rat_39um", true),
                AtlasEntry::new("waxholm78", "whs_sd_rat_78um", true),
            ],
        }
    }
}
