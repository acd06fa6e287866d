use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::colormap::COOL;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Colormap", inline)]
#[serde(default)]
/// Colormap used before the server selects one.
pub struct ColormapOptions {
    /// Registry name of the initial colormap.
    #[schemars(title = "Initial Colormap")]
    pub initial: String,
}

impl Default for ColormapOptions {
    fn default() -> Self {
        Self {
            initial: COOL.to_owned(),
        }
    }
}
