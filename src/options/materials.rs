use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Materials", inline)]
#[serde(default)]
/// Brain region materials known to the render layer.
pub struct MaterialOptions {
    /// Material names accepted in structure updates.
    #[schemars(skip)]
    pub names: Vec<String>,
    /// Material restored on reset.
    #[schemars(title = "Default Material")]
    pub default: String,
}

impl Default for MaterialOptions {
    fn default() -> Self {
        Self {
            names: [
                "default",
                "opaque-lit",
                "opaque-unlit",
                "transparent-lit",
                "transparent-unlit",
                "unlit",
            ]
            .map(str::to_owned)
            .to_vec(),
            default: "default".to_owned(),
        }
    }
}
