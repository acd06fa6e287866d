//! Structured messages pushed by the server.
//!
//! These arrive already decoded by the transport layer. Field names follow
//! the wire schema (camelCase), and [`Side`] travels as its integer code.

use serde::{Deserialize, Serialize};

use crate::colormap::Rgba;

/// Which representation of a structure a message targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Side {
    /// Bilateral mesh.
    #[default]
    Full = 0,
    /// Left hemisphere mesh.
    Left = 1,
    /// Right hemisphere mesh.
    Right = 2,
}

impl Side {
    /// All three sides, in wire order.
    pub const ALL: [Self; 3] = [Self::Full, Self::Left, Self::Right];
}

impl TryFrom<u8> for Side {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Full),
            1 => Ok(Self::Left),
            2 => Ok(Self::Right),
            other => Err(format!("invalid side code {other}")),
        }
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> Self {
        side as Self
    }
}

/// Visibility, material and color for one structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StructureUpdate {
    /// Acronym or integer ID, optionally suffixed `-lh` / `-rh`.
    pub identifier: String,
    /// Whether the structure should be shown.
    pub visible: bool,
    /// Side targeted when the identifier carries no hemisphere suffix.
    pub side: Side,
    /// Material name looked up in the material registry.
    pub material: String,
    /// Literal color, used when no colormap is active.
    pub color: Rgba,
    /// Colormap input, used when a colormap is active.
    pub color_intensity: f32,
}

impl Default for StructureUpdate {
    fn default() -> Self {
        Self {
            identifier: String::new(),
            visible: false,
            side: Side::Full,
            material: String::new(),
            color: [1.0, 1.0, 1.0, 1.0],
            color_intensity: 0.0,
        }
    }
}

/// Colormap selection carried by a snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColormapDescriptor {
    /// Registry name; empty means "no colormap".
    pub name: String,
    /// Declared data minimum, forwarded to collaborators (legends).
    pub min: f32,
    /// Declared data maximum, forwarded to collaborators (legends).
    pub max: f32,
}

/// The canonical serializable atlas state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AtlasSnapshot {
    /// API atlas name (mapped through the atlas catalog).
    pub name: String,
    /// Reference coordinate applied after the atlas bootstrap.
    pub reference_coord: [f32; 3],
    /// Active colormap.
    pub colormap: ColormapDescriptor,
    /// Structure updates, applied in order.
    pub areas: Vec<StructureUpdate>,
}

/// Request to build a custom (empty) atlas space.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomAtlas {
    /// Atlas name.
    pub name: String,
    /// Volume dimensions (mm).
    pub dimensions: [f32; 3],
    /// Voxel resolution (um).
    pub resolution: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_travels_as_integer_code() {
        let json = serde_json::to_string(&Side::Right).unwrap();
        assert_eq!(json, "2");
        let side: Side = serde_json::from_str("1").unwrap();
        assert_eq!(side, Side::Left);
        assert!(serde_json::from_str::<Side>("3").is_err());
    }

    #[test]
    fn snapshot_decodes_wire_field_names() {
        let json = r#"{
            "name": "ccf25",
            "referenceCoord": [5.5, 4.0, -6.5],
            "colormap": {"name": "cool", "min": 0.0, "max": 2.0},
            "areas": [
                {"identifier": "MOs-lh", "visible": true, "side": 1,
                 "material": "opaque-lit", "color": [1, 0, 0, 0.5],
                 "colorIntensity": 0.25}
            ]
        }"#;
        let snapshot: AtlasSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.name, "ccf25");
        assert_eq!(snapshot.reference_coord, [5.5, 4.0, -6.5]);
        assert_eq!(snapshot.colormap.max, 2.0);
        let area = &snapshot.areas[0];
        assert_eq!(area.side, Side::Left);
        assert_eq!(area.color, [1.0, 0.0, 0.0, 0.5]);
        assert_eq!(area.color_intensity, 0.25);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let update: StructureUpdate =
            serde_json::from_str(r#"{"identifier": "VISp"}"#).unwrap();
        assert!(!update.visible);
        assert_eq!(update.side, Side::Full);
        assert_eq!(update.color, [1.0, 1.0, 1.0, 1.0]);
    }
}
