//! Snapshot capture and JSON persistence.

use super::AtlasManager;
use crate::atlas::SideState;
use crate::colormap::Colormap;
use crate::error::UrchinError;
use crate::message::{
    AtlasSnapshot, ColormapDescriptor, Side, StructureUpdate,
};

impl AtlasManager {
    /// Capture the current state as a snapshot.
    ///
    /// Every visible side of every tracked structure becomes one area entry,
    /// addressed by integer ID. Applying the result to a fresh manager
    /// reproduces visibility, material and color.
    ///
    /// The colormap is exported only while every visible side still shows
    /// the colormap color of its recorded intensity. Otherwise the snapshot
    /// falls back to literal colors so that replay paints what is on screen.
    #[must_use]
    pub fn to_snapshot(&self) -> AtlasSnapshot {
        let data = self.data.borrow();
        let colormap = self.colormap.borrow();
        let intensities = self.intensities.borrow();

        let mut areas = Vec::new();
        let mut colormap_exact = colormap.enabled;
        for node in self.visible.borrow().iter() {
            for side in Side::ALL {
                let state = node.side_state(side);
                if !state.visible {
                    continue;
                }
                let intensity = intensities.get(&(node.id(), side)).copied();
                colormap_exact = colormap_exact
                    && intensity.is_some_and(|i| {
                        shows_colormap(&colormap.active, i, &state)
                    });
                areas.push(StructureUpdate {
                    identifier: node.id().to_string(),
                    visible: true,
                    side,
                    material: state.material.unwrap_or_default(),
                    color: state.color,
                    color_intensity: intensity.unwrap_or_default(),
                });
            }
        }
        if colormap.enabled && !colormap_exact {
            log::debug!(
                "colormap {} not exported, sides carry literal colors",
                colormap.active.name()
            );
        }

        AtlasSnapshot {
            name: data.name.clone(),
            reference_coord: data.reference_coord,
            colormap: ColormapDescriptor {
                name: if colormap_exact {
                    colormap.active.name().to_owned()
                } else {
                    String::new()
                },
                min: data.colormap.min,
                max: data.colormap.max,
            },
            areas,
        }
    }

    /// Capture the current state as snapshot JSON.
    pub fn to_serialized(&self) -> Result<String, UrchinError> {
        serde_json::to_string(&self.to_snapshot()).map_err(UrchinError::from)
    }

    /// Decode snapshot JSON and apply it.
    #[allow(clippy::wrong_self_convention)]
    pub async fn from_serialized(&self, json: &str) -> Result<(), UrchinError> {
        let snapshot: AtlasSnapshot = serde_json::from_str(json)?;
        self.apply_snapshot(&snapshot).await
    }
}

/// Whether `state` is exactly what colormap mode paints for `intensity`.
#[allow(clippy::float_cmp)]
fn shows_colormap(
    colormap: &Colormap,
    intensity: f32,
    state: &SideState,
) -> bool {
    let color = colormap.value(intensity);
    state.color == color && state.alpha == color[3]
}
