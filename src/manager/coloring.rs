//! Colormap mode, area data playback and one-sided coloring.

use super::{AtlasEvent, AtlasManager};
use crate::error::UrchinError;
use crate::message::Side;

impl AtlasManager {
    /// Switch colormap mode.
    ///
    /// An empty name disables colormap mode. A known name enables it with
    /// that mapping. An unknown name disables it and returns
    /// [`UrchinError::UnknownColormap`]. Collaborators are notified in every
    /// case; colors already applied are left alone.
    pub fn set_active_colormap(&self, name: &str) -> Result<(), UrchinError> {
        let result = {
            let mut state = self.colormap.borrow_mut();
            if name.is_empty() {
                state.enabled = false;
                Ok(())
            } else if let Some(colormap) = self.colormaps.get(name) {
                state.active = colormap.clone();
                state.enabled = true;
                Ok(())
            } else {
                state.enabled = false;
                Err(UrchinError::UnknownColormap(name.to_owned()))
            }
        };

        let (colormap, enabled) = {
            let state = self.colormap.borrow();
            (state.active.clone(), state.enabled)
        };
        let (min, max) = {
            let data = self.data.borrow();
            (data.colormap.min, data.colormap.max)
        };
        log::debug!(
            "colormap {} {}",
            colormap.name(),
            if enabled { "enabled" } else { "disabled" }
        );
        self.emit(&AtlasEvent::ColormapChanged {
            colormap,
            enabled,
            min,
            max,
        });
        result
    }

    /// Set per-structure intensity series, keyed by identifier.
    ///
    /// Identifiers may carry a hemisphere suffix to drive one side only.
    /// Existing series for the same structure are replaced; unresolvable
    /// identifiers are logged and skipped.
    pub fn set_area_data_series<I>(&self, series: I)
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let mut data = self.area_data.borrow_mut();
        for (identifier, values) in series {
            let resolved = self.resolve_identifier(&identifier);
            if !resolved.is_valid() {
                log::warn!("{}", UrchinError::UnresolvedIdentifier(identifier));
                continue;
            }
            if data.get(resolved.id).is_some() {
                log::debug!("replacing area data for {identifier}");
            }
            data.insert(resolved, values);
        }
        log::debug!("area data set for {} structures", data.len());
    }

    /// Move the area data playhead and recolor every structure with a
    /// series.
    ///
    /// Each structure's alpha becomes the raw intensity at `index` and its
    /// color the active colormap at that intensity, carrying the same alpha.
    /// The intensity is recorded for snapshot capture. Structures are loaded
    /// first if needed. An index past the end of any series fails with
    /// [`UrchinError::AreaDataIndex`] before anything changes.
    pub async fn set_area_data_index(
        &self,
        index: usize,
    ) -> Result<(), UrchinError> {
        let atlas = self.active_atlas()?;
        let entries = {
            let mut data = self.area_data.borrow_mut();
            data.seek(index)?;
            data.current()
        };
        let colormap = self.active_colormap();

        for (id, series, value) in entries {
            let Some(node) = atlas.ontology().node(id) else {
                log::warn!("{}", UrchinError::MissingEntity(id));
                continue;
            };
            if let Err(e) = self.ensure_loaded(&node, series.wait_side()).await
            {
                log::warn!("area data for {} skipped: {e}", node.acronym());
                continue;
            }
            let [r, g, b, _] = colormap.value(value);
            for side in series.targets() {
                node.set_alpha(side, value);
                node.set_color(side, [r, g, b, value]);
                let _ = self
                    .intensities
                    .borrow_mut()
                    .insert((id, side), value);
            }
        }
        Ok(())
    }

    /// Keep right hemispheres at their default color.
    ///
    /// Enabling reverts the right hemisphere of every tracked structure to
    /// its default color; disabling copies the left color back onto it.
    pub fn set_left_color_only(&self, enabled: bool) {
        self.left_color_only.set(enabled);
        for node in self.visible.borrow().iter() {
            let color = if enabled {
                node.default_color()
            } else {
                node.side_state(Side::Left).color
            };
            node.set_color(Side::Right, color);
        }
    }
}
