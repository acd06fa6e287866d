//! Server → scene synchronization: atlas bootstrap, snapshots and
//! per-structure updates.

use std::rc::Rc;

use futures::future::FutureExt;
use futures::task::LocalSpawnExt;
use glam::Vec3;

use super::events::Listeners;
use super::{AtlasEvent, AtlasManager};
use crate::atlas::{ReferenceAtlas, StructureNode};
use crate::error::UrchinError;
use crate::message::{AtlasSnapshot, CustomAtlas, Side, StructureUpdate};

impl AtlasManager {
    /// Map an API atlas name to the internal name, checking platform
    /// availability.
    fn catalog_name(&self, api_name: &str) -> Result<String, UrchinError> {
        if self.custom.borrow().iter().any(|name| name == api_name) {
            return Ok(api_name.to_owned());
        }
        let entry = self
            .options
            .atlas
            .lookup(api_name)
            .ok_or_else(|| UrchinError::UnknownAtlas(api_name.to_owned()))?;
        if cfg!(target_arch = "wasm32") && !entry.web {
            return Err(UrchinError::AtlasUnavailable(entry.atlas_name.clone()));
        }
        Ok(entry.atlas_name.clone())
    }

    /// Bootstrap the reference atlas named by `api_name`, or return the
    /// active one.
    ///
    /// Only one atlas can ever be active: requesting a different one while
    /// an atlas is loaded or loading fails with
    /// [`UrchinError::AtlasAlreadyLoaded`]. Concurrent callers for the same
    /// atlas share a single provider request.
    pub async fn load_atlas(
        &self,
        api_name: &str,
    ) -> Result<Rc<ReferenceAtlas>, UrchinError> {
        let atlas_name = self.catalog_name(api_name)?;

        if let Some(atlas) = self.atlas() {
            if atlas.name() == atlas_name {
                return Ok(atlas);
            }
            return Err(UrchinError::AtlasAlreadyLoaded {
                active: atlas.name().to_owned(),
                requested: atlas_name,
            });
        }

        let in_flight = self.bootstrap.borrow().clone();
        let pending = match in_flight {
            Some((name, pending)) if name == atlas_name => pending,
            Some((name, _)) => {
                return Err(UrchinError::AtlasAlreadyLoaded {
                    active: name,
                    requested: atlas_name,
                });
            }
            None => {
                log::info!("loading reference atlas {atlas_name}");
                let pending = self
                    .provider
                    .load_atlas(&atlas_name)
                    .map(|result| result.map(Rc::new))
                    .boxed_local()
                    .shared();
                *self.bootstrap.borrow_mut() =
                    Some((atlas_name.clone(), pending.clone()));
                pending
            }
        };

        let result = pending.await;
        *self.bootstrap.borrow_mut() = None;
        match result {
            Ok(atlas) => {
                let fresh = self.atlas.borrow().is_none();
                if fresh {
                    log::info!(
                        "reference atlas {} ready ({} structures)",
                        atlas.name(),
                        atlas.ontology().len()
                    );
                    *self.atlas.borrow_mut() = Some(Rc::clone(&atlas));
                    self.emit(&AtlasEvent::AtlasLoaded {
                        name: atlas.name().to_owned(),
                    });
                }
                Ok(atlas)
            }
            Err(e) => {
                log::error!("failed to load atlas {atlas_name}: {e}");
                Err(e)
            }
        }
    }

    fn set_reference_coord(&self, atlas: &ReferenceAtlas, coord: Vec3) {
        atlas.set_reference_coord(coord);
        self.provider.set_reference_coord(coord);
        log::debug!("reference coordinate set to {coord}");
        self.emit(&AtlasEvent::ReferenceCoordSet { coord });
    }

    /// Apply a full atlas snapshot.
    ///
    /// Bootstraps the atlas on first use, then activates the snapshot's
    /// colormap and applies every area in order. Only an atlas mismatch (or
    /// an unknown/unavailable atlas) aborts; per-area failures are logged and
    /// skipped.
    pub async fn apply_snapshot(
        &self,
        snapshot: &AtlasSnapshot,
    ) -> Result<(), UrchinError> {
        let first = self.atlas.borrow().is_none();
        let atlas = match self.load_atlas(&snapshot.name).await {
            Ok(atlas) => atlas,
            Err(e) => {
                log::error!("rejecting snapshot for {}: {e}", snapshot.name);
                return Err(e);
            }
        };

        {
            let mut data = self.data.borrow_mut();
            data.name.clone_from(&snapshot.name);
            data.reference_coord = snapshot.reference_coord;
            data.colormap = snapshot.colormap.clone();
        }
        self.set_reference_coord(&atlas, Vec3::from(snapshot.reference_coord));

        if first && self.options.atlas.load_defaults {
            if let Err(e) = self.load_default_structures().await {
                log::warn!("default structures not loaded: {e}");
            }
        }

        if !snapshot.colormap.name.is_empty() {
            if let Err(e) = self.set_active_colormap(&snapshot.colormap.name) {
                log::warn!("{e}, colormap mode disabled");
            }
        }

        for area in &snapshot.areas {
            if let Err(e) = self.apply_structure_update(area).await {
                log::warn!("skipping area {}: {e}", area.identifier);
            }
        }
        log::debug!(
            "applied snapshot with {} areas, {} structures tracked",
            snapshot.areas.len(),
            self.visible.borrow().len()
        );
        Ok(())
    }

    /// Apply one structure update.
    ///
    /// Showing a side that is not loaded starts its fetch and suspends until
    /// the side's signal resolves. Hiding never triggers a load.
    ///
    /// Material and color apply to the addressed side only, in colormap
    /// mode too. Each colored side then has its own recorded intensity for
    /// snapshot capture.
    pub async fn apply_structure_update(
        &self,
        update: &StructureUpdate,
    ) -> Result<(), UrchinError> {
        let atlas = self.active_atlas()?;
        let resolved = atlas.ontology().resolve(&update.identifier);
        if !resolved.is_valid() {
            return Err(UrchinError::UnresolvedIdentifier(
                update.identifier.clone(),
            ));
        }
        let node = atlas
            .ontology()
            .node(resolved.id)
            .ok_or(UrchinError::MissingEntity(resolved.id))?;
        let side = resolved.suffix_side().unwrap_or(update.side);

        if !update.visible {
            if node.has_geometry() {
                node.set_visibility(side, false)?;
                self.notify_visibility(&node, side, false);
            }
            return Ok(());
        }

        self.ensure_loaded(&node, side).await?;
        node.set_visibility(side, true)?;
        self.track(&node);
        self.notify_visibility(&node, side, true);

        if !update.material.is_empty() {
            if self.materials.contains(&update.material) {
                node.set_material(side, &update.material);
            } else {
                log::warn!(
                    "{}",
                    UrchinError::UnknownMaterial(update.material.clone())
                );
            }
        }

        let color = {
            let colormap = self.colormap.borrow();
            if colormap.enabled {
                let _ = self
                    .intensities
                    .borrow_mut()
                    .insert((node.id(), side), update.color_intensity);
                colormap.active.value(update.color_intensity)
            } else {
                let _ =
                    self.intensities.borrow_mut().remove(&(node.id(), side));
                update.color
            }
        };
        node.set_color(side, color);
        node.set_alpha(side, color[3]);
        Ok(())
    }

    fn notify_visibility(
        &self,
        node: &StructureNode,
        side: Side,
        visible: bool,
    ) {
        self.emit(&AtlasEvent::NodeVisibilityChanged {
            id: node.id(),
            side,
            visible,
        });
    }

    /// Request visibility for one side of `node` directly.
    ///
    /// A loaded side is toggled immediately. Otherwise the node is tracked,
    /// its fetch is started, and a background task applies the requested
    /// visibility to each stage as it resolves, then resets colors and
    /// emits [`AtlasEvent::NodeVisible`].
    pub fn load_area(
        &self,
        node: &Rc<StructureNode>,
        visible: bool,
        side: Side,
    ) -> Result<(), UrchinError> {
        if node.is_loaded(side) {
            node.set_visibility(side, visible)?;
            self.notify_visibility(node, side, visible);
            self.emit(&AtlasEvent::NodeVisible { id: node.id() });
            return Ok(());
        }

        self.track(node);
        let _ = node.begin_load(&self.provider, &*self.spawner)?;

        let node = Rc::clone(node);
        let listeners = self.listeners.clone();
        let task = async move {
            if let Err(e) = node.wait_loaded(Side::Full).await {
                log::warn!("{} not shown: {e}", node.acronym());
                return;
            }
            let full = visible && side == Side::Full;
            show_loaded(&node, &listeners, Side::Full, full);

            if let Err(e) = node.wait_loaded(Side::Left).await {
                log::warn!("{} hemispheres not shown: {e}", node.acronym());
                return;
            }
            for hemisphere in [Side::Left, Side::Right] {
                let shown = visible && side == hemisphere;
                show_loaded(&node, &listeners, hemisphere, shown);
            }
            node.reset_color();
            listeners.emit(&AtlasEvent::NodeVisible { id: node.id() });
        };
        self.spawner.spawn_local(task)?;
        Ok(())
    }

    /// Load and show the atlas default structures as hemispheres.
    ///
    /// Structures whose fetch fails are skipped. Returns the structures that
    /// were shown.
    pub async fn load_default_structures(
        &self,
    ) -> Result<Vec<Rc<StructureNode>>, UrchinError> {
        let atlas = self.active_atlas()?;
        let mut nodes = Vec::with_capacity(atlas.default_areas().len());

        for &id in atlas.default_areas() {
            let Some(node) = atlas.ontology().node(id) else {
                log::warn!("{}", UrchinError::MissingEntity(id));
                continue;
            };
            let loaded = match self.ensure_loaded(&node, Side::Full).await {
                Ok(()) => self.ensure_loaded(&node, Side::Left).await,
                Err(e) => Err(e),
            };
            if let Err(e) = loaded {
                log::warn!("default structure {} skipped: {e}", node.acronym());
                continue;
            }

            for (side, visible) in
                [(Side::Full, false), (Side::Left, true), (Side::Right, true)]
            {
                node.set_visibility(side, visible)?;
                self.notify_visibility(&node, side, visible);
            }
            self.track(&node);
            nodes.push(node);
        }

        log::info!("loaded {} default structures", nodes.len());
        Ok(nodes)
    }

    /// Reset and hide every tracked structure, then forget them.
    ///
    /// Colormap mode is switched off if it was on.
    pub fn clear_all(&self) {
        let cleared = self.visible.borrow_mut().clear();
        log::info!("clearing {} structures", cleared.len());
        for node in &cleared {
            node.reset_material();
            node.reset_color();
            node.hide_all();
        }
        self.intensities.borrow_mut().clear();
        self.emit(&AtlasEvent::Cleared);

        if self.colormap_enabled() {
            if let Err(e) = self.set_active_colormap("") {
                log::warn!("{e}");
            }
        }
    }

    /// Ask the geometry provider to build a custom atlas space.
    ///
    /// On success the atlas name becomes loadable through
    /// [`load_atlas`](Self::load_atlas) even though it is not in the
    /// catalog.
    pub fn create_custom_atlas(
        &self,
        atlas: &CustomAtlas,
    ) -> Result<(), UrchinError> {
        if let Err(e) = self.provider.create_custom_atlas(atlas) {
            log::error!("custom atlas {} not created: {e}", atlas.name);
            return Err(e);
        }
        self.custom.borrow_mut().push(atlas.name.clone());
        Ok(())
    }
}

/// Apply a stage's visibility from a background load and notify.
fn show_loaded(
    node: &StructureNode,
    listeners: &Listeners,
    side: Side,
    visible: bool,
) {
    match node.set_visibility(side, visible) {
        Ok(()) => listeners.emit(&AtlasEvent::NodeVisibilityChanged {
            id: node.id(),
            side,
            visible,
        }),
        Err(e) => log::warn!("{e}"),
    }
}
