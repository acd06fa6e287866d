//! Geometry/atlas provider seam.
//!
//! Mesh decoding and instantiation live outside this crate. The manager only
//! needs to know *when* an atlas or a structure's meshes become available, so
//! a provider hands back futures that complete on the cooperative scheduler.

use std::cell::{Cell, RefCell};

use futures::future::{self, FutureExt, LocalBoxFuture};
use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::atlas::{AtlasDefinition, ReferenceAtlas};
use crate::error::UrchinError;
use crate::message::CustomAtlas;

/// The two stages of a structure's mesh fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshStage {
    /// Bilateral mesh; always fetched first.
    Full,
    /// Left and right hemisphere meshes, split from the full mesh.
    Hemispheres,
}

/// Source of atlases and structure meshes.
pub trait AtlasProvider {
    /// Load the base atlas (ontology + geometry) by internal name.
    fn load_atlas(
        &self,
        atlas_name: &str,
    ) -> LocalBoxFuture<'static, Result<ReferenceAtlas, UrchinError>>;

    /// Fetch one stage of a structure's meshes.
    fn fetch_mesh(
        &self,
        id: i32,
        stage: MeshStage,
    ) -> LocalBoxFuture<'static, Result<(), UrchinError>>;

    /// Move the atlas reference coordinate (scene origin).
    fn set_reference_coord(&self, _coord: Vec3) {}

    /// Build a custom, empty atlas space.
    fn create_custom_atlas(
        &self,
        atlas: &CustomAtlas,
    ) -> Result<(), UrchinError> {
        Err(UrchinError::AtlasUnavailable(atlas.name.clone()))
    }
}

/// Provider serving atlas definitions from memory; meshes are "fetched"
/// instantly.
///
/// Used by the headless binary and by tests. Every fetch is recorded so
/// callers can check how many requests reached the provider.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    atlases: RefCell<FxHashMap<String, AtlasDefinition>>,
    failing: RefCell<FxHashSet<i32>>,
    fetches: RefCell<Vec<(i32, MeshStage)>>,
    reference_coord: Cell<Vec3>,
}

impl InMemoryProvider {
    /// Provider serving the given atlases.
    #[must_use]
    pub fn new(atlases: Vec<AtlasDefinition>) -> Self {
        let provider = Self::default();
        for atlas in atlases {
            provider.insert_atlas(atlas);
        }
        provider
    }

    /// Provider serving one atlas decoded from JSON.
    pub fn from_json(json: &str) -> Result<Self, UrchinError> {
        let definition: AtlasDefinition = serde_json::from_str(json)?;
        Ok(Self::new(vec![definition]))
    }

    /// Add or replace an atlas definition.
    pub fn insert_atlas(&self, atlas: AtlasDefinition) {
        let _ = self.atlases.borrow_mut().insert(atlas.name.clone(), atlas);
    }

    /// Make every future fetch of `id` fail.
    pub fn fail_mesh(&self, id: i32) {
        let _ = self.failing.borrow_mut().insert(id);
    }

    /// Every mesh fetch received so far, in order.
    #[must_use]
    pub fn fetches(&self) -> Vec<(i32, MeshStage)> {
        self.fetches.borrow().clone()
    }

    /// Last reference coordinate pushed by the manager.
    #[must_use]
    pub fn reference_coord(&self) -> Vec3 {
        self.reference_coord.get()
    }
}

impl AtlasProvider for InMemoryProvider {
    fn load_atlas(
        &self,
        atlas_name: &str,
    ) -> LocalBoxFuture<'static, Result<ReferenceAtlas, UrchinError>> {
        let result = self
            .atlases
            .borrow()
            .get(atlas_name)
            .map(ReferenceAtlas::new)
            .ok_or_else(|| UrchinError::UnknownAtlas(atlas_name.to_owned()));
        future::ready(result).boxed_local()
    }

    fn fetch_mesh(
        &self,
        id: i32,
        stage: MeshStage,
    ) -> LocalBoxFuture<'static, Result<(), UrchinError>> {
        self.fetches.borrow_mut().push((id, stage));
        let result = if self.failing.borrow().contains(&id) {
            Err(UrchinError::Load(format!("no {stage:?} mesh for {id}")))
        } else {
            Ok(())
        };
        future::ready(result).boxed_local()
    }

    fn set_reference_coord(&self, coord: Vec3) {
        self.reference_coord.set(coord);
    }

    fn create_custom_atlas(
        &self,
        atlas: &CustomAtlas,
    ) -> Result<(), UrchinError> {
        log::info!(
            "creating custom atlas {} ({:?} mm at {:?} um)",
            atlas.name,
            atlas.dimensions,
            atlas.resolution
        );
        self.insert_atlas(AtlasDefinition {
            name: atlas.name.clone(),
            ..AtlasDefinition::default()
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    const ATLAS_JSON: &str = r#"{
        "name": "allen_mouse_25um",
        "defaultAreas": [993],
        "structures": [
            {"id": 993, "acronym": "MOs", "name": "Secondary motor area",
             "group": 315, "color": [0.12, 0.5, 0.4, 1.0]}
        ]
    }"#;

    #[test]
    fn serves_atlas_from_json() {
        let provider = InMemoryProvider::from_json(ATLAS_JSON).unwrap();
        let atlas = block_on(provider.load_atlas("allen_mouse_25um")).unwrap();
        assert_eq!(atlas.name(), "allen_mouse_25um");
        assert_eq!(atlas.ontology().acronym_to_id("MOs"), Some(993));
        assert!(matches!(
            block_on(provider.load_atlas("whs_sd_rat_39um")),
            Err(UrchinError::UnknownAtlas(_))
        ));
    }

    #[test]
    fn records_fetches_and_failures() {
        let provider = InMemoryProvider::default();
        provider.fail_mesh(7);
        assert_eq!(block_on(provider.fetch_mesh(1, MeshStage::Full)), Ok(()));
        assert!(block_on(provider.fetch_mesh(7, MeshStage::Full)).is_err());
        assert_eq!(
            provider.fetches(),
            vec![(1, MeshStage::Full), (7, MeshStage::Full)]
        );
    }

    #[test]
    fn custom_atlas_becomes_loadable() {
        let provider = InMemoryProvider::default();
        let custom = CustomAtlas {
            name: "custom".to_owned(),
            dimensions: [11.4, 13.2, 8.0],
            resolution: [25.0; 3],
        };
        provider.create_custom_atlas(&custom).unwrap();
        let atlas = block_on(provider.load_atlas("custom")).unwrap();
        assert!(atlas.ontology().is_empty());
    }
}
