use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::task::{LocalSpawn, LocalSpawnExt};
use serde::{Deserialize, Serialize};

use super::signal::{LoadResult, LoadSignal};
use crate::colormap::Rgba;
use crate::error::UrchinError;
use crate::message::Side;
use crate::provider::{AtlasProvider, MeshStage};

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Static description of one ontology node, as shipped with an atlas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyEntry {
    /// Atlas ID.
    pub id: i32,
    /// Short acronym (e.g. `MOs`).
    pub acronym: String,
    /// Full structure name.
    #[serde(default)]
    pub name: String,
    /// Coarse parent (cosmos) group used by the exploded view.
    #[serde(default)]
    pub group: Option<i32>,
    /// Default color restored on reset.
    #[serde(default = "default_structure_color")]
    pub color: Rgba,
}

fn default_structure_color() -> Rgba {
    [1.0, 1.0, 1.0, 1.0]
}

/// Where a side is in its load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No fetch has been started.
    Unloaded,
    /// A fetch is in flight and this side's signal has not resolved.
    Loading,
    /// Mesh is available.
    Loaded,
    /// The fetch failed; this side will never load.
    Failed,
}

/// Render-facing state of one side.
#[derive(Debug, Clone, PartialEq)]
pub struct SideState {
    /// Whether the side's mesh is shown.
    pub visible: bool,
    /// Assigned material, `None` for the atlas default.
    pub material: Option<String>,
    /// Assigned color.
    pub color: Rgba,
    /// Shader alpha scalar.
    pub alpha: f32,
}

impl SideState {
    fn hidden(color: Rgba) -> Self {
        Self {
            visible: false,
            material: None,
            color,
            alpha: color[3],
        }
    }
}

// ---------------------------------------------------------------------------
// StructureNode
// ---------------------------------------------------------------------------

/// One anatomical structure with Full / Left / Right meshes.
///
/// The Full mesh and the two hemisphere meshes come from a single two-stage
/// fetch: the Full signal resolves first, then the shared hemisphere signal.
/// A side can only be made visible once its signal resolved successfully.
/// Nodes are owned by the [`Ontology`](super::Ontology) and shared with the
/// manager through `Rc`.
#[derive(Debug)]
pub struct StructureNode {
    id: i32,
    acronym: String,
    name: String,
    group: Option<i32>,
    default_color: Rgba,
    sides: RefCell<[SideState; 3]>,
    fetch_started: Cell<bool>,
    fetch_count: Cell<u32>,
    full_loaded: LoadSignal,
    side_loaded: LoadSignal,
}

const fn slot(side: Side) -> usize {
    match side {
        Side::Full => 0,
        Side::Left => 1,
        Side::Right => 2,
    }
}

impl StructureNode {
    /// Fresh, unloaded node.
    #[must_use]
    pub fn new(entry: &OntologyEntry) -> Self {
        let hidden = SideState::hidden(entry.color);
        Self {
            id: entry.id,
            acronym: entry.acronym.clone(),
            name: entry.name.clone(),
            group: entry.group,
            default_color: entry.color,
            sides: RefCell::new([hidden.clone(), hidden.clone(), hidden]),
            fetch_started: Cell::new(false),
            fetch_count: Cell::new(0),
            full_loaded: LoadSignal::new(),
            side_loaded: LoadSignal::new(),
        }
    }

    /// Atlas ID.
    #[must_use]
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Acronym.
    #[must_use]
    pub fn acronym(&self) -> &str {
        &self.acronym
    }

    /// Full name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cosmos group, if the atlas assigns one.
    #[must_use]
    pub fn group(&self) -> Option<i32> {
        self.group
    }

    /// Color restored by [`reset_color`](Self::reset_color).
    #[must_use]
    pub fn default_color(&self) -> Rgba {
        self.default_color
    }

    // -- Load lifecycle --

    fn signal(&self, side: Side) -> &LoadSignal {
        match side {
            Side::Full => &self.full_loaded,
            Side::Left | Side::Right => &self.side_loaded,
        }
    }

    /// Load state of one side.
    #[must_use]
    pub fn load_state(&self, side: Side) -> LoadState {
        let signal = self.signal(side);
        match signal.outcome() {
            Some(Ok(())) => LoadState::Loaded,
            Some(Err(_)) => LoadState::Failed,
            None if self.fetch_started.get() => LoadState::Loading,
            None => LoadState::Unloaded,
        }
    }

    /// Whether `side`'s mesh is available.
    #[must_use]
    pub fn is_loaded(&self, side: Side) -> bool {
        self.signal(side).is_ok()
    }

    /// Whether any geometry (full or hemisphere) has been instantiated.
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.full_loaded.is_ok() || self.side_loaded.is_ok()
    }

    /// Number of fetches ever started for this node (0 or 1).
    #[must_use]
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.get()
    }

    /// Future resolving when `side`'s signal resolves.
    pub fn wait_loaded(
        &self,
        side: Side,
    ) -> impl std::future::Future<Output = LoadResult> {
        self.signal(side).wait()
    }

    /// Start the two-stage fetch on `spawner` unless one is already in
    /// flight or finished.
    ///
    /// Returns `Ok(true)` when this call started the fetch, `Ok(false)` when
    /// the caller should simply wait on the existing signals.
    pub fn begin_load(
        self: &Rc<Self>,
        provider: &Rc<dyn AtlasProvider>,
        spawner: &dyn LocalSpawn,
    ) -> Result<bool, UrchinError> {
        if self.fetch_started.replace(true) {
            return Ok(false);
        }
        log::debug!("loading meshes for {} ({})", self.acronym, self.id);

        let node = Rc::clone(self);
        let provider = Rc::clone(provider);
        let task = async move {
            let full = provider.fetch_mesh(node.id, MeshStage::Full).await;
            if !node.finish_stage(MeshStage::Full, full) {
                return;
            }
            let hemispheres =
                provider.fetch_mesh(node.id, MeshStage::Hemispheres).await;
            let _ = node.finish_stage(MeshStage::Hemispheres, hemispheres);
        };

        match spawner.spawn_local(task) {
            Ok(()) => {
                self.fetch_count.set(self.fetch_count.get() + 1);
                Ok(true)
            }
            Err(e) => {
                self.fetch_started.set(false);
                Err(e.into())
            }
        }
    }

    /// Commit one fetch stage: reset the stage's sides to defaults, then
    /// resolve its signal. A failed full stage fails both signals.
    fn finish_stage(&self, stage: MeshStage, result: LoadResult) -> bool {
        match (stage, result) {
            (MeshStage::Full, Ok(())) => {
                self.reset_sides(&[Side::Full]);
                let _ = self.full_loaded.resolve(Ok(()));
                true
            }
            (MeshStage::Hemispheres, Ok(())) => {
                self.reset_sides(&[Side::Left, Side::Right]);
                let _ = self.side_loaded.resolve(Ok(()));
                true
            }
            (stage, Err(e)) => {
                log::error!(
                    "{stage:?} mesh fetch failed for {} ({}): {e}",
                    self.acronym,
                    self.id
                );
                if stage == MeshStage::Full {
                    let _ = self.full_loaded.resolve(Err(e.clone()));
                }
                let _ = self.side_loaded.resolve(Err(e));
                false
            }
        }
    }

    fn reset_sides(&self, sides: &[Side]) {
        let mut states = self.sides.borrow_mut();
        for &side in sides {
            let state = &mut states[slot(side)];
            state.material = None;
            state.color = self.default_color;
            state.alpha = self.default_color[3];
        }
    }

    // -- Render state --

    /// Snapshot of one side's render state.
    #[must_use]
    pub fn side_state(&self, side: Side) -> SideState {
        self.sides.borrow()[slot(side)].clone()
    }

    /// Whether `side` is shown.
    #[must_use]
    pub fn is_visible(&self, side: Side) -> bool {
        self.sides.borrow()[slot(side)].visible
    }

    /// Whether any side is shown.
    #[must_use]
    pub fn is_any_visible(&self) -> bool {
        self.sides.borrow().iter().any(|s| s.visible)
    }

    /// Show or hide one side. Showing requires the side to be loaded.
    pub fn set_visibility(
        &self,
        side: Side,
        visible: bool,
    ) -> Result<(), UrchinError> {
        if visible && !self.is_loaded(side) {
            return Err(UrchinError::NotLoaded { id: self.id, side });
        }
        self.sides.borrow_mut()[slot(side)].visible = visible;
        Ok(())
    }

    /// Hide every side.
    pub fn hide_all(&self) {
        for state in self.sides.borrow_mut().iter_mut() {
            state.visible = false;
        }
    }

    /// Assign a material to one side.
    pub fn set_material(&self, side: Side, material: &str) {
        self.sides.borrow_mut()[slot(side)].material =
            Some(material.to_owned());
    }

    /// Restore the atlas default material on every side.
    pub fn reset_material(&self) {
        for state in self.sides.borrow_mut().iter_mut() {
            state.material = None;
        }
    }

    /// Assign a color to one side.
    pub fn set_color(&self, side: Side, color: Rgba) {
        self.sides.borrow_mut()[slot(side)].color = color;
    }

    /// Restore the default color (and its alpha) on every side.
    pub fn reset_color(&self) {
        self.reset_sides(&Side::ALL);
    }

    /// Set the shader alpha scalar of one side.
    pub fn set_alpha(&self, side: Side, alpha: f32) {
        self.sides.borrow_mut()[slot(side)].alpha = alpha;
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::LocalPool;

    use super::*;
    use crate::provider::InMemoryProvider;

    fn entry() -> OntologyEntry {
        OntologyEntry {
            id: 993,
            acronym: "MOs".to_owned(),
            name: "Secondary motor area".to_owned(),
            group: Some(315),
            color: [0.12, 0.5, 0.4, 1.0],
        }
    }

    #[test]
    fn showing_an_unloaded_side_is_rejected() {
        let node = StructureNode::new(&entry());
        assert_eq!(node.load_state(Side::Left), LoadState::Unloaded);
        assert_eq!(
            node.set_visibility(Side::Left, true),
            Err(UrchinError::NotLoaded {
                id: 993,
                side: Side::Left
            })
        );
        // Hiding never needs geometry.
        assert_eq!(node.set_visibility(Side::Left, false), Ok(()));
    }

    #[test]
    fn begin_load_resolves_both_signals_and_resets_defaults() {
        let mut pool = LocalPool::new();
        let provider: Rc<dyn AtlasProvider> =
            Rc::new(InMemoryProvider::default());
        let node = Rc::new(StructureNode::new(&entry()));
        node.set_color(Side::Left, [1.0, 0.0, 0.0, 0.3]);

        assert_eq!(node.begin_load(&provider, &pool.spawner()), Ok(true));
        assert_eq!(node.begin_load(&provider, &pool.spawner()), Ok(false));
        assert_eq!(node.load_state(Side::Full), LoadState::Loading);
        pool.run_until_stalled();

        for side in Side::ALL {
            assert_eq!(node.load_state(side), LoadState::Loaded);
        }
        assert_eq!(node.fetch_count(), 1);
        assert_eq!(node.side_state(Side::Left).color, [0.12, 0.5, 0.4, 1.0]);
        assert!(node.set_visibility(Side::Right, true).is_ok());
        assert!(node.is_any_visible());
    }

    #[test]
    fn reset_and_hide_restore_defaults() {
        let mut pool = LocalPool::new();
        let provider: Rc<dyn AtlasProvider> =
            Rc::new(InMemoryProvider::default());
        let node = Rc::new(StructureNode::new(&entry()));
        let _ = node.begin_load(&provider, &pool.spawner());
        pool.run_until_stalled();

        node.set_material(Side::Full, "transparent-lit");
        node.set_color(Side::Full, [0.0, 0.0, 1.0, 0.2]);
        node.set_alpha(Side::Full, 0.2);
        node.set_visibility(Side::Full, true).unwrap();

        node.reset_material();
        node.reset_color();
        node.hide_all();

        let state = node.side_state(Side::Full);
        assert!(!state.visible);
        assert_eq!(state.material, None);
        assert_eq!(state.color, node.default_color());
        assert_eq!(state.alpha, 1.0);
        assert!(node.has_geometry());
    }
}
