//! Structure manager: the client's atlas orchestrator.
//!
//! [`AtlasManager`] mirrors server state into the scene. It bootstraps the
//! reference atlas once, resolves structure identifiers, drives the two-stage
//! mesh loads, and applies visibility, material and color to each
//! [`StructureNode`]. Everything runs on one cooperative scheduler: the
//! manager's async methods suspend only while awaiting a load signal or the
//! atlas bootstrap, and background work is spawned through the
//! [`LocalSpawn`] handed to [`AtlasManager::new`].

mod area_data;
mod coloring;
mod events;
mod persistence;
mod sync;
mod visible_set;


use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub use area_data::{AreaData, AreaSeries};
pub use events::AtlasEvent;
use futures::future::{LocalBoxFuture, Shared};
use futures::task::LocalSpawn;
use rustc_hash::FxHashMap;
pub use visible_set::VisibleSet;

use self::events::Listeners;
use crate::atlas::{LoadResult, ReferenceAtlas, ResolvedId, StructureNode};
use crate::colormap::{Colormap, ColormapRegistry};
use crate::error::UrchinError;
use crate::material::MaterialRegistry;
use crate::message::{AtlasSnapshot, Side};
use crate::options::Options;
use crate::provider::AtlasProvider;

type Bootstrap =
    Shared<LocalBoxFuture<'static, Result<Rc<ReferenceAtlas>, UrchinError>>>;

thread_local! {
    static MANAGER_ACTIVE: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current scheduler thread as owning a manager until dropped.
#[derive(Debug)]
struct ManagerGuard;

impl ManagerGuard {
    fn acquire() -> Result<Self, UrchinError> {
        if MANAGER_ACTIVE.with(|active| active.replace(true)) {
            return Err(UrchinError::ManagerAlreadyActive);
        }
        Ok(Self)
    }
}

impl Drop for ManagerGuard {
    fn drop(&mut self) {
        MANAGER_ACTIVE.with(|active| active.set(false));
    }
}

/// Colormap mode state.
#[derive(Debug, Clone)]
struct ColormapState {
    /// Mapping used in colormap mode and by area data playback.
    active: Colormap,
    enabled: bool,
}

/// Orchestrates atlas bootstrap, structure loading and coloring.
///
/// At most one manager may be alive per scheduler thread; see
/// [`AtlasManager::new`].
pub struct AtlasManager {
    options: Options,
    provider: Rc<dyn AtlasProvider>,
    spawner: Box<dyn LocalSpawn>,
    colormaps: ColormapRegistry,
    materials: MaterialRegistry,

    atlas: RefCell<Option<Rc<ReferenceAtlas>>>,
    /// In-flight bootstrap, keyed by internal atlas name.
    bootstrap: RefCell<Option<(String, Bootstrap)>>,
    /// Custom atlas names accepted in addition to the catalog.
    custom: RefCell<Vec<String>>,
    /// Name, reference coordinate and colormap bounds of the last snapshot.
    data: RefCell<AtlasSnapshot>,

    visible: Rc<RefCell<VisibleSet>>,
    colormap: RefCell<ColormapState>,
    area_data: RefCell<AreaData>,
    /// Last colormap intensity per structure side, for snapshot export.
    intensities: RefCell<FxHashMap<(i32, Side), f32>>,
    left_color_only: Cell<bool>,
    listeners: Listeners,

    _guard: ManagerGuard,
}

impl AtlasManager {
    /// Create the manager for this scheduler thread.
    ///
    /// Fails with [`UrchinError::ManagerAlreadyActive`] while another
    /// manager is alive on the same thread.
    pub fn new(
        options: Options,
        provider: Rc<dyn AtlasProvider>,
        spawner: Box<dyn LocalSpawn>,
    ) -> Result<Self, UrchinError> {
        let guard = ManagerGuard::acquire()?;

        let colormaps = ColormapRegistry::new();
        let active = colormaps
            .get(&options.colormap.initial)
            .cloned()
            .unwrap_or_else(|| {
                log::warn!(
                    "initial colormap {} does not exist, using cool",
                    options.colormap.initial
                );
                Colormap::cool()
            });
        let materials = MaterialRegistry::from_options(&options.materials);

        log::info!(
            "atlas manager ready ({} materials, colormaps: {:?})",
            materials.len(),
            colormaps.names()
        );

        Ok(Self {
            options,
            provider,
            spawner,
            colormaps,
            materials,
            atlas: RefCell::new(None),
            bootstrap: RefCell::new(None),
            custom: RefCell::new(Vec::new()),
            data: RefCell::new(AtlasSnapshot::default()),
            visible: Rc::new(RefCell::new(VisibleSet::default())),
            colormap: RefCell::new(ColormapState {
                active,
                enabled: false,
            }),
            area_data: RefCell::new(AreaData::default()),
            intensities: RefCell::new(FxHashMap::default()),
            left_color_only: Cell::new(false),
            listeners: Listeners::default(),
            _guard: guard,
        })
    }

    // -- Accessors --

    /// Options the manager was created with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The active reference atlas, once bootstrapped.
    #[must_use]
    pub fn atlas(&self) -> Option<Rc<ReferenceAtlas>> {
        self.atlas.borrow().clone()
    }

    fn active_atlas(&self) -> Result<Rc<ReferenceAtlas>, UrchinError> {
        self.atlas().ok_or(UrchinError::AtlasNotLoaded)
    }

    /// Node by ID in the active atlas.
    #[must_use]
    pub fn node(&self, id: i32) -> Option<Rc<StructureNode>> {
        self.atlas().and_then(|atlas| atlas.ontology().node(id))
    }

    /// Resolve an acronym or ID string against the active ontology.
    ///
    /// Before the bootstrap only integer IDs resolve.
    #[must_use]
    pub fn resolve_identifier(&self, text: &str) -> ResolvedId {
        let atlas = self.atlas();
        let ontology = atlas.as_ref().map(|a| a.ontology());
        crate::atlas::resolve_identifier(text, ontology)
    }

    /// IDs in the visible set, in insertion order.
    #[must_use]
    pub fn visible_ids(&self) -> Vec<i32> {
        self.visible.borrow().ids()
    }

    /// Nodes in the visible set, in insertion order.
    #[must_use]
    pub fn visible_nodes(&self) -> Vec<Rc<StructureNode>> {
        self.visible.borrow().iter().cloned().collect()
    }

    /// Whether colormap mode is on.
    #[must_use]
    pub fn colormap_enabled(&self) -> bool {
        self.colormap.borrow().enabled
    }

    /// Mapping designated for colormap mode.
    #[must_use]
    pub fn active_colormap(&self) -> Colormap {
        self.colormap.borrow().active.clone()
    }

    /// Current area data playhead.
    #[must_use]
    pub fn area_data_index(&self) -> usize {
        self.area_data.borrow().index()
    }

    /// Whether right hemispheres are kept at their default color.
    #[must_use]
    pub fn left_color_only(&self) -> bool {
        self.left_color_only.get()
    }

    /// Register an observer for [`AtlasEvent`]s.
    pub fn subscribe(&self, listener: impl Fn(&AtlasEvent) + 'static) {
        self.listeners.subscribe(listener);
    }

    fn emit(&self, event: &AtlasEvent) {
        self.listeners.emit(event);
    }

    // -- Loading helpers --

    /// Start the node's fetch if needed and wait for `side`'s signal.
    async fn ensure_loaded(
        &self,
        node: &Rc<StructureNode>,
        side: Side,
    ) -> LoadResult {
        if node.is_loaded(side) {
            return Ok(());
        }
        let _ = node.begin_load(&self.provider, &*self.spawner)?;
        node.wait_loaded(side).await
    }

    fn track(&self, node: &Rc<StructureNode>) {
        if self.visible.borrow_mut().insert(node) {
            log::debug!("tracking {} ({})", node.acronym(), node.id());
        }
    }
}

impl std::fmt::Debug for AtlasManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasManager")
            .field("atlas", &self.atlas().map(|a| a.name().to_owned()))
            .field("visible", &self.visible.borrow().len())
            .field("colormap", &*self.colormap.borrow())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
