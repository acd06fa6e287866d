//! Crate-level error types.

use std::fmt;

use crate::message::Side;

/// Errors produced by the urchin crate.
///
/// Most of these are reported to the log and swallowed by the batch
/// operations on [`AtlasManager`](crate::manager::AtlasManager); only
/// [`ManagerAlreadyActive`](Self::ManagerAlreadyActive) is meant to halt
/// startup.
#[derive(Debug, Clone, PartialEq)]
pub enum UrchinError {
    /// The requested API atlas name is not in the atlas catalog.
    UnknownAtlas(String),
    /// The atlas exists but is not available on the current platform.
    AtlasUnavailable(String),
    /// A different atlas is already active; atlases cannot be swapped.
    AtlasAlreadyLoaded {
        /// Internal name of the atlas that is already active.
        active: String,
        /// Internal name of the atlas that was requested.
        requested: String,
    },
    /// An operation needed the reference atlas before it was bootstrapped.
    AtlasNotLoaded,
    /// An identifier could not be resolved to an ontology node.
    UnresolvedIdentifier(String),
    /// A material name is not in the material registry.
    UnknownMaterial(String),
    /// A colormap name is not in the colormap registry.
    UnknownColormap(String),
    /// A structure ID is not present in the ontology.
    MissingEntity(i32),
    /// The area data playhead points past the end of a series.
    AreaDataIndex {
        /// Requested playhead index.
        index: usize,
        /// Structure whose series is too short.
        id: i32,
        /// Length of that series.
        len: usize,
    },
    /// A mesh or atlas fetch failed terminally.
    Load(String),
    /// A side was made visible before its mesh finished loading.
    NotLoaded {
        /// Structure ID.
        id: i32,
        /// Side that is not loaded yet.
        side: Side,
    },
    /// An exploded-view grouping index is out of range.
    UnknownGrouping {
        /// Requested grouping index.
        index: usize,
        /// Number of configured groupings.
        count: usize,
    },
    /// A second manager was constructed on a scheduler that already has one.
    ManagerAlreadyActive,
    /// The cooperative executor refused a background load task.
    Spawn(String),
    /// Generic I/O failure.
    Io(String),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// JSON snapshot or ontology parsing/serialization failure.
    SnapshotParse(String),
}

impl fmt::Display for UrchinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAtlas(name) => {
                write!(f, "atlas {name} does not exist")
            }
            Self::AtlasUnavailable(name) => {
                write!(f, "atlas {name} is not available on this platform")
            }
            Self::AtlasAlreadyLoaded { active, requested } => write!(
                f,
                "atlas {active} is already loaded, cannot load {requested}; \
                 restart to change atlases"
            ),
            Self::AtlasNotLoaded => write!(f, "no reference atlas is loaded"),
            Self::UnresolvedIdentifier(text) => {
                write!(f, "could not resolve structure identifier '{text}'")
            }
            Self::UnknownMaterial(name) => {
                write!(f, "material {name} does not exist")
            }
            Self::UnknownColormap(name) => {
                write!(f, "colormap {name} does not exist")
            }
            Self::MissingEntity(id) => {
                write!(f, "structure {id} is not in the ontology")
            }
            Self::AreaDataIndex { index, id, len } => write!(
                f,
                "area data index {index} out of range for structure {id} \
                 (series length {len})"
            ),
            Self::Load(msg) => write!(f, "load error: {msg}"),
            Self::NotLoaded { id, side } => {
                write!(f, "structure {id} {side:?} mesh is not loaded")
            }
            Self::UnknownGrouping { index, count } => write!(
                f,
                "grouping {index} does not exist ({count} groupings configured)"
            ),
            Self::ManagerAlreadyActive => {
                write!(f, "only one atlas manager can exist per scheduler")
            }
            Self::Spawn(msg) => write!(f, "failed to spawn load task: {msg}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::SnapshotParse(msg) => {
                write!(f, "snapshot parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for UrchinError {}

impl From<std::io::Error> for UrchinError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for UrchinError {
    fn from(e: serde_json::Error) -> Self {
        Self::SnapshotParse(e.to_string())
    }
}

impl From<futures::task::SpawnError> for UrchinError {
    fn from(e: futures::task::SpawnError) -> Self {
        Self::Spawn(e.to_string())
    }
}
