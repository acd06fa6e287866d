//! Reference atlas: ontology registry, structure nodes and their load
//! signals.
//!
//! The [`Ontology`] owns every [`StructureNode`] for the lifetime of the
//! atlas. Nodes are handed out as `Rc` so the manager can track membership
//! without owning them; clearing the scene never destroys a node.

mod node;
mod signal;

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;
pub use node::{LoadState, OntologyEntry, SideState, StructureNode};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
pub use signal::{LoadResult, LoadSignal};

use crate::message::Side;

/// ID returned for identifiers that do not name a structure.
pub const INVALID_ID: i32 = -1;

const LEFT_SUFFIX: &str = "-lh";
const RIGHT_SUFFIX: &str = "-rh";

// ---------------------------------------------------------------------------
// Identifier resolution
// ---------------------------------------------------------------------------

/// Result of resolving an acronym or ID string.
///
/// Exactly one of `full`, `left`, `right` is set. `id` is [`INVALID_ID`]
/// when resolution failed; the side flags are still meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedId {
    /// Atlas ID or [`INVALID_ID`].
    pub id: i32,
    /// No hemisphere suffix was given.
    pub full: bool,
    /// `-lh` suffix.
    pub left: bool,
    /// `-rh` suffix.
    pub right: bool,
}

impl ResolvedId {
    /// Whether `id` names a structure.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id != INVALID_ID
    }

    /// Side selected by the suffix, `None` when no suffix was given.
    #[must_use]
    pub fn suffix_side(&self) -> Option<Side> {
        if self.left {
            Some(Side::Left)
        } else if self.right {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Side selected by the suffix, falling back to [`Side::Full`].
    #[must_use]
    pub fn side(&self) -> Side {
        self.suffix_side().unwrap_or(Side::Full)
    }
}

/// Resolve `text` into an atlas ID plus side flags.
///
/// A trailing `-lh` / `-rh` selects a hemisphere. The remainder is matched
/// case-insensitively against acronyms (when an ontology is available), then
/// parsed as an integer. `void` always resolves to [`INVALID_ID`].
#[must_use]
pub fn resolve_identifier(
    text: &str,
    ontology: Option<&Ontology>,
) -> ResolvedId {
    let (stem, left, right) = if let Some(stem) = text.strip_suffix(LEFT_SUFFIX)
    {
        (stem, true, false)
    } else if let Some(stem) = text.strip_suffix(RIGHT_SUFFIX) {
        (stem, false, true)
    } else {
        (text, false, false)
    };
    let full = !(left || right);
    let resolved = |id| ResolvedId {
        id,
        full,
        left,
        right,
    };

    let lower = stem.to_lowercase();
    if lower == "void" {
        return resolved(INVALID_ID);
    }
    if let Some(id) = ontology.and_then(|o| o.acronym_to_id(&lower)) {
        return resolved(id);
    }
    match stem.trim().parse::<i32>() {
        Ok(id) => resolved(id),
        Err(_) => resolved(INVALID_ID),
    }
}

// ---------------------------------------------------------------------------
// Ontology
// ---------------------------------------------------------------------------

/// Registry of every structure in an atlas.
#[derive(Debug, Default)]
pub struct Ontology {
    nodes: FxHashMap<i32, Rc<StructureNode>>,
    acronyms: FxHashMap<String, i32>,
}

impl Ontology {
    /// Build the registry from static entries. Later duplicates of an ID or
    /// acronym replace earlier ones.
    #[must_use]
    pub fn new(entries: &[OntologyEntry]) -> Self {
        let mut ontology = Self::default();
        for entry in entries {
            let _ = ontology
                .acronyms
                .insert(entry.acronym.to_lowercase(), entry.id);
            let _ = ontology
                .nodes
                .insert(entry.id, Rc::new(StructureNode::new(entry)));
        }
        ontology
    }

    /// Node by atlas ID.
    #[must_use]
    pub fn node(&self, id: i32) -> Option<Rc<StructureNode>> {
        self.nodes.get(&id).cloned()
    }

    /// ID for an acronym (case-insensitive).
    #[must_use]
    pub fn acronym_to_id(&self, acronym: &str) -> Option<i32> {
        self.acronyms.get(&acronym.to_lowercase()).copied()
    }

    /// Resolve an identifier against this ontology.
    #[must_use]
    pub fn resolve(&self, text: &str) -> ResolvedId {
        resolve_identifier(text, Some(self))
    }

    /// Number of structures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the ontology is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ReferenceAtlas
// ---------------------------------------------------------------------------

/// Static description of an atlas, as served by a provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AtlasDefinition {
    /// Internal atlas name.
    pub name: String,
    /// Structures shown by `load_default_structures`.
    pub default_areas: Vec<i32>,
    /// Every structure in the atlas.
    pub structures: Vec<OntologyEntry>,
}

/// A bootstrapped atlas: its ontology plus the active reference coordinate.
#[derive(Debug)]
pub struct ReferenceAtlas {
    name: String,
    ontology: Ontology,
    default_areas: Vec<i32>,
    reference_coord: Cell<Vec3>,
}

impl ReferenceAtlas {
    /// Instantiate every node of `definition`.
    #[must_use]
    pub fn new(definition: &AtlasDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            ontology: Ontology::new(&definition.structures),
            default_areas: definition.default_areas.clone(),
            reference_coord: Cell::new(Vec3::ZERO),
        }
    }

    /// Internal atlas name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Structure registry.
    #[must_use]
    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    /// IDs shown by default.
    #[must_use]
    pub fn default_areas(&self) -> &[i32] {
        &self.default_areas
    }

    /// Current reference coordinate.
    #[must_use]
    pub fn reference_coord(&self) -> Vec3 {
        self.reference_coord.get()
    }

    /// Move the reference coordinate.
    pub fn set_reference_coord(&self, coord: Vec3) {
        self.reference_coord.set(coord);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ontology() -> Ontology {
        let entry = |id, acronym: &str| OntologyEntry {
            id,
            acronym: acronym.to_owned(),
            name: String::new(),
            group: None,
            color: [1.0; 4],
        };
        Ontology::new(&[
            entry(993, "MOs"),
            entry(385, "VISp"),
            entry(8, "grey"),
        ])
    }

    #[test]
    fn hemisphere_suffix_selects_side() {
        let o = ontology();
        assert_eq!(
            o.resolve("MOs-lh"),
            ResolvedId {
                id: 993,
                full: false,
                left: true,
                right: false
            }
        );
        let right = o.resolve("VISp-rh");
        assert_eq!((right.id, right.side()), (385, Side::Right));
    }

    #[test]
    fn acronyms_match_case_insensitively() {
        let o = ontology();
        assert_eq!(o.resolve("mos").id, 993);
        assert_eq!(o.resolve("VISP").id, 385);
        assert_eq!(o.resolve("Grey-lh").id, 8);
    }

    #[test]
    fn void_is_always_invalid() {
        let o = ontology();
        let void = o.resolve("void");
        assert_eq!(void.id, INVALID_ID);
        assert!(!void.is_valid());
        assert!(void.full);
        let void_left = o.resolve("VOID-lh");
        assert!(!void_left.is_valid());
        assert!(void_left.left);
    }

    #[test]
    fn integers_fall_back_to_parse() {
        let o = ontology();
        assert_eq!(
            o.resolve("315"),
            ResolvedId {
                id: 315,
                full: true,
                left: false,
                right: false
            }
        );
        assert_eq!(resolve_identifier("512-rh", None).id, 512);
        assert_eq!(resolve_identifier("MOs", None).id, INVALID_ID);
    }

    #[test]
    fn unresolvable_identifier_keeps_side_flags() {
        let resolved = ontology().resolve("nonsense-rh");
        assert_eq!(resolved.id, INVALID_ID);
        assert!(resolved.right);
        assert_eq!(resolved.suffix_side(), Some(Side::Right));
    }

    #[test]
    fn reference_atlas_instantiates_every_structure() {
        let atlas = ReferenceAtlas::new(&AtlasDefinition {
            name: "allen_mouse_25um".to_owned(),
            default_areas: vec![993],
            structures: vec![OntologyEntry {
                id: 993,
                acronym: "MOs".to_owned(),
                name: String::new(),
                group: Some(315),
                color: [1.0; 4],
            }],
        });
        assert_eq!(atlas.ontology().len(), 1);
        assert_eq!(atlas.default_areas(), &[993]);
        assert_eq!(atlas.ontology().node(993).unwrap().group(), Some(315));
        atlas.set_reference_coord(Vec3::new(5.5, 4.0, -6.5));
        assert_eq!(atlas.reference_coord(), Vec3::new(5.5, 4.0, -6.5));
    }
}
