use glam::Vec3;
use rustc_hash::FxHashMap;

use super::{explode, mirror, CosmosGrouping, HemispherePose, Placement};
use crate::atlas::StructureNode;
use crate::error::UrchinError;
use crate::options::{ExplodeOptions, MirrorAxis};

/// A structure registered with the exploded view.
#[derive(Debug, Clone, Copy)]
struct Registered {
    group: i32,
    rest: HemispherePose,
    mesh_center: Vec3,
}

/// Exploded-view state: resting poses, active grouping and explosion
/// parameters.
///
/// Resting poses are recorded the first time a structure registers and are
/// never overwritten. Group vectors and mesh centers are cached per grouping
/// and rebuilt only by [`set_grouping`](Self::set_grouping). Every setter
/// returns fresh placements for the whole visible set.
#[derive(Debug, Clone)]
pub struct ExplodedView {
    groupings: Vec<CosmosGrouping>,
    grouping: usize,
    vectors: FxHashMap<i32, Vec3>,
    centers: FxHashMap<i32, Vec3>,
    registered: FxHashMap<i32, Registered>,
    percentage: f32,
    left_only: bool,
    mirror_axis: MirrorAxis,
}

impl ExplodedView {
    /// View over `groupings`, starting at rest.
    #[must_use]
    pub fn new(
        groupings: Vec<CosmosGrouping>,
        options: &ExplodeOptions,
    ) -> Self {
        let grouping = if options.grouping < groupings.len() {
            options.grouping
        } else {
            if !groupings.is_empty() {
                log::warn!(
                    "grouping {} does not exist, using grouping 0",
                    options.grouping
                );
            }
            0
        };
        let mut view = Self {
            groupings,
            grouping,
            vectors: FxHashMap::default(),
            centers: FxHashMap::default(),
            registered: FxHashMap::default(),
            percentage: 0.0,
            left_only: options.left_only,
            mirror_axis: options.mirror_axis,
        };
        view.recompute_groups();
        view
    }

    fn recompute_groups(&mut self) {
        self.vectors.clear();
        self.centers.clear();
        let Some(grouping) = self.groupings.get(self.grouping) else {
            return;
        };
        for group in &grouping.groups {
            let _ = self.vectors.insert(group.id, group.vector);
            let _ = self.centers.insert(group.id, group.mesh_center);
        }
        let missing = grouping.missing_groups();
        if !missing.is_empty() {
            log::debug!(
                "grouping {} has no vectors for {missing:?}",
                grouping.name
            );
        }
    }

    // -- Registration --

    /// Record a structure's resting pose. Returns `false` (and keeps the
    /// original pose) if the structure was already registered.
    pub fn register(
        &mut self,
        id: i32,
        group: i32,
        rest: HemispherePose,
        mesh_center: Vec3,
    ) -> bool {
        if self.registered.contains_key(&id) {
            return false;
        }
        let _ = self.registered.insert(
            id,
            Registered {
                group,
                rest,
                mesh_center,
            },
        );
        true
    }

    /// Register `node` under its cosmos group. Nodes without a group cannot
    /// be exploded and are rejected.
    pub fn register_node(
        &mut self,
        node: &StructureNode,
        rest: HemispherePose,
        mesh_center: Vec3,
    ) -> bool {
        let Some(group) = node.group() else {
            log::warn!("{} has no cosmos group, not exploded", node.acronym());
            return false;
        };
        self.register(node.id(), group, rest, mesh_center)
    }

    /// Whether `id` has a resting pose.
    #[must_use]
    pub fn is_registered(&self, id: i32) -> bool {
        self.registered.contains_key(&id)
    }

    /// Mesh center recorded at registration.
    #[must_use]
    pub fn mesh_center(&self, id: i32) -> Option<Vec3> {
        self.registered.get(&id).map(|r| r.mesh_center)
    }

    // -- Accessors --

    /// Current explosion percentage in [0, 1].
    #[must_use]
    pub fn percentage(&self) -> f32 {
        self.percentage
    }

    /// Whether the right hemisphere stays at rest.
    #[must_use]
    pub fn left_only(&self) -> bool {
        self.left_only
    }

    /// Index of the active grouping.
    #[must_use]
    pub fn grouping(&self) -> usize {
        self.grouping
    }

    /// Names of the configured groupings.
    #[must_use]
    pub fn grouping_names(&self) -> Vec<&str> {
        self.groupings.iter().map(|g| g.name.as_str()).collect()
    }

    /// Displacement vector of `group` in the active grouping.
    #[must_use]
    pub fn group_vector(&self, group: i32) -> Option<Vec3> {
        self.vectors.get(&group).copied()
    }

    /// Mesh-bounds center of `group` in the active grouping.
    #[must_use]
    pub fn group_center(&self, group: i32) -> Option<Vec3> {
        self.centers.get(&group).copied()
    }

    // -- Triggers --

    /// Set the explosion percentage (clamped to [0, 1]).
    pub fn set_percentage(
        &mut self,
        p: f32,
        visible: &[i32],
    ) -> Vec<Placement> {
        self.percentage = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self.placements(visible)
    }

    /// Keep the right hemisphere at rest, or let it explode mirrored.
    pub fn set_left_only(
        &mut self,
        left_only: bool,
        visible: &[i32],
    ) -> Vec<Placement> {
        self.left_only = left_only;
        self.placements(visible)
    }

    /// Switch groupings and rebuild the cached vectors and centers.
    pub fn set_grouping(
        &mut self,
        index: usize,
        visible: &[i32],
    ) -> Result<Vec<Placement>, UrchinError> {
        if index >= self.groupings.len() {
            return Err(UrchinError::UnknownGrouping {
                index,
                count: self.groupings.len(),
            });
        }
        self.grouping = index;
        self.recompute_groups();
        log::debug!("exploded view grouping set to {index}");
        Ok(self.placements(visible))
    }

    // -- Placement --

    /// Placement of one registered structure. Structures whose group has no
    /// vector in the active grouping stay at rest.
    #[must_use]
    pub fn placement(&self, id: i32) -> Option<Placement> {
        let registered = self.registered.get(&id)?;
        let vector = self.group_vector(registered.group).unwrap_or(Vec3::ZERO);
        let rest = registered.rest;
        let right = if self.left_only {
            rest.right
        } else {
            let mirrored = mirror(vector, self.mirror_axis);
            explode(rest.right, mirrored, self.percentage)
        };
        Some(Placement {
            id,
            pose: HemispherePose {
                left: explode(rest.left, vector, self.percentage),
                right,
            },
        })
    }

    /// Placements for every registered structure in `visible`.
    #[must_use]
    pub fn placements(&self, visible: &[i32]) -> Vec<Placement> {
        visible.iter().filter_map(|&id| self.placement(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explode::CosmosGroup;

    fn grouping(name: &str, vector: Vec3) -> CosmosGrouping {
        CosmosGrouping::new(
            name,
            vec![
                CosmosGroup {
                    id: 315,
                    vector,
                    mesh_center: Vec3::new(5.0, 3.0, -4.0),
                },
                CosmosGroup {
                    id: 1089,
                    vector: -vector,
                    mesh_center: Vec3::new(6.0, 4.0, -7.0),
                },
            ],
        )
    }

    fn view() -> ExplodedView {
        let mut view = ExplodedView::new(
            vec![
                grouping("isocortex", Vec3::new(1.0, 2.0, 3.0)),
                grouping("flat", Vec3::new(0.0, 4.0, 0.0)),
            ],
            &ExplodeOptions::default(),
        );
        assert!(view.register(993, 315, pose(), Vec3::ONE));
        assert!(view.register(382, 1089, pose(), Vec3::ONE));
        assert!(view.is_registered(993));
        assert!(!view.is_registered(385));
        view
    }

    fn pose() -> HemispherePose {
        HemispherePose {
            left: Vec3::new(0.0, 0.0, 0.0),
            right: Vec3::new(0.0, 0.0, 11.4),
        }
    }

    #[test]
    fn zero_percent_is_exactly_at_rest() {
        let mut view = view();
        let placements = view.set_percentage(0.0, &[993, 382]);
        assert_eq!(placements.len(), 2);
        for p in placements {
            assert_eq!(p.pose, pose());
        }
    }

    #[test]
    fn full_percent_adds_vector_and_mirrors_right() {
        let mut view = view();
        let placements = view.set_percentage(1.0, &[993]);
        assert_eq!(
            placements[0].pose,
            HemispherePose {
                left: Vec3::new(1.0, 2.0, 3.0),
                right: Vec3::new(1.0, 2.0, 11.4 - 3.0),
            }
        );
    }

    #[test]
    fn left_only_keeps_right_at_rest() {
        let mut view = view();
        let _ = view.set_percentage(1.0, &[]);
        let placements = view.set_left_only(true, &[993]);
        assert_eq!(placements[0].pose.left, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(placements[0].pose.right, pose().right);
        assert!(view.left_only());
    }

    #[test]
    fn resting_pose_is_recorded_once() {
        let mut view = view();
        let moved = HemispherePose {
            left: Vec3::splat(9.0),
            right: Vec3::splat(9.0),
        };
        assert!(!view.register(993, 315, moved, Vec3::ZERO));
        assert_eq!(view.placement(993).unwrap().pose, pose());
        assert_eq!(view.mesh_center(993), Some(Vec3::ONE));
    }

    #[test]
    fn grouping_change_recomputes_vectors() {
        let mut view = view();
        let _ = view.set_percentage(0.5, &[]);
        let placements = view.set_grouping(1, &[382]).unwrap();
        assert_eq!(view.group_vector(315), Some(Vec3::new(0.0, 4.0, 0.0)));
        assert_eq!(view.group_center(1089), Some(Vec3::new(6.0, 4.0, -7.0)));
        assert_eq!(view.grouping_names(), vec!["isocortex", "flat"]);
        assert_eq!(placements[0].pose.left, Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(view.grouping(), 1);
        assert_eq!(
            view.set_grouping(2, &[]),
            Err(UrchinError::UnknownGrouping { index: 2, count: 2 })
        );
        assert_eq!(view.grouping(), 1);
    }

    #[test]
    fn unregistered_and_ungrouped_structures() {
        let mut view = view();
        assert!(view.register(8, 8, pose(), Vec3::ZERO));
        let placements = view.set_percentage(1.0, &[8, 4242]);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].pose, pose());
    }

    #[test]
    fn percentage_is_clamped() {
        let mut view = view();
        let _ = view.set_percentage(3.0, &[]);
        assert_eq!(view.percentage(), 1.0);
        let _ = view.set_percentage(f32::NAN, &[]);
        assert_eq!(view.percentage(), 0.0);
    }

    #[test]
    fn register_node_uses_its_cosmos_group() {
        let mut view = view();
        let node = StructureNode::new(&crate::atlas::OntologyEntry {
            id: 385,
            acronym: "VISp".to_owned(),
            name: String::new(),
            group: Some(315),
            color: [1.0; 4],
        });
        assert!(view.register_node(&node, pose(), Vec3::ZERO));
        let _ = view.set_percentage(1.0, &[]);
        assert_eq!(
            view.placement(385).unwrap().pose.left,
            Vec3::new(1.0, 2.0, 3.0)
        );
    }
}
