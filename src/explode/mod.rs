//! Exploded-view transform.
//!
//! Each visible structure is pushed away from its resting position along the
//! displacement vector of its cosmos group, scaled by the explosion
//! percentage. The right hemisphere moves along the mirrored vector unless
//! the view is left-only.
//!
//! The math is pure ([`explode`], [`mirror`]); [`ExplodedView`] caches the
//! resting poses and the active grouping's vectors.

mod view;

use glam::Vec3;
pub use view::ExplodedView;

use crate::options::MirrorAxis;

/// Cosmos group IDs of the Allen CCF: the coarse parents structures are
/// clustered under.
pub const COSMOS_IDS: [i32; 10] =
    [315, 698, 1089, 703, 623, 549, 1097, 313, 1065, 512];

/// Position at `p` along `vector` from `rest`.
#[inline]
#[must_use]
pub fn explode(rest: Vec3, vector: Vec3, p: f32) -> Vec3 {
    rest + vector * p
}

/// `vector` with `axis` negated.
#[inline]
#[must_use]
pub fn mirror(vector: Vec3, axis: MirrorAxis) -> Vec3 {
    vector * axis.flip()
}

/// Left and right hemisphere positions of one structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemispherePose {
    /// Left hemisphere position.
    pub left: Vec3,
    /// Right hemisphere position.
    pub right: Vec3,
}

/// Computed hemisphere positions for one structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Structure ID.
    pub id: i32,
    /// Where the scene should place the hemispheres.
    pub pose: HemispherePose,
}

/// One group of a grouping: its displacement vector and mesh-bounds center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosmosGroup {
    /// Cosmos ID.
    pub id: i32,
    /// Displacement applied at full explosion.
    pub vector: Vec3,
    /// Center of the group's mesh bounds.
    pub mesh_center: Vec3,
}

/// A named set of cosmos groups.
#[derive(Debug, Clone, PartialEq)]
pub struct CosmosGrouping {
    /// Display name.
    pub name: String,
    /// Groups in this grouping.
    pub groups: Vec<CosmosGroup>,
}

impl CosmosGrouping {
    /// Grouping with the given groups.
    #[must_use]
    pub fn new(name: impl Into<String>, groups: Vec<CosmosGroup>) -> Self {
        Self {
            name: name.into(),
            groups,
        }
    }

    /// Cosmos IDs from [`COSMOS_IDS`] this grouping has no group for.
    #[must_use]
    pub fn missing_groups(&self) -> Vec<i32> {
        COSMOS_IDS
            .iter()
            .copied()
            .filter(|id| !self.groups.iter().any(|g| g.id == *id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explode_is_linear_in_p() {
        let rest = Vec3::new(1.0, 2.0, 3.0);
        let v = Vec3::new(2.0, -4.0, 6.0);
        assert_eq!(explode(rest, v, 0.0), rest);
        assert_eq!(explode(rest, v, 1.0), rest + v);
        assert_eq!(explode(rest, v, 0.5), Vec3::new(2.0, 0.0, 6.0));
        let a = explode(rest, v, 0.25) - rest;
        let b = explode(rest, v, 0.75) - rest;
        assert_eq!(b, a * 3.0);
    }

    #[test]
    fn mirror_negates_one_axis() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(mirror(v, MirrorAxis::Z), Vec3::new(1.0, 2.0, -3.0));
        assert_eq!(mirror(v, MirrorAxis::X), Vec3::new(-1.0, 2.0, 3.0));
        assert_eq!(mirror(mirror(v, MirrorAxis::Y), MirrorAxis::Y), v);
    }

    #[test]
    fn missing_groups_lists_absent_cosmos_ids() {
        let grouping = CosmosGrouping::new(
            "partial",
            COSMOS_IDS[1..]
                .iter()
                .map(|&id| CosmosGroup {
                    id,
                    vector: Vec3::ZERO,
                    mesh_center: Vec3::ZERO,
                })
                .collect(),
        );
        assert_eq!(grouping.missing_groups(), vec![315]);
    }
}
