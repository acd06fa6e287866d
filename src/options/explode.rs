use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Axis negated when mirroring a group vector onto the right hemisphere.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MirrorAxis {
    /// Left/right axis in scene space.
    X,
    /// Up axis.
    Y,
    /// Anterior/posterior axis (the atlas default).
    #[default]
    Z,
}

impl MirrorAxis {
    /// Component-wise scale that negates this axis.
    #[must_use]
    pub fn flip(self) -> Vec3 {
        match self {
            Self::X => Vec3::new(-1.0, 1.0, 1.0),
            Self::Y => Vec3::new(1.0, -1.0, 1.0),
            Self::Z => Vec3::new(1.0, 1.0, -1.0),
        }
    }
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[schemars(title = "Exploded View", inline)]
#[serde(default)]
/// Exploded-view parameters.
pub struct ExplodeOptions {
    /// Axis mirrored for the right hemisphere.
    #[schemars(title = "Mirror Axis")]
    pub mirror_axis: MirrorAxis,
    /// Keep the right hemisphere at rest.
    #[schemars(title = "Explode Left Only")]
    pub left_only: bool,
    /// Index of the grouping selected at startup.
    #[schemars(skip)]
    pub grouping: usize,
}
