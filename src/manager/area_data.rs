use std::collections::BTreeMap;

use crate::atlas::ResolvedId;
use crate::error::UrchinError;
use crate::message::Side;

/// Intensity series for one structure plus the sides it drives.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaSeries {
    /// Intensity per playhead position.
    pub values: Vec<f32>,
    /// Side flags parsed from the identifier.
    pub sides: ResolvedId,
}

impl AreaSeries {
    /// Sides written at each playhead step. A suffixed identifier drives
    /// one hemisphere, otherwise the full mesh.
    #[must_use]
    pub fn targets(&self) -> Vec<Side> {
        if self.sides.full {
            return vec![Side::Full];
        }
        let mut sides = Vec::with_capacity(2);
        if self.sides.left {
            sides.push(Side::Left);
        }
        if self.sides.right {
            sides.push(Side::Right);
        }
        sides
    }

    /// Signal awaited before writing: the full signal for full-mesh series,
    /// the hemisphere signal otherwise.
    #[must_use]
    pub fn wait_side(&self) -> Side {
        self.sides.suffix_side().unwrap_or(Side::Full)
    }
}

/// Per-structure series sharing one global playhead.
#[derive(Debug, Clone, Default)]
pub struct AreaData {
    series: BTreeMap<i32, AreaSeries>,
    index: usize,
}

impl AreaData {
    /// Add or replace the series for `sides.id`.
    pub fn insert(&mut self, sides: ResolvedId, values: Vec<f32>) {
        let _ = self.series.insert(sides.id, AreaSeries { values, sides });
    }

    /// Current playhead.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of structures with a series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether no series are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series for one structure.
    #[must_use]
    pub fn get(&self, id: i32) -> Option<&AreaSeries> {
        self.series.get(&id)
    }

    /// Move the playhead. Fails without moving it when any series is too
    /// short for `index`.
    pub fn seek(&mut self, index: usize) -> Result<(), UrchinError> {
        if let Some((&id, series)) =
            self.series.iter().find(|(_, s)| index >= s.values.len())
        {
            return Err(UrchinError::AreaDataIndex {
                index,
                id,
                len: series.values.len(),
            });
        }
        self.index = index;
        Ok(())
    }

    /// `(id, series, value at playhead)` for every structure, in ID order.
    #[must_use]
    pub fn current(&self) -> Vec<(i32, AreaSeries, f32)> {
        self.series
            .iter()
            .filter_map(|(&id, series)| {
                series
                    .values
                    .get(self.index)
                    .map(|&value| (id, series.clone(), value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::resolve_identifier;

    #[test]
    fn seek_rejects_short_series_without_moving() {
        let mut data = AreaData::default();
        data.insert(resolve_identifier("993", None), vec![0.1, 0.2, 0.3]);
        data.insert(resolve_identifier("385-lh", None), vec![0.5, 0.6]);

        assert_eq!(data.seek(1), Ok(()));
        assert_eq!(
            data.seek(2),
            Err(UrchinError::AreaDataIndex {
                index: 2,
                id: 385,
                len: 2
            })
        );
        assert_eq!(data.index(), 1);
        let current = data.current();
        assert_eq!(current.len(), 2);
        assert_eq!(current[0].0, 385);
        assert_eq!(current[0].2, 0.6);
    }

    #[test]
    fn targets_follow_side_flags() {
        let full = AreaSeries {
            values: vec![],
            sides: resolve_identifier("8", None),
        };
        assert_eq!(full.targets(), vec![Side::Full]);
        assert_eq!(full.wait_side(), Side::Full);

        let right = AreaSeries {
            values: vec![],
            sides: resolve_identifier("8-rh", None),
        };
        assert_eq!(right.targets(), vec![Side::Right]);
        assert_eq!(right.wait_side(), Side::Right);
    }
}
