use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::Quad;

/// The chart corner the user treated as "top-left" when marking the frame.
///
/// A photographed chart may be rotated relative to its canonical definition,
/// and independently the user may start the marking drag from any visual
/// corner. This tag records which canonical corner ended up as the drag
/// anchor and drives both color re-indexing and fiducial output ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StartCorner {
    #[default]
    Lt,
    Rt,
    Rb,
    Lb,
}

impl StartCorner {
    /// Canonical patch index for the displayed grid cell `(y, x)`.
    ///
    /// Re-indexes a `rows x columns` grid so that the displayed cell receives
    /// the reference color of its true position on the physical chart. The
    /// four cases are two independent axis flips composed per corner; they do
    /// not form a rotation group, so they stay written out.
    ///
    /// Callers must supply `y < rows` and `x < columns`; anything else is a
    /// contract violation, not a runtime error.
    #[inline]
    pub fn patch_index(self, rows: usize, columns: usize, y: usize, x: usize) -> usize {
        debug_assert!(rows > 0 && columns > 0);
        debug_assert!(y < rows && x < columns);
        match self {
            StartCorner::Lt => y * columns + x,
            StartCorner::Rt => y * columns + (columns - 1) - x,
            StartCorner::Rb => (rows - 1 - y) * columns + (columns - 1) - x,
            StartCorner::Lb => (rows - 1 - y) * columns + x,
        }
    }

    /// Frame corners cycled so this corner comes first.
    ///
    /// The downstream calibration tool receives the four fiducial coordinates
    /// starting from the user's anchor and proceeding in canonical winding:
    /// `Lt -> lt,rt,rb,lb`, `Rt -> rt,rb,lb,lt`, `Rb -> rb,lb,lt,rt`,
    /// `Lb -> lb,lt,rt,rb`. This ordering is an external contract.
    pub fn corner_cycle(self, frame: &Quad) -> [Point2<f32>; 4] {
        match self {
            StartCorner::Lt => [frame.lt, frame.rt, frame.rb, frame.lb],
            StartCorner::Rt => [frame.rt, frame.rb, frame.lb, frame.lt],
            StartCorner::Rb => [frame.rb, frame.lb, frame.lt, frame.rt],
            StartCorner::Lb => [frame.lb, frame.lt, frame.rt, frame.rb],
        }
    }

    /// All four corners in the fixed evaluation order `Lt, Rt, Rb, Lb`.
    pub const ALL: [StartCorner; 4] = [
        StartCorner::Lt,
        StartCorner::Rt,
        StartCorner::Rb,
        StartCorner::Lb,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permutation(corner: StartCorner, rows: usize, columns: usize) -> Vec<usize> {
        let mut out = Vec::with_capacity(rows * columns);
        for y in 0..rows {
            for x in 0..columns {
                out.push(corner.patch_index(rows, columns, y, x));
            }
        }
        out
    }

    #[test]
    fn two_by_two_reference_permutations() {
        assert_eq!(permutation(StartCorner::Lt, 2, 2), vec![0, 1, 2, 3]);
        assert_eq!(permutation(StartCorner::Rb, 2, 2), vec![3, 2, 1, 0]);
        assert_eq!(permutation(StartCorner::Rt, 2, 2), vec![1, 0, 3, 2]);
        assert_eq!(permutation(StartCorner::Lb, 2, 2), vec![2, 3, 0, 1]);
    }

    #[test]
    fn every_branch_is_a_bijection() {
        let (rows, columns) = (4, 6);
        for corner in StartCorner::ALL {
            let mut seen = vec![false; rows * columns];
            for index in permutation(corner, rows, columns) {
                assert!(index < rows * columns);
                assert!(!seen[index], "{corner:?} repeated index {index}");
                seen[index] = true;
            }
            assert!(seen.iter().all(|&hit| hit));
        }
    }

    #[test]
    fn corner_cycle_starts_at_anchor_and_keeps_winding() {
        let frame = Quad::new(
            Point2::new(0.0, 0.0),
            Point2::new(9.0, 1.0),
            Point2::new(8.0, 7.0),
            Point2::new(-1.0, 6.0),
        );
        let cycled = StartCorner::Rt.corner_cycle(&frame);
        assert_eq!(cycled, [frame.rt, frame.rb, frame.lb, frame.lt]);
        let cycled = StartCorner::Lb.corner_cycle(&frame);
        assert_eq!(cycled, [frame.lb, frame.lt, frame.rt, frame.rb]);
    }
}
