use colorchart_core::Quad;
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::color::{hex_color, FALLBACK_COLOR};
use crate::descriptor::ChartDescriptor;

/// Idealized patch layout derived from a chart descriptor.
///
/// One quadrilateral per patch in canonical row-major order, expressed in
/// the same fiducial-relative units as the descriptor, paired with a
/// `#RRGGBB` display color. Rebuilt from scratch whenever a chart is
/// (re)loaded and read-only afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatchGrid {
    pub rows: usize,
    pub columns: usize,
    pub patches: Vec<Quad>,
    pub colors: Vec<String>,
}

impl PatchGrid {
    /// Lay out every patch of the descriptor's grid.
    ///
    /// Patch centers advance from the top-left fiducial by the descriptor's
    /// step sizes normalized to grid units; each patch extends half a box
    /// width/height around its center, reduced by the shrink factor.
    pub fn build(desc: &ChartDescriptor) -> Self {
        let n = desc.patch_count();
        let mut patches = Vec::with_capacity(n);

        let step_x = desc.step_x / desc.grid_width;
        let step_y = desc.step_y / desc.grid_height;
        let half_w = (desc.chart_width - 2.0 * desc.box_shrink) / (2.0 * desc.grid_width);
        let half_h = (desc.chart_height - 2.0 * desc.box_shrink) / (2.0 * desc.grid_height);
        let offs_x = (desc.origin_x - desc.fiducials.lt.x + desc.chart_width / 2.0) / desc.grid_width;
        let offs_y = (desc.origin_y - desc.fiducials.lt.y + desc.chart_height / 2.0) / desc.grid_height;

        for y in 0..desc.rows {
            for x in 0..desc.columns {
                let cx = offs_x + step_x * x as f32;
                let cy = offs_y + step_y * y as f32;
                patches.push(Quad::new(
                    Point2::new(cx - half_w, cy - half_h),
                    Point2::new(cx + half_w, cy - half_h),
                    Point2::new(cx + half_w, cy + half_h),
                    Point2::new(cx - half_w, cy + half_h),
                ));
            }
        }

        let colors = if desc.expected_declared {
            desc.expected_colors.iter().map(|&rgb| hex_color(rgb)).collect()
        } else {
            vec![String::from(FALLBACK_COLOR); n]
        };

        debug!(
            "built patch grid: {}x{} ({} patches)",
            desc.rows, desc.columns, n
        );
        Self {
            rows: desc.rows,
            columns: desc.columns,
            patches,
            colors,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Patch quad at displayed cell `(y, x)`, canonical indexing.
    #[inline]
    pub fn patch(&self, y: usize, x: usize) -> &Quad {
        &self.patches[y * self.columns + x]
    }
}
