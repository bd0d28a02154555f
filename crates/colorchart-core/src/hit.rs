use nalgebra::Point2;

use crate::{Quad, StartCorner};

/// Grab radius for frame corner handles, in display pixels.
pub const GRAB_RADIUS_PX: f32 = 12.0;

/// True when `candidate`, scaled into display space, lies strictly within
/// `radius_px` of `reference`.
///
/// `scale` is the ratio between the current display proportion and the
/// proportion at which `candidate` was captured, so stored frame coordinates
/// can be compared against a live cursor position.
#[inline]
pub fn is_near(reference: Point2<f32>, candidate: Point2<f32>, scale: f32, radius_px: f32) -> bool {
    let dx = candidate.x * scale - reference.x;
    let dy = candidate.y * scale - reference.y;
    (dx * dx + dy * dy).sqrt() < radius_px
}

impl Quad {
    /// Which corner handle, if any, lies within `radius_px` of `reference`.
    ///
    /// Corners are evaluated in the fixed order `Lt, Rt, Rb, Lb`; when
    /// handles overlap, the last matching corner wins.
    pub fn corner_near(
        &self,
        reference: Point2<f32>,
        scale: f32,
        radius_px: f32,
    ) -> Option<StartCorner> {
        let mut found = None;
        for corner in StartCorner::ALL {
            if is_near(reference, self.corner(corner), scale, radius_px) {
                found = Some(corner);
            }
        }
        found
    }
}
