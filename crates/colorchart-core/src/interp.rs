use nalgebra::Point2;

use crate::Quad;

/// Componentwise linear interpolation between two points.
#[inline]
pub fn lerp(a: Point2<f32>, b: Point2<f32>, t: f32) -> Point2<f32> {
    Point2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

impl Quad {
    /// Map a point from the unit square onto this quadrilateral.
    ///
    /// `p.x` and `p.y` are fractional coordinates in `[0, 1]` whose corners
    /// correspond to `lt`, `rt`, `rb`, `lb`. The map interpolates down the
    /// left and right edges first, then across between the two edge points.
    /// Exact for affine quads, a smooth approximation for general convex
    /// ones. Pure; called once per patch corner on every redraw.
    pub fn project(&self, p: Point2<f32>) -> Point2<f32> {
        let left = lerp(self.lt, self.lb, p.y);
        let right = lerp(self.rt, self.rb, p.y);
        lerp(left, right, p.x)
    }

    /// Project all four corners of an idealized patch through this frame.
    pub fn project_quad(&self, patch: &Quad) -> Quad {
        Quad {
            lt: self.project(patch.lt),
            rt: self.project(patch.rt),
            rb: self.project(patch.rb),
            lb: self.project(patch.lb),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_frame() -> Quad {
        Quad::new(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        )
    }

    #[test]
    fn center_of_axis_aligned_square() {
        let mapped = unit_frame().project(Point2::new(0.5, 0.5));
        assert_relative_eq!(mapped.x, 5.0);
        assert_relative_eq!(mapped.y, 5.0);
    }

    #[test]
    fn unit_corners_land_on_frame_corners() {
        let frame = unit_frame();
        assert_eq!(frame.project(Point2::new(0.0, 0.0)), frame.lt);
        assert_eq!(frame.project(Point2::new(1.0, 1.0)), frame.rb);
        assert_eq!(frame.project(Point2::new(1.0, 0.0)), frame.rt);
        assert_eq!(frame.project(Point2::new(0.0, 1.0)), frame.lb);
    }

    #[test]
    fn skewed_frame_midpoint_is_edge_average() {
        let frame = Quad::new(
            Point2::new(0.0, 0.0),
            Point2::new(8.0, 2.0),
            Point2::new(10.0, 12.0),
            Point2::new(-2.0, 9.0),
        );
        let mid_left = lerp(frame.lt, frame.lb, 0.5);
        let mid_right = lerp(frame.rt, frame.rb, 0.5);
        let expected = lerp(mid_left, mid_right, 0.5);
        let mapped = frame.project(Point2::new(0.5, 0.5));
        assert_relative_eq!(mapped.x, expected.x);
        assert_relative_eq!(mapped.y, expected.y);
    }
}
