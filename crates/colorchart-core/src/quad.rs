use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::StartCorner;

/// Four corners of a frame or patch, named in canonical orientation.
///
/// `lt`/`rt`/`rb`/`lb` are the logical top-left, top-right, bottom-right and
/// bottom-left corners as defined by the chart description. Once the chart is
/// rotated in a photograph the visual positions may differ; the logical names
/// stay fixed. The coordinate space (idealized chart units, image pixels or
/// display pixels) is determined by context.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub lt: Point2<f32>,
    pub rt: Point2<f32>,
    pub rb: Point2<f32>,
    pub lb: Point2<f32>,
}

impl Default for Quad {
    fn default() -> Self {
        let origin = Point2::new(0.0, 0.0);
        Self {
            lt: origin,
            rt: origin,
            rb: origin,
            lb: origin,
        }
    }
}

impl Quad {
    pub fn new(lt: Point2<f32>, rt: Point2<f32>, rb: Point2<f32>, lb: Point2<f32>) -> Self {
        Self { lt, rt, rb, lb }
    }

    /// Axis-aligned quad spanning a drag gesture, tagged with the corner the
    /// drag started from.
    ///
    /// The sign pair of the drag vector picks the tag: dragging down-right
    /// anchors `LT`, up-right anchors `LB`, down-left anchors `RT` and
    /// up-left anchors `RB`. Returns `None` when the gesture is degenerate
    /// (zero extent on either axis).
    pub fn from_drag(start: Point2<f32>, stop: Point2<f32>) -> Option<(Self, StartCorner)> {
        if start.x == stop.x || start.y == stop.y {
            return None;
        }
        let (x0, x1) = if start.x < stop.x {
            (start.x, stop.x)
        } else {
            (stop.x, start.x)
        };
        let (y0, y1) = if start.y < stop.y {
            (start.y, stop.y)
        } else {
            (stop.y, start.y)
        };
        let quad = Self {
            lt: Point2::new(x0, y0),
            rt: Point2::new(x1, y0),
            rb: Point2::new(x1, y1),
            lb: Point2::new(x0, y1),
        };
        let corner = match (start.x < stop.x, start.y < stop.y) {
            (true, true) => StartCorner::Lt,
            (true, false) => StartCorner::Lb,
            (false, true) => StartCorner::Rt,
            (false, false) => StartCorner::Rb,
        };
        Some((quad, corner))
    }

    /// Corners in canonical order: `lt`, `rt`, `rb`, `lb`.
    #[inline]
    pub fn corners(&self) -> [Point2<f32>; 4] {
        [self.lt, self.rt, self.rb, self.lb]
    }

    #[inline]
    pub fn corner(&self, which: StartCorner) -> Point2<f32> {
        match which {
            StartCorner::Lt => self.lt,
            StartCorner::Rt => self.rt,
            StartCorner::Rb => self.rb,
            StartCorner::Lb => self.lb,
        }
    }

    pub fn set_corner(&mut self, which: StartCorner, p: Point2<f32>) {
        match which {
            StartCorner::Lt => self.lt = p,
            StartCorner::Rt => self.rt = p,
            StartCorner::Rb => self.rb = p,
            StartCorner::Lb => self.lb = p,
        }
    }

    /// Componentwise scaling, e.g. from captured frame coordinates into the
    /// current display zoom.
    pub fn scaled(&self, factor: f32) -> Self {
        let s = |p: Point2<f32>| Point2::new(p.x * factor, p.y * factor);
        Self {
            lt: s(self.lt),
            rt: s(self.rt),
            rb: s(self.rb),
            lb: s(self.lb),
        }
    }

    /// True while every corner still sits at the origin (nothing marked yet).
    pub fn is_unset(&self) -> bool {
        self.corners()
            .iter()
            .all(|p| p.x == 0.0 && p.y == 0.0)
    }
}
