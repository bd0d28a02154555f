use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Ratio between the current display zoom and the zoom at which frame
/// coordinates were captured.
///
/// Frame coordinates are stored at the proportion in effect when the user
/// started marking; the display proportion keeps changing as the window is
/// resized. Every geometry call that crosses between the two spaces takes
/// this value explicitly rather than reading it from shared state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewScale {
    /// Current display proportion (display pixels per image pixel).
    pub current: f32,
    /// Display proportion at the moment the frame was captured.
    pub at_capture: f32,
}

impl Default for ViewScale {
    fn default() -> Self {
        Self {
            current: 1.0,
            at_capture: 1.0,
        }
    }
}

impl ViewScale {
    pub fn new(current: f32, at_capture: f32) -> Self {
        Self {
            current,
            at_capture,
        }
    }

    /// Captured-frame coordinates -> current display coordinates.
    #[inline]
    pub fn factor(&self) -> f32 {
        self.current / self.at_capture
    }

    /// Map a display-space point back into captured frame coordinates.
    #[inline]
    pub fn to_frame(&self, p: Point2<f32>) -> Point2<f32> {
        let inv = self.at_capture / self.current;
        Point2::new(p.x * inv, p.y * inv)
    }

    /// Map a captured frame point into current display coordinates.
    #[inline]
    pub fn to_display(&self, p: Point2<f32>) -> Point2<f32> {
        let f = self.factor();
        Point2::new(p.x * f, p.y * f)
    }
}
