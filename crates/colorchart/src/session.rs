use std::path::Path;

use log::info;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use colorchart_cht::{ChartDescriptor, ChtError, PatchGrid};
use colorchart_core::{Quad, StartCorner, ViewScale, GRAB_RADIUS_PX};

/// A chart description together with its derived patch layout.
///
/// Replaced wholesale when a new chart file is opened; never partially
/// mutated.
#[derive(Clone, Debug)]
pub struct LoadedChart {
    pub descriptor: ChartDescriptor,
    pub grid: PatchGrid,
}

impl LoadedChart {
    /// Parse a chart file and lay out its patch grid.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ChtError> {
        let descriptor = ChartDescriptor::from_path(path)?;
        let grid = PatchGrid::build(&descriptor);
        Ok(Self { descriptor, grid })
    }
}

/// The user-marked frame on the photographed chart.
///
/// `tetra` lives in the display coordinates captured when the drag began;
/// `capture_proportion` records the display zoom at that moment so later
/// interactions at a different zoom can be mapped back.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FrameState {
    pub tetra: Quad,
    pub drag_start: Point2<f32>,
    pub drag_stop: Point2<f32>,
    pub start_corner: StartCorner,
    pub capture_proportion: f32,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            tetra: Quad::default(),
            drag_start: Point2::new(0.0, 0.0),
            drag_stop: Point2::new(0.0, 0.0),
            start_corner: StartCorner::Lt,
            capture_proportion: 1.0,
        }
    }
}

impl FrameState {
    /// True once the user has dragged out a non-degenerate frame.
    pub fn is_set(&self) -> bool {
        self.drag_start.x != self.drag_stop.x && self.drag_start.y != self.drag_stop.y
    }
}

/// One patch ready for drawing: outline in current display coordinates and
/// the display color of the reference patch that belongs at this position.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenePatch {
    pub outline: Quad,
    pub color: String,
}

/// Explicit session/document state.
///
/// Owns the loaded chart and the user frame; every operation takes the
/// current display proportion as an argument instead of reading shared
/// state, so the whole session stays independently testable.
#[derive(Debug, Default)]
pub struct Session {
    chart: Option<LoadedChart>,
    frame: FrameState,
    grabbed: Option<StartCorner>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load (or replace) the chart description.
    ///
    /// On failure the previously loaded chart is kept unchanged.
    pub fn load_chart(&mut self, path: impl AsRef<Path>) -> Result<&LoadedChart, ChtError> {
        let loaded = LoadedChart::open(path)?;
        info!(
            "loaded chart: {}x{} patches",
            loaded.grid.rows, loaded.grid.columns
        );
        self.frame = FrameState::default();
        self.grabbed = None;
        Ok(self.chart.insert(loaded))
    }

    pub fn chart(&self) -> Option<&LoadedChart> {
        self.chart.as_ref()
    }

    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    /// Clear the marked frame (e.g. when a new image or chart is opened).
    pub fn reset_frame(&mut self) {
        self.frame = FrameState::default();
        self.grabbed = None;
    }

    /// Start marking the frame; records the display proportion in effect so
    /// later redraws can rescale the captured coordinates.
    pub fn begin_frame_drag(&mut self, p: Point2<f32>, current_proportion: f32) {
        self.frame = FrameState {
            drag_start: p,
            drag_stop: p,
            capture_proportion: current_proportion,
            ..FrameState::default()
        };
    }

    /// Extend the marking drag; rebuilds the frame quad and start-corner tag
    /// from the drag direction.
    pub fn drag_frame_to(&mut self, p: Point2<f32>) {
        self.frame.drag_stop = p;
        if let Some((quad, corner)) = Quad::from_drag(self.frame.drag_start, self.frame.drag_stop)
        {
            self.frame.tetra = quad;
            self.frame.start_corner = corner;
        }
    }

    /// Try to grab a corner handle near `p` (display coordinates).
    pub fn grab_corner(
        &mut self,
        p: Point2<f32>,
        current_proportion: f32,
    ) -> Option<StartCorner> {
        let scale = self.view(current_proportion).factor();
        self.grabbed = self.frame.tetra.corner_near(p, scale, GRAB_RADIUS_PX);
        self.grabbed
    }

    /// Drag the grabbed corner to `p` (display coordinates).
    pub fn move_grabbed_to(&mut self, p: Point2<f32>, current_proportion: f32) {
        if let Some(corner) = self.grabbed {
            let frame_point = self.view(current_proportion).to_frame(p);
            self.frame.tetra.set_corner(corner, frame_point);
        }
    }

    pub fn release_corner(&mut self) {
        self.grabbed = None;
    }

    /// Re-anchor the start corner to whichever handle is near `p`, if any.
    ///
    /// Used when the chart's orientation in the photo does not match the
    /// direction the user happened to drag in.
    pub fn reanchor_start_corner(
        &mut self,
        p: Point2<f32>,
        current_proportion: f32,
    ) -> Option<StartCorner> {
        let scale = self.view(current_proportion).factor();
        if let Some(corner) = self.frame.tetra.corner_near(p, scale, GRAB_RADIUS_PX) {
            self.frame.start_corner = corner;
            return Some(corner);
        }
        None
    }

    /// Per-redraw scene: every idealized patch projected through the user
    /// frame into current display coordinates, paired with the reference
    /// color re-indexed for the start corner.
    pub fn patch_scene(&self, current_proportion: f32) -> Vec<ScenePatch> {
        let Some(chart) = self.chart.as_ref() else {
            return Vec::new();
        };
        if !self.frame.is_set() || chart.grid.is_empty() {
            return Vec::new();
        }
        let scale = self.view(current_proportion).factor();
        let (rows, columns) = (chart.grid.rows, chart.grid.columns);
        let mut scene = Vec::with_capacity(chart.grid.len());
        for y in 0..rows {
            for x in 0..columns {
                let projected = self.frame.tetra.project_quad(chart.grid.patch(y, x));
                let color_index = self.frame.start_corner.patch_index(rows, columns, y, x);
                scene.push(ScenePatch {
                    outline: projected.scaled(scale),
                    color: chart.grid.colors[color_index].clone(),
                });
            }
        }
        scene
    }

    fn view(&self, current_proportion: f32) -> ViewScale {
        ViewScale::new(current_proportion, self.frame.capture_proportion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    const CHART: &str = "\
BOXES 25
  F _ _ 0.0 0.0 100.0 0.0 100.0 80.0 0.0 80.0
  X _ F _ 4 16.0 19.0 0.0 0.0 16.5 19.5
BOX_SHRINK 1.0
EXPECTED XYZ 24
  A1 40.0 22.0 2.0
";

    fn session_with_chart() -> Session {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(CHART.as_bytes()).unwrap();
        let mut session = Session::new();
        session.load_chart(tmp.path()).unwrap();
        session
    }

    fn p(x: f32, y: f32) -> Point2<f32> {
        Point2::new(x, y)
    }

    #[test]
    fn failed_reload_keeps_previous_chart() {
        let mut session = session_with_chart();
        assert!(session.load_chart("/nonexistent/chart.cht").is_err());
        assert_eq!(session.chart().unwrap().grid.len(), 24);
    }

    #[test]
    fn dragging_builds_frame_and_start_corner() {
        let mut session = session_with_chart();
        session.begin_frame_drag(p(200.0, 150.0), 1.0);
        assert!(!session.frame().is_set());
        session.drag_frame_to(p(50.0, 20.0));
        assert!(session.frame().is_set());
        assert_eq!(session.frame().start_corner, StartCorner::Rb);
        assert_eq!(session.frame().tetra.rb, p(200.0, 150.0));
    }

    #[test]
    fn grab_and_move_a_corner_across_zoom_levels() {
        let mut session = session_with_chart();
        session.begin_frame_drag(p(0.0, 0.0), 0.5);
        session.drag_frame_to(p(100.0, 100.0));
        // Zoomed in 2x since capture: the rb handle now displays at (200, 200).
        let grabbed = session.grab_corner(p(198.0, 201.0), 1.0);
        assert_eq!(grabbed, Some(StartCorner::Rb));
        session.move_grabbed_to(p(220.0, 220.0), 1.0);
        session.release_corner();
        // Stored back in capture coordinates.
        assert_relative_eq!(session.frame().tetra.rb.x, 110.0);
        assert_relative_eq!(session.frame().tetra.rb.y, 110.0);
    }

    #[test]
    fn reanchoring_requires_proximity() {
        let mut session = session_with_chart();
        session.begin_frame_drag(p(0.0, 0.0), 1.0);
        session.drag_frame_to(p(300.0, 200.0));
        assert_eq!(session.frame().start_corner, StartCorner::Lt);
        assert_eq!(session.reanchor_start_corner(p(150.0, 100.0), 1.0), None);
        assert_eq!(session.frame().start_corner, StartCorner::Lt);
        let hit = session.reanchor_start_corner(p(299.0, 5.0), 1.0);
        assert_eq!(hit, Some(StartCorner::Rt));
        assert_eq!(session.frame().start_corner, StartCorner::Rt);
    }

    #[test]
    fn scene_is_empty_until_chart_and_frame_exist() {
        let mut bare = Session::new();
        assert!(bare.patch_scene(1.0).is_empty());
        bare.begin_frame_drag(p(0.0, 0.0), 1.0);
        bare.drag_frame_to(p(10.0, 10.0));
        assert!(bare.patch_scene(1.0).is_empty());

        let mut session = session_with_chart();
        assert!(session.patch_scene(1.0).is_empty());
        session.begin_frame_drag(p(0.0, 0.0), 1.0);
        session.drag_frame_to(p(100.0, 80.0));
        assert_eq!(session.patch_scene(1.0).len(), 24);
    }

    #[test]
    fn scene_colors_follow_the_start_corner() {
        let mut session = session_with_chart();
        session.begin_frame_drag(p(0.0, 0.0), 1.0);
        session.drag_frame_to(p(100.0, 80.0));
        let lt_scene = session.patch_scene(1.0);
        // Re-anchor at the bottom-right handle: the color layout flips on
        // both axes, so the first displayed patch shows the last reference
        // color.
        session.reanchor_start_corner(p(99.0, 79.0), 1.0);
        assert_eq!(session.frame().start_corner, StartCorner::Rb);
        let rb_scene = session.patch_scene(1.0);
        assert_eq!(lt_scene[0].color, rb_scene[23].color);
        assert_eq!(lt_scene[23].color, rb_scene[0].color);
        // Geometry itself does not move when only the anchor changes.
        assert_eq!(lt_scene[0].outline, rb_scene[0].outline);
    }

    #[test]
    fn scene_outlines_rescale_with_the_display_proportion() {
        let mut session = session_with_chart();
        session.begin_frame_drag(p(0.0, 0.0), 1.0);
        session.drag_frame_to(p(100.0, 80.0));
        let base = session.patch_scene(1.0);
        let zoomed = session.patch_scene(2.0);
        assert_relative_eq!(zoomed[0].outline.lt.x, base[0].outline.lt.x * 2.0);
        assert_relative_eq!(zoomed[0].outline.rb.y, base[0].outline.rb.y * 2.0);
    }
}
