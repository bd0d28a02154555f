use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use colorchart_core::Quad;
use log::{debug, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::color::{convert_to_rgb, ColorSpace};

/// Errors surfaced by the `.cht` parser.
///
/// Both kinds are non-fatal to a running session: on error the caller keeps
/// whatever chart was loaded before.
#[derive(thiserror::Error, Debug)]
pub enum ChtError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("line {line}: malformed {field} value {token:?}")]
    Format {
        line: usize,
        field: &'static str,
        token: String,
    },
}

/// Parsed chart description, immutable after load.
///
/// `rows * columns` patches laid out between the four fiducial corners.
/// Raw layout parameters (`chart_width` … `step_y`) are kept in the file's
/// own units; `grid_width`/`grid_height` are the Euclidean distances between
/// adjacent fiducials and set the scale for all derived geometry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub rows: usize,
    pub columns: usize,
    pub fiducials: Quad,
    pub grid_width: f32,
    pub grid_height: f32,
    pub chart_width: f32,
    pub chart_height: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub step_x: f32,
    pub step_y: f32,
    pub box_shrink: f32,
    pub color_space: ColorSpace,
    /// Patch count declared on the `EXPECTED` line (0 if never declared).
    pub number_of_patches: usize,
    /// Expected colors in display RGB (0–255 per channel), canonical
    /// row-major order. Always `rows * columns` entries once the grid is
    /// dimensioned; rows the file never supplied stay zeroed.
    pub expected_colors: Vec<[f32; 3]>,
    /// Whether an `EXPECTED` table was present at all. Without one the
    /// display layer falls back to a neutral patch color.
    pub expected_declared: bool,
}

impl Default for ChartDescriptor {
    fn default() -> Self {
        Self {
            rows: 0,
            columns: 0,
            fiducials: Quad::default(),
            grid_width: 0.0,
            grid_height: 0.0,
            chart_width: 0.0,
            chart_height: 0.0,
            origin_x: 0.0,
            origin_y: 0.0,
            step_x: 0.0,
            step_y: 0.0,
            box_shrink: 1.0,
            color_space: ColorSpace::default(),
            number_of_patches: 0,
            expected_colors: Vec::new(),
            expected_declared: false,
        }
    }
}

impl ChartDescriptor {
    /// Parse a chart description file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ChtError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a chart description from any line source.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, ChtError> {
        let mut scanner = Scanner::default();
        for (idx, line) in reader.lines().enumerate() {
            scanner.feed_line(&line?, idx + 1)?;
        }
        Ok(scanner.finish())
    }

    #[inline]
    pub fn patch_count(&self) -> usize {
        self.rows * self.columns
    }
}

/// Line-by-line scanner state. The three sections (box table, shrink
/// factor, expected colors) are detected by substring markers and may
/// arrive in any order.
#[derive(Debug, Default)]
struct Scanner {
    desc: ChartDescriptor,
    in_boxes: bool,
    expected_armed: bool,
    /// True after an `X` orientation line: the row axis is fixed and the
    /// column axis varies while scanning the expected-color table. A `Y`
    /// line fixes the column axis instead.
    x_primary: bool,
    cursor_row: usize,
    cursor_col: usize,
}

impl Scanner {
    fn feed_line(&mut self, line: &str, lineno: usize) -> Result<(), ChtError> {
        if line.trim().is_empty() {
            return Ok(());
        }
        if line.contains("BOXES") {
            self.in_boxes = true;
        }
        if self.in_boxes {
            self.feed_box_line(line, lineno)?;
        }
        if line.contains("BOX_SHRINK") {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            self.desc.box_shrink = parse_f32(&tokens, 1, "BOX_SHRINK", lineno)?;
            return Ok(());
        }
        if line.contains("EXPECTED") {
            self.feed_expected_marker(line, lineno)?;
            return Ok(());
        }
        if self.expected_armed && self.desc.rows > 0 && self.desc.columns > 0 {
            self.feed_color_row(line, lineno);
        }
        Ok(())
    }

    fn feed_box_line(&mut self, line: &str, lineno: usize) -> Result<(), ChtError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&first) = tokens.first() else {
            return Ok(());
        };
        match first {
            "F" => {
                // Eight numeric fields at fixed positions: x,y pairs for
                // lt, rt, rb, lb.
                let mut pts = [Point2::new(0.0f32, 0.0f32); 4];
                for (i, pt) in pts.iter_mut().enumerate() {
                    let x = parse_f32(&tokens, 3 + 2 * i, "fiducial", lineno)?;
                    let y = parse_f32(&tokens, 4 + 2 * i, "fiducial", lineno)?;
                    *pt = Point2::new(x, y);
                }
                self.desc.fiducials = Quad::new(pts[0], pts[1], pts[2], pts[3]);
                self.desc.grid_width = (pts[1] - pts[0]).norm();
                self.desc.grid_height = (pts[3] - pts[0]).norm();
            }
            "X" if tokens.get(2).is_some_and(|t| t.len() == 1) => {
                self.desc.columns = letter_code(tokens[2]);
                self.desc.rows = parse_usize(&tokens, 4, "row count", lineno)?;
                self.x_primary = true;
                self.read_layout(&tokens, lineno)?;
                self.sync_expected_table();
            }
            "Y" if tokens.get(4).is_some_and(|t| t.len() == 1) => {
                self.desc.columns = parse_usize(&tokens, 2, "column count", lineno)?;
                self.desc.rows = letter_code(tokens[4]);
                self.x_primary = false;
                self.read_layout(&tokens, lineno)?;
                self.sync_expected_table();
            }
            _ => {
                debug!("cht line {lineno}: skipping box-table line starting with {first:?}");
            }
        }
        Ok(())
    }

    fn read_layout(&mut self, tokens: &[&str], lineno: usize) -> Result<(), ChtError> {
        self.desc.chart_width = parse_f32(tokens, 5, "chart width", lineno)?;
        self.desc.chart_height = parse_f32(tokens, 6, "chart height", lineno)?;
        self.desc.origin_x = parse_f32(tokens, 7, "origin x", lineno)?;
        self.desc.origin_y = parse_f32(tokens, 8, "origin y", lineno)?;
        self.desc.step_x = parse_f32(tokens, 9, "step x", lineno)?;
        self.desc.step_y = parse_f32(tokens, 10, "step y", lineno)?;
        Ok(())
    }

    fn feed_expected_marker(&mut self, line: &str, lineno: usize) -> Result<(), ChtError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.get(1) {
            Some(&"XYZ") => self.desc.color_space = ColorSpace::Xyz,
            Some(&"LAB") => self.desc.color_space = ColorSpace::Lab,
            other => warn!("cht line {lineno}: unknown color space {other:?}"),
        }
        self.desc.number_of_patches = parse_usize(&tokens, 2, "expected patch count", lineno)?;
        // A repeated EXPECTED marker replaces the table and restarts the
        // label cursor.
        self.desc.expected_colors = vec![[0.0; 3]; self.desc.patch_count()];
        self.desc.expected_declared = true;
        self.expected_armed = true;
        self.cursor_row = 1;
        self.cursor_col = 1;
        Ok(())
    }

    /// Keep the expected-color table sized to the grid. The markers are
    /// order-independent, so the dimensions may arrive after `EXPECTED`.
    fn sync_expected_table(&mut self) {
        if self.expected_armed {
            self.desc.expected_colors.resize(self.desc.patch_count(), [0.0; 3]);
        }
    }

    /// Consume one expected-color row if it matches the cursor label.
    /// Rows that don't match are ignored; a matching row with malformed
    /// components is skipped without advancing the cursor.
    fn feed_color_row(&mut self, line: &str, lineno: usize) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&first) = tokens.first() else {
            return;
        };
        if first != self.cursor_label() {
            return;
        }
        let mut triple = [0.0f32; 3];
        for (i, slot) in triple.iter_mut().enumerate() {
            match tokens.get(i + 1).map(|t| t.parse::<f32>()) {
                Some(Ok(value)) => *slot = value / 100.0,
                _ => {
                    warn!("cht line {lineno}: color row {first} has malformed components");
                    return;
                }
            }
        }
        let rgb = convert_to_rgb(self.desc.color_space, triple);
        let index = (self.cursor_row - 1) * self.desc.columns + (self.cursor_col - 1);
        if let Some(slot) = self.desc.expected_colors.get_mut(index) {
            *slot = rgb;
        }
        self.advance_cursor();
    }

    /// Synthetic label for the current cursor position: letter from the
    /// fixed axis, number from the varying axis.
    fn cursor_label(&self) -> String {
        let (fixed, varying) = if self.x_primary {
            (self.cursor_row, self.cursor_col)
        } else {
            (self.cursor_col, self.cursor_row)
        };
        let letter = char::from_u32('A' as u32 + fixed as u32 - 1).unwrap_or('?');
        format!("{letter}{varying}")
    }

    /// Advance the varying axis; on overflow reset it and step the fixed
    /// axis, saturating at the declared grid size.
    fn advance_cursor(&mut self) {
        if self.x_primary {
            self.cursor_col += 1;
            if self.cursor_col > self.desc.columns {
                self.cursor_col = 1;
                self.cursor_row = (self.cursor_row + 1).min(self.desc.rows);
            }
        } else {
            self.cursor_row += 1;
            if self.cursor_row > self.desc.rows {
                self.cursor_row = 1;
                self.cursor_col = (self.cursor_col + 1).min(self.desc.columns);
            }
        }
    }

    fn finish(self) -> ChartDescriptor {
        let mut desc = self.desc;
        if desc.rows > 0 && desc.columns > 0 {
            let n = desc.rows * desc.columns;
            desc.expected_colors.resize(n, [0.0; 3]);
        }
        desc
    }
}

fn letter_code(token: &str) -> usize {
    (token.as_bytes()[0] as i32 - 64).max(0) as usize
}

fn parse_f32(
    tokens: &[&str],
    idx: usize,
    field: &'static str,
    line: usize,
) -> Result<f32, ChtError> {
    let token = tokens.get(idx).ok_or(ChtError::Format {
        line,
        field,
        token: String::from("<missing>"),
    })?;
    token.parse().map_err(|_| ChtError::Format {
        line,
        field,
        token: (*token).to_string(),
    })
}

fn parse_usize(
    tokens: &[&str],
    idx: usize,
    field: &'static str,
    line: usize,
) -> Result<usize, ChtError> {
    let token = tokens.get(idx).ok_or(ChtError::Format {
        line,
        field,
        token: String::from("<missing>"),
    })?;
    token.parse().map_err(|_| ChtError::Format {
        line,
        field,
        token: (*token).to_string(),
    })
}
