//! Chart-description (`.cht`) parsing and idealized patch-grid layout.
//!
//! A chart description defines a grid of reference color patches in the
//! chart's own coordinate space: four fiducial corners, grid dimensions,
//! raw layout parameters and the expected color of every patch. This crate
//! reads that file into an immutable [`ChartDescriptor`] and derives a
//! [`PatchGrid`] for the projection layer: one quadrilateral per patch, in
//! fiducial-relative coordinates, paired with a display color.

mod color;
mod descriptor;
mod grid;

pub use color::{convert_to_rgb, hex_color, ColorSpace, FALLBACK_COLOR};
pub use descriptor::{ChartDescriptor, ChtError};
pub use grid::PatchGrid;
