//! Pure geometry for registering color-chart patch grids against photographs.
//!
//! This crate is intentionally small and free of I/O. It covers the frame
//! quadrilateral a user marks on a photographed chart, the bilinear map from
//! idealized chart coordinates into that frame, the start-corner re-indexing
//! that keeps reference colors attached to the right physical patches when
//! the chart is rotated in the photo, and the proximity test used to grab
//! frame corners interactively.

mod hit;
mod interp;
mod orientation;
mod quad;
mod view;

pub use hit::{is_near, GRAB_RADIUS_PX};
pub use interp::lerp;
pub use orientation::StartCorner;
pub use quad::Quad;
pub use view::ViewScale;
