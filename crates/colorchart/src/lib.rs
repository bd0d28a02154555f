//! High-level facade for color-chart camera profiling.
//!
//! This crate ties the geometry and chart-description crates together into a
//! session a display layer can drive:
//! - [`Session`]: the document state (loaded chart, user-marked frame,
//!   drag/grab interaction, per-redraw patch scene).
//! - [`ProfileConfig`] / [`WbCoefficients`]: JSON configuration files.
//! - [`generate`]: fiducial-marks and calibration command-file output for
//!   the external `scanin`/`dcamprof` tools.
//! - [`PhaseGate`]: the one-flag handoff between the interactive display
//!   thread and the profiling worker.
//!
//! The windowing/canvas layer, image pixel transforms and process spawning
//! stay outside; they consume plain values from here.

pub use colorchart_cht as cht;
pub use colorchart_core as geometry;

pub mod config;
pub mod generate;
pub mod phase;
pub mod session;
pub mod wb;

pub use config::{ConfigError, ProfileConfig};
pub use phase::{Cancelled, PhaseGate};
pub use session::{FrameState, LoadedChart, ScenePatch, Session};
pub use wb::WbCoefficients;

pub use colorchart_cht::{ChartDescriptor, ChtError, PatchGrid};
pub use colorchart_core::{Quad, StartCorner, ViewScale};
