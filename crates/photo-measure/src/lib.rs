//! High-level facade for the `photo-measure-*` workspace.
//!
//! This crate provides:
//! - a re-export of the numeric engine as [`core`],
//! - adapters for the engine's external collaborators: depth-model output
//!   to [`core::DepthField`], polygon rasterization to [`core::RegionMask`],
//! - JSON-configurable measurement jobs and the `photo-measure` CLI
//!   (feature `cli`).
//!
//! ## Quickstart
//!
//! ```no_run
//! use photo_measure::core::{Point2D, Polygon, VolumeParams};
//! use photo_measure::{depth_field_from_image, measure_volume};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let depth = depth_field_from_image("pile_depth.png", false)?;
//! let base = Polygon::new(vec![
//!     Point2D::new(120.0, 400.0),
//!     Point2D::new(610.0, 380.0),
//!     Point2D::new(650.0, 700.0),
//!     Point2D::new(90.0, 720.0),
//! ])?;
//! let estimate = measure_volume(depth, &base, 5.0, &VolumeParams::new(0.05))?;
//! println!("{:.2} m^3, {:.2} t", estimate.volume_m3, estimate.mass_t);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `photo_measure::core`: geometry, scale calibration, area, height
//!   normalization, volume integration and the session state machine.
//! - [`depth_field_from_raw`] / [`depth_field_from_image`]: model output adapters.
//! - [`rasterize_polygon`]: polygon fill onto the depth grid.
//! - [`MeasurementJob`], [`run_area`], [`measure_volume`], [`run_job`]: job runners.
//! - [`log_directives`]: `-v`-driven log filters for `env_logger` / `tracing`.

pub use photo_measure_core as core;

mod depth;
mod error;
mod job;
mod logging;
mod raster;

pub use depth::depth_field_from_raw;
pub use error::PipelineError;
pub use job::{
    measure_volume, run_area, AreaJob, AreaReport, JobReport, MeasurementJob, VolumeJob,
};
pub use logging::{log_directives, verbosity_level, MEASURE_TARGETS};
pub use raster::rasterize_polygon;

#[cfg(feature = "cli")]
pub use logging::init_logging;
#[cfg(feature = "tracing")]
pub use logging::init_tracing;

#[cfg(feature = "image")]
pub use depth::depth_field_from_image;
#[cfg(feature = "image")]
pub use job::{run_job, run_volume};
