//! Single-image metric measurement engine.
//!
//! Turns pixel coordinates picked on a photo and a relative depth map into
//! real-world lengths, areas, volumes and masses. The crate is purely
//! numeric: it does not decode images, rasterize polygons or run depth
//! models. Callers hand it already-extracted points, polygons, depth grids
//! and masks.
//!
//! ## Area
//!
//! ```
//! use photo_measure_core::{calibrate_scale, quantify_area, LengthUnit, Point2D};
//!
//! # fn main() -> Result<(), photo_measure_core::MeasureError> {
//! // A 100 cm reference spans 50 px.
//! let scale = calibrate_scale(
//!     Point2D::new(0.0, 0.0),
//!     Point2D::new(30.0, 40.0),
//!     100.0,
//!     LengthUnit::Centimeter,
//! )?;
//! let square = [
//!     Point2D::new(0.0, 0.0),
//!     Point2D::new(10.0, 0.0),
//!     Point2D::new(10.0, 10.0),
//!     Point2D::new(0.0, 10.0),
//! ];
//! let area = quantify_area(&square, &scale)?;
//! assert!((area.area_m2 - 0.04).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```
//!
//! ## Volume
//!
//! 1. Attach a relative [`DepthField`] (`[0, 1]`, larger = higher).
//! 2. Attach a [`RegionMask`] selecting the measured object.
//! 3. [`normalize_heights`]: the masked minimum becomes the floor and the
//!    masked maximum is mapped to a declared real peak height.
//! 4. [`integrate_volume`]: sum `height * pixel_scale²` over the mask.
//!
//! [`VolumeSession`] enforces that order and reports
//! [`MeasureError::PrerequisiteMissing`] when a step is skipped.

mod area;
mod calibration;
mod depth;
mod error;
mod geometry;
mod session;
mod volume;

pub use area::{quantify_area, AreaMeasurement};
pub use calibration::{
    calibrate_scale, CalibrationInput, LengthUnit, ParseUnitError, ScaleCalibration,
};
pub use depth::{normalize_heights, DepthField, HeightProfile, RegionMask};
pub use error::MeasureError;
pub use geometry::{distance, polygon_area, Point2D, Polygon};
pub use session::{SessionStage, VolumeSession};
pub use volume::{integrate_volume, VolumeEstimate, VolumeParams, DEFAULT_DENSITY_T_PER_M3};
