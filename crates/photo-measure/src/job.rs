//! Caller-side measurement jobs: typed inputs, runners and reports.

use crate::raster::rasterize_polygon;
use crate::PipelineError;
use photo_measure_core::{
    quantify_area, AreaMeasurement, CalibrationInput, DepthField, Polygon, ScaleCalibration,
    VolumeEstimate, VolumeParams, VolumeSession,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Area measurement: one reference segment plus the region outline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AreaJob {
    pub calibration: CalibrationInput,
    pub polygon: Polygon,
}

/// Volume measurement over a depth image.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VolumeJob {
    /// Depth image produced by the depth model. Relative paths are resolved
    /// against the job file's directory.
    pub depth_image: PathBuf,
    /// Treat dark pixels as high (see [`crate::depth_field_from_raw`]).
    #[serde(default)]
    pub invert_depth: bool,
    /// Outline of the measured object's base.
    pub polygon: Polygon,
    /// Declared real height of the highest point, in meters.
    pub h_real_max: f64,
    #[serde(flatten)]
    pub params: VolumeParams,
}

/// A job file may request an area measurement, a volume measurement, or both.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MeasurementJob {
    #[serde(default)]
    pub area: Option<AreaJob>,
    #[serde(default)]
    pub volume: Option<VolumeJob>,
}

impl MeasurementJob {
    /// Parse a JSON job file, resolving relative image paths against its
    /// parent directory.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut job: MeasurementJob = serde_json::from_str(&text)?;
        if let (Some(vol), Some(dir)) = (job.volume.as_mut(), path.parent()) {
            if vol.depth_image.is_relative() {
                vol.depth_image = dir.join(&vol.depth_image);
            }
        }
        Ok(job)
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct AreaReport {
    pub scale: ScaleCalibration,
    pub measurement: AreaMeasurement,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct JobReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeEstimate>,
}

/// Calibrate against the reference segment and measure the polygon.
pub fn run_area(job: &AreaJob) -> Result<AreaReport, PipelineError> {
    let scale = job.calibration.calibrate()?;
    let measurement = quantify_area(job.polygon.vertices(), &scale)?;
    Ok(AreaReport { scale, measurement })
}

/// Run the volume pipeline on an in-memory depth field.
///
/// The polygon is rasterized onto the depth grid, then the session steps
/// run in order: mask, normalize, integrate.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(vertices = polygon.len()))
)]
pub fn measure_volume(
    depth: DepthField,
    polygon: &Polygon,
    h_real_max: f64,
    params: &VolumeParams,
) -> Result<VolumeEstimate, PipelineError> {
    let (w, h) = depth.dims();
    let mask = rasterize_polygon(polygon, w, h);
    log::debug!("region mask: {} of {} px selected", mask.count(), w * h);

    let session = VolumeSession::new()
        .with_depth(depth)
        .with_mask(mask)?
        .normalize(h_real_max)?
        .integrate(params)?;
    Ok(*session.volume()?)
}

/// Load the depth image and run [`measure_volume`].
#[cfg(feature = "image")]
pub fn run_volume(job: &VolumeJob) -> Result<VolumeEstimate, PipelineError> {
    let depth = crate::depth_field_from_image(&job.depth_image, job.invert_depth)?;
    measure_volume(depth, &job.polygon, job.h_real_max, &job.params)
}

/// Run every section present in the job.
#[cfg(feature = "image")]
pub fn run_job(job: &MeasurementJob) -> Result<JobReport, PipelineError> {
    let area = job.area.as_ref().map(run_area).transpose()?;
    let volume = job.volume.as_ref().map(run_volume).transpose()?;
    Ok(JobReport { area, volume })
}
