//! Volume and mass from a calibrated height profile.

use crate::depth::HeightProfile;
use crate::error::require_positive;
use crate::MeasureError;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Bulk density used when the caller does not override it, in t/m³.
pub const DEFAULT_DENSITY_T_PER_M3: f64 = 2.98;

/// Caller-supplied integration parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeParams {
    /// Ground-sample distance over the measured region, in meters per pixel.
    ///
    /// Entered separately from the linear scale calibration: the reference
    /// object and the measured material need not share a resolution.
    pub pixel_scale: f64,
    /// Bulk density of the material, in t/m³.
    #[serde(default = "default_density")]
    pub density: f64,
}

fn default_density() -> f64 {
    DEFAULT_DENSITY_T_PER_M3
}

impl VolumeParams {
    pub fn new(pixel_scale: f64) -> Self {
        Self {
            pixel_scale,
            density: DEFAULT_DENSITY_T_PER_M3,
        }
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Real-world footprint of one pixel, in m².
    #[inline]
    pub fn pixel_area_m2(&self) -> f64 {
        self.pixel_scale * self.pixel_scale
    }
}

/// Result of integrating a height profile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeEstimate {
    /// Number of masked pixels.
    pub pixel_count: usize,
    /// Projected base area, in m².
    pub base_area_m2: f64,
    /// Declared peak height, in m.
    pub max_height_m: f64,
    pub mean_height_m: f64,
    pub volume_m3: f64,
    /// Density the mass was computed with, in t/m³.
    pub density: f64,
    /// Estimated mass, in metric tonnes.
    pub mass_t: f64,
}

/// Riemann-sum volume: every masked pixel is a prism of footprint
/// `pixel_scale²` and height equal to its calibrated elevation.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(profile), fields(pixels = profile.pixel_count()))
)]
pub fn integrate_volume(
    profile: &HeightProfile,
    params: &VolumeParams,
) -> Result<VolumeEstimate, MeasureError> {
    require_positive("pixel_scale", params.pixel_scale)?;
    let density = require_positive("density", params.density)?;

    let pixel_area_m2 = params.pixel_area_m2();
    let pixel_count = profile.pixel_count();
    let volume_m3: f64 = profile
        .heights_m()
        .iter()
        .map(|h| h * pixel_area_m2)
        .sum();

    let estimate = VolumeEstimate {
        pixel_count,
        base_area_m2: pixel_count as f64 * pixel_area_m2,
        max_height_m: profile.h_real_max(),
        mean_height_m: profile.mean_height_m(),
        volume_m3,
        density,
        mass_t: volume_m3 * density,
    };

    log::debug!(
        "volume integration: {} px at {:.6} m^2/px => {:.4} m^3, {:.4} t",
        pixel_count,
        pixel_area_m2,
        estimate.volume_m3,
        estimate.mass_t
    );

    Ok(estimate)
}
