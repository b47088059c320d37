//! Relative depth fields, region masks and height normalization.

use crate::error::require_positive;
use crate::MeasureError;
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Dense relative depth grid, row-major, values in `[0, 1]`.
///
/// Larger values are closer to the camera, i.e. higher above the floor.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthField {
    width: usize,
    height: usize,
    data: Vec<f32>, // row-major, len = w*h
}

impl DepthField {
    /// Wrap a row-major buffer. All values must be finite.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self, MeasureError> {
        check_len(width, height, data.len())?;
        if let Some(bad) = data.iter().find(|v| !v.is_finite()) {
            return Err(MeasureError::InvalidParameter {
                name: "depth",
                value: *bad as f64,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.data[row * self.width + col])
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Boolean selection over a [`DepthField`]; `true` inside the delimited region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionMask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl RegionMask {
    pub fn new(width: usize, height: usize, data: Vec<bool>) -> Result<Self, MeasureError> {
        check_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a mask by evaluating `f(row, col)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.data[row * self.width + col]
    }

    /// Number of selected cells.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&m| m).count()
    }

    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }
}

fn check_len(width: usize, height: usize, len: usize) -> Result<(), MeasureError> {
    match width.checked_mul(height) {
        Some(expected) if expected == len => Ok(()),
        Some(expected) => Err(MeasureError::InvalidBuffer { expected, got: len }),
        None => Err(MeasureError::InvalidBuffer {
            expected: usize::MAX,
            got: len,
        }),
    }
}

/// Masked heights in meters, floor-referenced and scaled to a declared peak.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeightProfile {
    heights_m: Vec<f64>,
    height_scale_factor: f64,
    base_level: f32,
    peak_level: f32,
    h_real_max: f64,
}

impl HeightProfile {
    /// Per-pixel heights in meters, in mask row-major order.
    #[inline]
    pub fn heights_m(&self) -> &[f64] {
        &self.heights_m
    }

    /// Meters per unit of normalized relative depth.
    #[inline]
    pub fn height_scale_factor(&self) -> f64 {
        self.height_scale_factor
    }

    /// Minimum relative depth inside the mask (the floor).
    #[inline]
    pub fn base_level(&self) -> f32 {
        self.base_level
    }

    #[inline]
    pub fn peak_level(&self) -> f32 {
        self.peak_level
    }

    /// The declared real height that the peak was mapped to.
    #[inline]
    pub fn h_real_max(&self) -> f64 {
        self.h_real_max
    }

    /// Number of masked pixels contributing to the profile.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.heights_m.len()
    }

    pub fn mean_height_m(&self) -> f64 {
        self.heights_m.iter().sum::<f64>() / self.heights_m.len() as f64
    }
}

/// Convert masked relative depth into metric heights.
///
/// The minimum masked value becomes the floor (`0 m`) and the maximum is
/// mapped to `h_real_max`; everything in between is scaled linearly. This is
/// a single-anchor calibration: only the declared peak is physically
/// grounded, so any non-linearity in the relative depth survives unchanged.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(depth, mask),
        fields(width = depth.width(), height = depth.height())
    )
)]
pub fn normalize_heights(
    depth: &DepthField,
    mask: &RegionMask,
    h_real_max: f64,
) -> Result<HeightProfile, MeasureError> {
    if depth.dims() != mask.dims() {
        return Err(MeasureError::ShapeMismatch {
            expected: depth.dims(),
            got: mask.dims(),
        });
    }
    let h_real_max = require_positive("h_real_max", h_real_max)?;

    let values: Vec<f32> = depth
        .data
        .iter()
        .zip(&mask.data)
        .filter_map(|(&d, &m)| m.then_some(d))
        .collect();
    if values.is_empty() {
        return Err(MeasureError::EmptyRegion);
    }

    let (base, peak) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let peak_normalized = peak as f64 - base as f64;
    if peak_normalized == 0.0 {
        return Err(MeasureError::FlatRegion { level: base });
    }

    let height_scale_factor = h_real_max / peak_normalized;
    let heights_m: Vec<f64> = values
        .iter()
        .map(|&v| (v as f64 - base as f64) * height_scale_factor)
        .collect();

    log::debug!(
        "height normalization: {} px, base={:.4}, peak={:.4}, scale={:.4} m/unit",
        heights_m.len(),
        base,
        peak,
        height_scale_factor
    );

    Ok(HeightProfile {
        heights_m,
        height_scale_factor,
        base_level: base,
        peak_level: peak,
        h_real_max,
    })
}
