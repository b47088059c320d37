//! Adapters from depth-model output to [`DepthField`].

use crate::PipelineError;
use photo_measure_core::DepthField;

#[cfg(feature = "image")]
use std::path::Path;

/// Min-max normalize a raw model output into a `[0, 1]` [`DepthField`].
///
/// With `invert`, the normalized value `v` is stored as `1 - v`, flipping
/// which end of the model's range is treated as "high".
pub fn depth_field_from_raw(
    width: usize,
    height: usize,
    raw: &[f32],
    invert: bool,
) -> Result<DepthField, PipelineError> {
    let Some(expected) = width.checked_mul(height) else {
        return Err(PipelineError::InvalidDepthBuffer {
            expected: usize::MAX,
            got: raw.len(),
        });
    };
    if raw.len() != expected {
        return Err(PipelineError::InvalidDepthBuffer {
            expected,
            got: raw.len(),
        });
    }

    let (lo, hi) = raw
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;
    if !(range > 0.0) {
        return Err(PipelineError::FlatDepthMap { value: lo });
    }

    let data = raw
        .iter()
        .map(|&v| {
            let n = (v - lo) / range;
            if invert {
                1.0 - n
            } else {
                n
            }
        })
        .collect();

    log::debug!(
        "depth map {}x{}: raw range [{:.4}, {:.4}], invert={}",
        width,
        height,
        lo,
        hi,
        invert
    );

    Ok(DepthField::new(width, height, data)?)
}

/// Load a single-channel depth image (8 or 16 bit) written by a depth model.
///
/// Color images are converted to luma first.
#[cfg(feature = "image")]
pub fn depth_field_from_image(
    path: impl AsRef<Path>,
    invert: bool,
) -> Result<DepthField, PipelineError> {
    let img = ::image::ImageReader::open(path.as_ref())?
        .decode()?
        .to_luma16();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let raw: Vec<f32> = img.as_raw().iter().map(|&v| v as f32).collect();
    depth_field_from_raw(w, h, &raw, invert)
}
