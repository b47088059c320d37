//! Real-world area of a polygon under a scale calibration.

use crate::calibration::ScaleCalibration;
use crate::geometry::{polygon_area, vertex_mean, Point2D};
use crate::MeasureError;
use serde::{Deserialize, Serialize};

/// Area of a delimited region, in image and world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaMeasurement {
    pub area_px2: f64,
    pub area_m2: f64,
    /// Mean of the polygon vertices, used to anchor result annotations.
    pub centroid_px: Point2D,
}

/// Scale a pixel-space polygon area into square meters.
///
/// The calibration comes from one reference segment, so the same ratio is
/// applied on both axes: `area_m2 = area_px2 * meters_per_pixel^2`.
pub fn quantify_area(
    vertices: &[Point2D],
    scale: &ScaleCalibration,
) -> Result<AreaMeasurement, MeasureError> {
    let area_px2 = polygon_area(vertices)?;
    let mpp = scale.meters_per_pixel();
    let area_m2 = area_px2 * mpp * mpp;

    log::debug!(
        "area: {:.2} px^2 over {} vertices => {:.4} m^2",
        area_px2,
        vertices.len(),
        area_m2
    );

    Ok(AreaMeasurement {
        area_px2,
        area_m2,
        centroid_px: vertex_mean(vertices),
    })
}
