//! Two-point linear scale calibration.

use crate::geometry::{distance, Point2D};
use crate::MeasureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Linear unit of a user-supplied reference length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    #[serde(alias = "mm")]
    Millimeter,
    #[serde(alias = "cm")]
    Centimeter,
    #[serde(alias = "m")]
    Meter,
}

impl LengthUnit {
    /// How many of this unit make up one meter.
    #[inline]
    pub fn per_meter(self) -> f64 {
        match self {
            LengthUnit::Millimeter => 1000.0,
            LengthUnit::Centimeter => 100.0,
            LengthUnit::Meter => 1.0,
        }
    }

    /// Convert a length expressed in this unit to meters.
    #[inline]
    pub fn to_meters(self, length: f64) -> f64 {
        length / self.per_meter()
    }

    #[inline]
    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Returned when a unit string is not one of `mm`, `cm`, `m`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown length unit '{0}' (expected mm, cm or m)")]
pub struct ParseUnitError(pub String);

impl FromStr for LengthUnit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Ok(LengthUnit::Millimeter),
            "cm" | "centimeter" | "centimeters" => Ok(LengthUnit::Centimeter),
            "m" | "meter" | "meters" => Ok(LengthUnit::Meter),
            _ => Err(ParseUnitError(s.to_string())),
        }
    }
}

/// Reference segment picked on the image plus its known real length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationInput {
    pub p1: Point2D,
    pub p2: Point2D,
    /// Real length of the `p1`-`p2` segment, expressed in `unit`.
    pub reference_length: f64,
    /// Required: a bare number is never assumed to be meters.
    pub unit: LengthUnit,
}

/// Metric-per-pixel ratio derived from a single reference segment.
///
/// All downstream computation uses `meters_per_pixel`; `unit` only records
/// what the user typed so results can be echoed back in that unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScaleCalibration {
    meters_per_pixel: f64,
    pixel_distance: f64,
    unit: LengthUnit,
}

impl ScaleCalibration {
    #[inline]
    pub fn meters_per_pixel(&self) -> f64 {
        self.meters_per_pixel
    }

    /// Length of the reference segment in pixels.
    #[inline]
    pub fn pixel_distance(&self) -> f64 {
        self.pixel_distance
    }

    #[inline]
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// The same ratio expressed in the unit the user supplied.
    pub fn units_per_pixel(&self) -> f64 {
        self.meters_per_pixel * self.unit.per_meter()
    }
}

/// Derive `meters_per_pixel = reference_meters / |p2 - p1|`.
///
/// Fails with [`MeasureError::DegenerateCalibration`] when the two points
/// coincide, when either point has a non-finite coordinate, or when the
/// reference length is not a finite positive number.
#[cfg_attr(feature = "tracing", instrument(level = "debug"))]
pub fn calibrate_scale(
    p1: Point2D,
    p2: Point2D,
    reference_length: f64,
    unit: LengthUnit,
) -> Result<ScaleCalibration, MeasureError> {
    if !(reference_length.is_finite() && reference_length > 0.0) {
        return Err(MeasureError::DegenerateCalibration {
            reason: "reference length must be positive",
        });
    }

    let pixel_distance = distance(&p1, &p2);
    if !pixel_distance.is_finite() {
        return Err(MeasureError::DegenerateCalibration {
            reason: "calibration point distance is not finite",
        });
    }
    if pixel_distance == 0.0 {
        return Err(MeasureError::DegenerateCalibration {
            reason: "calibration points coincide",
        });
    }

    let reference_meters = unit.to_meters(reference_length);
    let meters_per_pixel = reference_meters / pixel_distance;

    log::debug!(
        "scale calibration: {:.2} px <-> {} {} => {:.6} m/px",
        pixel_distance,
        reference_length,
        unit,
        meters_per_pixel
    );

    Ok(ScaleCalibration {
        meters_per_pixel,
        pixel_distance,
        unit,
    })
}

impl CalibrationInput {
    pub fn calibrate(&self) -> Result<ScaleCalibration, MeasureError> {
        calibrate_scale(self.p1, self.p2, self.reference_length, self.unit)
    }
}
