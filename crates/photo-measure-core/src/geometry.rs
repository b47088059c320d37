//! Pixel-space geometry primitives.

use crate::MeasureError;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A pixel coordinate `(x, y)` as picked on the source image.
pub type Point2D = Point2<f64>;

/// Euclidean distance between two pixel coordinates.
///
/// NaN and infinite inputs propagate through IEEE-754 arithmetic.
#[inline]
pub fn distance(p1: &Point2D, p2: &Point2D) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

/// Area enclosed by an open vertex list, via the shoelace formula.
///
/// The cycle is closed implicitly (last vertex connects back to the first).
/// The absolute value of the signed sum is returned, so clockwise and
/// counter-clockwise traversals give the same non-negative area.
///
/// Self-intersecting vertex lists are not rejected: the result is the
/// absolute signed sum, where lobes of opposite winding cancel. It will not
/// match the visually enclosed area in that case.
pub fn polygon_area(vertices: &[Point2D]) -> Result<f64, MeasureError> {
    if vertices.len() < 3 {
        return Err(MeasureError::InvalidGeometry {
            vertices: vertices.len(),
        });
    }

    Ok(shoelace(vertices))
}

fn shoelace(vertices: &[Point2D]) -> f64 {
    let n = vertices.len();
    let mut twice_signed = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        twice_signed += a.x * b.y - b.x * a.y;
    }
    0.5 * twice_signed.abs()
}

pub(crate) fn vertex_mean(vertices: &[Point2D]) -> Point2D {
    let n = vertices.len() as f64;
    let (sx, sy) = vertices
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2D::new(sx / n, sy / n)
}

/// Ordered, implicitly closed polygon with at least three finite vertices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2D>", into = "Vec<Point2D>")]
pub struct Polygon {
    vertices: Vec<Point2D>,
}

impl Polygon {
    /// Validate the vertex count and coordinates and wrap the list.
    pub fn new(vertices: Vec<Point2D>) -> Result<Self, MeasureError> {
        if vertices.len() < 3 {
            return Err(MeasureError::InvalidGeometry {
                vertices: vertices.len(),
            });
        }
        if let Some(index) = vertices
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(MeasureError::NonFiniteVertex { index });
        }
        Ok(Self { vertices })
    }

    #[inline]
    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false`: construction rejects short vertex lists.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Area in square pixels.
    pub fn area_px2(&self) -> f64 {
        shoelace(&self.vertices)
    }

    /// Arithmetic mean of the vertices.
    ///
    /// This is the anchor used to place result labels, not the area centroid.
    pub fn vertex_mean(&self) -> Point2D {
        vertex_mean(&self.vertices)
    }
}

impl TryFrom<Vec<Point2D>> for Polygon {
    type Error = MeasureError;

    fn try_from(vertices: Vec<Point2D>) -> Result<Self, Self::Error> {
        Self::new(vertices)
    }
}

impl From<Polygon> for Vec<Point2D> {
    fn from(p: Polygon) -> Self {
        p.vertices
    }
}

impl AsRef<[Point2D]> for Polygon {
    fn as_ref(&self) -> &[Point2D] {
        &self.vertices
    }
}
